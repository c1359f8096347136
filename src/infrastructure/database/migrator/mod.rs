//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_points_of_sale;
mod m20240101_000002_create_users;
mod m20240101_000003_create_reviews;

pub use m20240101_000003_create_reviews::REVIEWS_POS_AUTHOR_INDEX;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_points_of_sale::Migration),
            Box::new(m20240101_000002_create_users::Migration),
            Box::new(m20240101_000003_create_reviews::Migration),
        ]
    }
}
