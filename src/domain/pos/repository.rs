//! Point-of-sale repository interface

use async_trait::async_trait;

use super::model::PointOfSale;
use crate::domain::repositories::{CrudRepository, DomainResult};

#[async_trait]
pub trait PosRepository: CrudRepository<PointOfSale, i64> {
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<PointOfSale>>;
}
