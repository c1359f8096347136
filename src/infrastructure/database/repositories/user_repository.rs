//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use tracing::debug;

use crate::domain::{CrudRepository, DomainError, DomainResult, User, UserRepository};
use crate::infrastructure::database::entities::user;

fn write_err(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        let field = if msg.contains("email_address") {
            "e-mail address"
        } else {
            "login name"
        };
        return DomainError::Validation(format!("duplicate user: {} already taken", field));
    }
    DomainError::from(e)
}

pub(super) fn entity_to_domain(m: user::Model) -> User {
    User {
        id: Some(m.id),
        login_name: m.login_name,
        email_address: m.email_address,
        first_name: m.first_name,
        last_name: m.last_name,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

pub struct SeaOrmUserRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmUserRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c, C> CrudRepository<User, i64> for SeaOrmUserRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(self.conn).await?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn upsert(&self, u: User) -> DomainResult<User> {
        let now = Utc::now();
        let mut model = user::ActiveModel {
            login_name: Set(u.login_name),
            email_address: Set(u.email_address),
            first_name: Set(u.first_name),
            last_name: Set(u.last_name),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = match u.id {
            None => {
                model.created_at = Set(now);
                model.insert(self.conn).await.map_err(write_err)?
            }
            Some(id) => {
                let Some(existing) = user::Entity::find_by_id(id).one(self.conn).await? else {
                    return Err(DomainError::not_found("User", id));
                };
                model.id = Set(id);
                model.created_at = Set(existing.created_at);
                model.update(self.conn).await.map_err(write_err)?
            }
        };
        debug!(user_id = saved.id, login_name = %saved.login_name, "User saved");
        Ok(entity_to_domain(saved))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id).exec(self.conn).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }
}

#[async_trait]
impl<'c, C> UserRepository for SeaOrmUserRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_login_name(&self, login_name: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::LoginName.eq(login_name))
            .one(self.conn)
            .await?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_email_address(&self, email_address: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::EmailAddress.eq(email_address))
            .one(self.conn)
            .await?;
        Ok(model.map(entity_to_domain))
    }
}
