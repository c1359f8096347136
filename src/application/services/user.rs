//! User business logic

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::crud::CrudService;
use crate::domain::{
    CrudRepository, DomainError, DomainResult, RepositoryProvider, ReviewStore, User,
    UserRepository,
};

/// Service for user operations
pub struct UserService {
    store: Arc<dyn ReviewStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CrudService<User, i64> for UserService {
    async fn get_all(&self) -> DomainResult<Vec<User>> {
        self.store.users().find_all().await
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<User> {
        self.store
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn upsert(&self, mut user: User) -> DomainResult<User> {
        user.login_name = user.login_name.trim().to_string();
        user.email_address = user.email_address.trim().to_string();
        if user.login_name.is_empty() {
            return Err(DomainError::Validation("login name must not be blank".into()));
        }

        let uow = self.store.begin().await?;
        if let Some(other) = uow.users().find_by_login_name(&user.login_name).await? {
            if other.id != user.id {
                return Err(DomainError::Validation(format!(
                    "duplicate login name '{}'",
                    user.login_name
                )));
            }
        }
        if let Some(other) = uow
            .users()
            .find_by_email_address(&user.email_address)
            .await?
        {
            if other.id != user.id {
                return Err(DomainError::Validation(format!(
                    "duplicate email address '{}'",
                    user.email_address
                )));
            }
        }

        let saved = uow.users().upsert(user).await?;
        uow.commit().await?;
        info!(user_id = saved.id, login_name = %saved.login_name, "User saved");
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        uow.users().delete(id).await?;
        uow.commit().await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}
