use async_trait::async_trait;

use super::model::User;
use crate::domain::repositories::{CrudRepository, DomainResult};

#[async_trait]
pub trait UserRepository: CrudRepository<User, i64> {
    async fn find_by_login_name(&self, login_name: &str) -> DomainResult<Option<User>>;
    async fn find_by_email_address(&self, email_address: &str) -> DomainResult<Option<User>>;
}
