//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::User;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub login_name: String,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDto {
    pub fn from_domain(u: User) -> Self {
        Self {
            id: u.id.unwrap_or_default(),
            login_name: u.login_name,
            email_address: u.email_address,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Body for creating or updating a user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserRequest {
    #[validate(length(min = 1, max = 64))]
    pub login_name: String,
    #[validate(email)]
    pub email_address: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
}

impl UserRequest {
    pub fn into_domain(self, id: Option<i64>) -> User {
        let mut user = User::new(self.login_name, self.email_address);
        user.id = id;
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user
    }
}
