//! User domain entity

use chrono::{DateTime, Utc};

/// A person who writes and approves reviews
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// `None` until persisted
    pub id: Option<i64>,
    pub login_name: String,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(login_name: impl Into<String>, email_address: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            login_name: login_name.into(),
            email_address: email_address.into(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Placeholder carrying only an identifier, resolved by the service layer.
    pub fn reference(id: i64) -> Self {
        let mut user = Self::new(String::new(), String::new());
        user.id = Some(id);
        user
    }

    /// Identity comparison; unsaved users never match.
    pub fn is_same_user(&self, other: &User) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}
