pub mod health;
pub mod metrics;
pub mod pos;
pub mod request_id;
pub mod reviews;
pub mod users;
