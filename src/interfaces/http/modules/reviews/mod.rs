//! Review module: CRUD, filtering and approvals

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
