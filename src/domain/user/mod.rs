//! User aggregate
//!
//! Contains the User entity and its repository interface.

pub mod model;
pub mod repository;

pub use model::User;
pub use repository::UserRepository;
