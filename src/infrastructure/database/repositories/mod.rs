//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + the transactional store.

pub mod pos_repository;
pub mod review_repository;
pub mod store;
pub mod user_repository;

pub use store::{SeaOrmStore, SeaOrmUnitOfWork};
