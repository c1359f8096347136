//! Non-SQL storage backends

pub mod memory;

pub use memory::{InMemoryStore, InMemoryUnitOfWork};
