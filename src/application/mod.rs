//! Application layer - use cases on top of the domain ports

pub mod services;

pub use services::{CrudService, PosService, ReviewService, UserService};
