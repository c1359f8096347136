//! Point-of-sale aggregate
//!
//! Contains the PointOfSale entity and its repository interface.

pub mod model;
pub mod repository;

pub use model::{Campus, PointOfSale, PosType};
pub use repository::PosRepository;
