//! # Campus Reviews
//!
//! Review service for campus points of sale (cafes, bakeries, cafeterias,
//! vending machines). Users write at most one review per point of sale;
//! other users approve reviews, and a review counts as approved once it
//! reaches the configured number of approvals.
//!
//! ## Architecture
//!
//! - **domain**: entities, approval threshold, repository and unit-of-work ports
//! - **application**: CRUD services and the review approval workflow
//! - **infrastructure**: SeaORM (SQLite) and in-memory stores, migrations
//! - **interfaces**: REST API with Swagger documentation and Prometheus metrics
//! - **server**: runtime lifecycle and tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryStore, SeaOrmStore};

pub use interfaces::http::{create_api_router, ApiState};
