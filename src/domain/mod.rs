pub mod pos;
pub mod repositories;
pub mod review;
pub mod user;

// Re-export commonly used types
pub use pos::{Campus, PointOfSale, PosRepository, PosType};
pub use repositories::{
    CrudRepository, DomainError, DomainResult, RepositoryProvider, ReviewStore, UnitOfWork,
};
pub use review::{ApprovalConfig, Review, ReviewRepository};
pub use user::{User, UserRepository};
