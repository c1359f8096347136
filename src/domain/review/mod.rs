//! Review aggregate
//!
//! Contains the Review entity, the approval threshold, and the repository
//! interface.

pub mod approval;
pub mod model;
pub mod repository;

pub use approval::ApprovalConfig;
pub use model::Review;
pub use repository::ReviewRepository;
