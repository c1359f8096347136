//! Repository traits for the domain layer
//!
//! Contains:
//! - `CrudRepository`: generic persistence port shared by every aggregate
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `UnitOfWork`: a provider whose writes commit or roll back together
//! - `ReviewStore`: root port with non-transactional reads plus `begin()`

use async_trait::async_trait;

use super::pos::PosRepository;
use super::review::ReviewRepository;
use super::user::UserRepository;

pub use crate::shared::errors::{DomainError, DomainResult};

// ── CrudRepository ──────────────────────────────────────────────

/// Basic persistence operations, parameterized by entity and identifier.
///
/// `upsert` inserts when the entity carries no identifier and updates in
/// place otherwise; it returns the stored entity including any assigned id.
#[async_trait]
pub trait CrudRepository<E, Id>: Send + Sync
where
    E: Send + 'static,
    Id: Send + 'static,
{
    async fn find_by_id(&self, id: Id) -> DomainResult<Option<E>>;
    async fn find_all(&self) -> DomainResult<Vec<E>>;
    async fn upsert(&self, entity: E) -> DomainResult<E>;
    async fn delete(&self, id: Id) -> DomainResult<()>;
}

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Repositories borrow the provider, so the ones handed out by a
/// [`UnitOfWork`] cannot outlive it:
///
/// ```ignore
/// let uow = store.begin().await?;
/// let pos = uow.points_of_sale().find_by_id(1).await?;
/// uow.reviews().upsert(review).await?;
/// uow.commit().await?;
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn points_of_sale(&self) -> Box<dyn PosRepository + '_>;
    fn users(&self) -> Box<dyn UserRepository + '_>;
    fn reviews(&self) -> Box<dyn ReviewRepository + '_>;
}

// ── UnitOfWork ──────────────────────────────────────────────────

/// Transaction boundary for a single mutating domain operation.
///
/// Reads and writes issued through its repositories are isolated from
/// other units of work. Dropping it without calling [`commit`](Self::commit)
/// discards every write.
#[async_trait]
pub trait UnitOfWork: RepositoryProvider {
    async fn commit(self: Box<Self>) -> DomainResult<()>;
    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}

/// Root persistence port handed to the application services.
#[async_trait]
pub trait ReviewStore: RepositoryProvider {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;

    /// Cheap liveness probe of the backing storage.
    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}
