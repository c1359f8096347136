//! Generic CRUD service contract

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Operations every entity service exposes to the API layer.
///
/// Unlike [`CrudRepository`](crate::domain::CrudRepository), lookups by id
/// fail with `NotFound` instead of returning `None`, and every write runs in
/// its own unit of work.
#[async_trait]
pub trait CrudService<E, Id>: Send + Sync
where
    E: Send + 'static,
    Id: Send + 'static,
{
    async fn get_all(&self) -> DomainResult<Vec<E>>;
    async fn get_by_id(&self, id: Id) -> DomainResult<E>;
    async fn upsert(&self, entity: E) -> DomainResult<E>;
    async fn delete(&self, id: Id) -> DomainResult<()>;
}
