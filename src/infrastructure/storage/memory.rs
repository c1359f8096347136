//! In-memory storage implementation
//!
//! Writers are serialized: a unit of work holds the writer lock for its whole
//! lifetime and mutates a staged copy of the state, which replaces the
//! committed state on commit. Readers only ever see committed state. Writes
//! through the store's own repositories take the same writer lock for the
//! duration of the single write.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};
use tracing::debug;

use crate::domain::{
    CrudRepository, DomainError, DomainResult, PointOfSale, PosRepository, RepositoryProvider,
    Review, ReviewRepository, ReviewStore, UnitOfWork, User, UserRepository,
};

// ── State ───────────────────────────────────────────────────────

/// Reviews are stored by reference and re-joined with their point of sale
/// and author on every read.
#[derive(Debug, Clone)]
struct ReviewRecord {
    id: i64,
    pos_id: i64,
    author_id: i64,
    review: String,
    approval_count: u32,
    approved: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct MemoryState {
    points_of_sale: BTreeMap<i64, PointOfSale>,
    users: BTreeMap<i64, User>,
    reviews: BTreeMap<i64, ReviewRecord>,
    next_pos_id: i64,
    next_user_id: i64,
    next_review_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            points_of_sale: BTreeMap::new(),
            users: BTreeMap::new(),
            reviews: BTreeMap::new(),
            next_pos_id: 1,
            next_user_id: 1,
            next_review_id: 1,
        }
    }
}

impl MemoryState {
    fn hydrate(&self, record: &ReviewRecord) -> DomainResult<Review> {
        let pos = self
            .points_of_sale
            .get(&record.pos_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("PointOfSale", record.pos_id))?;
        let author = self
            .users
            .get(&record.author_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("User", record.author_id))?;
        Ok(Review {
            id: Some(record.id),
            pos,
            author,
            review: record.review.clone(),
            approval_count: record.approval_count,
            approved: record.approved,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    fn hydrate_where<F>(&self, predicate: F) -> DomainResult<Vec<Review>>
    where
        F: Fn(&ReviewRecord) -> bool,
    {
        self.reviews
            .values()
            .filter(|r| predicate(r))
            .map(|r| self.hydrate(r))
            .collect()
    }
}

fn read(state: &RwLock<MemoryState>) -> DomainResult<RwLockReadGuard<'_, MemoryState>> {
    state
        .read()
        .map_err(|_| DomainError::Storage("in-memory state lock poisoned".into()))
}

fn write(state: &RwLock<MemoryState>) -> DomainResult<RwLockWriteGuard<'_, MemoryState>> {
    state
        .write()
        .map_err(|_| DomainError::Storage("in-memory state lock poisoned".into()))
}

/// `None` inside a unit of work, which already holds the writer lock.
async fn lock_writer(writer: Option<&Mutex<()>>) -> Option<MutexGuard<'_, ()>> {
    match writer {
        Some(lock) => Some(lock.lock().await),
        None => None,
    }
}

fn persisted_id(id: Option<i64>, entity: &'static str) -> DomainResult<i64> {
    id.ok_or_else(|| DomainError::Validation(format!("{} reference has no id", entity)))
}

// ── Repositories ────────────────────────────────────────────────

pub struct MemoryPosRepository<'a> {
    state: &'a RwLock<MemoryState>,
    writer: Option<&'a Mutex<()>>,
}

#[async_trait]
impl<'a> CrudRepository<PointOfSale, i64> for MemoryPosRepository<'a> {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<PointOfSale>> {
        Ok(read(self.state)?.points_of_sale.get(&id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<PointOfSale>> {
        Ok(read(self.state)?.points_of_sale.values().cloned().collect())
    }

    async fn upsert(&self, mut pos: PointOfSale) -> DomainResult<PointOfSale> {
        let _writer = lock_writer(self.writer).await;
        let mut state = write(self.state)?;
        let now = Utc::now();
        match pos.id {
            Some(id) => {
                let Some(existing) = state.points_of_sale.get(&id) else {
                    return Err(DomainError::not_found("PointOfSale", id));
                };
                pos.created_at = existing.created_at;
                pos.updated_at = now;
            }
            None => {
                let id = state.next_pos_id;
                state.next_pos_id += 1;
                pos.id = Some(id);
                pos.created_at = now;
                pos.updated_at = now;
            }
        }
        let id = persisted_id(pos.id, "PointOfSale")?;
        state.points_of_sale.insert(id, pos.clone());
        Ok(pos)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let _writer = lock_writer(self.writer).await;
        let mut state = write(self.state)?;
        if state.points_of_sale.remove(&id).is_none() {
            return Err(DomainError::not_found("PointOfSale", id));
        }
        state.reviews.retain(|_, r| r.pos_id != id);
        Ok(())
    }
}

#[async_trait]
impl<'a> PosRepository for MemoryPosRepository<'a> {
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<PointOfSale>> {
        Ok(read(self.state)?
            .points_of_sale
            .values()
            .find(|p| p.name == name)
            .cloned())
    }
}

pub struct MemoryUserRepository<'a> {
    state: &'a RwLock<MemoryState>,
    writer: Option<&'a Mutex<()>>,
}

#[async_trait]
impl<'a> CrudRepository<User, i64> for MemoryUserRepository<'a> {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(read(self.state)?.users.get(&id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        Ok(read(self.state)?.users.values().cloned().collect())
    }

    async fn upsert(&self, mut user: User) -> DomainResult<User> {
        let _writer = lock_writer(self.writer).await;
        let mut state = write(self.state)?;
        let now = Utc::now();
        match user.id {
            Some(id) => {
                let Some(existing) = state.users.get(&id) else {
                    return Err(DomainError::not_found("User", id));
                };
                user.created_at = existing.created_at;
                user.updated_at = now;
            }
            None => {
                let id = state.next_user_id;
                state.next_user_id += 1;
                user.id = Some(id);
                user.created_at = now;
                user.updated_at = now;
            }
        }
        let id = persisted_id(user.id, "User")?;
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let _writer = lock_writer(self.writer).await;
        let mut state = write(self.state)?;
        if state.users.remove(&id).is_none() {
            return Err(DomainError::not_found("User", id));
        }
        state.reviews.retain(|_, r| r.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl<'a> UserRepository for MemoryUserRepository<'a> {
    async fn find_by_login_name(&self, login_name: &str) -> DomainResult<Option<User>> {
        Ok(read(self.state)?
            .users
            .values()
            .find(|u| u.login_name == login_name)
            .cloned())
    }

    async fn find_by_email_address(&self, email_address: &str) -> DomainResult<Option<User>> {
        Ok(read(self.state)?
            .users
            .values()
            .find(|u| u.email_address == email_address)
            .cloned())
    }
}

pub struct MemoryReviewRepository<'a> {
    state: &'a RwLock<MemoryState>,
    writer: Option<&'a Mutex<()>>,
}

#[async_trait]
impl<'a> CrudRepository<Review, i64> for MemoryReviewRepository<'a> {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Review>> {
        let state = read(self.state)?;
        let review = match state.reviews.get(&id) {
            Some(record) => Some(state.hydrate(record)?),
            None => None,
        };
        Ok(review)
    }

    async fn find_all(&self) -> DomainResult<Vec<Review>> {
        read(self.state)?.hydrate_where(|_| true)
    }

    async fn upsert(&self, review: Review) -> DomainResult<Review> {
        let _writer = lock_writer(self.writer).await;
        let mut state = write(self.state)?;
        let pos_id = persisted_id(review.pos_id(), "PointOfSale")?;
        let author_id = persisted_id(review.author_id(), "User")?;
        if !state.points_of_sale.contains_key(&pos_id) {
            return Err(DomainError::not_found("PointOfSale", pos_id));
        }
        if !state.users.contains_key(&author_id) {
            return Err(DomainError::not_found("User", author_id));
        }

        // Mirrors the unique (pos_id, author_id) index of the SQL schema.
        let clash = state.reviews.values().any(|r| {
            r.pos_id == pos_id && r.author_id == author_id && Some(r.id) != review.id
        });
        if clash {
            return Err(DomainError::Validation(
                "duplicate review: user already created a review for this point of sale".into(),
            ));
        }

        let now = Utc::now();
        let (id, created_at) = match review.id {
            Some(id) => {
                let Some(existing) = state.reviews.get(&id) else {
                    return Err(DomainError::not_found("Review", id));
                };
                (id, existing.created_at)
            }
            None => {
                let id = state.next_review_id;
                state.next_review_id += 1;
                (id, now)
            }
        };

        let record = ReviewRecord {
            id,
            pos_id,
            author_id,
            review: review.review,
            approval_count: review.approval_count,
            approved: review.approved,
            created_at,
            updated_at: now,
        };
        let stored = state.hydrate(&record)?;
        state.reviews.insert(id, record);
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let _writer = lock_writer(self.writer).await;
        if write(self.state)?.reviews.remove(&id).is_none() {
            return Err(DomainError::not_found("Review", id));
        }
        Ok(())
    }
}

#[async_trait]
impl<'a> ReviewRepository for MemoryReviewRepository<'a> {
    async fn filter_by_pos_and_author(
        &self,
        pos_id: i64,
        author_id: i64,
    ) -> DomainResult<Vec<Review>> {
        read(self.state)?.hydrate_where(|r| r.pos_id == pos_id && r.author_id == author_id)
    }

    async fn filter_by_pos_and_approved(
        &self,
        pos_id: i64,
        approved: bool,
    ) -> DomainResult<Vec<Review>> {
        read(self.state)?.hydrate_where(|r| r.pos_id == pos_id && r.approved == approved)
    }
}

// ── InMemoryStore ───────────────────────────────────────────────

/// In-memory storage for development and testing
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
    writer: Arc<Mutex<()>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            writer: Arc::new(Mutex::new(())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStore {
    fn points_of_sale(&self) -> Box<dyn PosRepository + '_> {
        Box::new(MemoryPosRepository {
            state: &self.state,
            writer: Some(self.writer.as_ref()),
        })
    }

    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(MemoryUserRepository {
            state: &self.state,
            writer: Some(self.writer.as_ref()),
        })
    }

    fn reviews(&self) -> Box<dyn ReviewRepository + '_> {
        Box::new(MemoryReviewRepository {
            state: &self.state,
            writer: Some(self.writer.as_ref()),
        })
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let guard = self.writer.clone().lock_owned().await;
        let snapshot = read(&self.state)?.clone();
        debug!("In-memory unit of work started");
        Ok(Box::new(InMemoryUnitOfWork {
            committed: Arc::clone(&self.state),
            staged: RwLock::new(snapshot),
            _writer: guard,
        }))
    }
}

/// Unit of work over a staged snapshot of the in-memory state
pub struct InMemoryUnitOfWork {
    committed: Arc<RwLock<MemoryState>>,
    staged: RwLock<MemoryState>,
    _writer: OwnedMutexGuard<()>,
}

impl RepositoryProvider for InMemoryUnitOfWork {
    fn points_of_sale(&self) -> Box<dyn PosRepository + '_> {
        Box::new(MemoryPosRepository {
            state: &self.staged,
            writer: None,
        })
    }

    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(MemoryUserRepository {
            state: &self.staged,
            writer: None,
        })
    }

    fn reviews(&self) -> Box<dyn ReviewRepository + '_> {
        Box::new(MemoryReviewRepository {
            state: &self.staged,
            writer: None,
        })
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let this = *self;
        let staged = this
            .staged
            .into_inner()
            .map_err(|_| DomainError::Storage("in-memory state lock poisoned".into()))?;
        *write(&this.committed)? = staged;
        debug!("In-memory unit of work committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        debug!("In-memory unit of work rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Campus, PosType};

    async fn seed(store: &InMemoryStore) -> (PointOfSale, User) {
        let pos = store
            .points_of_sale()
            .upsert(PointOfSale::new("Mensa", PosType::Cafeteria, Campus::Bergheim))
            .await
            .unwrap();
        let user = store
            .users()
            .upsert(User::new("jane", "jane@uni.de"))
            .await
            .unwrap();
        (pos, user)
    }

    #[tokio::test]
    async fn upsert_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let (pos, user) = seed(&store).await;
        assert_eq!(pos.id, Some(1));
        assert_eq!(user.id, Some(1));

        let second = store
            .points_of_sale()
            .upsert(PointOfSale::new("Botanik", PosType::Cafe, Campus::InfNeuenheimerFeld))
            .await
            .unwrap();
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn review_store_enforces_pos_author_uniqueness() {
        let store = InMemoryStore::new();
        let (pos, user) = seed(&store).await;

        store
            .reviews()
            .upsert(Review::new(pos.clone(), user.clone(), "first"))
            .await
            .unwrap();
        let err = store
            .reviews()
            .upsert(Review::new(pos, user, "second"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn reviews_are_joined_with_current_pos() {
        let store = InMemoryStore::new();
        let (mut pos, user) = seed(&store).await;
        let saved = store
            .reviews()
            .upsert(Review::new(pos.clone(), user, "tasty"))
            .await
            .unwrap();

        pos.name = "Mensa Bergheim".into();
        store.points_of_sale().upsert(pos).await.unwrap();

        let loaded = store
            .reviews()
            .find_by_id(saved.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.pos.name, "Mensa Bergheim");
    }

    #[tokio::test]
    async fn uncommitted_unit_of_work_is_discarded() {
        let store = InMemoryStore::new();
        {
            let uow = store.begin().await.unwrap();
            uow.users()
                .upsert(User::new("ghost", "ghost@uni.de"))
                .await
                .unwrap();
            // Not visible outside until commit
            assert!(store.users().find_all().await.unwrap().is_empty());
        }
        assert!(store.users().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_unit_of_work_is_visible() {
        let store = InMemoryStore::new();
        let uow = store.begin().await.unwrap();
        uow.users()
            .upsert(User::new("jane", "jane@uni.de"))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.users().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn direct_write_waits_for_open_unit_of_work() {
        let store = InMemoryStore::new();
        let uow = store.begin().await.unwrap();
        uow.users()
            .upsert(User::new("staged", "staged@uni.de"))
            .await
            .unwrap();

        let direct = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .users()
                    .upsert(User::new("direct", "direct@uni.de"))
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(!direct.is_finished());
        assert!(store.users().find_all().await.unwrap().is_empty());

        uow.commit().await.unwrap();
        let saved = direct.await.unwrap().unwrap();
        assert_eq!(saved.id, Some(2));

        let logins: Vec<_> = store
            .users()
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.login_name)
            .collect();
        assert_eq!(logins, vec!["staged", "direct"]);
    }

    #[tokio::test]
    async fn deleting_pos_removes_its_reviews() {
        let store = InMemoryStore::new();
        let (pos, user) = seed(&store).await;
        store
            .reviews()
            .upsert(Review::new(pos.clone(), user, "ok"))
            .await
            .unwrap();

        store.points_of_sale().delete(pos.id.unwrap()).await.unwrap();
        assert!(store.reviews().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_review_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.reviews().delete(99).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
