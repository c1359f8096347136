//! SeaORM implementation of ReviewStore and UnitOfWork

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::debug;

use crate::domain::{
    DomainResult, PosRepository, RepositoryProvider, ReviewRepository, ReviewStore, UnitOfWork,
    UserRepository,
};

use super::pos_repository::SeaOrmPosRepository;
use super::review_repository::SeaOrmReviewRepository;
use super::user_repository::SeaOrmUserRepository;

/// Store backed by a SeaORM connection pool.
///
/// Repositories handed out directly run in autocommit mode; mutating
/// operations go through [`ReviewStore::begin`], which opens a database
/// transaction:
///
/// ```ignore
/// let store = SeaOrmStore::new(db.clone());
/// let uow = store.begin().await?;
/// let pos = uow.points_of_sale().find_by_id(1).await?;
/// uow.commit().await?;
/// ```
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl RepositoryProvider for SeaOrmStore {
    fn points_of_sale(&self) -> Box<dyn PosRepository + '_> {
        Box::new(SeaOrmPosRepository::new(&self.db))
    }

    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(SeaOrmUserRepository::new(&self.db))
    }

    fn reviews(&self) -> Box<dyn ReviewRepository + '_> {
        Box::new(SeaOrmReviewRepository::new(&self.db))
    }
}

#[async_trait]
impl ReviewStore for SeaOrmStore {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.db.begin().await?;
        debug!("Database transaction started");
        Ok(Box::new(SeaOrmUnitOfWork { txn }))
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db.ping().await?;
        Ok(())
    }
}

/// Unit of work over one database transaction.
///
/// Dropping it without commit rolls the transaction back.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

impl RepositoryProvider for SeaOrmUnitOfWork {
    fn points_of_sale(&self) -> Box<dyn PosRepository + '_> {
        Box::new(SeaOrmPosRepository::new(&self.txn))
    }

    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(SeaOrmUserRepository::new(&self.txn))
    }

    fn reviews(&self) -> Box<dyn ReviewRepository + '_> {
        Box::new(SeaOrmReviewRepository::new(&self.txn))
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await?;
        debug!("Database transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        self.txn.rollback().await?;
        debug!("Database transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Campus, CrudRepository, DomainError, PointOfSale, PosType, Review, User};
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, DatabaseConfig};
    use sea_orm_migration::MigratorTrait;

    async fn setup() -> SeaOrmStore {
        let db = init_database(&DatabaseConfig::sqlite_in_memory())
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmStore::new(db)
    }

    async fn seed(store: &SeaOrmStore) -> (PointOfSale, User) {
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
    async fn review_round_trips_with_joined_pos_and_author() {
        let store = setup().await;
        let (pos, user) = seed(&store).await;

        let saved = store
            .reviews()
            .upsert(Review::new(pos.clone(), user.clone(), "Good coffee"))
            .await
            .unwrap();
        assert!(saved.id.is_some());

        let loaded = store
            .reviews()
            .find_by_id(saved.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.pos.name, "Mensa");
        assert_eq!(loaded.author.login_name, "jane");
        assert_eq!(loaded.approval_count, 0);
        assert!(!loaded.approved);
    }

    #[tokio::test]
    async fn unique_index_rejects_second_review() {
        let store = setup().await;
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
        assert!(err.is_validation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn filter_by_pos_and_approved() {
        let store = setup().await;
        let (pos, user) = seed(&store).await;
        let other = store
            .users()
            .upsert(User::new("john", "john@uni.de"))
            .await
            .unwrap();

        let mut approved = Review::new(pos.clone(), user, "great");
        approved.approval_count = 3;
        approved.approved = true;
        store.reviews().upsert(approved).await.unwrap();
        store
            .reviews()
            .upsert(Review::new(pos.clone(), other, "meh"))
            .await
            .unwrap();

        let pos_id = pos.id.unwrap();
        let yes = store
            .reviews()
            .filter_by_pos_and_approved(pos_id, true)
            .await
            .unwrap();
        let no = store
            .reviews()
            .filter_by_pos_and_approved(pos_id, false)
            .await
            .unwrap();
        assert_eq!(yes.len(), 1);
        assert_eq!(yes[0].review, "great");
        assert_eq!(no.len(), 1);
        assert_eq!(no[0].review, "meh");
    }

    #[tokio::test]
    async fn rolled_back_transaction_leaves_no_trace() {
        let store = setup().await;

        let uow = store.begin().await.unwrap();
        uow.users()
            .upsert(User::new("ghost", "ghost@uni.de"))
            .await
            .unwrap();
        uow.rollback().await.unwrap();

        assert!(store.users().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() {
        let store = setup().await;

        let uow = store.begin().await.unwrap();
        uow.users()
            .upsert(User::new("jane", "jane@uni.de"))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let users = store.users().find_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].login_name, "jane");
    }

    #[tokio::test]
    async fn deleting_author_cascades_to_reviews() {
        let store = setup().await;
        let (pos, user) = seed(&store).await;
        store
            .reviews()
            .upsert(Review::new(pos, user.clone(), "bye"))
            .await
            .unwrap();

        store.users().delete(user.id.unwrap()).await.unwrap();
        assert!(store.reviews().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn updating_missing_review_is_not_found() {
        let store = setup().await;
        let (pos, user) = seed(&store).await;
        let mut review = Review::new(pos, user, "ghost");
        review.id = Some(404);

        let err = store.reviews().upsert(review).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unique_index_violation_inside_transaction_is_validation() {
        let store = setup().await;
        let (pos, user) = seed(&store).await;
        store
            .reviews()
            .upsert(Review::new(pos.clone(), user.clone(), "first"))
            .await
            .unwrap();

        let uow = store.begin().await.unwrap();
        let err = uow
            .reviews()
            .upsert(Review::new(pos, user, "racing insert"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::Validation(ref msg) if msg.starts_with("duplicate review")),
            "unexpected error: {err}"
        );
        uow.rollback().await.unwrap();

        let reviews = store.reviews().find_all().await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].review, "first");
    }

    #[tokio::test]
    async fn duplicate_pos_name_is_validation() {
        let store = setup().await;
        seed(&store).await;

        let err = store
            .points_of_sale()
            .upsert(PointOfSale::new("Mensa", PosType::Cafe, Campus::Altstadt))
            .await
            .unwrap_err();
        assert!(err.is_validation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn duplicate_login_or_email_is_validation() {
        let store = setup().await;
        seed(&store).await;

        let login = store
            .users()
            .upsert(User::new("jane", "other@uni.de"))
            .await
            .unwrap_err();
        assert!(
            matches!(login, DomainError::Validation(ref msg) if msg.contains("login name")),
            "unexpected error: {login}"
        );

        let email = store
            .users()
            .upsert(User::new("janet", "jane@uni.de"))
            .await
            .unwrap_err();
        assert!(
            matches!(email, DomainError::Validation(ref msg) if msg.contains("e-mail address")),
            "unexpected error: {email}"
        );
    }
}
