//! Point-of-sale business logic

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::crud::CrudService;
use crate::domain::{
    CrudRepository, DomainError, DomainResult, PointOfSale, PosRepository, RepositoryProvider,
    ReviewStore,
};

/// Service for point-of-sale operations
pub struct PosService {
    store: Arc<dyn ReviewStore>,
}

impl PosService {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CrudService<PointOfSale, i64> for PosService {
    async fn get_all(&self) -> DomainResult<Vec<PointOfSale>> {
        self.store.points_of_sale().find_all().await
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<PointOfSale> {
        self.store
            .points_of_sale()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("PointOfSale", id))
    }

    async fn upsert(&self, mut pos: PointOfSale) -> DomainResult<PointOfSale> {
        pos.name = pos.name.trim().to_string();
        if pos.name.is_empty() {
            return Err(DomainError::Validation(
                "point of sale name must not be blank".into(),
            ));
        }

        let uow = self.store.begin().await?;
        if let Some(other) = uow.points_of_sale().find_by_name(&pos.name).await? {
            if other.id != pos.id {
                return Err(DomainError::Validation(format!(
                    "duplicate point of sale name '{}'",
                    pos.name
                )));
            }
        }

        let saved = uow.points_of_sale().upsert(pos).await?;
        uow.commit().await?;
        info!(pos_id = saved.id, name = %saved.name, "Point of sale saved");
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        uow.points_of_sale().delete(id).await?;
        uow.commit().await?;
        info!(pos_id = id, "Point of sale deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Campus, PosType, Review, User};
    use crate::infrastructure::storage::InMemoryStore;

    fn service() -> (Arc<InMemoryStore>, PosService) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), PosService::new(store))
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let (_, service) = service();
        let saved = service
            .upsert(PointOfSale::new("  Café Botanik ", PosType::Cafe, Campus::InfNeuenheimerFeld))
            .await
            .unwrap();
        assert_eq!(saved.name, "Café Botanik");

        let loaded = service.get_by_id(saved.id.unwrap()).await.unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(service.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (_, service) = service();
        let err = service
            .upsert(PointOfSale::new("   ", PosType::Bakery, Campus::Altstadt))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_but_renaming_self_is_fine() {
        let (_, service) = service();
        let mensa = service
            .upsert(PointOfSale::new("Mensa", PosType::Cafeteria, Campus::Altstadt))
            .await
            .unwrap();

        let err = service
            .upsert(PointOfSale::new("Mensa", PosType::Cafe, Campus::Bergheim))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let mut same = mensa.clone();
        same.description = "Main cafeteria".into();
        let updated = service.upsert(same).await.unwrap();
        assert_eq!(updated.id, mensa.id);
        assert_eq!(updated.description, "Main cafeteria");
    }

    #[tokio::test]
    async fn update_of_missing_pos_is_not_found() {
        let (_, service) = service();
        let mut pos = PointOfSale::new("Ghost", PosType::Cafe, Campus::Altstadt);
        pos.id = Some(77);
        assert!(service.upsert(pos).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_reviews_of_the_pos() {
        let (store, service) = service();
        let pos = service
            .upsert(PointOfSale::new("Mensa", PosType::Cafeteria, Campus::Altstadt))
            .await
            .unwrap();
        let user = store
            .users()
            .upsert(User::new("jane", "jane@uni.de"))
            .await
            .unwrap();
        store
            .reviews()
            .upsert(Review::new(pos.clone(), user, "fine"))
            .await
            .unwrap();

        service.delete(pos.id.unwrap()).await.unwrap();
        assert!(service.get_by_id(pos.id.unwrap()).await.unwrap_err().is_not_found());
        assert!(store.reviews().find_all().await.unwrap().is_empty());
        assert!(service.delete(pos.id.unwrap()).await.unwrap_err().is_not_found());
    }
}
