//! SeaORM implementation of PosRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use tracing::debug;

use crate::domain::{
    Campus, CrudRepository, DomainError, DomainResult, PointOfSale, PosRepository, PosType,
};
use crate::infrastructure::database::entities::point_of_sale;

// ── Conversion helpers ──────────────────────────────────────────

/// The name index is the only unique constraint on `points_of_sale`.
fn write_err(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
        return DomainError::Validation("duplicate point of sale name".into());
    }
    DomainError::from(e)
}

pub(super) fn entity_to_domain(m: point_of_sale::Model) -> PointOfSale {
    PointOfSale {
        id: Some(m.id),
        name: m.name,
        description: m.description,
        pos_type: match m.pos_type {
            point_of_sale::PosType::Cafe => PosType::Cafe,
            point_of_sale::PosType::Bakery => PosType::Bakery,
            point_of_sale::PosType::Cafeteria => PosType::Cafeteria,
            point_of_sale::PosType::VendingMachine => PosType::VendingMachine,
        },
        campus: match m.campus {
            point_of_sale::Campus::Altstadt => Campus::Altstadt,
            point_of_sale::Campus::Bergheim => Campus::Bergheim,
            point_of_sale::Campus::InfNeuenheimerFeld => Campus::InfNeuenheimerFeld,
        },
        street: m.street,
        house_number: m.house_number,
        postal_code: m.postal_code.max(0) as u32,
        city: m.city,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn type_to_entity(t: PosType) -> point_of_sale::PosType {
    match t {
        PosType::Cafe => point_of_sale::PosType::Cafe,
        PosType::Bakery => point_of_sale::PosType::Bakery,
        PosType::Cafeteria => point_of_sale::PosType::Cafeteria,
        PosType::VendingMachine => point_of_sale::PosType::VendingMachine,
    }
}

fn campus_to_entity(c: Campus) -> point_of_sale::Campus {
    match c {
        Campus::Altstadt => point_of_sale::Campus::Altstadt,
        Campus::Bergheim => point_of_sale::Campus::Bergheim,
        Campus::InfNeuenheimerFeld => point_of_sale::Campus::InfNeuenheimerFeld,
    }
}

// ── SeaOrmPosRepository ─────────────────────────────────────────

pub struct SeaOrmPosRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmPosRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c, C> CrudRepository<PointOfSale, i64> for SeaOrmPosRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<PointOfSale>> {
        let model = point_of_sale::Entity::find_by_id(id).one(self.conn).await?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<PointOfSale>> {
        let models = point_of_sale::Entity::find()
            .order_by_asc(point_of_sale::Column::Id)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn upsert(&self, pos: PointOfSale) -> DomainResult<PointOfSale> {
        let now = Utc::now();
        let postal_code = i32::try_from(pos.postal_code)
            .map_err(|_| DomainError::Validation("postal code out of range".into()))?;

        let mut model = point_of_sale::ActiveModel {
            name: Set(pos.name),
            description: Set(pos.description),
            pos_type: Set(type_to_entity(pos.pos_type)),
            campus: Set(campus_to_entity(pos.campus)),
            street: Set(pos.street),
            house_number: Set(pos.house_number),
            postal_code: Set(postal_code),
            city: Set(pos.city),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = match pos.id {
            None => {
                model.created_at = Set(now);
                model.insert(self.conn).await.map_err(write_err)?
            }
            Some(id) => {
                let Some(existing) = point_of_sale::Entity::find_by_id(id).one(self.conn).await?
                else {
                    return Err(DomainError::not_found("PointOfSale", id));
                };
                model.id = Set(id);
                model.created_at = Set(existing.created_at);
                model.update(self.conn).await.map_err(write_err)?
            }
        };
        debug!(pos_id = saved.id, name = %saved.name, "Point of sale saved");
        Ok(entity_to_domain(saved))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = point_of_sale::Entity::delete_by_id(id)
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("PointOfSale", id));
        }
        Ok(())
    }
}

#[async_trait]
impl<'c, C> PosRepository for SeaOrmPosRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<PointOfSale>> {
        let model = point_of_sale::Entity::find()
            .filter(point_of_sale::Column::Name.eq(name))
            .one(self.conn)
            .await?;
        Ok(model.map(entity_to_domain))
    }
}
