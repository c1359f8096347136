//! Point-of-sale entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Point-of-sale type
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PosType {
    #[sea_orm(string_value = "Cafe")]
    Cafe,
    #[sea_orm(string_value = "Bakery")]
    Bakery,
    #[sea_orm(string_value = "Cafeteria")]
    Cafeteria,
    #[sea_orm(string_value = "VendingMachine")]
    VendingMachine,
}

/// Campus
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Campus {
    #[sea_orm(string_value = "Altstadt")]
    Altstadt,
    #[sea_orm(string_value = "Bergheim")]
    Bergheim,
    #[sea_orm(string_value = "InfNeuenheimerFeld")]
    InfNeuenheimerFeld,
}

/// Point-of-sale model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "points_of_sale")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Display name, unique across all points of sale
    #[sea_orm(unique)]
    pub name: String,

    pub description: String,
    pub pos_type: PosType,
    pub campus: Campus,
    pub street: String,
    pub house_number: String,
    pub postal_code: i32,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
