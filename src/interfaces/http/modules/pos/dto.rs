//! Point-of-sale DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Campus, PointOfSale, PosType};
use crate::interfaces::http::common::ApiError;

/// Point of sale API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PosDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Cafe, Bakery, Cafeteria or VendingMachine
    pub pos_type: String,
    /// Altstadt, Bergheim or InfNeuenheimerFeld
    pub campus: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: u32,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PosDto {
    pub fn from_domain(p: PointOfSale) -> Self {
        Self {
            id: p.id.unwrap_or_default(),
            name: p.name,
            description: p.description,
            pos_type: p.pos_type.to_string(),
            campus: p.campus.to_string(),
            street: p.street,
            house_number: p.house_number,
            postal_code: p.postal_code,
            city: p.city,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Body for creating or updating a point of sale
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PosRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub pos_type: String,
    pub campus: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house_number: String,
    #[serde(default)]
    #[validate(range(max = 99999))]
    pub postal_code: u32,
    #[serde(default)]
    pub city: String,
}

impl PosRequest {
    pub fn into_domain(self, id: Option<i64>) -> Result<PointOfSale, ApiError> {
        let pos_type: PosType = self.pos_type.parse().map_err(ApiError::bad_request)?;
        let campus: Campus = self.campus.parse().map_err(ApiError::bad_request)?;

        let mut pos = PointOfSale::new(self.name, pos_type, campus);
        pos.id = id;
        pos.description = self.description;
        pos.street = self.street;
        pos.house_number = self.house_number;
        pos.postal_code = self.postal_code;
        pos.city = self.city;
        Ok(pos)
    }
}
