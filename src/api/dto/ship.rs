//! Ship API DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::infrastructure::database::entities::{ship, user};

/// A registered ship
#[derive(Debug, Serialize, ToSchema)]
pub struct ShipDto {
    /// Registry identifier (UUID)
    pub id: String,
    /// Ship name
    pub name: String,
    /// IMO number (unique)
    pub imo: String,
    /// Flag country
    pub flag: String,
    /// Vessel type: `cargo`, `passenger`, `tanker`, `fishing`, `other`
    #[serde(rename = "type")]
    pub ship_type: String,
    /// Registration timestamp (ISO 8601), stamped once at creation
    pub registered_at: String,
    /// Username of the registering user, `null` if that account was
    /// deleted since
    pub registered_by: Option<String>,
}

impl ShipDto {
    /// Build from a ship row and its (optionally joined) registrant.
    pub fn from_model(ship: ship::Model, registrant: Option<user::Model>) -> Self {
        Self {
            id: ship.id,
            name: ship.name,
            imo: ship.imo,
            flag: ship.flag,
            ship_type: ship.ship_type.as_str().to_string(),
            registered_at: ship.registered_at.to_rfc3339(),
            registered_by: registrant.map(|u| u.username),
        }
    }
}

fn default_flag() -> String {
    "Ecuador".to_string()
}

fn default_ship_type() -> String {
    "cargo".to_string()
}

/// Request to register a new ship
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "MSC Esperanza",
    "imo": "9484525",
    "flag": "Panamá",
    "type": "cargo"
}))]
pub struct CreateShipRequest {
    /// Ship name (required)
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    /// IMO number (required, unique; stored as free text)
    #[validate(length(min = 1, max = 20, message = "IMO number is required"))]
    pub imo: String,
    /// Flag country. Defaults to `Ecuador`
    #[serde(default = "default_flag")]
    #[validate(length(min = 1, max = 50, message = "flag must be 1-50 characters"))]
    pub flag: String,
    /// Vessel type: `cargo`, `passenger`, `tanker`, `fishing`, `other`.
    /// Defaults to `cargo`
    #[serde(rename = "type", default = "default_ship_type")]
    pub ship_type: String,
}

/// Request to update an existing ship
///
/// All four mutable fields are applied; the audit fields
/// (`registered_at`, `registered_by`) are never part of an update.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateShipRequest {
    /// Ship name (required)
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    /// IMO number (required, unique among other ships)
    #[validate(length(min = 1, max = 20, message = "IMO number is required"))]
    pub imo: String,
    /// Flag country
    #[serde(default = "default_flag")]
    #[validate(length(min = 1, max = 50, message = "flag must be 1-50 characters"))]
    pub flag: String,
    /// Vessel type: `cargo`, `passenger`, `tanker`, `fishing`, `other`
    #[serde(rename = "type", default = "default_ship_type")]
    pub ship_type: String,
}
