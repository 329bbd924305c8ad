//! Ship entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vessel type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ShipType {
    #[sea_orm(string_value = "cargo")]
    Cargo,
    #[sea_orm(string_value = "passenger")]
    Passenger,
    #[sea_orm(string_value = "tanker")]
    Tanker,
    #[sea_orm(string_value = "fishing")]
    Fishing,
    #[sea_orm(string_value = "other")]
    Other,
}

impl Default for ShipType {
    fn default() -> Self {
        Self::Cargo
    }
}

impl ShipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Passenger => "passenger",
            Self::Tanker => "tanker",
            Self::Fishing => "fishing",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cargo" => Some(Self::Cargo),
            "passenger" => Some(Self::Passenger),
            "tanker" => Some(Self::Tanker),
            "fishing" => Some(Self::Fishing),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for ShipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ship model
///
/// `registered_at` and `registered_by` are audit fields stamped once at
/// creation and never modified afterwards. `registered_by` is a weak
/// reference: deleting the user nulls it, the ship record survives.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    /// IMO number, stored as free text. Unique across the registry.
    #[sea_orm(unique)]
    pub imo: String,
    pub flag: String,
    pub ship_type: ShipType,
    pub registered_at: DateTime<Utc>,
    pub registered_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RegisteredBy",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_type_parse_rejects_unknown() {
        assert_eq!(ShipType::parse("cargo"), Some(ShipType::Cargo));
        assert_eq!(ShipType::parse("submarine"), None);
    }

    #[test]
    fn default_type_is_cargo() {
        assert_eq!(ShipType::default(), ShipType::Cargo);
    }
}
