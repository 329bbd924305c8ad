//! Public home summary and the authenticated dashboard

use std::collections::BTreeMap;

use axum::{extract::State, Extension, Json};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::auth::middleware::CurrentUser;
use crate::domain::DomainError;
use crate::infrastructure::database::entities::ship;

/// Dashboard state
#[derive(Clone)]
pub struct DashboardState {
    pub db: sea_orm::DatabaseConnection,
}

/// Public home summary
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeSummary {
    /// Total number of registered ships
    pub total_ships: u64,
}

/// Dashboard statistics for authenticated users
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    /// Total number of registered ships
    pub total_ships: u64,
    /// Ship count per vessel type. Types with no ships are absent,
    /// not zero-filled
    pub ships_by_type: BTreeMap<String, u64>,
    /// Ships registered by the current user. Only present for
    /// operator-or-admin identities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_registrations: Option<u64>,
}

/// Public home page summary
///
/// No authentication required; also serves as the neutral target for
/// rejected authorization gates.
#[utoipa::path(
    get,
    path = "/",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Registry totals", body = ApiResponse<HomeSummary>)
    )
)]
pub async fn home(
    State(state): State<DashboardState>,
) -> Result<Json<ApiResponse<HomeSummary>>, DomainError> {
    let total_ships = ship::Entity::find().count(&state.db).await?;
    Ok(Json(ApiResponse::success(HomeSummary { total_ships })))
}

/// Dashboard statistics
///
/// Totals and a per-type breakdown for any authenticated role. The
/// personal registration count is computed only for operators and
/// admins, the roles that can register ships.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Registry statistics", body = ApiResponse<DashboardSummary>),
        (status = 303, description = "Not authenticated")
    )
)]
pub async fn dashboard(
    State(state): State<DashboardState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<DashboardSummary>>, DomainError> {
    let ships = ship::Entity::find().all(&state.db).await?;

    let total_ships = ships.len() as u64;
    let mut ships_by_type: BTreeMap<String, u64> = BTreeMap::new();
    for s in &ships {
        *ships_by_type
            .entry(s.ship_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    let my_registrations = if current.is_operator() {
        let count = ship::Entity::find()
            .filter(ship::Column::RegisteredBy.eq(&current.user_id))
            .count(&state.db)
            .await?;
        Some(count)
    } else {
        None
    };

    Ok(Json(ApiResponse::success(DashboardSummary {
        total_ships,
        ships_by_type,
        my_registrations,
    })))
}
