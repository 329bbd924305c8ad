//! Ship registry handlers
//!
//! Read endpoints are open to any authenticated role; create/update sit
//! behind the operator gate and the two-step delete behind the admin
//! gate (wired in the router, not here).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};

use crate::api::dto::{ApiResponse, CreateShipRequest, Notice, ShipDto, UpdateShipRequest};
use crate::api::validated_json::ValidatedJson;
use crate::auth::middleware::CurrentUser;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::ship::{self, ShipType};
use crate::infrastructure::database::entities::user;

/// Ship handler state
#[derive(Clone)]
pub struct ShipHandlerState {
    pub db: sea_orm::DatabaseConnection,
}

const IMO_TAKEN: &str = "imo: a ship with this IMO number is already registered";

fn parse_ship_type(s: &str) -> DomainResult<ShipType> {
    ShipType::parse(s)
        .ok_or_else(|| DomainError::validation(format!("type: unknown vessel type \"{}\"", s)))
}

/// List all registered ships
///
/// Newest registrations first. The ordering is an invariant of the
/// listing, not a client-chosen sort.
#[utoipa::path(
    get,
    path = "/api/v1/ships",
    tag = "Ships",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All ships, newest first", body = ApiResponse<Vec<ShipDto>>),
        (status = 303, description = "Not authenticated")
    )
)]
pub async fn list_ships(
    State(state): State<ShipHandlerState>,
) -> Result<Json<ApiResponse<Vec<ShipDto>>>, DomainError> {
    let rows = ship::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(ship::Column::RegisteredAt)
        .all(&state.db)
        .await?;

    let items: Vec<ShipDto> = rows
        .into_iter()
        .map(|(s, registrant)| ShipDto::from_model(s, registrant))
        .collect();

    Ok(Json(ApiResponse::success(items)))
}

/// Get a single ship
#[utoipa::path(
    get,
    path = "/api/v1/ships/{id}",
    tag = "Ships",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ship ID")),
    responses(
        (status = 200, description = "Ship details", body = ApiResponse<ShipDto>),
        (status = 404, description = "Ship not found")
    )
)]
pub async fn get_ship(
    State(state): State<ShipHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShipDto>>, DomainError> {
    let row = ship::Entity::find_by_id(&id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?;

    let Some((s, registrant)) = row else {
        return Err(DomainError::not_found("ship", id));
    };

    Ok(Json(ApiResponse::success(ShipDto::from_model(s, registrant))))
}

/// Register a new ship
///
/// Stamps the audit fields from the current identity and clock. The IMO
/// number must not collide with an existing ship; a collision (including
/// one lost to a concurrent insert) surfaces as a validation error and
/// leaves the registry unchanged.
#[utoipa::path(
    post,
    path = "/api/v1/ships",
    tag = "Ships",
    security(("bearer_auth" = [])),
    request_body = CreateShipRequest,
    responses(
        (status = 201, description = "Ship registered", body = ApiResponse<ShipDto>),
        (status = 303, description = "Insufficient role"),
        (status = 422, description = "Validation error (missing field or duplicate IMO)")
    )
)]
pub async fn create_ship(
    State(state): State<ShipHandlerState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<CreateShipRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShipDto>>), DomainError> {
    let ship_type = parse_ship_type(&request.ship_type)?;

    // Pre-check for a friendly message; the unique key is the final
    // arbiter under concurrency.
    let existing = ship::Entity::find()
        .filter(ship::Column::Imo.eq(&request.imo))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(DomainError::validation(IMO_TAKEN));
    }

    let new_ship = ship::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(request.name),
        imo: Set(request.imo),
        flag: Set(request.flag),
        ship_type: Set(ship_type),
        registered_at: Set(Utc::now()),
        registered_by: Set(Some(current.user_id)),
    };

    let created = new_ship
        .insert(&state.db)
        .await
        .map_err(|e| DomainError::unique_violation_as_validation(e, IMO_TAKEN))?;

    let notice = Notice::success(format!("Ship \"{}\" registered", created.name));
    let dto = ShipDto {
        registered_by: Some(current.username),
        ..ShipDto::from_model(created, None)
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_notice(dto, notice)),
    ))
}

/// Update a ship
///
/// Applies name, IMO, flag and type. The audit fields are preserved
/// unchanged; the record's own IMO is not a self-collision.
#[utoipa::path(
    put,
    path = "/api/v1/ships/{id}",
    tag = "Ships",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ship ID")),
    request_body = UpdateShipRequest,
    responses(
        (status = 200, description = "Ship updated", body = ApiResponse<ShipDto>),
        (status = 303, description = "Insufficient role"),
        (status = 404, description = "Ship not found"),
        (status = 422, description = "Validation error (missing field or duplicate IMO)")
    )
)]
pub async fn update_ship(
    State(state): State<ShipHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateShipRequest>,
) -> Result<Json<ApiResponse<ShipDto>>, DomainError> {
    let ship_type = parse_ship_type(&request.ship_type)?;

    let existing = ship::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("ship", id.clone()))?;

    // Uniqueness against *other* records only.
    let collision = ship::Entity::find()
        .filter(ship::Column::Imo.eq(&request.imo))
        .filter(ship::Column::Id.ne(&id))
        .one(&state.db)
        .await?;
    if collision.is_some() {
        return Err(DomainError::validation(IMO_TAKEN));
    }

    let registrant = existing.find_related(user::Entity).one(&state.db).await?;

    let mut active: ship::ActiveModel = existing.into();
    active.name = Set(request.name);
    active.imo = Set(request.imo);
    active.flag = Set(request.flag);
    active.ship_type = Set(ship_type);

    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| DomainError::unique_violation_as_validation(e, IMO_TAKEN))?;

    let notice = Notice::success(format!("Ship \"{}\" updated", updated.name));
    Ok(Json(ApiResponse::success_with_notice(
        ShipDto::from_model(updated, registrant),
        notice,
    )))
}

/// Confirmation step for deleting a ship
///
/// Returns the record about to be destroyed so the caller can present a
/// confirmation view. Deletion only happens on the subsequent POST.
#[utoipa::path(
    get,
    path = "/api/v1/ships/{id}/delete",
    tag = "Ships",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ship ID")),
    responses(
        (status = 200, description = "Ship pending confirmation", body = ApiResponse<ShipDto>),
        (status = 303, description = "Insufficient role"),
        (status = 404, description = "Ship not found")
    )
)]
pub async fn delete_ship_confirm(
    State(state): State<ShipHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShipDto>>, DomainError> {
    let row = ship::Entity::find_by_id(&id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?;

    let Some((s, registrant)) = row else {
        return Err(DomainError::not_found("ship", id));
    };

    Ok(Json(ApiResponse::success(ShipDto::from_model(s, registrant))))
}

/// Delete a ship
///
/// Irreversible; there is no soft delete. This is the second step of
/// the two-step flow, after the confirmation GET.
#[utoipa::path(
    post,
    path = "/api/v1/ships/{id}/delete",
    tag = "Ships",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Ship ID")),
    responses(
        (status = 200, description = "Ship removed from the registry"),
        (status = 303, description = "Insufficient role"),
        (status = 404, description = "Ship not found")
    )
)]
pub async fn delete_ship(
    State(state): State<ShipHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, DomainError> {
    let existing = ship::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("ship", id.clone()))?;

    let name = existing.name.clone();
    existing.delete(&state.db).await?;

    let notice = Notice::warning(format!("Ship \"{}\" removed from the registry", name));
    Ok(Json(ApiResponse::success_with_notice((), notice)))
}
