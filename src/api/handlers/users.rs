//! User administration handlers
//!
//! Admin-only. Changing a role here is the single path by which a
//! user's role ever changes.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use utoipa::ToSchema;

use super::auth::UserInfo;
use crate::api::dto::{ApiResponse, Notice};
use crate::domain::DomainError;
use crate::infrastructure::database::entities::user::{self, UserRole};

/// User admin state
#[derive(Clone)]
pub struct UserHandlerState {
    pub db: sea_orm::DatabaseConnection,
}

/// Role change request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({ "role": "operator" }))]
pub struct UpdateRoleRequest {
    /// New role: `admin`, `operator` or `guard`
    pub role: String,
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserInfo>>),
        (status = 303, description = "Insufficient role")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, DomainError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Username)
        .all(&state.db)
        .await?;

    let items: Vec<UserInfo> = users.into_iter().map(UserInfo::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<UserInfo>),
        (status = 303, description = "Insufficient role"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Unknown role")
    )
)]
pub async fn update_user_role(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, DomainError> {
    let role = UserRole::parse(&request.role)
        .ok_or_else(|| DomainError::validation(format!("role: unknown role \"{}\"", request.role)))?;

    let found = user::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("user", id.clone()))?;

    let mut active: user::ActiveModel = found.into();
    active.role = Set(role);
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    let notice = Notice::success(format!("User \"{}\" is now {}", updated.username, role));
    Ok(Json(ApiResponse::success_with_notice(
        UserInfo::from(updated),
        notice,
    )))
}
