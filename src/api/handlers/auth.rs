//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::validated_json::ValidatedJson;
use crate::auth::middleware::CurrentUser;
use crate::auth::{create_token, hash_password, verify_password, JwtConfig};
use crate::domain::DomainError;
use crate::infrastructure::database::entities::user::{self, UserRole};

/// Auth state for authentication handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub db: sea_orm::DatabaseConnection,
    pub jwt_config: JwtConfig,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "username": "admin",
    "password": "secret123"
}))]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    /// Password
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token. Pass as `Authorization: Bearer <token>`
    pub token: String,
    /// Token type (always `Bearer`)
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// User information
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    /// Unique user ID (UUID)
    pub id: String,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Role: `admin`, `operator`, `guard`
    pub role: String,
    /// Superuser flag
    pub is_superuser: bool,
}

impl From<user::Model> for UserInfo {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role.as_str().to_string(),
            is_superuser: u.is_superuser,
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "username": "newguard",
    "email": "guard@example.com",
    "password": "secure_password_123"
}))]
pub struct RegisterRequest {
    /// Username (3-50 characters, unique)
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    /// Email address (unique)
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Password (at least 8 characters)
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// Log in
///
/// Accepts username or email. Returns a JWT on success; disabled
/// accounts and bad credentials are both rejected with 401.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, returns JWT", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or disabled account")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, DomainError> {
    let found = user::Entity::find()
        .filter(
            user::Column::Username
                .eq(&request.username)
                .or(user::Column::Email.eq(&request.username)),
        )
        .one(&state.db)
        .await?;

    let Some(found) = found else {
        return Err(DomainError::InvalidCredentials);
    };

    if !found.is_active {
        return Err(DomainError::InvalidCredentials);
    }

    let password_valid = verify_password(&request.password, &found.password_hash).unwrap_or(false);
    if !password_valid {
        return Err(DomainError::InvalidCredentials);
    }

    // Update last login time
    let mut active_user: user::ActiveModel = found.clone().into();
    active_user.last_login_at = Set(Some(Utc::now()));
    active_user.update(&state.db).await.ok();

    let token = create_token(
        &found.id,
        &found.username,
        found.role,
        found.is_superuser,
        &state.jwt_config,
    )?;

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: UserInfo::from(found),
    };

    Ok(Json(ApiResponse::success(response)))
}

/// Register a new user
///
/// New accounts always start with the least-privileged role (`guard`);
/// only an administrator can raise it afterwards.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserInfo>),
        (status = 409, description = "Username or email already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), DomainError> {
    let existing = user::Entity::find()
        .filter(
            user::Column::Username
                .eq(&request.username)
                .or(user::Column::Email.eq(&request.email)),
        )
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(DomainError::Conflict(
            "Username or email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;

    let now = Utc::now();
    let new_user = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        username: Set(request.username),
        email: Set(request.email),
        password_hash: Set(password_hash),
        role: Set(UserRole::Guard),
        is_superuser: Set(false),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        last_login_at: Set(None),
    };

    let created = new_user
        .insert(&state.db)
        .await
        .map_err(|e| DomainError::unique_violation_as_validation(e, "username or email already exists"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserInfo::from(created))),
    ))
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user information", body = ApiResponse<UserInfo>),
        (status = 303, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AuthHandlerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserInfo>>, DomainError> {
    let found = user::Entity::find_by_id(&current.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| DomainError::not_found("user", current.user_id.clone()))?;

    Ok(Json(ApiResponse::success(UserInfo::from(found))))
}
