//! HTTP mapping for [`DomainError`]
//!
//! One place decides how each error kind leaves the service. Gate
//! failures become redirects to public pages (nothing about the gated
//! resource is revealed); everything else is a JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tracing::error;

use super::dto::ApiResponse;
use crate::auth::middleware::{HOME_PATH, LOGIN_PATH};
use crate::domain::DomainError;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        match self {
            DomainError::NotFound { entity, id } => {
                let body = ApiResponse::<()>::error(format!("{} {} not found", entity, id));
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            DomainError::Validation(msg) => {
                let body = ApiResponse::<()>::error(msg);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            DomainError::Conflict(msg) => {
                let body = ApiResponse::<()>::error(msg);
                (StatusCode::CONFLICT, Json(body)).into_response()
            }
            DomainError::InvalidCredentials => {
                let body = ApiResponse::<()>::error("Invalid credentials");
                (StatusCode::UNAUTHORIZED, Json(body)).into_response()
            }
            DomainError::Unauthenticated => Redirect::to(LOGIN_PATH).into_response(),
            DomainError::Forbidden => Redirect::to(HOME_PATH).into_response(),
            DomainError::Database(e) => {
                error!("Database error: {}", e);
                let body = ApiResponse::<()>::error("Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            DomainError::Crypto(e) => {
                error!("Crypto error: {}", e);
                let body = ApiResponse::<()>::error("Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
