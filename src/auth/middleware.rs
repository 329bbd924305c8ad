//! Authentication and role-gate middleware for Axum
//!
//! `auth_middleware` turns a bearer token into a [`CurrentUser`] request
//! extension. `require_operator` / `require_admin` are layered after it
//! in front of the mutation routes. A failing gate redirects to a
//! neutral public page instead of returning an error body, so a caller
//! probing a gated route learns nothing about the resource behind it.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::jwt::{verify_token, JwtConfig};
use crate::infrastructure::database::entities::user::UserRole;

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Neutral page for authenticated users lacking the required role.
pub const HOME_PATH: &str = "/";

/// Authentication state for the token-verifying middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated user snapshot for the current request.
///
/// Built entirely from token claims. The authorization predicates below
/// consult nothing but these fields, so they are deterministic and free
/// of side effects for a given snapshot.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
    pub is_superuser: bool,
}

impl CurrentUser {
    /// Admins and superusers only.
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.role >= UserRole::Admin
    }

    /// Operators, admins and superusers.
    pub fn is_operator(&self) -> bool {
        self.is_superuser || self.role >= UserRole::Operator
    }

    /// Any role in the enumeration. There is no sub-guard tier today,
    /// so this holds for every authenticated user; the check is kept as
    /// the lowest rung of the privilege order.
    pub fn is_guard_or_higher(&self) -> bool {
        self.is_superuser || self.role >= UserRole::Guard
    }
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

fn redirect_to_login() -> Response {
    Redirect::to(LOGIN_PATH).into_response()
}

fn redirect_to_home() -> Response {
    Redirect::to(HOME_PATH).into_response()
}

/// JWT authentication middleware - requires a valid token
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return redirect_to_login();
    };

    let Some(token) = extract_token(&auth_header) else {
        return redirect_to_login();
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return redirect_to_login();
            }

            // A token minted by this service always carries a known role;
            // anything else is treated as no identity at all.
            let Some(role) = UserRole::parse(&claims.role) else {
                return redirect_to_login();
            };

            let user = CurrentUser {
                user_id: claims.sub,
                username: claims.username,
                role,
                is_superuser: claims.superuser,
            };
            request.extensions_mut().insert(user);

            next.run(request).await
        }
        Err(_) => redirect_to_login(),
    }
}

/// Operator-or-admin gate - must be layered after `auth_middleware`
pub async fn require_operator(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<CurrentUser>() {
        Some(user) if user.is_operator() => next.run(request).await,
        Some(_) => redirect_to_home(),
        None => redirect_to_login(),
    }
}

/// Admin-only gate - must be layered after `auth_middleware`
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<CurrentUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => redirect_to_home(),
        None => redirect_to_login(),
    }
}
