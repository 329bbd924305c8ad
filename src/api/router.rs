//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::*;
use crate::api::handlers::{auth, dashboard, health, ships, users};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{auth_middleware, require_admin, require_operator, AuthState};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        // Users
        users::list_users,
        users::update_user_role,
        // Ships
        ships::list_ships,
        ships::get_ship,
        ships::create_ship,
        ships::update_ship,
        ships::delete_ship_confirm,
        ships::delete_ship,
        // Dashboard
        dashboard::home,
        dashboard::dashboard,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            Notice,
            NoticeTag,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::RegisterRequest,
            // Users
            users::UpdateRoleRequest,
            // Ships
            ShipDto,
            CreateShipRequest,
            UpdateShipRequest,
            // Dashboard
            dashboard::HomeSummary,
            dashboard::DashboardSummary,
            // Health
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness. No authentication required."),
        (name = "Authentication", description = "Login (JWT), registration, current user. Pass the token as `Authorization: Bearer <token>`. New accounts start as `guard`."),
        (name = "Users", description = "User administration. Admin only; the role endpoint is the single way a role ever changes."),
        (name = "Ships", description = "Ship registry CRUD. Listing and detail need any authenticated role; create/edit need operator; delete is admin-only and two-step (confirmation GET, then POST)."),
        (name = "Dashboard", description = "Registry totals and per-type breakdown. The public home shows the total only."),
    ),
    info(
        title = "Harbor Registry API",
        version = "0.1.0",
        description = "Port-authority ship registry with role-based access control.

## Roles

Three roles with a strict privilege order: `guard` < `operator` < `admin`
(superusers pass every gate). Guards can only read; operators also register
and edit ships; admins additionally delete ships and manage users.

## Authentication

Obtain a JWT via `POST /api/v1/auth/login` and pass it in the
`Authorization: Bearer <token>` header. Requests without a valid token are
redirected to the login route; authenticated requests lacking the required
role are redirected to the public home page.

## Response format

All REST responses use the envelope
`{\"success\": true, \"data\": {...}, \"error\": null}`. Mutations carry an
additional `notice` with a human-readable status message tagged
`success`/`warning`.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(db: DatabaseConnection, jwt_config: JwtConfig) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    let auth_state = auth::AuthHandlerState {
        db: db.clone(),
        jwt_config,
    };
    let ship_state = ships::ShipHandlerState { db: db.clone() };
    let dashboard_state = dashboard::DashboardState { db: db.clone() };
    let user_state = users::UserHandlerState { db };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Ship routes - reads are open to any authenticated role
    let ship_read_routes = Router::new()
        .route("/", get(ships::list_ships))
        .route("/{id}", get(ships::get_ship))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(ship_state.clone());

    // Ship routes - create/edit sit behind the operator gate
    let ship_operator_routes = Router::new()
        .route("/", post(ships::create_ship))
        .route("/{id}", put(ships::update_ship))
        .layer(middleware::from_fn(require_operator))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(ship_state.clone());

    // Ship routes - the two-step delete is admin only
    let ship_admin_routes = Router::new()
        .route(
            "/{id}/delete",
            get(ships::delete_ship_confirm).post(ships::delete_ship),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(ship_state);

    // Dashboard (protected)
    let dashboard_routes = Router::new()
        .route("/", get(dashboard::dashboard))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(dashboard_state.clone());

    // User administration (admin only)
    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/{id}/role", put(users::update_user_role))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(user_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Public pages
        .route("/", get(dashboard::home))
        .route("/health", get(health::health_check))
        .with_state(dashboard_state)
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Ships
        .nest("/api/v1/ships", ship_read_routes)
        .nest("/api/v1/ships", ship_operator_routes)
        .nest("/api/v1/ships", ship_admin_routes)
        // Dashboard
        .nest("/api/v1/dashboard", dashboard_routes)
        // Users
        .nest("/api/v1/users", user_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
