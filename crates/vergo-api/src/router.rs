//! Route definitions for the Vergo HTTP API.
//!
//! Public auth routes, bearer routes and tenant-scoped routes are mounted
//! under `/v1`; probes live at the root. Gate stages are attached with
//! `route_layer`, so unknown paths still answer 404 rather than 401.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use vergo_entity::membership::OrgRole;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and gate stages.
pub fn build_router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(public_auth_routes())
        .merge(bearer_routes(state.clone()))
        .merge(reserved_routes());

    Router::new()
        .nest("/v1", v1)
        .merge(health_routes())
        .with_state(state)
}

/// Signup, login, refresh, logout. No credentials required.
fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// Routes behind the bearer stage, including every tenant-scoped route.
fn bearer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout-all", post(handlers::auth::logout_all))
        .route("/me", get(handlers::me::me))
        .route(
            "/context",
            get(handlers::context::get_context).post(handlers::context::set_context),
        )
        .merge(tenant_routes(state.clone()))
        .route_layer(from_fn_with_state(state, middleware::auth::require_bearer))
}

/// Routes behind the tenant stage, each with its own role threshold.
fn tenant_routes(state: AppState) -> Router<AppState> {
    let member = Router::new()
        .route("/orgs/current", get(handlers::orgs::current))
        .route_layer(from_fn_with_state(
            OrgRole::Member,
            middleware::rbac::require_role,
        ));

    let admin = Router::new()
        .route(
            "/orgs/current/members",
            get(handlers::stubs::not_implemented).post(handlers::stubs::not_implemented),
        )
        .route(
            "/orgs/current/members/{user_id}",
            get(handlers::stubs::not_implemented)
                .patch(handlers::stubs::not_implemented)
                .delete(handlers::stubs::not_implemented),
        )
        .route("/audit", get(handlers::stubs::not_implemented))
        .route_layer(from_fn_with_state(
            OrgRole::Admin,
            middleware::rbac::require_role,
        ));

    Router::new()
        .merge(member)
        .merge(admin)
        .route_layer(from_fn_with_state(state, middleware::tenant::resolve_tenant))
}

/// Surfaces reserved for other services; answer 501.
fn reserved_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/forgot-password",
            post(handlers::stubs::not_implemented),
        )
        .route("/auth/reset-password", post(handlers::stubs::not_implemented))
        .route(
            "/api-keys",
            get(handlers::stubs::not_implemented).post(handlers::stubs::not_implemented),
        )
        .route(
            "/webhooks",
            get(handlers::stubs::not_implemented).post(handlers::stubs::not_implemented),
        )
        .route("/billing", get(handlers::stubs::not_implemented))
        .route(
            "/storage/presign",
            post(handlers::stubs::not_implemented),
        )
}

/// Liveness and readiness probes.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route("/readyz", get(handlers::health::readyz))
}
