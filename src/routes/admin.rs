use crate::{AppState, auth::access_gate, handlers, models::AdminView};
use axum::{
    Extension, Router, middleware,
    routing::{MethodRouter, get},
};

/// Admin Router Module
///
/// One route per dashboard view, nested under `/admin`. Every route carries a
/// route layer running `access_gate`, so a request only reaches the handler once
/// the gate has allowed it.
///
/// Access Control:
/// The gate reads the shared `AuthContext` from `AppState`; the only per-route
/// input is the `AdminView` tag, injected as a request extension.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // GET /admin/admins
        // AdminsManagement. SUPERADMIN only; wrong-role sessions go back to login.
        .route(
            AdminView::Admins.route(),
            gated(state, AdminView::Admins, get(handlers::get_admins_page)),
        )
        // GET /admin/users
        // UsersManagement. SUPERADMIN or ADMIN.
        .route(
            AdminView::Users.route(),
            gated(state, AdminView::Users, get(handlers::get_users_page)),
        )
        // GET /admin/batches
        // BatchManagement. SUPERADMIN or ADMIN.
        .route(
            AdminView::Batches.route(),
            gated(state, AdminView::Batches, get(handlers::get_batches_page)),
        )
        // GET /admin/api-tokens
        // ApiTokens. SUPERADMIN or ADMIN.
        .route(
            AdminView::ApiTokens.route(),
            gated(state, AdminView::ApiTokens, get(handlers::get_api_tokens_page)),
        )
        // GET /admin/statistics
        // Statistics. Any signed-in user, which in practice means an elevated role.
        .route(
            AdminView::Statistics.route(),
            gated(state, AdminView::Statistics, get(handlers::get_statistics_page)),
        )
}

fn gated(
    state: &AppState,
    view: AdminView,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    // Layers added later wrap earlier ones: the view tag is set before the gate runs.
    route
        .route_layer(middleware::from_fn_with_state(state.clone(), access_gate))
        .route_layer(Extension(view))
}
