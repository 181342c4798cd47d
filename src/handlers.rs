use axum::{Extension, Json};

use crate::models::{AdminView, PageContext, Session};

// Every handler here sits behind `auth::access_gate`, which only lets a request
// through with a `Session` in its extensions. The page bodies themselves are
// rendered client-side by the named component.

fn render(view: AdminView, session: Session) -> Json<PageContext> {
    Json(PageContext::new(view, session))
}

/// get_admins_page
///
/// [SUPERADMIN] Administrator account management.
#[utoipa::path(
    get,
    path = "/admin/admins",
    responses(
        (status = 200, description = "AdminsManagement view", body = PageContext),
        (status = 307, description = "Redirect to login (no session or not SUPERADMIN)")
    )
)]
pub async fn get_admins_page(Extension(session): Extension<Session>) -> Json<PageContext> {
    render(AdminView::Admins, session)
}

/// get_users_page
///
/// [SUPERADMIN, ADMIN] End-user account management.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "UsersManagement view", body = PageContext),
        (status = 307, description = "Redirect to login or application root")
    )
)]
pub async fn get_users_page(Extension(session): Extension<Session>) -> Json<PageContext> {
    render(AdminView::Users, session)
}

/// get_batches_page
///
/// [SUPERADMIN, ADMIN] Batch management.
#[utoipa::path(
    get,
    path = "/admin/batches",
    responses(
        (status = 200, description = "BatchManagement view", body = PageContext),
        (status = 307, description = "Redirect to login or application root")
    )
)]
pub async fn get_batches_page(Extension(session): Extension<Session>) -> Json<PageContext> {
    render(AdminView::Batches, session)
}

/// get_api_tokens_page
///
/// [SUPERADMIN, ADMIN] API token management.
#[utoipa::path(
    get,
    path = "/admin/api-tokens",
    responses(
        (status = 200, description = "ApiTokens view", body = PageContext),
        (status = 307, description = "Redirect to login or application root")
    )
)]
pub async fn get_api_tokens_page(Extension(session): Extension<Session>) -> Json<PageContext> {
    render(AdminView::ApiTokens, session)
}

/// get_statistics_page
///
/// [Authenticated] Usage statistics.
#[utoipa::path(
    get,
    path = "/admin/statistics",
    responses(
        (status = 200, description = "Statistics view", body = PageContext),
        (status = 307, description = "Redirect to login or application root")
    )
)]
pub async fn get_statistics_page(Extension(session): Extension<Session>) -> Json<PageContext> {
    render(AdminView::Statistics, session)
}
