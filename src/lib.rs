use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod session;

// Routing split by access level (public, admin).
pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use auth::{AuthContext, PolicyRegistry, RouteGuard};
pub use config::AppConfig;
pub use gate::{AccessDecision, RoutePolicy, evaluate};
pub use session::{JwtSessionProvider, MockSessionProvider, SessionProvider, SessionState};

/// ApiDoc
///
/// OpenAPI document for the admin pages, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_admins_page, handlers::get_users_page, handlers::get_batches_page,
        handlers::get_api_tokens_page, handlers::get_statistics_page
    ),
    components(
        schemas(
            models::Session, models::AdminView, models::PageContext,
            gate::RoutePolicy, gate::AccessDecision,
        )
    ),
    tags(
        (name = "admin-gate", description = "Role-gated admin dashboard pages")
    )
)]
struct ApiDoc;

/// AppState
///
/// Single shared container for everything request handling needs. Cheap to clone:
/// the provider and registry sit behind `Arc`s. Configuration is consumed while
/// building the state (redirect targets land in the policy registry) and is not
/// kept around.
#[derive(Clone)]
pub struct AppState {
    /// Session provider handle and per-route policies, read by `auth::access_gate`.
    pub auth: AuthContext,
}

impl AppState {
    /// Wires the given provider to the route table derived from `config`.
    pub fn new(config: &AppConfig, provider: SessionState) -> Self {
        let policies = PolicyRegistry::from_config(config);
        Self {
            auth: AuthContext::new(provider, policies),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Lets the gate middleware extract `State<AuthContext>` without seeing the rest
// of the application state.
impl FromRef<AppState> for AuthContext {
    fn from_ref(app_state: &AppState) -> AuthContext {
        app_state.auth.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, attaches the per-view access gates and the
/// observability layers, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI over the generated OpenAPI document.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: no gate.
        .merge(public::public_routes())
        // Admin Routes: nested under '/admin'. Each route carries its own
        // `access_gate` layer, which redirects before the handler ever runs.
        .nest("/admin", admin::admin_routes(&state))
        .with_state(state);

    // 3. Observability and Correlation Layers (outermost first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: one span per request, carrying the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, correlated by the `x-request-id` set above.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
