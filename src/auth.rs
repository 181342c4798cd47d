use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    config::AppConfig,
    gate::{AccessDecision, RoutePolicy, evaluate},
    models::AdminView,
    session::SessionState,
};

/// RouteGuard
///
/// A route's policy together with where its redirects go. Targets are stored per
/// route rather than derived from the policy: the superadmin page sends wrong-role
/// users to login, every other page sends them to the application root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    pub policy: RoutePolicy,
    pub login_target: String,
    pub fallback_target: String,
}

impl RouteGuard {
    /// `Location` for a redirect decision; `None` when the request may proceed.
    pub fn redirect_target(&self, decision: AccessDecision) -> Option<&str> {
        match decision {
            AccessDecision::Allow => None,
            AccessDecision::RedirectToLogin => Some(self.login_target.as_str()),
            AccessDecision::RedirectToDefault => Some(self.fallback_target.as_str()),
        }
    }
}

/// PolicyRegistry
///
/// Static table of guards, one per admin view.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    guards: HashMap<AdminView, RouteGuard>,
}

impl PolicyRegistry {
    /// The dashboard's route table, with redirect targets taken from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let login = config.login_path.as_str();
        let home = config.default_path.as_str();

        Self::default()
            // Most sensitive page: wrong-role sessions go back to login, not home.
            .with(AdminView::Admins, RoutePolicy::SuperadminOnly, login, login)
            .with(AdminView::Users, RoutePolicy::SuperadminOrAdmin, login, home)
            .with(AdminView::Batches, RoutePolicy::SuperadminOrAdmin, login, home)
            .with(AdminView::ApiTokens, RoutePolicy::SuperadminOrAdmin, login, home)
            .with(AdminView::Statistics, RoutePolicy::Authenticated, login, home)
    }

    pub fn with(
        mut self,
        view: AdminView,
        policy: RoutePolicy,
        login_target: &str,
        fallback_target: &str,
    ) -> Self {
        self.guards.insert(
            view,
            RouteGuard {
                policy,
                login_target: login_target.to_string(),
                fallback_target: fallback_target.to_string(),
            },
        );
        self
    }

    pub fn guard(&self, view: AdminView) -> Option<&RouteGuard> {
        self.guards.get(&view)
    }
}

/// AuthContext
///
/// Everything a protected route needs to authorize a request: the session
/// provider handle and the policy registry. Passed explicitly through `AppState`.
#[derive(Clone)]
pub struct AuthContext {
    pub provider: SessionState,
    pub policies: Arc<PolicyRegistry>,
}

impl AuthContext {
    pub fn new(provider: SessionState, policies: PolicyRegistry) -> Self {
        Self {
            provider,
            policies: Arc::new(policies),
        }
    }
}

/// access_gate
///
/// Route-layer middleware placed in front of every admin view. Reads the
/// `AuthContext` from application state and the view from the `AdminView`
/// extension set by the route, resolves the session, evaluates the view's guard
/// and either redirects or hands the request (with the `Session` in its
/// extensions) to the view handler.
pub async fn access_gate(
    State(auth): State<AuthContext>,
    Extension(view): Extension<AdminView>,
    request: Request,
    next: Next,
) -> Response {
    // A view without a guard is a wiring mistake, never an open door.
    let Some(guard) = auth.policies.guard(view) else {
        tracing::error!(?view, "no route guard registered for view");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let (parts, body) = request.into_parts();
    let session = auth.provider.get_session(&parts).await;
    let decision = evaluate(session.as_ref(), guard.policy);

    tracing::info!(
        ?view,
        user_id = ?session.as_ref().map(|s| s.user_id),
        role = session.as_ref().map(|s| s.role.as_str()),
        ?decision,
        "access decision"
    );

    if let Some(target) = guard.redirect_target(decision) {
        return Redirect::temporary(target).into_response();
    }

    // Allow implies a session; hand it to the view handler.
    let mut request = Request::from_parts(parts, body);
    if let Some(session) = session {
        request.extensions_mut().insert(session);
    }
    next.run(request).await
}
