use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Role, Session};

/// RoutePolicy
///
/// Which sessions a page admits. Fixed per route at router assembly time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoutePolicy {
    /// SUPERADMIN only.
    SuperadminOnly,
    /// SUPERADMIN or ADMIN.
    SuperadminOrAdmin,
    /// Any signed-in user. The dashboard only ever mounts this on admin pages, so
    /// in practice it still requires an elevated role.
    Authenticated,
}

/// AccessDecision
///
/// The gate's verdict, consumed by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
    RedirectToDefault,
}

impl RoutePolicy {
    pub fn permits(self, role: &Role) -> bool {
        match self {
            RoutePolicy::SuperadminOnly => *role == Role::SuperAdmin,
            RoutePolicy::SuperadminOrAdmin | RoutePolicy::Authenticated => role.is_elevated(),
        }
    }
}

/// evaluate
///
/// Pure decision over (session, policy). A missing session always means login;
/// a present one is either allowed or sent to the route's default target.
pub fn evaluate(session: Option<&Session>, policy: RoutePolicy) -> AccessDecision {
    match session {
        None => AccessDecision::RedirectToLogin,
        Some(session) if policy.permits(&session.role) => AccessDecision::Allow,
        Some(_) => AccessDecision::RedirectToDefault,
    }
}
