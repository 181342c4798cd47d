use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Identity ---

/// Role
///
/// The authorization level carried by a session. The claim arrives as a free-form
/// string; only `SUPERADMIN` and `ADMIN` carry privileges, anything else is kept
/// verbatim in `Other` so it can still be logged and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    SuperAdmin,
    Admin,
    Other(String),
}

impl Role {
    pub const SUPERADMIN: &'static str = "SUPERADMIN";
    pub const ADMIN: &'static str = "ADMIN";

    pub fn as_str(&self) -> &str {
        match self {
            Role::SuperAdmin => Self::SUPERADMIN,
            Role::Admin => Self::ADMIN,
            Role::Other(raw) => raw,
        }
    }

    /// SUPERADMIN or ADMIN.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

// Exact, case-sensitive match: "admin" is not ADMIN.
impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        match raw {
            Self::SUPERADMIN => Role::SuperAdmin,
            Self::ADMIN => Role::Admin,
            other => Role::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            Self::SUPERADMIN => Role::SuperAdmin,
            Self::ADMIN => Role::Admin,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session
///
/// The authenticated user behind the current request, as resolved by the session
/// provider. Read-only to this service: issuance, refresh and expiry happen in the
/// external authentication provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    #[ts(type = "string")]
    #[schema(value_type = String, example = "ADMIN")]
    pub role: Role,
    /// Tenant/client scoping code, when the account belongs to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub client_code: Option<String>,
}

// --- Admin Views ---

/// AdminView
///
/// The protected dashboard pages. Each one is rendered by an external front-end
/// component; this service only decides whether the viewer may see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum AdminView {
    Admins,
    Users,
    Batches,
    ApiTokens,
    Statistics,
}

impl AdminView {
    pub const ALL: [AdminView; 5] = [
        AdminView::Admins,
        AdminView::Users,
        AdminView::Batches,
        AdminView::ApiTokens,
        AdminView::Statistics,
    ];

    /// Path relative to the `/admin` nest.
    pub fn route(self) -> &'static str {
        match self {
            AdminView::Admins => "/admins",
            AdminView::Users => "/users",
            AdminView::Batches => "/batches",
            AdminView::ApiTokens => "/api-tokens",
            AdminView::Statistics => "/statistics",
        }
    }

    /// Full request path as seen by clients.
    pub fn path(self) -> String {
        format!("/admin{}", self.route())
    }

    /// Name of the front-end component that renders this page.
    pub fn component(self) -> &'static str {
        match self {
            AdminView::Admins => "AdminsManagement",
            AdminView::Users => "UsersManagement",
            AdminView::Batches => "BatchManagement",
            AdminView::ApiTokens => "ApiTokens",
            AdminView::Statistics => "Statistics",
        }
    }
}

/// PageContext
///
/// What an allowed request receives: enough for the front-end to mount the view
/// component for the signed-in viewer.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub view: AdminView,
    pub component: String,
    pub path: String,
    pub viewer: Session,
    #[ts(type = "string")]
    pub rendered_at: DateTime<Utc>,
}

impl PageContext {
    pub fn new(view: AdminView, viewer: Session) -> Self {
        Self {
            view,
            component: view.component().to_string(),
            path: view.path(),
            viewer,
            rendered_at: Utc::now(),
        }
    }
}
