use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header, request::Parts};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::{Role, Session},
};

/// Claims
///
/// Payload of the session token minted by the external authentication provider.
/// Everything the gate needs is carried in the token itself, so resolving a
/// session never touches a database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    /// Raw role claim, e.g. "SUPERADMIN". Unrecognized values are unprivileged.
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_code: Option<String>,
    /// Expiration Time. Always validated.
    pub exp: usize,
    /// Issued At.
    pub iat: usize,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Session {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: Role::from(claims.role),
            client_code: claims.client_code,
        }
    }
}

/// SessionProvider
///
/// Resolves the session behind a request. Implementations must fold every failure
/// (missing credentials, bad signature, expired token, upstream outage) into `None`:
/// the gate does not distinguish "signed out" from "lookup broke".
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, parts: &Parts) -> Option<Session>;
}

/// SessionState
///
/// Shared handle to the active provider.
pub type SessionState = Arc<dyn SessionProvider>;

/// JwtSessionProvider
///
/// Validates HS256 session tokens taken from `Authorization: Bearer` (API clients)
/// or from the session cookie (browser page loads).
#[derive(Clone)]
pub struct JwtSessionProvider {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
    env: Env,
}

impl JwtSessionProvider {
    pub fn new(config: &AppConfig) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            cookie_name: config.session_cookie.clone(),
            env: config.env.clone(),
        }
    }

    /// Candidate tokens in precedence order: the bearer header, then the session
    /// cookie. A bearer token that fails validation falls through to the cookie.
    fn tokens<'a>(&self, parts: &'a Parts) -> impl Iterator<Item = &'a str> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        bearer
            .into_iter()
            .chain(session_cookie(parts, &self.cookie_name))
    }

    fn decode_token(&self, token: &str) -> Option<Session> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims.into()),
            Err(e) => {
                tracing::debug!(error = %e, "rejected session token");
                None
            }
        }
    }

    /// Local development bypass: `x-user-id` plus `x-user-role` stand in for a
    /// token. Never consulted outside `Env::Local`.
    fn local_bypass(&self, parts: &Parts) -> Option<Session> {
        if self.env != Env::Local {
            return None;
        }

        let user_id = Uuid::parse_str(header_value(parts, "x-user-id")?).ok()?;
        let role = header_value(parts, "x-user-role")?;

        tracing::debug!(%user_id, role, "session resolved via local bypass");

        Some(Session {
            user_id,
            email: header_value(parts, "x-user-email")
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}@localhost", user_id.simple())),
            name: header_value(parts, "x-user-name").unwrap_or("Local Developer").to_string(),
            role: Role::from(role),
            client_code: header_value(parts, "x-client-code").map(str::to_string),
        })
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn get_session(&self, parts: &Parts) -> Option<Session> {
        if let Some(session) = self.local_bypass(parts) {
            return Some(session);
        }

        self.tokens(parts).find_map(|token| self.decode_token(token))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|value| value.to_str().ok())
}

fn session_cookie<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// MockSessionProvider
///
/// Test double returning a fixed session for every request.
#[derive(Clone, Default)]
pub struct MockSessionProvider {
    pub session: Option<Session>,
}

impl MockSessionProvider {
    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// A provider whose lookups always come back empty, as after an upstream fault.
    pub fn signed_out() -> Self {
        Self { session: None }
    }
}

#[async_trait]
impl SessionProvider for MockSessionProvider {
    async fn get_session(&self, _parts: &Parts) -> Option<Session> {
        self.session.clone()
    }
}
