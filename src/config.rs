use std::env;

use thiserror::Error;

/// AppConfig
///
/// Holds the gate's entire configuration state. Immutable once loaded and pulled
/// into handlers and middleware via FromRef, like every other part of `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local session bypass and log format.
    pub env: Env,
    // HS256 secret used to validate incoming session tokens.
    pub jwt_secret: String,
    // Where unauthenticated visitors are sent.
    pub login_path: String,
    // Application root; where authenticated but unprivileged users are sent.
    pub default_path: String,
    // Name of the cookie carrying the session token for browser page loads.
    pub session_cookie: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Runtime context, used to switch between development conveniences (header bypass,
/// pretty logs) and the hardened production setup.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// ConfigError
///
/// Startup failures. Any of these aborts the process before the listener is bound.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),
    #[error("{var} must be an absolute path starting with '/', got {value:?}")]
    InvalidPath { var: &'static str, value: String },
}

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking values for test state setup, so tests never depend on
    /// the process environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            login_path: "/login".to_string(),
            default_path: "/".to_string(),
            session_cookie: "session".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables and fails fast when the
    /// current environment is missing something it cannot run without.
    ///
    /// # Errors
    /// `ConfigError::Missing` if `SESSION_JWT_SECRET` is absent or blank in production,
    /// `ConfigError::InvalidPath` if a redirect path is not absolute.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        // The production secret is mandatory and a blank value counts as missing.
        // Locally a known fallback keeps hand-minted dev tokens working.
        let jwt_secret = env::var("SESSION_JWT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty());
        let jwt_secret = match env {
            Env::Production => jwt_secret.ok_or(ConfigError::Missing("SESSION_JWT_SECRET"))?,
            Env::Local => jwt_secret.unwrap_or_else(|| LOCAL_JWT_SECRET.to_string()),
        };

        let defaults = Self::default();

        Ok(Self {
            env,
            jwt_secret,
            login_path: redirect_path("LOGIN_PATH", defaults.login_path)?,
            default_path: redirect_path("DEFAULT_PATH", defaults.default_path)?,
            session_cookie: env::var("SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }
}

/// Redirect targets end up in a `Location` header; only same-origin absolute paths
/// are accepted.
fn redirect_path(var: &'static str, fallback: String) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if value.starts_with('/') && !value.starts_with("//") => Ok(value),
        Ok(value) => Err(ConfigError::InvalidPath { var, value }),
        Err(_) => Ok(fallback),
    }
}
