use admin_gate::{
    JwtSessionProvider, SessionProvider,
    config::{AppConfig, Env},
    models::Role,
    session::Claims,
};
use axum::http::{Method, Request, Uri, header, request::Parts};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::SystemTime;
use uuid::Uuid;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn claims(role: &str, exp: u64) -> Claims {
    Claims {
        sub: TEST_USER_ID,
        email: "ops@example.com".to_string(),
        name: "Ops Person".to_string(),
        role: role.to_string(),
        client_code: Some("ACME".to_string()),
        iat: now() as usize,
        exp: exp as usize,
    }
}

fn create_token(claims: &Claims, secret: &str) -> String {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &key).unwrap()
}

fn provider(env: Env) -> JwtSessionProvider {
    let config = AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    };
    JwtSessionProvider::new(&config)
}

fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_header(mut parts: Parts, name: &'static str, value: &str) -> Parts {
    parts.headers.append(
        header::HeaderName::from_static(name),
        header::HeaderValue::from_str(value).unwrap(),
    );
    parts
}

fn bare_parts() -> Parts {
    get_request_parts(Method::GET, "/admin/users".parse().unwrap())
}

// --- Tests ---

#[tokio::test]
async fn test_session_from_valid_bearer_token() {
    let token = create_token(&claims("ADMIN", now() + 3600), TEST_JWT_SECRET);
    let parts = with_header(bare_parts(), "authorization", &format!("Bearer {token}"));

    let session = provider(Env::Production).get_session(&parts).await.unwrap();

    assert_eq!(session.user_id, TEST_USER_ID);
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.email, "ops@example.com");
    assert_eq!(session.name, "Ops Person");
    assert_eq!(session.client_code.as_deref(), Some("ACME"));
}

#[tokio::test]
async fn test_session_from_cookie() {
    let token = create_token(&claims("SUPERADMIN", now() + 3600), TEST_JWT_SECRET);
    let parts = with_header(
        bare_parts(),
        "cookie",
        &format!("theme=dark; session={token}; lang=en"),
    );

    let session = provider(Env::Production).get_session(&parts).await.unwrap();

    assert_eq!(session.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_unrecognized_role_is_kept_as_other() {
    let token = create_token(&claims("USER", now() + 3600), TEST_JWT_SECRET);
    let parts = with_header(bare_parts(), "authorization", &format!("Bearer {token}"));

    let session = provider(Env::Production).get_session(&parts).await.unwrap();

    assert_eq!(session.role, Role::Other("USER".to_string()));
    assert!(!session.role.is_elevated());
}

#[tokio::test]
async fn test_missing_credentials_yield_no_session() {
    let session = provider(Env::Production).get_session(&bare_parts()).await;
    assert!(session.is_none());
}

#[tokio::test]
async fn test_expired_token_yields_no_session() {
    // Well past the default validation leeway.
    let token = create_token(&claims("ADMIN", now() - 3600), TEST_JWT_SECRET);
    let parts = with_header(bare_parts(), "authorization", &format!("Bearer {token}"));

    assert!(provider(Env::Production).get_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_token_signed_with_other_secret_yields_no_session() {
    let token = create_token(&claims("ADMIN", now() + 3600), "some-other-secret");
    let parts = with_header(bare_parts(), "authorization", &format!("Bearer {token}"));

    assert!(provider(Env::Production).get_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_malformed_token_yields_no_session() {
    let parts = with_header(bare_parts(), "authorization", "Bearer not.a.jwt");
    assert!(provider(Env::Production).get_session(&parts).await.is_none());

    let parts = with_header(bare_parts(), "cookie", "session=");
    assert!(provider(Env::Production).get_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_local_bypass_success() {
    let user_id = Uuid::new_v4();
    let parts = with_header(bare_parts(), "x-user-id", &user_id.to_string());
    let parts = with_header(parts, "x-user-role", "SUPERADMIN");

    let session = provider(Env::Local).get_session(&parts).await.unwrap();

    assert_eq!(session.user_id, user_id);
    assert_eq!(session.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_local_bypass_requires_role_header() {
    let parts = with_header(bare_parts(), "x-user-id", &Uuid::new_v4().to_string());
    assert!(provider(Env::Local).get_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let parts = with_header(bare_parts(), "x-user-id", &Uuid::new_v4().to_string());
    let parts = with_header(parts, "x-user-role", "SUPERADMIN");

    assert!(provider(Env::Production).get_session(&parts).await.is_none());
}

#[tokio::test]
async fn test_stale_bearer_falls_back_to_cookie() {
    let stale = create_token(&claims("ADMIN", now() - 3600), TEST_JWT_SECRET);
    let fresh = create_token(&claims("SUPERADMIN", now() + 3600), TEST_JWT_SECRET);
    let parts = with_header(bare_parts(), "authorization", &format!("Bearer {stale}"));
    let parts = with_header(parts, "cookie", &format!("session={fresh}"));

    let session = provider(Env::Production).get_session(&parts).await.unwrap();

    assert_eq!(session.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_valid_bearer_wins_over_cookie() {
    let bearer = create_token(&claims("ADMIN", now() + 3600), TEST_JWT_SECRET);
    let cookie = create_token(&claims("SUPERADMIN", now() + 3600), TEST_JWT_SECRET);
    let parts = with_header(bare_parts(), "authorization", &format!("Bearer {bearer}"));
    let parts = with_header(parts, "cookie", &format!("session={cookie}"));

    let session = provider(Env::Production).get_session(&parts).await.unwrap();

    assert_eq!(session.role, Role::Admin);
}
