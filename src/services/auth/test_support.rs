//! Fixtures shared by the auth tests: RSA keys/certificates, token minting and
//! a mock key-set endpoint.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::config::AuthConfig;
use crate::services::auth::{AuthService, build_auth_service};

pub const SIGNING_KEY_PEM: &str = include_str!("../../../tests/fixtures/signing_key.pem");
pub const SIGNING_CERT_PEM: &str = include_str!("../../../tests/fixtures/signing_cert.pem");
pub const ROGUE_KEY_PEM: &str = include_str!("../../../tests/fixtures/rogue_key.pem");
pub const ROGUE_CERT_PEM: &str = include_str!("../../../tests/fixtures/rogue_cert.pem");

pub const ISSUER: &str = "https://relationsales.eu.auth0.com/";
pub const AUDIENCE: &str = "https://api.relationsales.test";
pub const SIGNING_KID: &str = "signing-key-1";
pub const SUBJECT: &str = "auth0|6650c1e2a9d1f0b7c4e3d2a1";

const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Certificate body as it appears in a JWKS `x5c` entry.
pub fn x5c(cert_pem: &str) -> String {
    cert_pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect()
}

pub fn jwk(kid: &str, cert_pem: &str) -> Value {
    json!({
        "kty": "RSA",
        "kid": kid,
        "use": "sig",
        "n": "unused-by-verifier",
        "e": "AQAB",
        "x5c": [x5c(cert_pem)],
    })
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims an Auth0 access token for this API would carry.
pub fn valid_claims() -> Value {
    let now = now();
    json!({
        "sub": SUBJECT,
        "aud": [AUDIENCE, "https://relationsales.eu.auth0.com/userinfo"],
        "iss": ISSUER,
        "iat": now - 10,
        "exp": now + 3600,
        "scope": "openid profile email",
    })
}

pub fn sign_rs256(kid: Option<&str>, claims: &Value, key_pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(key_pem.as_bytes()).expect("fixture rsa key");
    jsonwebtoken::encode(&header, claims, &key).expect("sign rs256")
}

pub fn sign_hs256(kid: Option<&str>, claims: &Value, secret: &[u8]) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = kid.map(str::to_string);
    jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(secret)).expect("sign hs256")
}

/// `alg: none` token with an empty signature segment.
pub fn unsigned(kid: &str, claims: &Value) -> String {
    let header = json!({ "alg": "none", "typ": "JWT", "kid": kid });
    format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

pub async fn jwks_server(keys: Vec<Value>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": keys })))
        .mount(&server)
        .await;
    server
}

pub fn jwks_uri(server: &MockServer) -> Url {
    Url::parse(&format!("{}{}", server.uri(), JWKS_PATH)).expect("mock server uri")
}

pub fn auth_config(jwks_uri: Url) -> AuthConfig {
    AuthConfig {
        jwks_uri,
        issuer: ISSUER.to_string(),
        audience: AUDIENCE.to_string(),
        jwks_fetch_timeout: None,
    }
}

pub fn auth_service(config: &AuthConfig) -> Arc<AuthService> {
    build_auth_service(config).expect("reqwest client")
}
