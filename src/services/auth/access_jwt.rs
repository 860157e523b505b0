use std::{str::FromStr, sync::Arc};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
use serde::{Deserialize, de::DeserializeOwned};

use crate::config::AuthConfig;
use crate::services::auth::jwks::{JwksError, KeyResolver};

/// RSA signature family. Everything else (`none`, HMAC, EC, EdDSA) is refused
/// before any key is looked up.
pub const ALLOWED_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

// Every failure of the bearer gate. All of them end in 401; the message is
// what the client sees in `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingCredential,
    #[error("Invalid authorization header")]
    MalformedCredential,
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("unexpected signing method: {0}")]
    UnsupportedAlgorithm(String),
    #[error("invalid audience")]
    AudienceMismatch,
    #[error("invalid issuer")]
    IssuerMismatch,
    #[error(transparent)]
    KeyResolution(#[from] JwksError),
    #[error("invalid signature")]
    SignatureInvalid,
    #[error("token is expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
}

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == expected,
            Audience::Multiple(auds) => auds.iter().any(|aud| aud == expected),
        }
    }
}

/// Access token claims. `sub`, `aud`, `iss` and `exp` are required; a token
/// missing any of them fails to decode.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub aud: Audience,
    pub iss: String,
    pub exp: i64,

    #[serde(default)]
    pub nbf: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default)]
    kid: Option<String>,
}

/// What the gate hands to the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub user_id: String,
}

/// Verifies Auth0-issued RS* access tokens against the provider's key set.
#[derive(Clone)]
pub struct AuthService {
    issuer: String,
    audience: String,
    keys: Arc<dyn KeyResolver>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(config: &AuthConfig, keys: Arc<dyn KeyResolver>) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            keys,
        }
    }

    /// Verify a compact JWS access token.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// algorithm, audience, issuer, key lookup, signature, exp/nbf.
    pub async fn verify(&self, token: &str) -> Result<VerifiedAccessToken, AuthError> {
        self.verify_at(token, chrono::Utc::now().timestamp()).await
    }

    pub(crate) async fn verify_at(
        &self,
        token: &str,
        now: i64,
    ) -> Result<VerifiedAccessToken, AuthError> {
        let (header_b64, claims_b64) = split_compact(token)?;
        let header: TokenHeader = decode_segment(header_b64, "header")?;
        let claims: AccessTokenClaims = decode_segment(claims_b64, "claims")?;

        let alg = allowed_algorithm(&header.alg)?;

        if !claims.aud.contains(&self.audience) {
            return Err(AuthError::AudienceMismatch);
        }
        if !same_issuer(&claims.iss, &self.issuer) {
            return Err(AuthError::IssuerMismatch);
        }

        // A token without `kid` can never match a published key.
        let kid = header.kid.as_deref().ok_or(JwksError::KeyNotFound)?;
        let key = self.keys.resolve(kid).await?;

        let verified = jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &signature_only(alg))
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::SignatureInvalid
                }
                _ => AuthError::MalformedToken(e.to_string()),
            })?
            .claims;

        check_time_bounds(&verified, now)?;

        Ok(VerifiedAccessToken {
            user_id: verified.sub,
        })
    }
}

fn split_compact(token: &str) -> Result<(&str, &str), AuthError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(claims), Some(_signature), None) => Ok((header, claims)),
        _ => Err(AuthError::MalformedToken(
            "expected three dot-separated segments".into(),
        )),
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str, what: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::MalformedToken(format!("{what}: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken(format!("{what}: {e}")))
}

fn allowed_algorithm(alg: &str) -> Result<Algorithm, AuthError> {
    Algorithm::from_str(alg)
        .ok()
        .filter(|a| ALLOWED_ALGORITHMS.contains(a))
        .ok_or_else(|| AuthError::UnsupportedAlgorithm(alg.to_string()))
}

fn same_issuer(actual: &str, expected: &str) -> bool {
    actual.trim_end_matches('/') == expected.trim_end_matches('/')
}

// Signature check only: aud/iss were compared above and exp/nbf are checked
// by `check_time_bounds` without leeway.
fn signature_only(alg: Algorithm) -> Validation {
    let mut validation = Validation::new(alg);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation
}

/// `exp` is exclusive: a token expiring at `now` is already expired.
/// `nbf` and `iat` may not lie in the future.
fn check_time_bounds(claims: &AccessTokenClaims, now: i64) -> Result<(), AuthError> {
    if now >= claims.exp {
        return Err(AuthError::Expired);
    }
    if claims.nbf.is_some_and(|nbf| now < nbf) || claims.iat.is_some_and(|iat| now < iat) {
        return Err(AuthError::NotYetValid);
    }
    Ok(())
}
