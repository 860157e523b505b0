//! Remote JSON Web Key Set lookup.
//!
//! The key set is fetched on every call. There is no cache and no retry: a
//! failed fetch and an unknown `kid` both end the verification.

use std::{future::Future, pin::Pin, time::Duration};

use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tracing::debug;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch key set: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("key set endpoint responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode key set: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unable to find appropriate key")]
    KeyNotFound,

    #[error("key '{kid}' has no certificate chain")]
    MissingCertificate { kid: String },

    #[error("invalid certificate for key '{kid}': {source}")]
    InvalidCertificate {
        kid: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// One entry of the published key set.
///
/// Only `kid` and `x5c` are read; `kty`, `use`, `n`, `e` and the rest are
/// ignored. Both are optional so that one odd descriptor (e.g. an encryption
/// key without `x5c`) does not make the whole set undecodable.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub x5c: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// First descriptor (in published order) whose `kid` equals `kid`.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

impl Jwk {
    /// Build RSA verification key material from the leaf certificate (`x5c[0]`).
    pub fn to_decoding_key(&self) -> Result<DecodingKey, JwksError> {
        let kid = self.kid.clone().unwrap_or_default();
        let leaf = self
            .x5c
            .first()
            .ok_or_else(|| JwksError::MissingCertificate { kid: kid.clone() })?;

        DecodingKey::from_rsa_pem(pem_certificate(leaf).as_bytes())
            .map_err(|source| JwksError::InvalidCertificate { kid, source })
    }
}

/// Wrap a base64 DER certificate body in PEM delimiters.
pub fn pem_certificate(der_base64: &str) -> String {
    format!(
        "-----BEGIN CERTIFICATE-----\n{}\n-----END CERTIFICATE-----",
        der_base64
    )
}

/// Source of verification keys, looked up by key identifier.
///
/// `AuthService` only depends on this trait; a cached implementation could be
/// slotted in without touching the gate.
pub trait KeyResolver: Send + Sync {
    fn resolve<'a>(
        &'a self,
        kid: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<DecodingKey, JwksError>> + Send + 'a>>;
}

/// Fetches the key set from the identity provider on every `resolve`.
#[derive(Debug, Clone)]
pub struct RemoteJwks {
    client: reqwest::Client,
    jwks_uri: Url,
}

impl RemoteJwks {
    pub fn new(jwks_uri: Url, timeout: Option<Duration>) -> Result<Self, JwksError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(JwksError::Client)?;

        Ok(Self { client, jwks_uri })
    }

    pub fn jwks_uri(&self) -> &Url {
        &self.jwks_uri
    }

    pub async fn fetch(&self) -> Result<JwkSet, JwksError> {
        debug!(jwks_uri = %self.jwks_uri, "fetching key set");

        let response = self
            .client
            .get(self.jwks_uri.clone())
            .send()
            .await
            .map_err(JwksError::Fetch)?;

        let status = response.status();
        if !status.is_success() {
            return Err(JwksError::Status(status));
        }

        let body = response.bytes().await.map_err(JwksError::Fetch)?;
        let set: JwkSet = serde_json::from_slice(&body)?;

        debug!(key_count = set.keys.len(), "key set fetched");
        Ok(set)
    }
}

impl KeyResolver for RemoteJwks {
    fn resolve<'a>(
        &'a self,
        kid: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<DecodingKey, JwksError>> + Send + 'a>> {
        Box::pin(async move {
            let set = self.fetch().await?;
            set.find(kid).ok_or(JwksError::KeyNotFound)?.to_decoding_key()
        })
    }
}
