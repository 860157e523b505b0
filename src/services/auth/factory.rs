/// Factory: build `AuthService` from the identity-provider settings.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::{AuthService, RemoteJwks, jwks::JwksError};

pub fn build_auth_service(config: &AuthConfig) -> Result<Arc<AuthService>, JwksError> {
    let keys = RemoteJwks::new(config.jwks_uri.clone(), config.jwks_fetch_timeout)?;

    tracing::info!(
        jwks_uri = %keys.jwks_uri(),
        issuer = %config.issuer,
        audience = %config.audience,
        "bearer gate configured"
    );

    Ok(Arc::new(AuthService::new(config, Arc::new(keys))))
}
