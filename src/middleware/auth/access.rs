//! Bearer gate: `Authorization: Bearer <jwt>` を検証 → AuthCtx を extensions に入れる
//!
//! - 検証 (alg / aud / iss / JWKS / 署名 / exp・nbf) は `AuthService` 側
//! - ここでは header の取り出しと、成功・失敗の振り分けだけを行う
//! - 失敗は常に 401 `{"error": "..."}`、内側の handler は実行されない

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AuthError, AuthService};

/// Protect every route of `router` with the bearer gate.
///
/// `route_layer` so that unmatched paths still 404 instead of 401.
pub fn apply<S>(router: Router<S>, auth: Arc<AuthService>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(auth, access_middleware))
}

async fn access_middleware(
    State(auth): State<Arc<AuthService>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .map(str::to_owned)
        .inspect_err(|err| tracing::warn!(error = %err, "rejected authorization header"))?;

    let verified = match auth.verify(&token).await {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(err.into());
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(verified.user_id));

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization`. The scheme must be exactly `Bearer`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;
    if raw.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    let raw = raw.to_str().map_err(|_| AuthError::MalformedCredential)?;

    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedCredential),
    }
}
