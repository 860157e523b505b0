/*
 * Responsibility
 * - /api の URL 構造を定義
 * - /health 以外はすべて Bearer gate (route_layer) の内側
 */
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::handlers::{
    contacts::{add_contact, delete_contact, edit_contact},
    health::health,
    organizations::{add_organization, all_data, org_types},
};

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/add_organization", post(add_organization))
        .route("/add_contact", post(add_contact))
        .route("/all_data", get(all_data))
        .route("/org_types", get(org_types))
        .route("/edit_contact", put(edit_contact))
        .route("/delete_contact/{id}", delete(delete_contact));

    Router::new()
        .route("/health", get(health))
        .merge(middleware::auth::access::apply(protected, state.auth.clone()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use wiremock::MockServer;

    use super::*;
    use crate::services::auth::test_support::{
        SIGNING_CERT_PEM, SIGNING_KEY_PEM, SIGNING_KID, auth_config, auth_service, jwk,
        jwks_server, jwks_uri, sign_rs256, valid_claims,
    };

    const DATA_ROUTES: [(Method, &str); 6] = [
        (Method::POST, "/api/add_organization"),
        (Method::POST, "/api/add_contact"),
        (Method::GET, "/api/all_data"),
        (Method::GET, "/api/org_types"),
        (Method::PUT, "/api/edit_contact"),
        (Method::DELETE, "/api/delete_contact/3f2c0e4e-7a43-4a52-9d0c-1b1f3f0b6a11"),
    ];

    // The pool never connects; every request here is answered before a
    // handler would touch the database.
    fn app(server: &MockServer) -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://relationsales@127.0.0.1:1/relationsales")
            .unwrap();
        let state = AppState::new(db, auth_service(&auth_config(jwks_uri(server))));

        Router::new().nest("/api", routes(&state)).with_state(state)
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        let res = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn every_data_route_requires_a_bearer_token() {
        let server = jwks_server(vec![jwk(SIGNING_KID, SIGNING_CERT_PEM)]).await;
        let app = app(&server);

        for (method, uri) in DATA_ROUTES {
            let (status, body) = send(app.clone(), method.clone(), uri, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(
                body,
                json!({ "error": "Authorization header is required" }),
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn health_is_public_and_unknown_paths_are_not_found() {
        let server = jwks_server(vec![]).await;
        let app = app(&server);

        let (status, body) = send(app.clone(), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        let (status, _) = send(app, Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_contact_id_is_bad_request_once_authenticated() {
        let server = jwks_server(vec![jwk(SIGNING_KID, SIGNING_CERT_PEM)]).await;
        let token = sign_rs256(Some(SIGNING_KID), &valid_claims(), SIGNING_KEY_PEM);

        let (status, body) = send(
            app(&server),
            Method::DELETE,
            "/api/delete_contact/not-a-uuid",
            Some(&format!("Bearer {token}")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "invalid contact id" }));
    }
}
