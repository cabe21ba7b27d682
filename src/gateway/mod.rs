pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

/// Build the complete router
pub fn router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/sign-up", post(handlers::sign_up))
        .route("/sign-in", post(handlers::sign_in))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me));

    // Session required (resolved per handler from the cookie)
    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .route("/api/v1/banks", get(handlers::list_banks))
        .route("/api/v1/banks/link-token", post(handlers::create_link_token))
        .route("/api/v1/banks/exchange", post(handlers::exchange_public_token))
        .route("/api/v1/banks/{id}", get(handlers::get_bank))
        .route("/api/v1/accounts", get(handlers::get_accounts))
        .route("/api/v1/accounts/{id}", get(handlers::get_account))
        .route("/api/v1/transfers", post(handlers::send_payment))
        .route(
            "/api/v1/transactions/{bank_id}",
            get(handlers::get_transactions_by_bank_id),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start HTTP Gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        tracing::error!("Failed to bind to {}: {} (is port {} in use?)", addr, e, port);
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::actions::{Actions, Clients, CollectionIds};
    use crate::appwrite::mock::{MockDocumentStore, MockIdentity};
    use crate::dwolla::mock::MockProcessor;
    use crate::plaid::mock::MockAggregator;

    fn test_app() -> Router {
        let clients = Clients {
            identity: Arc::new(MockIdentity::new()),
            documents: Arc::new(MockDocumentStore::new()),
            aggregator: Arc::new(MockAggregator::new()),
            processor: Arc::new(MockProcessor::new()),
        };
        let collections = CollectionIds {
            user: "users".to_string(),
            bank: "banks".to_string(),
            transaction: "transactions".to_string(),
        };
        router(Arc::new(AppState::new(Actions::new(clients, &collections))))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_with(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    /// `name=value` part of the first Set-Cookie header
    fn session_cookie(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(get_with("/api/v1/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["code"], 0);
        assert!(body["data"]["timestamp_ms"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_protected_route_requires_session() {
        let response = test_app()
            .oneshot(get_with("/api/v1/accounts", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["code"], types::error_codes::MISSING_AUTH);
    }

    #[tokio::test]
    async fn test_sign_up_link_and_list_banks() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/sign-up",
                json!({
                    "email": "a@b.com",
                    "firstName": "A",
                    "lastName": "B",
                    "ssn": "1234",
                    "dateOfBirth": "1990-01-01",
                    "password": "pw"
                }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("appwrite-session="));
        assert!(set_cookie.contains("HttpOnly"));
        let cookie = session_cookie(&response);

        let me = body_json(
            app.clone()
                .oneshot(get_with("/api/v1/auth/me", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(me["data"]["email"], "a@b.com");
        assert!(me["data"].get("ssn").is_none());
        assert!(me["data"].get("dateOfBirth").is_none());

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/banks/exchange",
                json!({"publicToken": "public-sandbox-1"}),
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let linked = body_json(response).await;
        assert_eq!(linked["data"]["revalidate"], "/");
        assert!(linked["data"]["bank"].get("accessToken").is_none());
        let bank_id = linked["data"]["bank"]["id"].as_str().unwrap().to_string();

        let banks = body_json(
            app.clone()
                .oneshot(get_with("/api/v1/banks", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(banks["data"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(get_with(&format!("/api/v1/accounts/{}", bank_id), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let detail = body_json(response).await;
        assert_eq!(detail["data"]["data"]["appwriteItemId"], bank_id.as_str());
    }

    #[tokio::test]
    async fn test_logout_expires_cookie() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/sign-up",
                json!({"email": "a@b.com", "firstName": "A", "lastName": "B", "password": "pw"}),
                None,
            ))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/logout", json!({}), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let expired = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(expired.contains("Max-Age=0"));

        let me = body_json(
            app.oneshot(get_with("/api/v1/auth/me", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        assert!(me["data"].is_null());
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/auth/sign-in",
                json!({"email": "nobody@b.com", "password": "pw"}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
