//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the single `POST /update` route
//! - Wire up middleware (CORS, tracing, request ID, body limit)
//! - Bind server to listener and shut down gracefully
//! - Forward each payload to the upstream and relay the outcome

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Method, Request},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::request::{request_id_layers, request_id_of};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
}

impl RelayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamError> {
        let state = AppState {
            upstream: UpstreamClient::new(&config.upstream)?,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let (set_request_id, propagate_request_id) = request_id_layers();

        Router::new()
            .route("/update", post(forward_update))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id)
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %request.method(),
                                uri = %request.uri(),
                                request_id = %request_id_of(request),
                            )
                        },
                    ))
                    .layer(propagate_request_id)
                    .layer(cors_layer()),
            )
    }

    /// The fully layered router, e.g. for driving with `tower::ServiceExt::oneshot`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Cross-origin policy: any origin, the common verbs, and whatever headers
/// a preflight asks for.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// `POST /update`: relay the JSON body upstream and echo what comes back.
async fn forward_update(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, UpstreamError> {
    tracing::info!(payload = %payload, "Forwarding request");

    match state.upstream.forward(&payload).await {
        Ok(body) => {
            tracing::info!(response = %body, "Upstream response");
            Ok(Json(body))
        }
        Err(err) => {
            tracing::error!(
                status = %err.status(),
                details = %err.details(),
                "Error forwarding request to upstream"
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    fn test_router(config: RelayConfig) -> Router {
        RelayServer::new(config).unwrap().router()
    }

    #[tokio::test]
    async fn preflight_is_permissive_for_any_origin() {
        let response = test_router(RelayConfig::default())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/update")
                    .header(header::ORIGIN, "http://dashboard.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST"));
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn only_post_is_routed() {
        let response = test_router(RelayConfig::default())
            .oneshot(Request::builder().uri("/update").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let response = test_router(RelayConfig::default())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/other")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_json_content_type_is_rejected() {
        let response = test_router(RelayConfig::default())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/update")
                    .body(Body::from(r#"{"id":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let response = test_router(RelayConfig::default())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/update")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"id\":"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = RelayConfig::default();
        config.security.max_body_size = 16;
        let response = test_router(config)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/update")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(format!(r#"{{"pixels":"{}"}}"#, "x".repeat(64))))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let response = test_router(RelayConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/update")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
