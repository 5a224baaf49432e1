use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, Request};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};
use uuid::Uuid;

use crate::core::config::AppConfig;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Assigns a time-ordered UUID v7 to requests that arrive without an id
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request span carrying method, path and request id
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    }
}

/// CORS for the back-office frontend. `*` in the list allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([REQUEST_ID_HEADER]);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Wrap the application router in the HTTP stack: body limit, CORS, request
/// ids and request tracing. The request id layer is outermost so the trace
/// span and the response both see it.
pub fn apply_http_layers(router: Router, config: &AppConfig) -> Router {
    router
        .layer(DefaultBodyLimit::max(config.max_request_body_size))
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    fn app(origins: &[&str]) -> TestServer {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            max_request_body_size: 1024,
        };
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        TestServer::new(apply_http_layers(router, &config)).unwrap()
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let server = app(&["*"]);

        let response = server.get("/ping").await;
        let id = response.header(REQUEST_ID_HEADER);
        let id = Uuid::parse_str(id.to_str().unwrap()).unwrap();
        assert_eq!(id.get_version_num(), 7);
    }

    #[tokio::test]
    async fn test_propagates_client_request_id() {
        let server = app(&["*"]);

        let response = server
            .get("/ping")
            .add_header(REQUEST_ID_HEADER, HeaderValue::from_static("client-abc"))
            .await;
        assert_eq!(response.header(REQUEST_ID_HEADER), "client-abc");
    }

    #[tokio::test]
    async fn test_cors_allows_listed_origin_only() {
        let server = app(&["https://admin.example.com"]);

        let allowed = server
            .get("/ping")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://admin.example.com"),
            )
            .await;
        assert_eq!(
            allowed.header("access-control-allow-origin"),
            "https://admin.example.com"
        );

        let denied = server
            .get("/ping")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://evil.example.com"),
            )
            .await;
        assert!(denied
            .maybe_header("access-control-allow-origin")
            .is_none());
    }
}
