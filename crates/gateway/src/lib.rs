//! HTTP API gateway for CampusDesk.
//!
//! Exposes the resolution endpoint and a health check:
//!
//! - `POST /ask`    — resolve a question against the knowledge base
//! - `GET  /health` — liveness check
//!
//! Built on Axum. The gateway is a thin transport: it maps the resolver's
//! error taxonomy onto status codes and never invents outcomes of its own.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use campusdesk_core::error::ResolveError;
use campusdesk_core::resolve::{Resolution, ResolveRequest};
use campusdesk_core::store::KnowledgeStore;
use campusdesk_resolver::QueryResolver;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub resolver: QueryResolver,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ask", post(ask_handler))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: &campusdesk_config::AppConfig,
    store: Arc<dyn KnowledgeStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let resolver = QueryResolver::new(store).with_cache_ttl(std::time::Duration::from_secs(
        config.knowledge.cache_ttl_secs,
    ));
    let state = Arc::new(GatewayState { resolver });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Wire shape of `POST /ask`.
///
/// `question` is optional here so an absent field reaches the resolver as
/// invalid input and comes back as a 400, not a deserialization rejection.
#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    question: Option<String>,

    #[serde(default, rename = "studentEmail")]
    student_email: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn ask_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<Resolution>, (StatusCode, Json<ErrorResponse>)> {
    let request = ResolveRequest {
        question: payload.question.unwrap_or_default(),
        student_email: payload.student_email,
    };

    match state.resolver.resolve(request).await {
        Ok(resolution) => Ok(Json(resolution)),

        Err(ResolveError::InvalidRequest) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Question is required".into(),
            }),
        )),

        Err(e @ ResolveError::StoreUnavailable(_)) => {
            error!(error = %e, "knowledge base read failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }

        Err(e @ ResolveError::EscalationWriteFailed(_)) => {
            error!(error = %e, "escalation append failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use campusdesk_core::knowledge::KnowledgeEntry;
    use campusdesk_store::InMemoryStore;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn test_app() -> (Arc<InMemoryStore>, Router) {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_entry(KnowledgeEntry::verified("refund policy", "See section 4"))
            .await;

        let resolver = QueryResolver::new(store.clone() as Arc<dyn KnowledgeStore>);
        let app = build_router(Arc::new(GatewayState { resolver }));
        (store, app)
    }

    fn ask(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (_store, app) = test_app().await;
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn matched_question_returns_internal_db_shape() {
        let (store, app) = test_app().await;

        let response = app
            .oneshot(ask(
                r#"{"question":"What's the refund policy for summer term?"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["source"], "INTERNAL_DB");
        assert_eq!(body["answer"], "See section 4");
        assert!(store.query_records().await.is_empty());
    }

    #[tokio::test]
    async fn unmatched_question_escalates_and_persists() {
        let (store, app) = test_app().await;

        let response = app
            .oneshot(ask(
                r#"{"question":"How do I reset my password?","studentEmail":"sam@example.edu"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["source"], "ESCALATED");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("forwarded to administration")
        );

        let log = store.query_records().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].student_email, "sam@example.edu");
    }

    #[tokio::test]
    async fn empty_question_is_a_client_error() {
        let (store, app) = test_app().await;

        let response = app.oneshot(ask(r#"{"question":""}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Question is required");
        assert!(store.query_records().await.is_empty());
    }

    #[tokio::test]
    async fn missing_question_field_is_a_client_error() {
        let (_store, app) = test_app().await;

        let response = app
            .oneshot(ask(r#"{"studentEmail":"sam@example.edu"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Question is required");
    }

    /// Store whose reads always fail.
    struct DownStore;

    #[async_trait::async_trait]
    impl KnowledgeStore for DownStore {
        fn name(&self) -> &str {
            "down"
        }

        async fn read_verified_entries(
            &self,
        ) -> Result<Vec<KnowledgeEntry>, campusdesk_core::StoreError> {
            Err(campusdesk_core::StoreError::Storage(
                "connection refused".into(),
            ))
        }

        async fn append_query_record(
            &self,
            _record: campusdesk_core::NewQueryRecord,
        ) -> Result<campusdesk_core::QueryRecord, campusdesk_core::StoreError> {
            Err(campusdesk_core::StoreError::Storage(
                "connection refused".into(),
            ))
        }
    }

    #[tokio::test]
    async fn store_failure_maps_to_service_unavailable() {
        let resolver = QueryResolver::new(Arc::new(DownStore));
        let app = build_router(Arc::new(GatewayState { resolver }));

        let response = app
            .oneshot(ask(r#"{"question":"Any question"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("Knowledge base unavailable")
        );
    }
}
