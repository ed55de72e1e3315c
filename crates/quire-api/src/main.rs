//! quire-api - HTTP API server for quire

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use quire_core::{
    defaults, ChatBackend, CreateNoteRequest, DeleteNoteResponse, ModelList, NoteStore, Session,
    SummarizeRequest, SummarizeResponse, UpdateNoteRequest,
};
use quire_db::Database;
use quire_inference::{ChatCompletionsBackend, Summarizer};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Arc<Database>,
    summarizer: Arc<Summarizer>,
    backend: Arc<dyn ChatBackend>,
    /// Base URL the auth callback redirects back to.
    app_base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   RUST_LOG    - standard env filter (default: "quire_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quire_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!(log_format = %log_format, "Logging initialized");

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/quire".to_string());
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| defaults::API_BIND_ADDR.to_string());
    let app_base_url =
        std::env::var("APP_BASE_URL").unwrap_or_else(|_| defaults::APP_BASE_URL.to_string());

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Completion backend for summarization
    let backend: Arc<dyn ChatBackend> = Arc::new(ChatCompletionsBackend::from_env()?);
    info!(model = backend.default_model(), "Completions backend initialized");
    let summarizer = Arc::new(Summarizer::new(backend.clone()));

    let state = AppState {
        db: Arc::new(db),
        summarizer,
        backend,
        app_base_url,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route(
            "/notes",
            get(list_notes)
                .post(create_note)
                .put(update_note)
                .delete(delete_note),
        )
        .route("/ai/summarize", axum::routing::post(summarize))
        .route("/ai/models", get(list_models))
        .route("/auth/callback", get(auth_callback))
        .route("/health", get(health_check))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = bind_addr.parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

/// Extract the bearer token from an Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
}

/// Resolve the request's session or reject with 401.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Session, ApiError> {
    let token =
        bearer_token(headers).ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    state
        .db
        .sessions
        .introspect(token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
}

// =============================================================================
// NOTE HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
struct NoteQuery {
    uuid: Option<Uuid>,
}

/// Create body. Required fields are declared optional so a missing field
/// reaches validation and answers 400 with the standard `{"error": ...}`
/// shape instead of a bare extractor rejection.
#[derive(Debug, Deserialize)]
struct CreateNotePayload {
    notes: Option<String>,
    title: Option<String>,
}

/// Update body. A client-supplied `email` is not even deserialized; the
/// owner identity comes from the session alone.
#[derive(Debug, Deserialize)]
struct UpdateNotePayload {
    notes: Option<String>,
    title: Option<String>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummarizePayload {
    text: Option<String>,
    model: Option<String>,
    length: Option<quire_core::SummaryLength>,
    tone: Option<quire_core::SummaryTone>,
}

/// Pull a required text field out of a request body. Absent and blank
/// values are rejected the same way.
fn require_content(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

/// List the owner's notes, or fetch one by id when `?uuid=` is given.
/// Both shapes answer with an array; an unknown id yields an empty one.
async fn list_notes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NoteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let notes = match query.uuid {
        Some(id) => state
            .db
            .notes
            .fetch(&session.email, id)
            .await?
            .into_iter()
            .collect(),
        None => state.db.notes.list(&session.email).await?,
    };

    Ok(Json(notes))
}

async fn create_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateNotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let req = CreateNoteRequest {
        notes: require_content(payload.notes, "Notes content is required")?,
        title: payload.title,
    };

    let note = state.db.notes.insert(&session.email, req).await?;
    Ok((StatusCode::CREATED, Json(vec![note])))
}

/// Update a note. The owner is always the session identity; any `email` in
/// the body is discarded. An ownership mismatch or unknown id answers with
/// an empty array rather than an error.
async fn update_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NoteQuery>,
    Json(payload): Json<UpdateNotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let id = query
        .uuid
        .ok_or_else(|| ApiError::BadRequest("uuid query parameter is required".to_string()))?;

    let req = UpdateNoteRequest {
        notes: require_content(payload.notes, "Notes content is required")?,
        title: payload.title,
        email: None,
        summary: payload.summary,
    };

    let updated = state.db.notes.update(&session.email, id, req).await?;
    Ok(Json(updated.into_iter().collect::<Vec<_>>()))
}

async fn delete_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NoteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let id = query
        .uuid
        .ok_or_else(|| ApiError::BadRequest("uuid query parameter is required".to_string()))?;

    // Deleting an id that is already gone is not an error.
    state.db.notes.delete(&session.email, id).await?;
    Ok(Json(DeleteNoteResponse {
        message: "Note deleted successfully".to_string(),
    }))
}

// =============================================================================
// AI HANDLERS
// =============================================================================

async fn summarize(
    State(state): State<AppState>,
    Json(payload): Json<SummarizePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let req = SummarizeRequest {
        text: require_content(payload.text, "Text content is required")?,
        model: payload.model,
        length: payload.length,
        tone: payload.tone,
    };

    let summary = state.summarizer.summarize(&req).await?;
    Ok(Json(SummarizeResponse { summary }))
}

async fn list_models(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = state.backend.list_models().await?;
    Ok(Json(ModelList { data }))
}

// =============================================================================
// AUTH CALLBACK
// =============================================================================

#[derive(Debug, Deserialize)]
struct AuthCallbackQuery {
    code: Option<String>,
}

/// Exchange a one-time login code for a session and bounce back to the app.
/// The token travels in the URL fragment so it never reaches server logs on
/// the app side. A missing or spent code redirects to the app's error page.
async fn auth_callback(
    State(state): State<AppState>,
    Query(query): Query<AuthCallbackQuery>,
) -> Result<Redirect, ApiError> {
    let Some(code) = query.code else {
        return Ok(Redirect::to(&format!("{}/error", state.app_base_url)));
    };

    match state.db.sessions.exchange_code(&code).await? {
        Some(session) => {
            info!(owner = %session.email, "Login code exchanged");
            Ok(Redirect::to(&format!(
                "{}/#access_token={}",
                state.app_base_url, session.access_token
            )))
        }
        None => Ok(Redirect::to(&format!("{}/error", state.app_base_url))),
    }
}

// =============================================================================
// SYSTEM
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Internal(quire_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
}

impl From<quire_core::Error> for ApiError {
    fn from(err: quire_core::Error) -> Self {
        match &err {
            quire_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            quire_core::Error::NoteNotFound(id) => {
                ApiError::NotFound(format!("Note not found: {}", id))
            }
            quire_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            quire_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    #[test]
    fn test_require_content_rejects_missing_and_blank() {
        for value in [None, Some(String::new()), Some("   \n".to_string())] {
            match require_content(value, "Notes content is required") {
                Err(ApiError::BadRequest(msg)) => {
                    assert_eq!(msg, "Notes content is required");
                }
                other => panic!("Expected BadRequest, got {:?}", other),
            }
        }

        let ok = require_content(Some("<p>hi</p>".to_string()), "x").unwrap();
        assert_eq!(ok, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_missing_notes_field_reaches_validation_as_bad_request() {
        use axum::extract::FromRequest;

        // A body without `notes` must deserialize, so the response is our
        // 400 with the `{"error": ...}` shape rather than an extractor
        // rejection.
        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{}"))
            .unwrap();

        let Json(payload) = Json::<CreateNotePayload>::from_request(request, &())
            .await
            .expect("Body without required fields should still deserialize");
        assert!(payload.notes.is_none());

        let err = require_content(payload.notes, "Notes content is required").unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_text_field_reaches_validation_as_bad_request() {
        use axum::extract::FromRequest;

        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"length": "short"}"#))
            .unwrap();

        let Json(payload) = Json::<SummarizePayload>::from_request(request, &())
            .await
            .expect("Body without required fields should still deserialize");

        let err = require_content(payload.text, "Text content is required").unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bearer_token_parses_well_formed_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_rejects_missing_or_malformed() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_api_error_status_mapping() {
        let cases = [
            (
                ApiError::Unauthorized("no".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::NotFound("gone".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::BadRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Internal(quire_core::Error::Inference("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_core_error_conversion() {
        let id = Uuid::new_v4();
        assert!(matches!(
            ApiError::from(quire_core::Error::NoteNotFound(id)),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(quire_core::Error::InvalidInput("x".to_string())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(quire_core::Error::Unauthorized("x".to_string())),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(quire_core::Error::Inference("x".to_string())),
            ApiError::Internal(_)
        ));
    }
}
