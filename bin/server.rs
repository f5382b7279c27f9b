// Rhyme Store - Web Server
// REST API with Axum over the SQLite rhyme index

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use rhyme_store::{
    add_sentence, compose_reply, delete_sentence, get_all_sentences, logging, pick_rhyme,
    setup_database, DefaultRhymes, Settings, SpanishWordParser, StoredSentence, WordAnalysis,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    parser: SpanishWordParser,
    defaults: Arc<DefaultRhymes>,
    /// Next fallback phrase to hand out
    rotation: Arc<AtomicUsize>,
    max_reply_length: usize,
}

impl AppState {
    fn new(conn: Connection, settings: &Settings) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            parser: SpanishWordParser::new(),
            defaults: Arc::new(settings.default_rhymes()),
            rotation: Arc::new(AtomicUsize::new(0)),
            max_reply_length: settings.rhymes.max_reply_length,
        }
    }

    fn db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::internal("database lock poisoned"))
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Error half of a handler result, rendered with the same envelope
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl std::fmt::Display) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    fn bad_request(message: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}", self.message);
        }
        (self.status, Json(ApiResponse::<()>::err(self.message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Deserialize)]
struct SentenceRequest {
    sentence: String,
}

#[derive(Serialize)]
struct AddResponse {
    added: bool,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    user: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    rhyme: String,
    /// False when the rhyme is a fallback phrase
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/rhymes - All stored sentences
async fn list_rhymes(State(state): State<AppState>) -> ApiResult<Vec<StoredSentence>> {
    let conn = state.db()?;
    let sentences = get_all_sentences(&conn).map_err(ApiError::internal)?;
    Ok(Json(ApiResponse::ok(sentences)))
}

/// POST /api/rhymes - Index a sentence
async fn create_rhyme(
    State(state): State<AppState>,
    Json(request): Json<SentenceRequest>,
) -> ApiResult<AddResponse> {
    let conn = state.db()?;
    let added = add_sentence(&conn, &state.parser, &request.sentence)
        .map_err(|e| ApiError::bad_request(format!("{:#}", e)))?;
    Ok(Json(ApiResponse::ok(AddResponse { added })))
}

/// DELETE /api/rhymes - Remove a sentence
async fn remove_rhyme(
    State(state): State<AppState>,
    Json(request): Json<SentenceRequest>,
) -> ApiResult<String> {
    let conn = state.db()?;
    delete_sentence(&conn, &request.sentence)
        .map_err(|e| ApiError::new(StatusCode::NOT_FOUND, e))?;
    Ok(Json(ApiResponse::ok(request.sentence)))
}

/// GET /api/rhymes/search?q=...&user=... - Find a rhyme for a sentence
async fn search_rhyme(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let found = {
        let conn = state.db()?;
        pick_rhyme(&conn, &state.parser, &query.q).map_err(ApiError::internal)?
    };

    let matched = found.is_some();
    let rhyme = found.unwrap_or_else(|| {
        let turn = state.rotation.fetch_add(1, Ordering::Relaxed);
        state.defaults.pick(turn).to_string()
    });

    let reply = query
        .user
        .as_deref()
        .map(|user| compose_reply(user, &rhyme, state.max_reply_length));

    Ok(Json(ApiResponse::ok(SearchResponse {
        query: query.q,
        rhyme,
        matched,
        reply,
    })))
}

/// GET /api/analyze/:word - Step-by-step rhyme analysis of one word
async fn analyze_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> ApiResult<WordAnalysis> {
    let analysis = state.parser.analyze(&word).map_err(ApiError::bad_request)?;
    Ok(Json(ApiResponse::ok(analysis)))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn app(state: AppState) -> Router {
    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/rhymes", get(list_rhymes).post(create_rhyme).delete(remove_rhyme))
        .route("/rhymes/search", get(search_rhyme))
        .route("/analyze/:word", get(analyze_word))
        .with_state(state);

    // Build main router
    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;
    logging::init(&settings.log.level)?;

    println!("🌐 Rhyme Store - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let db_path = &settings.database.path;
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    setup_database(&conn)?;
    info!("Database opened: {}", db_path.display());

    let state = AppState::new(conn, &settings);

    // Start server
    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/rhymes", addr);
    println!("   UI:  http://{}", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app(state))
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
