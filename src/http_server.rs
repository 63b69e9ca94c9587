// HTTP server for browser mode - exposes the debate session as a JSON API

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::debate::{DebateOrchestrator, RoundError};
use crate::export::export_markdown;
use crate::providers::ProviderError;
use crate::round_builder::RoundMode;
use crate::segmenter::strip_summary_label;
use crate::session::SessionState;
use crate::types::{Bookmark, Relevance, Round};

#[derive(Clone)]
pub struct AppState {
    /// One mutex for the whole session: at most one completion call is
    /// outstanding at a time and round appends never interleave.
    pub session: Arc<Mutex<SessionState>>,
    pub orchestrator: Arc<DebateOrchestrator>,
}

pub async fn run_http_server(state: AppState, port: u16) {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/session", get(get_session))
        .route("/api/topic", put(set_topic))
        .route("/api/personas", get(list_personas))
        .route("/api/rounds", get(list_rounds).post(start_round))
        .route("/api/rounds/follow-up", post(follow_up_round))
        .route("/api/rounds/:number", get(get_round))
        .route("/api/summary", get(get_summary))
        .route("/api/bookmarks", get(list_bookmarks).post(add_bookmark))
        .route("/api/bookmarks/:persona", get(list_bookmarks_for))
        .route("/api/export/markdown", get(export_transcript))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind HTTP server to port {}: {}", port, e);
            eprintln!("Try setting DEBATE_HTTP_PORT to a different port, e.g.:");
            eprintln!("  DEBATE_HTTP_PORT=3002 cargo run");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("HTTP server error: {}", e);
    }
}

// Root route - shows API info and available endpoints
async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Debate Room API",
        "version": "1.0.0",
        "status": "running",
        "endpoints": {
            "health": "GET /api/health",
            "session": "GET /api/session",
            "topic": "PUT /api/topic",
            "personas": "GET /api/personas",
            "rounds": {
                "start": "POST /api/rounds",
                "follow_up": "POST /api/rounds/follow-up",
                "list": "GET /api/rounds",
                "read": "GET /api/rounds/:number"
            },
            "summary": "GET /api/summary",
            "bookmarks": "GET|POST /api/bookmarks",
            "export": "GET /api/export/markdown"
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

fn round_json(number: usize, round: &Round) -> serde_json::Value {
    json!({
        "number": number,
        "raw_text": round.raw_text,
        "fragments": round.fragments,
        "speaker_order": round.speaker_order,
        "moderator_summary": round.moderator_summary,
        "moderator_summary_display": strip_summary_label(&round.moderator_summary),
    })
}

fn bookmark_json(bookmark: &Bookmark) -> serde_json::Value {
    json!({
        "round": bookmark.round_number,
        "content": bookmark.content,
        "relevance": bookmark.relevance.label(),
        "style": bookmark.relevance.display_style(),
    })
}

/// The UI only ever learns "round produced" or "round not produced, reason
/// shown"; the status code classifies the reason.
fn round_error_response(error: RoundError) -> axum::response::Response {
    let status = match &error {
        RoundError::EmptyTopic | RoundError::EmptyRoster => StatusCode::BAD_REQUEST,
        RoundError::Provider(ProviderError::RateLimited)
        | RoundError::Provider(ProviderError::ServiceUnavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        RoundError::Provider(ProviderError::Blocked) => StatusCode::UNPROCESSABLE_ENTITY,
        RoundError::Provider(ProviderError::Transport(_)) => StatusCode::BAD_GATEWAY,
        RoundError::Provider(ProviderError::Unauthenticated) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(json!({
        "topic": session.topic(),
        "personas": session.personas().personas(),
        "round_count": session.rounds.count(),
    }))
}

#[derive(serde::Deserialize)]
struct SetTopicRequest {
    topic: String,
}

async fn set_topic(
    State(state): State<AppState>,
    Json(req): Json<SetTopicRequest>,
) -> impl IntoResponse {
    if req.topic.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "topic is empty" })))
            .into_response();
    }
    let mut session = state.session.lock().await;
    session.set_topic(req.topic);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_personas(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(json!(session.personas().personas()))
}

async fn start_round(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    match state
        .orchestrator
        .run_round(&mut session, RoundMode::NewRound)
        .await
    {
        Ok(number) => match session.rounds.get(number - 1) {
            Ok(round) => (StatusCode::CREATED, Json(round_json(number, round))).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
        },
        Err(e) => round_error_response(e),
    }
}

#[derive(serde::Deserialize)]
struct FollowUpRequest {
    question: String,
}

async fn follow_up_round(
    State(state): State<AppState>,
    Json(req): Json<FollowUpRequest>,
) -> impl IntoResponse {
    let question = req.question.trim().to_string();
    if question.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "question is empty" })))
            .into_response();
    }
    let mut session = state.session.lock().await;
    match state
        .orchestrator
        .run_round(&mut session, RoundMode::FollowUp(question))
        .await
    {
        Ok(number) => match session.rounds.get(number - 1) {
            Ok(round) => (StatusCode::CREATED, Json(round_json(number, round))).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
        },
        Err(e) => round_error_response(e),
    }
}

async fn list_rounds(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    let rounds: Vec<_> = session
        .rounds
        .all()
        .iter()
        .enumerate()
        .map(|(i, round)| round_json(i + 1, round))
        .collect();
    Json(json!(rounds))
}

async fn get_round(
    State(state): State<AppState>,
    Path(number): Path<usize>,
) -> impl IntoResponse {
    let session = state.session.lock().await;
    if number == 0 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "rounds are numbered from 1" })),
        )
            .into_response();
    }
    match session.rounds.get(number - 1) {
        Ok(round) => (StatusCode::OK, Json(round_json(number, round))).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))).into_response(),
    }
}

// Mirrors the UI's Summary tab: moderator summaries by round plus bookmarked
// arguments grouped by persona.
async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    let summaries: Vec<_> = session
        .rounds
        .all()
        .iter()
        .enumerate()
        .filter(|(_, round)| !round.moderator_summary.is_empty())
        .map(|(i, round)| {
            json!({
                "round": i + 1,
                "summary": strip_summary_label(&round.moderator_summary),
            })
        })
        .collect();

    let mut bookmarks = serde_json::Map::new();
    for persona in session.personas().iter() {
        let list: Vec<_> = session
            .bookmarks
            .list_for(&persona.name)
            .iter()
            .map(bookmark_json)
            .collect();
        bookmarks.insert(persona.name.clone(), json!(list));
    }

    Json(json!({
        "moderator_summaries": summaries,
        "bookmarks": bookmarks,
    }))
}

#[derive(serde::Deserialize)]
struct AddBookmarkRequest {
    persona: String,
    round: usize,
    content: String,
    relevance: Relevance,
}

/// Trim policy lives here, at the API boundary; the store keeps content
/// verbatim. Whitespace-only submissions carry nothing worth keeping and are
/// rejected before the store is touched.
fn normalize_bookmark_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn add_bookmark(
    State(state): State<AppState>,
    Json(req): Json<AddBookmarkRequest>,
) -> impl IntoResponse {
    let content = match normalize_bookmark_content(&req.content) {
        Some(c) => c,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "bookmark content is empty" })),
            )
                .into_response();
        }
    };
    let mut session = state.session.lock().await;
    if req.round == 0 || req.round > session.rounds.count() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("round {} does not exist", req.round) })),
        )
            .into_response();
    }
    match session
        .bookmarks
        .add(&req.persona, req.round, content, req.relevance)
    {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))).into_response(),
    }
}

async fn list_bookmarks(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    let mut all = serde_json::Map::new();
    for (persona, list) in session.bookmarks.list_all() {
        all.insert(
            persona.clone(),
            json!(list.iter().map(bookmark_json).collect::<Vec<_>>()),
        );
    }
    Json(json!(all))
}

async fn list_bookmarks_for(
    State(state): State<AppState>,
    Path(persona): Path<String>,
) -> impl IntoResponse {
    let session = state.session.lock().await;
    if !session.personas().contains(&persona) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown persona: {}", persona) })),
        )
            .into_response();
    }
    let list: Vec<_> = session
        .bookmarks
        .list_for(&persona)
        .iter()
        .map(bookmark_json)
        .collect();
    (StatusCode::OK, Json(json!(list))).into_response()
}

async fn export_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        export_markdown(&session),
    )
        .into_response()
}
