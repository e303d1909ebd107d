use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Json, Redirect};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::client::BotCommand;
use crate::page::render_document;
use crate::poller::Poller;
use crate::surface::Surface;

pub type AppState = Arc<Poller>;

pub fn router(poller: AppState) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/api/view", get(api_view))
        .route("/bot/start", post(bot_start))
        .route("/bot/stop", post(bot_stop))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(poller)
}

// ── Handlers ──

async fn serve_page(State(poller): State<AppState>) -> Html<String> {
    let state = poller.state().lock().await;
    Html(render_document(&state.surface))
}

async fn api_view(State(poller): State<AppState>) -> Json<Surface> {
    Json(poller.state().lock().await.surface.clone())
}

async fn bot_start(State(poller): State<AppState>) -> Redirect {
    poller.command(BotCommand::Start).await;
    Redirect::to("/")
}

async fn bot_stop(State(poller): State<AppState>) -> Redirect {
    poller.command(BotCommand::Stop).await;
    Redirect::to("/")
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
