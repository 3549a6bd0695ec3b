pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use log::info;

use crate::assessment::QuestionBank;
use crate::storage::Storage;

/// Shared application state: the immutable question bank and the storage
/// backend selected at startup.
#[derive(Debug)]
pub struct AppState {
    pub bank: QuestionBank,
    pub storage: Storage,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/assessments",
            post(handlers::submit_assessment).get(handlers::list_assessments),
        )
        .route(
            "/api/assessments/latest/{type}",
            get(handlers::latest_assessment),
        )
        .route("/api/quiz/questions", get(handlers::quiz_questions))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
