//! EduPath assessment service.
//!
//! Backend for the student-guidance platform's aptitude and interest
//! assessments: a fixed multilingual question bank, a weighted-sum scoring
//! and recommendation engine, and append-only per-user persistence of
//! completed assessments, exposed over a small HTTP API.
//!
//! Authentication, the college/course directories, and translation proxying
//! live in other services; callers arrive here already identified.

pub mod assessment;
pub mod config;
pub mod locale;
pub mod server;
pub mod storage;

use std::sync::Arc;

use anyhow::Context;
use log::info;

use crate::assessment::QuestionBank;
use crate::config::Config;
use crate::server::AppState;
use crate::storage::Storage;

/// Loads configuration and reference data, selects the storage backend,
/// and serves the API until shutdown.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    let bank = QuestionBank::bundled().context("question bank failed validation")?;
    info!("Loaded question bank with {} questions", bank.len());

    let storage = Storage::select(&config.database).await;

    let state = Arc::new(AppState { bank, storage });
    server::serve(state, config.port).await
}
