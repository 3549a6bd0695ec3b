use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use super::error::ApiError;
use super::AppState;
use crate::assessment::{recommend, score};
use crate::locale::Language;
use crate::storage::{AssessmentRecord, AssessmentType, NewAssessment};

/// Upper bound on answer-map entries, a sanity cap well above any real
/// bank size. Entries referencing unknown questions are ignored by the
/// scorer.
const MAX_ANSWER_ENTRIES: u64 = 200;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    pub assessment_type: AssessmentType,
    #[validate(length(max = "MAX_ANSWER_ENTRIES", message = "too many answers"))]
    pub answers: std::collections::BTreeMap<String, String>,
}

/// The identity of the caller, as established by the fronting auth layer.
fn require_user(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::Unauthenticated)
}

/// `POST /api/assessments`: scores the submitted answers against the bank
/// and persists the resulting record under the caller's identity.
pub async fn submit_assessment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SubmitAssessmentRequest>,
) -> Result<Json<AssessmentRecord>, ApiError> {
    let user_id = require_user(&headers)?;
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Invalid assessment data: {e}")))?;

    let results = score(&state.bank, &payload.answers);
    let recommendations = recommend(&results);

    let record = state
        .storage
        .create_assessment(
            &user_id,
            NewAssessment {
                assessment_type: payload.assessment_type,
                answers: payload.answers,
                results,
                recommendations,
            },
        )
        .await?;

    info!(
        "User {} completed {} assessment {}",
        user_id, record.assessment_type, record.id
    );
    Ok(Json(record))
}

/// `GET /api/assessments`: every record for the caller, most recent first.
pub async fn list_assessments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AssessmentRecord>>, ApiError> {
    let user_id = require_user(&headers)?;
    let records = state.storage.user_assessments(&user_id).await?;
    Ok(Json(records))
}

/// `GET /api/assessments/latest/{type}`: the caller's most recent record
/// of the given type.
pub async fn latest_assessment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(assessment_type): Path<String>,
) -> Result<Json<AssessmentRecord>, ApiError> {
    let user_id = require_user(&headers)?;
    let assessment_type = assessment_type
        .parse::<AssessmentType>()
        .map_err(|_| ApiError::BadRequest(format!("Unknown assessment type: {assessment_type}")))?;

    let record = state
        .storage
        .latest_assessment(&user_id, assessment_type)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(record))
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionsQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

/// `GET /api/quiz/questions?lang=xx`: the bank localized for display.
/// Weights stay server-side; the client only ever sees text.
pub async fn quiz_questions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuestionsQuery>,
) -> Json<Vec<QuizQuestion>> {
    let language = query
        .lang
        .as_deref()
        .map(Language::from_code)
        .unwrap_or_default();

    let questions = state
        .bank
        .questions()
        .map(|question| QuizQuestion {
            id: question.id.clone(),
            prompt: question.prompt.get(language).to_string(),
            options: question
                .options
                .iter()
                .map(|option| QuizOption {
                    id: option.id.clone(),
                    text: option.text.get(language).to_string(),
                })
                .collect(),
        })
        .collect();

    Json(questions)
}

/// `GET /api/health`: storage mode and reachability.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let status = match state.storage.ping().await {
        Ok(()) => "ok",
        Err(_) => "degraded",
    };

    Json(json!({
        "status": status,
        "storage": state.storage.backend_name(),
        "questions": state.bank.len(),
    }))
}
