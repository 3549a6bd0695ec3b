use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::{AnswerSet, StreamScores};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentType {
    Aptitude,
    Interest,
}

impl AssessmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentType::Aptitude => "aptitude",
            AssessmentType::Interest => "interest",
        }
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "aptitude" => Ok(AssessmentType::Aptitude),
            "interest" => Ok(AssessmentType::Interest),
            _ => Err(()),
        }
    }
}

/// One completed quiz submission. Append-only: records are created once and
/// never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub user_id: String,
    pub assessment_type: AssessmentType,
    pub answers: AnswerSet,
    pub results: StreamScores,
    pub recommendations: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Payload for persisting a submission, before storage assigns id and
/// timestamp.
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub assessment_type: AssessmentType,
    pub answers: AnswerSet,
    pub results: StreamScores,
    pub recommendations: Vec<String>,
}
