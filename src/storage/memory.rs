use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::models::{AssessmentRecord, AssessmentType, NewAssessment};
use super::Result;

/// Process-local storage used when the database is unreachable at startup.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    assessments: RwLock<HashMap<String, Vec<AssessmentRecord>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ping(&self) -> Result<()> {
        Ok(())
    }

    pub fn create_assessment(
        &self,
        user_id: &str,
        new: NewAssessment,
    ) -> Result<AssessmentRecord> {
        let record = AssessmentRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            assessment_type: new.assessment_type,
            answers: new.answers,
            results: new.results,
            recommendations: new.recommendations,
            completed_at: Utc::now(),
        };

        self.assessments
            .write()
            .entry(user_id.to_string())
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    pub fn user_assessments(&self, user_id: &str) -> Result<Vec<AssessmentRecord>> {
        // Records are appended in completion order, so most recent first is
        // a straight reversal.
        let mut records = self
            .assessments
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        records.reverse();
        Ok(records)
    }

    pub fn latest_assessment(
        &self,
        user_id: &str,
        assessment_type: AssessmentType,
    ) -> Result<Option<AssessmentRecord>> {
        let latest = self
            .assessments
            .read()
            .get(user_id)
            .into_iter()
            .flatten()
            .rev()
            .find(|record| record.assessment_type == assessment_type)
            .cloned();
        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AnswerSet, StreamScores};

    fn submission(assessment_type: AssessmentType) -> NewAssessment {
        NewAssessment {
            assessment_type,
            answers: AnswerSet::new(),
            results: StreamScores::default(),
            recommendations: vec![],
        }
    }

    #[test]
    fn records_are_scoped_to_their_user() {
        let storage = MemoryStorage::new();
        storage
            .create_assessment("alice", submission(AssessmentType::Aptitude))
            .unwrap();

        assert_eq!(storage.user_assessments("alice").unwrap().len(), 1);
        assert!(storage.user_assessments("bob").unwrap().is_empty());
    }

    #[test]
    fn listing_is_most_recent_first() {
        let storage = MemoryStorage::new();
        let first = storage
            .create_assessment("alice", submission(AssessmentType::Aptitude))
            .unwrap();
        let second = storage
            .create_assessment("alice", submission(AssessmentType::Interest))
            .unwrap();

        let records = storage.user_assessments("alice").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, second.id);
        assert_eq!(records[1].id, first.id);
    }

    #[test]
    fn latest_filters_by_type() {
        let storage = MemoryStorage::new();
        storage
            .create_assessment("alice", submission(AssessmentType::Aptitude))
            .unwrap();
        let interest = storage
            .create_assessment("alice", submission(AssessmentType::Interest))
            .unwrap();
        let aptitude = storage
            .create_assessment("alice", submission(AssessmentType::Aptitude))
            .unwrap();

        let latest_aptitude = storage
            .latest_assessment("alice", AssessmentType::Aptitude)
            .unwrap()
            .unwrap();
        assert_eq!(latest_aptitude.id, aptitude.id);

        let latest_interest = storage
            .latest_assessment("alice", AssessmentType::Interest)
            .unwrap()
            .unwrap();
        assert_eq!(latest_interest.id, interest.id);

        assert!(storage
            .latest_assessment("bob", AssessmentType::Aptitude)
            .unwrap()
            .is_none());
    }
}
