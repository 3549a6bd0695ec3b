use chrono::{DateTime, Utc};
use deadpool_postgres::{Config, Pool, Runtime};
use log::{error, info};
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

use super::models::{AssessmentRecord, AssessmentType, NewAssessment};
use super::{Result, StorageError};
use crate::config::DatabaseConfig;

/// Durable assessment storage backed by PostgreSQL.
#[derive(Debug)]
pub struct PostgresStorage {
    pool: Pool,
}

impl PostgresStorage {
    /// Builds the connection pool, verifies the database answers, and
    /// creates the assessments table if it does not exist yet.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!(
            "Connecting to database: {}@{}:{}/{}",
            config.user, config.host, config.port, config.dbname
        );

        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.dbname = Some(config.dbname.clone());
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StorageError::ConnectionFailed(format!("Pool creation failed: {e}")))?;

        let storage = PostgresStorage { pool };
        storage.ping().await?;
        storage.ensure_schema().await?;

        info!("Database connection established successfully");
        Ok(storage)
    }

    async fn client(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))
    }

    pub async fn ping(&self) -> Result<()> {
        let client = self.client().await?;
        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| StorageError::ConnectionFailed(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        let client = self.client().await?;
        client
            .batch_execute(
                r#"
                CREATE TABLE IF NOT EXISTS assessments (
                    id UUID PRIMARY KEY,
                    user_id VARCHAR NOT NULL,
                    assessment_type VARCHAR NOT NULL,
                    answers JSONB NOT NULL,
                    results JSONB NOT NULL,
                    recommendations JSONB NOT NULL,
                    completed_at TIMESTAMPTZ NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_assessments_user
                    ON assessments (user_id, completed_at DESC);
                "#,
            )
            .await
            .map_err(|e| {
                error!("Failed to ensure assessments schema: {e}");
                StorageError::QueryFailed(format!("Failed to ensure schema: {e}"))
            })?;
        Ok(())
    }

    pub async fn create_assessment(
        &self,
        user_id: &str,
        new: NewAssessment,
    ) -> Result<AssessmentRecord> {
        let client = self.client().await?;

        let record = AssessmentRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            assessment_type: new.assessment_type,
            answers: new.answers,
            results: new.results,
            recommendations: new.recommendations,
            completed_at: Utc::now(),
        };

        let answers = serde_json::to_value(&record.answers)
            .map_err(|e| StorageError::QueryFailed(format!("Failed to encode answers: {e}")))?;
        let results = serde_json::to_value(record.results)
            .map_err(|e| StorageError::QueryFailed(format!("Failed to encode results: {e}")))?;
        let recommendations = serde_json::to_value(&record.recommendations).map_err(|e| {
            StorageError::QueryFailed(format!("Failed to encode recommendations: {e}"))
        })?;

        client
            .execute(
                r#"
                INSERT INTO assessments
                (id, user_id, assessment_type, answers, results, recommendations, completed_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
                &[
                    &record.id,
                    &record.user_id,
                    &record.assessment_type.as_str(),
                    &answers,
                    &results,
                    &recommendations,
                    &record.completed_at,
                ],
            )
            .await
            .map_err(|e| {
                error!("Failed to insert assessment for user {user_id}: {e}");
                StorageError::QueryFailed(format!("Failed to insert assessment: {e}"))
            })?;

        info!(
            "Stored {} assessment {} for user {}",
            record.assessment_type, record.id, user_id
        );
        Ok(record)
    }

    pub async fn user_assessments(&self, user_id: &str) -> Result<Vec<AssessmentRecord>> {
        let client = self.client().await?;

        let rows = client
            .query(
                r#"
                SELECT id, user_id, assessment_type, answers, results, recommendations, completed_at
                FROM assessments
                WHERE user_id = $1
                ORDER BY completed_at DESC
                "#,
                &[&user_id],
            )
            .await
            .map_err(|e| {
                error!("Failed to fetch assessments for user {user_id}: {e}");
                StorageError::QueryFailed(format!("Failed to fetch assessments: {e}"))
            })?;

        rows.iter().map(row_to_record).collect()
    }

    pub async fn latest_assessment(
        &self,
        user_id: &str,
        assessment_type: AssessmentType,
    ) -> Result<Option<AssessmentRecord>> {
        let client = self.client().await?;

        let row = client
            .query_opt(
                r#"
                SELECT id, user_id, assessment_type, answers, results, recommendations, completed_at
                FROM assessments
                WHERE user_id = $1 AND assessment_type = $2
                ORDER BY completed_at DESC
                LIMIT 1
                "#,
                &[&user_id, &assessment_type.as_str()],
            )
            .await
            .map_err(|e| {
                error!("Failed to fetch latest assessment for user {user_id}: {e}");
                StorageError::QueryFailed(format!("Failed to fetch latest assessment: {e}"))
            })?;

        row.as_ref().map(row_to_record).transpose()
    }
}

fn row_to_record(row: &Row) -> Result<AssessmentRecord> {
    let id: Uuid = row.get(0);
    let type_raw: String = row.get(2);
    let assessment_type = type_raw
        .parse::<AssessmentType>()
        .map_err(|_| StorageError::CorruptRecord(id, format!("unknown type {type_raw}")))?;

    let answers: serde_json::Value = row.get(3);
    let answers = serde_json::from_value(answers)
        .map_err(|e| StorageError::CorruptRecord(id, format!("bad answers: {e}")))?;
    let results: serde_json::Value = row.get(4);
    let results = serde_json::from_value(results)
        .map_err(|e| StorageError::CorruptRecord(id, format!("bad results: {e}")))?;
    let recommendations: serde_json::Value = row.get(5);
    let recommendations = serde_json::from_value(recommendations)
        .map_err(|e| StorageError::CorruptRecord(id, format!("bad recommendations: {e}")))?;

    let completed_at: DateTime<Utc> = row.get(6);

    Ok(AssessmentRecord {
        id,
        user_id: row.get(1),
        assessment_type,
        answers,
        results,
        recommendations,
        completed_at,
    })
}
