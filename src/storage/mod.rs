pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStorage;
pub use models::{AssessmentRecord, AssessmentType, NewAssessment};
pub use postgres::PostgresStorage;

use log::{info, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseConfig;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Stored assessment {0} is corrupt: {1}")]
    CorruptRecord(Uuid, String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// The storage backend chosen at startup. PostgreSQL when reachable,
/// otherwise an in-memory substitute; never mixed per request.
#[derive(Debug)]
pub enum Storage {
    Postgres(PostgresStorage),
    Memory(MemoryStorage),
}

impl Storage {
    /// Runs the startup health check and picks the backend. A database
    /// failure here downgrades the process to non-durable storage rather
    /// than aborting.
    pub async fn select(config: &DatabaseConfig) -> Storage {
        match PostgresStorage::connect(config).await {
            Ok(postgres) => {
                info!("Using PostgreSQL assessment storage");
                Storage::Postgres(postgres)
            }
            Err(e) => {
                warn!("Database unavailable: {e}");
                warn!("Falling back to in-memory storage; assessment records will not survive a restart");
                Storage::Memory(MemoryStorage::new())
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Storage::Postgres(_) => "postgres",
            Storage::Memory(_) => "memory",
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self {
            Storage::Postgres(postgres) => postgres.ping().await,
            Storage::Memory(memory) => memory.ping(),
        }
    }

    pub async fn create_assessment(
        &self,
        user_id: &str,
        new: NewAssessment,
    ) -> Result<AssessmentRecord> {
        match self {
            Storage::Postgres(postgres) => postgres.create_assessment(user_id, new).await,
            Storage::Memory(memory) => memory.create_assessment(user_id, new),
        }
    }

    pub async fn user_assessments(&self, user_id: &str) -> Result<Vec<AssessmentRecord>> {
        match self {
            Storage::Postgres(postgres) => postgres.user_assessments(user_id).await,
            Storage::Memory(memory) => memory.user_assessments(user_id),
        }
    }

    pub async fn latest_assessment(
        &self,
        user_id: &str,
        assessment_type: AssessmentType,
    ) -> Result<Option<AssessmentRecord>> {
        match self {
            Storage::Postgres(postgres) => {
                postgres.latest_assessment(user_id, assessment_type).await
            }
            Storage::Memory(memory) => memory.latest_assessment(user_id, assessment_type),
        }
    }
}
