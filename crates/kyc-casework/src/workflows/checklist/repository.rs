use super::domain::{CaseId, CaseSnapshot};

/// Source of case snapshots owned by the surrounding case-management data layer.
pub trait CaseSnapshotRepository: Send + Sync {
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseSnapshot>, RepositoryError>;
    /// Insert or replace the snapshot, returning `true` when a previous one existed.
    fn upsert(&self, snapshot: CaseSnapshot) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("case not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
