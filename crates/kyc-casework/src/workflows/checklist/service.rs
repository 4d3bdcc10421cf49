use std::sync::Arc;

use super::catalog::RequirementCatalog;
use super::domain::{CaseId, CaseSnapshot};
use super::engine::ChecklistEngine;
use super::report::CaseChecklistView;
use super::repository::{CaseSnapshotRepository, RepositoryError};

/// Service composing the requirement catalog, checklist engine, and snapshot repository.
pub struct ChecklistService<R> {
    engine: ChecklistEngine,
    repository: Arc<R>,
}

impl<R> ChecklistService<R>
where
    R: CaseSnapshotRepository + 'static,
{
    pub fn new(catalog: Arc<RequirementCatalog>, repository: Arc<R>) -> Self {
        Self {
            engine: ChecklistEngine::shared(catalog),
            repository,
        }
    }

    pub fn engine(&self) -> &ChecklistEngine {
        &self.engine
    }

    /// Store the latest snapshot for a case, returning `true` when one was replaced.
    pub fn record(&self, snapshot: CaseSnapshot) -> Result<bool, ChecklistServiceError> {
        validate_snapshot(&snapshot)?;

        let case_id = snapshot.case_id.clone();
        let replaced = self.repository.upsert(snapshot)?;
        tracing::info!(%case_id, replaced, "recorded case snapshot");
        Ok(replaced)
    }

    /// Validate, store, then derive the checklist for the stored snapshot.
    /// Invalid snapshots never reach the engine.
    pub fn upsert(
        &self,
        snapshot: CaseSnapshot,
    ) -> Result<(bool, CaseChecklistView), ChecklistServiceError> {
        validate_snapshot(&snapshot)?;
        let view = self.evaluate(&snapshot);
        let replaced = self.record(snapshot)?;
        Ok((replaced, view))
    }

    /// Derive the checklist for a stored case.
    pub fn checklist(&self, case_id: &CaseId) -> Result<CaseChecklistView, ChecklistServiceError> {
        let snapshot = self
            .repository
            .fetch(case_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(self.evaluate(&snapshot))
    }

    /// Derive the checklist for a snapshot supplied by the caller.
    pub fn evaluate(&self, snapshot: &CaseSnapshot) -> CaseChecklistView {
        let outcome = self.engine.for_case(snapshot);
        CaseChecklistView::new(snapshot, outcome)
    }
}

fn validate_snapshot(snapshot: &CaseSnapshot) -> Result<(), ChecklistServiceError> {
    if snapshot.case_id.0.trim().is_empty() {
        return Err(ChecklistServiceError::InvalidSnapshot(
            "case id must not be blank".to_string(),
        ));
    }
    if snapshot.attributes.entity_type.trim().is_empty() {
        return Err(ChecklistServiceError::InvalidSnapshot(
            "entity type must not be blank".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ChecklistServiceError {
    #[error("invalid case snapshot: {0}")]
    InvalidSnapshot(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
