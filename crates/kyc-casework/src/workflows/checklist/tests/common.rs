use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::checklist::catalog::{DocumentRequirement, RequirementCatalog};
use crate::workflows::checklist::domain::{
    CaseAttributes, CaseId, CaseSnapshot, CaseStatus, DocumentRecord, DocumentStatus,
    DocumentVersion, RiskLevel,
};
use crate::workflows::checklist::predicate::Condition;
use crate::workflows::checklist::repository::{CaseSnapshotRepository, RepositoryError};
use crate::workflows::checklist::service::ChecklistService;

pub(super) fn uploaded_at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn version(day: u32, status: DocumentStatus) -> DocumentVersion {
    DocumentVersion {
        uploaded_at: uploaded_at(day, 9),
        status,
    }
}

pub(super) fn record(kind: &str, versions: Vec<DocumentVersion>) -> DocumentRecord {
    DocumentRecord {
        kind: kind.to_string(),
        label: None,
        versions,
    }
}

pub(super) fn attributes(entity_type: &str, risk_level: RiskLevel) -> CaseAttributes {
    CaseAttributes {
        entity_type: entity_type.to_string(),
        risk_level,
        jurisdiction: Some("GB".to_string()),
        place_of_incorporation: Some("GB".to_string()),
        status: CaseStatus::DocumentCollection,
    }
}

/// Passport always, proof of address only for high-risk cases.
pub(super) fn passport_and_poa() -> Vec<DocumentRequirement> {
    vec![
        DocumentRequirement::new("passport", "Passport"),
        DocumentRequirement::new("poa", "Proof of Address")
            .when(Condition::equals("risk_level", "High")),
    ]
}

pub(super) fn snapshot(
    case_id: &str,
    attributes: CaseAttributes,
    documents: Vec<DocumentRecord>,
) -> CaseSnapshot {
    CaseSnapshot {
        case_id: CaseId(case_id.to_string()),
        attributes,
        documents,
        raw_stage: None,
    }
}

pub(super) fn build_service() -> (ChecklistService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ChecklistService::new(
        Arc::new(RequirementCatalog::standard()),
        repository.clone(),
    );
    (service, repository)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    snapshots: Mutex<HashMap<CaseId, CaseSnapshot>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.snapshots.lock().expect("repository mutex poisoned").len()
    }
}

impl CaseSnapshotRepository for MemoryRepository {
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseSnapshot>, RepositoryError> {
        let guard = self.snapshots.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, snapshot: CaseSnapshot) -> Result<bool, RepositoryError> {
        let mut guard = self.snapshots.lock().expect("repository mutex poisoned");
        Ok(guard.insert(snapshot.case_id.clone(), snapshot).is_some())
    }
}

pub(super) struct UnavailableRepository;

impl CaseSnapshotRepository for UnavailableRepository {
    fn fetch(&self, _id: &CaseId) -> Result<Option<CaseSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn upsert(&self, _snapshot: CaseSnapshot) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
