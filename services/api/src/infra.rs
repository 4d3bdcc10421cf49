use kyc_casework::workflows::checklist::{
    CaseId, CaseSnapshot, CaseSnapshotRepository, RepositoryError, RequirementCatalog,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<RequirementCatalog>,
}

/// Process-local snapshot store; case data is pushed in by the case-management backend.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseRepository {
    snapshots: Arc<Mutex<HashMap<CaseId, CaseSnapshot>>>,
}

impl CaseSnapshotRepository for InMemoryCaseRepository {
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseSnapshot>, RepositoryError> {
        let guard = self.snapshots.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, snapshot: CaseSnapshot) -> Result<bool, RepositoryError> {
        let mut guard = self.snapshots.lock().expect("repository mutex poisoned");
        Ok(guard.insert(snapshot.case_id.clone(), snapshot).is_some())
    }
}
