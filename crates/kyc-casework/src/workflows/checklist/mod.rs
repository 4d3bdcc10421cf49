//! Document checklist derivation for onboarding cases.
//!
//! A [`RequirementCatalog`] lists, per entity type, the documents a case must
//! provide, each optionally gated by a declarative [`Condition`] over the
//! case's attributes. [`compute_checklist`] merges the applicable requirements
//! with the case's uploaded [`DocumentRecord`]s into ordered [`ChecklistRow`]s,
//! returning problems as [`ChecklistWarning`]s instead of failing.

pub mod catalog;
pub mod domain;
mod engine;
pub mod predicate;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, DocumentRequirement, RequirementCatalog};
pub use domain::{
    CaseAttributes, CaseId, CaseSnapshot, CaseStatus, ChecklistRow, DocumentRecord,
    DocumentStatus, DocumentVersion, RiskLevel, RowState,
};
pub use engine::{compute_checklist, ChecklistEngine, ChecklistOutcome, ChecklistWarning};
pub use predicate::{CaseField, Condition, LeafCondition, Operator, PredicateError};
pub use report::{CaseChecklistView, ChecklistSummary};
pub use repository::{CaseSnapshotRepository, RepositoryError};
pub use router::checklist_router;
pub use service::{ChecklistService, ChecklistServiceError};
