use super::catalog::{DocumentRequirement, RequirementCatalog};
use super::domain::{CaseAttributes, CaseSnapshot, ChecklistRow, DocumentRecord};
use super::report::ChecklistSummary;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Non-fatal problems found while deriving a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChecklistWarning {
    /// The requirement's predicate could not be evaluated; it was treated as inapplicable.
    Configuration { kind: String, detail: String },
    /// Several records share a kind; only the most recently uploaded one was used.
    DuplicateRecord { kind: String, count: usize },
    UnknownEntityType { entity_type: String },
}

impl fmt::Display for ChecklistWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecklistWarning::Configuration { kind, detail } => {
                write!(f, "requirement '{kind}' skipped: {detail}")
            }
            ChecklistWarning::DuplicateRecord { kind, count } => {
                write!(f, "{count} document records share kind '{kind}'; most recent upload used")
            }
            ChecklistWarning::UnknownEntityType { entity_type } => {
                write!(f, "no document requirements configured for entity type '{entity_type}'")
            }
        }
    }
}

/// Rows in display order plus any warnings raised while building them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistOutcome {
    pub rows: Vec<ChecklistRow>,
    pub warnings: Vec<ChecklistWarning>,
}

impl ChecklistOutcome {
    pub fn summary(&self) -> ChecklistSummary {
        ChecklistSummary::from_rows(&self.rows)
    }

    pub fn missing(&self) -> impl Iterator<Item = &ChecklistRow> {
        self.rows.iter().filter(|row| row.is_missing())
    }
}

/// Derive the checklist for one case.
///
/// Applicable requirements come first in catalog order, each merged with the
/// document record of the same kind. Records matching no applicable requirement
/// follow as optional rows in the order their kind first appears in `documents`.
pub fn compute_checklist(
    requirements: &[DocumentRequirement],
    attributes: &CaseAttributes,
    documents: &[DocumentRecord],
) -> ChecklistOutcome {
    let mut warnings = Vec::new();
    let index = DocumentIndex::build(documents, &mut warnings);

    let mut rows = Vec::with_capacity(requirements.len() + index.order.len());
    let mut matched = HashSet::new();

    for requirement in requirements {
        match requirement.applies_to(attributes) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(error) => {
                warnings.push(ChecklistWarning::Configuration {
                    kind: requirement.kind.clone(),
                    detail: error.to_string(),
                });
                continue;
            }
        }

        let record = index.get(&requirement.kind);
        if record.is_some() {
            matched.insert(requirement.kind.as_str());
        }
        rows.push(build_row(&requirement.kind, &requirement.label, true, record));
    }

    for kind in &index.order {
        if matched.contains(kind) {
            continue;
        }
        if let Some(record) = index.get(kind) {
            let label = record.label.as_deref().unwrap_or(*kind);
            rows.push(build_row(kind, label, false, Some(record)));
        }
    }

    ChecklistOutcome { rows, warnings }
}

fn build_row(
    kind: &str,
    label: &str,
    required: bool,
    record: Option<&DocumentRecord>,
) -> ChecklistRow {
    let latest = record.and_then(DocumentRecord::latest_version);

    ChecklistRow {
        kind: kind.to_string(),
        label: label.to_string(),
        required,
        satisfied: record.map(DocumentRecord::is_approved).unwrap_or(false),
        latest_status: latest.map(|version| version.status),
        version_count: record.map(|record| record.versions.len()).unwrap_or(0),
        latest_uploaded_at: latest.map(|version| version.uploaded_at),
    }
}

/// One record per kind, chosen by most recent upload.
struct DocumentIndex<'a> {
    winners: HashMap<&'a str, &'a DocumentRecord>,
    order: Vec<&'a str>,
}

impl<'a> DocumentIndex<'a> {
    fn build(documents: &'a [DocumentRecord], warnings: &mut Vec<ChecklistWarning>) -> Self {
        let mut winners: HashMap<&str, &DocumentRecord> = HashMap::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();

        for record in documents {
            let kind = record.kind.as_str();
            *counts.entry(kind).or_insert(0) += 1;

            let replace = match winners.get(kind) {
                Some(current) => supersedes(record, current),
                None => {
                    order.push(kind);
                    true
                }
            };
            if replace {
                winners.insert(kind, record);
            }
        }

        for kind in &order {
            let count = counts.get(kind).copied().unwrap_or(1);
            if count > 1 {
                warnings.push(ChecklistWarning::DuplicateRecord {
                    kind: kind.to_string(),
                    count,
                });
            }
        }

        Self { winners, order }
    }

    fn get(&self, kind: &str) -> Option<&'a DocumentRecord> {
        self.winners.get(kind).copied()
    }
}

// A record without versions never beats one with versions; equal timestamps
// go to the later record.
fn supersedes(candidate: &DocumentRecord, current: &DocumentRecord) -> bool {
    candidate.latest_uploaded_at() >= current.latest_uploaded_at()
}

/// Catalog-backed checklist derivation for whole case snapshots.
#[derive(Debug, Clone)]
pub struct ChecklistEngine {
    catalog: Arc<RequirementCatalog>,
}

impl ChecklistEngine {
    pub fn new(catalog: RequirementCatalog) -> Self {
        Self::shared(Arc::new(catalog))
    }

    pub fn shared(catalog: Arc<RequirementCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RequirementCatalog {
        &self.catalog
    }

    pub fn for_case(&self, snapshot: &CaseSnapshot) -> ChecklistOutcome {
        let attributes = &snapshot.attributes;

        let outcome = match self.catalog.requirements_for(&attributes.entity_type) {
            Some(requirements) => {
                compute_checklist(requirements, attributes, &snapshot.documents)
            }
            None => {
                let mut outcome = compute_checklist(&[], attributes, &snapshot.documents);
                outcome.warnings.insert(
                    0,
                    ChecklistWarning::UnknownEntityType {
                        entity_type: attributes.entity_type.clone(),
                    },
                );
                outcome
            }
        };

        for warning in &outcome.warnings {
            tracing::warn!(case_id = %snapshot.case_id, %warning, "checklist warning");
        }
        tracing::debug!(
            case_id = %snapshot.case_id,
            rows = outcome.rows.len(),
            "derived document checklist"
        );

        outcome
    }
}

impl Default for ChecklistEngine {
    fn default() -> Self {
        Self::new(RequirementCatalog::standard())
    }
}
