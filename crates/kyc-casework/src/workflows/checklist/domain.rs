use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for onboarding cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

impl RiskLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Case lifecycle status as recorded on the case record.
///
/// Statuses the backend adds later deserialize as [`CaseStatus::Other`] so the
/// snapshot is still usable; predicates on `status` then fail closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[serde(alias = "Prospect")]
    Prospect,
    #[serde(alias = "Document Collection")]
    DocumentCollection,
    #[serde(alias = "KYC Review")]
    KycReview,
    #[serde(alias = "Pending Approval")]
    PendingApproval,
    #[serde(alias = "Approved")]
    Approved,
    #[serde(alias = "Rejected")]
    Rejected,
    #[serde(alias = "Closed")]
    Closed,
    #[serde(other)]
    Other,
}

impl CaseStatus {
    /// Known statuses; [`CaseStatus::Other`] is not a valid predicate literal.
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Prospect,
            Self::DocumentCollection,
            Self::KycReview,
            Self::PendingApproval,
            Self::Approved,
            Self::Rejected,
            Self::Closed,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::DocumentCollection => "document_collection",
            Self::KycReview => "kyc_review",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Prospect => "Prospect",
            Self::DocumentCollection => "Document Collection",
            Self::KycReview => "KYC Review",
            Self::PendingApproval => "Pending Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Closed => "Closed",
            Self::Other => "Other",
        }
    }
}

/// Attributes of a case that requirement predicates may inspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAttributes {
    pub entity_type: String,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub place_of_incorporation: Option<String>,
    pub status: CaseStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Approved")]
    Approved,
    #[serde(alias = "Rejected")]
    Rejected,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub uploaded_at: DateTime<Utc>,
    pub status: DocumentStatus,
}

/// An uploaded document together with its version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub versions: Vec<DocumentVersion>,
}

impl DocumentRecord {
    /// Most recent version by upload time; the later entry wins a timestamp tie.
    pub fn latest_version(&self) -> Option<&DocumentVersion> {
        self.versions
            .iter()
            .reduce(|current, candidate| {
                if candidate.uploaded_at >= current.uploaded_at {
                    candidate
                } else {
                    current
                }
            })
    }

    pub fn latest_status(&self) -> Option<DocumentStatus> {
        self.latest_version().map(|version| version.status)
    }

    pub fn latest_uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.latest_version().map(|version| version.uploaded_at)
    }

    pub fn is_approved(&self) -> bool {
        self.latest_status() == Some(DocumentStatus::Approved)
    }
}

/// Everything the checklist needs to know about one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSnapshot {
    pub case_id: CaseId,
    pub attributes: CaseAttributes,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    /// Stage string as reported by the case-management backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_stage: Option<String>,
}

/// One derived line item of a case's document checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistRow {
    pub kind: String,
    pub label: String,
    pub required: bool,
    pub satisfied: bool,
    pub latest_status: Option<DocumentStatus>,
    pub version_count: usize,
    pub latest_uploaded_at: Option<DateTime<Utc>>,
}

impl ChecklistRow {
    pub fn state(&self) -> RowState {
        match self.latest_status {
            Some(DocumentStatus::Approved) => RowState::Satisfied,
            Some(DocumentStatus::Pending) => RowState::PendingReview,
            Some(DocumentStatus::Rejected) => RowState::Rejected,
            None if self.required => RowState::Missing,
            None => RowState::NotUploaded,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.required && self.latest_status.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowState {
    Satisfied,
    PendingReview,
    Rejected,
    Missing,
    /// Optional record listed without any uploaded version.
    NotUploaded,
}

impl RowState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Satisfied => "Satisfied",
            Self::PendingReview => "Pending Review",
            Self::Rejected => "Rejected",
            Self::Missing => "Missing",
            Self::NotUploaded => "Not Uploaded",
        }
    }
}
