//! Canonical five-step onboarding workflow and the mapping from backend stage strings.

mod mapping;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Prospect,
    DocumentCollection,
    KycReview,
    Approval,
    Completed,
}

impl WorkflowStage {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Prospect,
            Self::DocumentCollection,
            Self::KycReview,
            Self::Approval,
            Self::Completed,
        ]
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::DocumentCollection => "document_collection",
            Self::KycReview => "kyc_review",
            Self::Approval => "approval",
            Self::Completed => "completed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Prospect => "Prospect",
            Self::DocumentCollection => "Document Collection",
            Self::KycReview => "KYC Review",
            Self::Approval => "Approval",
            Self::Completed => "Completed",
        }
    }

    /// Icon reference understood by the presentation layer.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Prospect => "user-plus",
            Self::DocumentCollection => "file-text",
            Self::KycReview => "shield-check",
            Self::Approval => "clipboard-check",
            Self::Completed => "check-circle",
        }
    }

    /// Zero-based position in the progress sequence.
    pub const fn position(self) -> usize {
        match self {
            Self::Prospect => 0,
            Self::DocumentCollection => 1,
            Self::KycReview => 2,
            Self::Approval => 3,
            Self::Completed => 4,
        }
    }
}

/// Result of resolving a raw backend stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedStage<'a> {
    Canonical(WorkflowStage),
    /// Passed through unchanged; has no place in the progress sequence.
    Unrecognized(&'a str),
}

impl<'a> MappedStage<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            MappedStage::Canonical(stage) => stage.id(),
            MappedStage::Unrecognized(raw) => raw,
        }
    }

    pub fn stage(&self) -> Option<WorkflowStage> {
        match *self {
            MappedStage::Canonical(stage) => Some(stage),
            MappedStage::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, MappedStage::Canonical(_))
    }

    pub fn position(&self) -> Option<usize> {
        self.stage().map(WorkflowStage::position)
    }

    pub fn progress_view(&self) -> StageProgressView {
        let stage = self.stage();
        StageProgressView {
            id: self.id().to_string(),
            recognized: self.is_recognized(),
            position: self.position(),
            label: stage.map(WorkflowStage::label),
            steps: stage_progress(self),
        }
    }
}

/// Resolve a raw backend stage string. Lookup is exact; anything not in the
/// table comes back unchanged as [`MappedStage::Unrecognized`].
pub fn map_stage(raw: &str) -> MappedStage<'_> {
    match mapping::canonical_for(raw) {
        Some(stage) => MappedStage::Canonical(stage),
        None => MappedStage::Unrecognized(raw),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Complete,
    Current,
    Upcoming,
}

impl StepState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Current => "Current",
            Self::Upcoming => "Upcoming",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageStepView {
    pub stage: WorkflowStage,
    pub label: &'static str,
    pub icon: &'static str,
    pub position: usize,
    pub state: StepState,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageProgressView {
    pub id: String,
    pub recognized: bool,
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    pub steps: Vec<StageStepView>,
}

/// Step states for the progress strip. The terminal stage counts as complete
/// once reached; an unrecognized stage highlights nothing.
pub fn stage_progress(mapped: &MappedStage<'_>) -> Vec<StageStepView> {
    let current = mapped.stage();

    WorkflowStage::ordered()
        .into_iter()
        .map(|stage| {
            let state = match current {
                Some(current) if stage.position() < current.position() => StepState::Complete,
                Some(WorkflowStage::Completed) => StepState::Complete,
                Some(current) if stage == current => StepState::Current,
                _ => StepState::Upcoming,
            };
            StageStepView {
                stage,
                label: stage.label(),
                icon: stage.icon(),
                position: stage.position(),
                state,
            }
        })
        .collect()
}
