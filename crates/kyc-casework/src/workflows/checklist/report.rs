use super::domain::{CaseId, CaseSnapshot, ChecklistRow, RowState};
use super::engine::{ChecklistOutcome, ChecklistWarning};
use crate::workflows::stage::{map_stage, StageProgressView};
use serde::Serialize;

/// Aggregate view of a checklist, used for progress badges and approval gating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistSummary {
    pub required_total: usize,
    pub required_satisfied: usize,
    pub missing: usize,
    pub pending_review: usize,
    pub rejected: usize,
    pub ad_hoc: usize,
    pub completion_pct: f32,
    pub ready_for_approval: bool,
}

impl ChecklistSummary {
    pub fn from_rows(rows: &[ChecklistRow]) -> Self {
        let mut summary = Self {
            required_total: 0,
            required_satisfied: 0,
            missing: 0,
            pending_review: 0,
            rejected: 0,
            ad_hoc: 0,
            completion_pct: 100.0,
            ready_for_approval: true,
        };

        for row in rows {
            if !row.required {
                summary.ad_hoc += 1;
                continue;
            }

            summary.required_total += 1;
            match row.state() {
                RowState::Satisfied => summary.required_satisfied += 1,
                RowState::PendingReview => summary.pending_review += 1,
                RowState::Rejected => summary.rejected += 1,
                RowState::Missing | RowState::NotUploaded => summary.missing += 1,
            }
        }

        if summary.required_total > 0 {
            summary.completion_pct =
                summary.required_satisfied as f32 / summary.required_total as f32 * 100.0;
            summary.ready_for_approval = summary.required_satisfied == summary.required_total;
        }

        summary
    }

    pub fn outstanding(&self) -> usize {
        self.required_total - self.required_satisfied
    }
}

/// Everything the case screen needs: rows, roll-up, warnings and stage strip.
#[derive(Debug, Clone, Serialize)]
pub struct CaseChecklistView {
    pub case_id: CaseId,
    pub entity_type: String,
    pub rows: Vec<ChecklistRow>,
    pub summary: ChecklistSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ChecklistWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageProgressView>,
}

impl CaseChecklistView {
    pub fn new(snapshot: &CaseSnapshot, outcome: ChecklistOutcome) -> Self {
        let summary = outcome.summary();
        let stage = snapshot
            .raw_stage
            .as_deref()
            .map(|raw| map_stage(raw).progress_view());

        Self {
            case_id: snapshot.case_id.clone(),
            entity_type: snapshot.attributes.entity_type.clone(),
            rows: outcome.rows,
            summary,
            warnings: outcome.warnings,
            stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::checklist::domain::DocumentStatus;

    fn row(kind: &str, required: bool, status: Option<DocumentStatus>) -> ChecklistRow {
        ChecklistRow {
            kind: kind.to_string(),
            label: kind.to_string(),
            required,
            satisfied: status == Some(DocumentStatus::Approved),
            latest_status: status,
            version_count: usize::from(status.is_some()),
            latest_uploaded_at: None,
        }
    }

    #[test]
    fn counts_each_required_state_once() {
        let rows = vec![
            row("passport", true, Some(DocumentStatus::Approved)),
            row("proof_of_address", true, Some(DocumentStatus::Pending)),
            row("bank_reference", true, Some(DocumentStatus::Rejected)),
            row("source_of_wealth", true, None),
            row("utility_bill", false, Some(DocumentStatus::Approved)),
        ];

        let summary = ChecklistSummary::from_rows(&rows);

        assert_eq!(summary.required_total, 4);
        assert_eq!(summary.required_satisfied, 1);
        assert_eq!(summary.pending_review, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.ad_hoc, 1);
        assert_eq!(summary.outstanding(), 3);
        assert!((summary.completion_pct - 25.0).abs() < f32::EPSILON);
        assert!(!summary.ready_for_approval);
    }

    #[test]
    fn nothing_required_counts_as_complete() {
        let rows = vec![row("misc_letter", false, None)];

        let summary = ChecklistSummary::from_rows(&rows);

        assert_eq!(summary.required_total, 0);
        assert_eq!(summary.completion_pct, 100.0);
        assert!(summary.ready_for_approval);
    }
}
