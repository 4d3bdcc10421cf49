use super::WorkflowStage;
use std::collections::HashMap;
use std::sync::OnceLock;

static RAW_STAGE_MAP: OnceLock<HashMap<&'static str, WorkflowStage>> = OnceLock::new();

pub(crate) fn canonical_for(raw: &str) -> Option<WorkflowStage> {
    raw_stage_map().get(raw).copied()
}

fn raw_stage_map() -> &'static HashMap<&'static str, WorkflowStage> {
    RAW_STAGE_MAP.get_or_init(|| {
        const RAW_TO_STAGE: &[(&str, WorkflowStage)] = &[
            // Prospect
            ("prospect", WorkflowStage::Prospect),
            ("lead", WorkflowStage::Prospect),
            ("new", WorkflowStage::Prospect),
            ("draft", WorkflowStage::Prospect),
            ("intake", WorkflowStage::Prospect),
            // Document collection
            ("document_collection", WorkflowStage::DocumentCollection),
            ("onboarding", WorkflowStage::DocumentCollection),
            ("collecting_documents", WorkflowStage::DocumentCollection),
            ("documents_requested", WorkflowStage::DocumentCollection),
            ("awaiting_documents", WorkflowStage::DocumentCollection),
            ("pending_documents", WorkflowStage::DocumentCollection),
            ("information_requested", WorkflowStage::DocumentCollection),
            // KYC review
            ("kyc_review", WorkflowStage::KycReview),
            ("kyc", WorkflowStage::KycReview),
            ("in_review", WorkflowStage::KycReview),
            ("under_review", WorkflowStage::KycReview),
            ("compliance_review", WorkflowStage::KycReview),
            ("screening", WorkflowStage::KycReview),
            ("edd_review", WorkflowStage::KycReview),
            // Approval
            ("approval", WorkflowStage::Approval),
            ("pending_approval", WorkflowStage::Approval),
            ("awaiting_approval", WorkflowStage::Approval),
            ("approval_pending", WorkflowStage::Approval),
            ("sign_off", WorkflowStage::Approval),
            ("mlro_review", WorkflowStage::Approval),
            // Completed
            ("completed", WorkflowStage::Completed),
            ("complete", WorkflowStage::Completed),
            ("approved", WorkflowStage::Completed),
            ("onboarded", WorkflowStage::Completed),
            ("active", WorkflowStage::Completed),
        ];

        let mut map = HashMap::with_capacity(RAW_TO_STAGE.len());
        for (raw, stage) in RAW_TO_STAGE {
            map.insert(*raw, *stage);
        }
        map
    })
}
