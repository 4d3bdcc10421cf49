use kyc_casework::workflows::stage::{map_stage, stage_progress, StepState, WorkflowStage};

#[test]
fn backend_aliases_resolve_to_canonical_stages() {
    let cases = [
        ("lead", WorkflowStage::Prospect),
        ("intake", WorkflowStage::Prospect),
        ("awaiting_documents", WorkflowStage::DocumentCollection),
        ("information_requested", WorkflowStage::DocumentCollection),
        ("screening", WorkflowStage::KycReview),
        ("edd_review", WorkflowStage::KycReview),
        ("mlro_review", WorkflowStage::Approval),
        ("sign_off", WorkflowStage::Approval),
        ("approved", WorkflowStage::Completed),
        ("active", WorkflowStage::Completed),
    ];

    for (raw, expected) in cases {
        assert_eq!(map_stage(raw).stage(), Some(expected), "{raw}");
    }
}

#[test]
fn canonical_ids_are_stable() {
    for stage in WorkflowStage::ordered() {
        let mapped = map_stage(stage.id());
        assert_eq!(mapped.stage(), Some(stage));
        assert_eq!(mapped.position(), Some(stage.position()));
    }
}

#[test]
fn lookup_does_not_normalise_input() {
    for raw in ["Pending_Approval", " kyc_review", "KYC", ""] {
        let mapped = map_stage(raw);
        assert!(!mapped.is_recognized(), "{raw:?}");
        assert_eq!(mapped.id(), raw);
    }
}

#[test]
fn progress_strip_has_one_current_step_for_active_stages() {
    for raw in ["prospect", "onboarding", "kyc", "pending_approval"] {
        let steps = stage_progress(&map_stage(raw));
        let current = steps
            .iter()
            .filter(|step| step.state == StepState::Current)
            .count();
        assert_eq!(current, 1, "{raw}");
        assert_eq!(steps.len(), 5);
    }
}
