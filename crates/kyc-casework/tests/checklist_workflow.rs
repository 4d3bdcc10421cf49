//! End-to-end checklist derivation through the public API: a YAML catalog, JSON
//! case snapshots as the case-management backend would send them, and the view
//! handed to the case screen.

use kyc_casework::workflows::checklist::{
    compute_checklist, CaseChecklistView, CaseSnapshot, ChecklistEngine, ChecklistWarning,
    DocumentStatus, RequirementCatalog, RowState,
};
use serde_json::json;

const CATALOG: &str = r#"
entity_types:
  company:
    - kind: certificate_of_incorporation
      label: Certificate of Incorporation
    - kind: register_of_directors
      label: Register of Directors
    - kind: certificate_of_good_standing
      label: Certificate of Good Standing
      applies_if:
        field: jurisdiction
        not_equals_field: place_of_incorporation
    - kind: source_of_funds
      label: Source of Funds
      applies_if:
        all:
          - field: risk_level
            equals: High
          - field: status
            not_in: [rejected, closed]
"#;

fn engine() -> ChecklistEngine {
    ChecklistEngine::new(RequirementCatalog::from_yaml_str(CATALOG).expect("catalog parses"))
}

fn company_case(risk_level: &str, jurisdiction: &str) -> CaseSnapshot {
    serde_json::from_value(json!({
        "case_id": "C-1001",
        "attributes": {
            "entity_type": "Company",
            "risk_level": risk_level,
            "jurisdiction": jurisdiction,
            "place_of_incorporation": "GB",
            "status": "Document Collection"
        },
        "documents": [
            {
                "kind": "certificate_of_incorporation",
                "versions": [
                    { "uploaded_at": "2025-02-01T08:00:00Z", "status": "Rejected" },
                    { "uploaded_at": "2025-02-10T08:00:00Z", "status": "Approved" }
                ]
            },
            {
                "kind": "register_of_directors",
                "versions": [
                    { "uploaded_at": "2025-02-11T08:00:00Z", "status": "Pending" }
                ]
            },
            {
                "kind": "board_resolution",
                "label": "Board Resolution",
                "versions": [
                    { "uploaded_at": "2025-02-12T08:00:00Z", "status": "Approved" }
                ]
            }
        ],
        "raw_stage": "documents_requested"
    }))
    .expect("snapshot deserializes")
}

#[test]
fn domestic_low_risk_company_checklist() {
    let case = company_case("low", "GB");
    let view = CaseChecklistView::new(&case, engine().for_case(&case));

    let kinds: Vec<&str> = view.rows.iter().map(|row| row.kind.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "certificate_of_incorporation",
            "register_of_directors",
            "board_resolution"
        ]
    );
    assert_eq!(view.rows[0].state(), RowState::Satisfied);
    assert_eq!(view.rows[1].state(), RowState::PendingReview);
    assert!(!view.rows[2].required);
    assert_eq!(view.rows[2].label, "Board Resolution");

    assert_eq!(view.summary.required_total, 2);
    assert_eq!(view.summary.outstanding(), 1);
    assert!(view.warnings.is_empty());

    let stage = view.stage.expect("stage reported");
    assert_eq!(stage.id, "document_collection");
}

#[test]
fn foreign_high_risk_company_needs_more_documents() {
    let case = company_case("High", "KY");
    let outcome = engine().for_case(&case);

    let missing: Vec<&str> = outcome.missing().map(|row| row.kind.as_str()).collect();
    assert_eq!(missing, vec!["certificate_of_good_standing", "source_of_funds"]);
    assert!(!outcome.summary().ready_for_approval);
}

#[test]
fn blank_jurisdiction_skips_conditional_requirement_with_warning() {
    let case = company_case("low", " ");
    let outcome = engine().for_case(&case);

    assert!(outcome
        .rows
        .iter()
        .all(|row| row.kind != "certificate_of_good_standing"));
    assert!(matches!(
        outcome.warnings.as_slice(),
        [ChecklistWarning::Configuration { kind, .. }] if kind == "certificate_of_good_standing"
    ));
}

#[test]
fn unrecognized_backend_status_still_yields_checklist() {
    let mut payload = serde_json::to_value(company_case("High", "GB")).expect("serializes");
    payload["attributes"]["status"] = json!("On Hold");
    let case: CaseSnapshot = serde_json::from_value(payload).expect("snapshot deserializes");

    let outcome = engine().for_case(&case);

    let kinds: Vec<&str> = outcome.rows.iter().map(|row| row.kind.as_str()).collect();
    assert!(kinds.contains(&"certificate_of_incorporation"));
    assert!(!kinds.contains(&"source_of_funds"));
    assert!(matches!(
        outcome.warnings.as_slice(),
        [ChecklistWarning::Configuration { kind, .. }] if kind == "source_of_funds"
    ));
}

#[test]
fn free_function_matches_engine_output() {
    let case = company_case("medium", "GB");
    let catalog = RequirementCatalog::from_yaml_str(CATALOG).expect("catalog parses");
    let requirements = catalog.requirements_for("company").expect("company");

    let direct = compute_checklist(requirements, &case.attributes, &case.documents);

    assert_eq!(direct, engine().for_case(&case));
    assert_eq!(
        direct.rows[0].latest_status,
        Some(DocumentStatus::Approved)
    );
}

#[test]
fn view_serializes_for_the_case_screen() {
    let case = company_case("low", "GB");
    let view = CaseChecklistView::new(&case, engine().for_case(&case));

    let payload = serde_json::to_value(&view).expect("view serializes");

    assert_eq!(payload["case_id"], "C-1001");
    assert_eq!(payload["rows"][0]["latest_status"], "approved");
    assert_eq!(payload["rows"][0]["latest_uploaded_at"], "2025-02-10T08:00:00Z");
    assert_eq!(payload["summary"]["ad_hoc"], 1);
    assert_eq!(payload["stage"]["steps"][1]["state"], "current");
    assert!(payload.get("warnings").is_none());
}
