use super::common::*;
use crate::workflows::checklist::catalog::{
    CatalogError, DocumentRequirement, RequirementCatalog,
};
use crate::workflows::checklist::domain::RiskLevel;
use crate::workflows::checklist::predicate::{CaseField, Condition, PredicateError};

const CATALOG_YAML: &str = r#"
entity_types:
  Individual:
    - kind: passport
      label: Passport
    - kind: poa
      label: Proof of Address
      applies_if:
        field: risk_level
        in: [medium, high]
  trust:
    - kind: trust_deed
      label: Trust Deed
    - kind: letter_of_wishes
      label: Letter of Wishes
      applies_if:
        any:
          - field: risk_level
            equals: high
          - not:
              field: jurisdiction
              equals_field: place_of_incorporation
"#;

#[test]
fn standard_catalog_passes_validation() {
    let standard = RequirementCatalog::standard();
    standard.validate().expect("standard catalog is valid");

    let entity_types: Vec<&str> = standard.entity_types().collect();
    assert_eq!(
        entity_types,
        vec!["company", "fund", "individual", "partnership", "trust"]
    );
}

#[test]
fn entity_type_lookup_ignores_case_and_padding() {
    let catalog = RequirementCatalog::standard();

    let requirements = catalog
        .requirements_for("  Individual ")
        .expect("individual requirements");
    assert_eq!(requirements[0].kind, "passport");
    assert!(catalog.requirements_for("foundation").is_none());
}

#[test]
fn loads_catalog_from_yaml() {
    let catalog = RequirementCatalog::from_yaml_str(CATALOG_YAML).expect("catalog parses");

    let individual = catalog
        .requirements_for("individual")
        .expect("keys are normalised");
    let kinds: Vec<&str> = individual.iter().map(|req| req.kind.as_str()).collect();
    assert_eq!(kinds, vec!["passport", "poa"]);

    let medium = attributes("individual", RiskLevel::Medium);
    assert_eq!(individual[1].applies_to(&medium), Ok(true));
    let low = attributes("individual", RiskLevel::Low);
    assert_eq!(individual[1].applies_to(&low), Ok(false));

    let trust = catalog.requirements_for("trust").expect("trust requirements");
    assert!(matches!(
        trust[1].applies_if,
        Some(Condition::Any { ref any }) if any.len() == 2
    ));
}

#[test]
fn rejects_unknown_predicate_field_at_load() {
    let yaml = r#"
entity_types:
  individual:
    - kind: tax_form
      label: Tax Form
      applies_if:
        field: tax_status
        equals: resident
"#;

    match RequirementCatalog::from_yaml_str(yaml) {
        Err(CatalogError::InvalidPredicate {
            entity_type,
            kind,
            source: PredicateError::UnknownField { field },
        }) => {
            assert_eq!(entity_type, "individual");
            assert_eq!(kind, "tax_form");
            assert_eq!(field, "tax_status");
        }
        other => panic!("expected invalid predicate, got {other:?}"),
    }
}

#[test]
fn rejects_predicates_with_conflicting_keys() {
    let two_operators = r#"
entity_types:
  individual:
    - kind: source_of_wealth
      label: Source of Wealth
      applies_if:
        field: risk_level
        equals: high
        not_in: [high]
"#;
    let stray_field = r#"
entity_types:
  individual:
    - kind: source_of_wealth
      label: Source of Wealth
      applies_if:
        field: risk_level
        not:
          field: risk_level
          equals: low
"#;

    for yaml in [two_operators, stray_field] {
        match RequirementCatalog::from_yaml_str(yaml) {
            Err(CatalogError::Yaml(_)) => {}
            other => panic!("expected yaml shape error, got {other:?}"),
        }
    }
}

#[test]
fn rejects_impossible_risk_literal() {
    let entries = vec![(
        "company".to_string(),
        vec![DocumentRequirement::new("edd_pack", "Enhanced Due Diligence Pack")
            .when(Condition::equals("risk_level", "critical"))],
    )];

    match RequirementCatalog::new(entries) {
        Err(CatalogError::InvalidPredicate {
            source: PredicateError::InvalidLiteral { field, value },
            ..
        }) => {
            assert_eq!(field, CaseField::RiskLevel);
            assert_eq!(value, "critical");
        }
        other => panic!("expected invalid literal, got {other:?}"),
    }
}

#[test]
fn rejects_structural_mistakes() {
    let duplicate_kind = vec![(
        "individual".to_string(),
        vec![
            DocumentRequirement::new("passport", "Passport"),
            DocumentRequirement::new("passport", "Passport (again)"),
        ],
    )];
    assert!(matches!(
        RequirementCatalog::new(duplicate_kind),
        Err(CatalogError::DuplicateRequirement { ref kind, .. }) if kind == "passport"
    ));

    let blank_label = vec![(
        "individual".to_string(),
        vec![DocumentRequirement::new("passport", "  ")],
    )];
    assert!(matches!(
        RequirementCatalog::new(blank_label),
        Err(CatalogError::EmptyLabel { .. })
    ));

    let blank_kind = vec![(
        "individual".to_string(),
        vec![DocumentRequirement::new("", "Passport")],
    )];
    assert!(matches!(
        RequirementCatalog::new(blank_kind),
        Err(CatalogError::EmptyKind { .. })
    ));

    let blank_entity = vec![(" ".to_string(), Vec::new())];
    assert!(matches!(
        RequirementCatalog::new(blank_entity),
        Err(CatalogError::EmptyEntityType)
    ));

    let clashing_entities = vec![
        ("Trust".to_string(), Vec::new()),
        ("trust".to_string(), Vec::new()),
    ];
    assert!(matches!(
        RequirementCatalog::new(clashing_entities),
        Err(CatalogError::DuplicateEntityType { ref entity_type }) if entity_type == "trust"
    ));
}

#[test]
fn malformed_yaml_is_reported() {
    let result = RequirementCatalog::from_yaml_str("entity_types: [not, a, map]");
    assert!(matches!(result, Err(CatalogError::Yaml(_))));
}

#[test]
fn missing_catalog_file_reports_path() {
    let error = RequirementCatalog::from_path("/nonexistent/kyc/catalog.yaml")
        .expect_err("file does not exist");
    assert!(matches!(error, CatalogError::Io { .. }));
    assert!(error.to_string().contains("catalog.yaml"));
}
