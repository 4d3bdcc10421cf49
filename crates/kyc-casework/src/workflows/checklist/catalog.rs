use super::predicate::{CaseField, Condition, Operator, PredicateError};
use super::domain::CaseAttributes;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// A document the catalog expects for an entity type, optionally gated by a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequirement {
    pub kind: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_if: Option<Condition>,
}

impl DocumentRequirement {
    pub fn new(kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            applies_if: None,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.applies_if = Some(condition);
        self
    }

    /// Whether the requirement applies to the case. Absent predicates always apply.
    pub fn applies_to(&self, attributes: &CaseAttributes) -> Result<bool, PredicateError> {
        match &self.applies_if {
            Some(condition) => condition.evaluate(attributes),
            None => Ok(true),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read requirement catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid requirement catalog yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("catalog contains an entity type with an empty name")]
    EmptyEntityType,
    #[error("entity type '{entity_type}' is declared more than once")]
    DuplicateEntityType { entity_type: String },
    #[error("entity type '{entity_type}' has a requirement with an empty kind")]
    EmptyKind { entity_type: String },
    #[error("requirement '{kind}' for '{entity_type}' has an empty label")]
    EmptyLabel { entity_type: String, kind: String },
    #[error("requirement '{kind}' is declared more than once for '{entity_type}'")]
    DuplicateRequirement { entity_type: String, kind: String },
    #[error("requirement '{kind}' for '{entity_type}' has an invalid predicate: {source}")]
    InvalidPredicate {
        entity_type: String,
        kind: String,
        source: PredicateError,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    entity_types: BTreeMap<String, Vec<DocumentRequirement>>,
}

/// Immutable mapping from entity type to its ordered document requirements.
///
/// Entity type keys are matched case-insensitively; requirement order is the
/// declaration order and doubles as the checklist display order.
#[derive(Debug, Clone)]
pub struct RequirementCatalog {
    entries: BTreeMap<String, Vec<DocumentRequirement>>,
}

impl RequirementCatalog {
    /// Build a catalog, rejecting anything that would only fail later at evaluation.
    pub fn new<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (String, Vec<DocumentRequirement>)>,
    {
        let mut keyed = BTreeMap::new();

        for (entity_type, requirements) in entries {
            let key = entity_key(&entity_type);
            if key.is_empty() {
                return Err(CatalogError::EmptyEntityType);
            }
            if keyed.insert(key.clone(), requirements).is_some() {
                return Err(CatalogError::DuplicateEntityType { entity_type: key });
            }
        }

        let catalog = Self { entries: keyed };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Built-in requirements. The table is a literal, so it is checked by the
    /// same validator as loaded catalogs in debug builds and by the test suite.
    pub fn standard() -> Self {
        let entries = standard_requirements()
            .into_iter()
            .map(|(entity_type, requirements)| (entity_type.to_string(), requirements))
            .collect();
        let catalog = Self { entries };
        debug_assert!(
            catalog.validate().is_ok(),
            "built-in requirement catalog failed validation"
        );
        catalog
    }

    /// Per-requirement checks: non-empty kind and label, unique kinds, and
    /// predicates that only name known fields and possible literals.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.entries
            .iter()
            .try_for_each(|(entity_type, requirements)| {
                validate_requirements(entity_type, requirements)
            })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(raw)?;
        Self::new(file.entity_types)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&raw)?;

        tracing::info!(
            path = %path.display(),
            entity_types = catalog.entries.len(),
            "loaded requirement catalog"
        );

        Ok(catalog)
    }

    pub fn requirements_for(&self, entity_type: &str) -> Option<&[DocumentRequirement]> {
        self.entries
            .get(&entity_key(entity_type))
            .map(Vec::as_slice)
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for RequirementCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn entity_key(entity_type: &str) -> String {
    entity_type.trim().to_ascii_lowercase()
}

fn validate_requirements(
    entity_type: &str,
    requirements: &[DocumentRequirement],
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();

    for requirement in requirements {
        if requirement.kind.trim().is_empty() {
            return Err(CatalogError::EmptyKind {
                entity_type: entity_type.to_string(),
            });
        }
        if requirement.label.trim().is_empty() {
            return Err(CatalogError::EmptyLabel {
                entity_type: entity_type.to_string(),
                kind: requirement.kind.clone(),
            });
        }
        if !seen.insert(requirement.kind.as_str()) {
            return Err(CatalogError::DuplicateRequirement {
                entity_type: entity_type.to_string(),
                kind: requirement.kind.clone(),
            });
        }
        if let Some(condition) = &requirement.applies_if {
            condition
                .validate()
                .map_err(|source| CatalogError::InvalidPredicate {
                    entity_type: entity_type.to_string(),
                    kind: requirement.kind.clone(),
                    source,
                })?;
        }
    }

    Ok(())
}

fn high_risk() -> Condition {
    Condition::equals(CaseField::RiskLevel.as_str(), "high")
}

fn elevated_risk() -> Condition {
    Condition::leaf(
        CaseField::RiskLevel.as_str(),
        Operator::In(vec!["medium".to_string(), "high".to_string()]),
    )
}

fn incorporated_elsewhere() -> Condition {
    Condition::leaf(
        CaseField::Jurisdiction.as_str(),
        Operator::NotEqualsField(CaseField::PlaceOfIncorporation.as_str().to_string()),
    )
}

fn standard_requirements() -> Vec<(&'static str, Vec<DocumentRequirement>)> {
    vec![
        (
            "individual",
            vec![
                DocumentRequirement::new("passport", "Passport or National ID"),
                DocumentRequirement::new("proof_of_address", "Proof of Address"),
                DocumentRequirement::new("source_of_wealth", "Source of Wealth Declaration")
                    .when(high_risk()),
                DocumentRequirement::new("bank_reference", "Bank Reference Letter")
                    .when(elevated_risk()),
            ],
        ),
        (
            "company",
            vec![
                DocumentRequirement::new(
                    "certificate_of_incorporation",
                    "Certificate of Incorporation",
                ),
                DocumentRequirement::new(
                    "memorandum_and_articles",
                    "Memorandum & Articles of Association",
                ),
                DocumentRequirement::new("register_of_directors", "Register of Directors"),
                DocumentRequirement::new("register_of_shareholders", "Register of Shareholders"),
                DocumentRequirement::new("ubo_declaration", "Beneficial Ownership Declaration"),
                DocumentRequirement::new(
                    "certificate_of_good_standing",
                    "Certificate of Good Standing",
                )
                .when(incorporated_elsewhere()),
                DocumentRequirement::new("audited_financials", "Audited Financial Statements")
                    .when(elevated_risk()),
                DocumentRequirement::new("source_of_funds", "Source of Funds Evidence")
                    .when(high_risk()),
            ],
        ),
        (
            "partnership",
            vec![
                DocumentRequirement::new("partnership_agreement", "Partnership Agreement"),
                DocumentRequirement::new("register_of_partners", "Register of Partners"),
                DocumentRequirement::new("proof_of_address", "Proof of Registered Address"),
                DocumentRequirement::new("source_of_funds", "Source of Funds Evidence")
                    .when(high_risk()),
            ],
        ),
        (
            "trust",
            vec![
                DocumentRequirement::new("trust_deed", "Trust Deed"),
                DocumentRequirement::new("register_of_trustees", "Register of Trustees"),
                DocumentRequirement::new("beneficiary_schedule", "Schedule of Beneficiaries"),
                DocumentRequirement::new("settlor_identification", "Settlor Identification"),
                DocumentRequirement::new("letter_of_wishes", "Letter of Wishes").when(high_risk()),
            ],
        ),
        (
            "fund",
            vec![
                DocumentRequirement::new("offering_memorandum", "Offering Memorandum"),
                DocumentRequirement::new(
                    "certificate_of_registration",
                    "Certificate of Registration",
                ),
                DocumentRequirement::new(
                    "investment_manager_agreement",
                    "Investment Management Agreement",
                ),
                DocumentRequirement::new("aml_comfort_letter", "AML Comfort Letter")
                    .when(incorporated_elsewhere()),
            ],
        ),
    ]
}
