//! Applicability predicates attached to document requirements.
//!
//! Predicates are plain data (`{field, operator, value}` leaves combined with
//! `all` / `any` / `not`) so catalogs stay declarative and can be loaded from
//! YAML. Evaluation is fallible: a predicate that names an unknown field, or an
//! attribute the case does not carry, reports a [`PredicateError`] and the caller
//! decides how to degrade.

use super::domain::{CaseAttributes, CaseStatus, RiskLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attributes of a case that a predicate may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseField {
    EntityType,
    RiskLevel,
    Jurisdiction,
    PlaceOfIncorporation,
    Status,
}

impl CaseField {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "entity_type" | "entityType" => Some(Self::EntityType),
            "risk_level" | "riskLevel" => Some(Self::RiskLevel),
            "jurisdiction" => Some(Self::Jurisdiction),
            "place_of_incorporation" | "placeOfIncorporation" => {
                Some(Self::PlaceOfIncorporation)
            }
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EntityType => "entity_type",
            Self::RiskLevel => "risk_level",
            Self::Jurisdiction => "jurisdiction",
            Self::PlaceOfIncorporation => "place_of_incorporation",
            Self::Status => "status",
        }
    }

    /// Canonical spelling of a literal for this field, or `None` when the literal
    /// can never be a value of an enumerated field.
    pub fn canonical_literal(self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        match self {
            Self::RiskLevel => RiskLevel::ordered()
                .into_iter()
                .find(|level| {
                    level.as_str().eq_ignore_ascii_case(raw) || level.label().eq_ignore_ascii_case(raw)
                })
                .map(|level| level.as_str().to_string()),
            Self::Status => CaseStatus::ordered()
                .into_iter()
                .find(|status| {
                    status.as_str().eq_ignore_ascii_case(raw)
                        || status.label().eq_ignore_ascii_case(raw)
                })
                .map(|status| status.as_str().to_string()),
            Self::EntityType | Self::Jurisdiction | Self::PlaceOfIncorporation => {
                Some(raw.to_string())
            }
        }
    }

    fn matches_literal(self, actual: &str, expected: &str) -> bool {
        match self.canonical_literal(expected) {
            Some(expected) => actual.trim().eq_ignore_ascii_case(&expected),
            None => false,
        }
    }
}

impl fmt::Display for CaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CaseAttributes {
    /// Canonical string value of a field; blank optional attributes count as absent.
    pub fn value_of(&self, field: CaseField) -> Option<&str> {
        match field {
            CaseField::EntityType => Some(self.entity_type.as_str()),
            CaseField::RiskLevel => Some(self.risk_level.as_str()),
            CaseField::Jurisdiction => non_blank(self.jurisdiction.as_deref()),
            CaseField::PlaceOfIncorporation => non_blank(self.place_of_incorporation.as_deref()),
            CaseField::Status => match self.status {
                CaseStatus::Other => None,
                status => Some(status.as_str()),
            },
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Applicability rule tree.
///
/// Each node is exactly one of `all`, `any`, `not`, or a `field` with a single
/// operator key. Nodes that mix shapes or carry unknown keys fail to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Condition {
    All { all: Vec<Condition> },
    Any { any: Vec<Condition> },
    Not { not: Box<Condition> },
    Leaf(LeafCondition),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafCondition {
    pub field: String,
    #[serde(flatten)]
    pub operator: Operator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals(String),
    NotEquals(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    /// Compare against another attribute of the same case.
    EqualsField(String),
    NotEqualsField(String),
}

/// Wire shape of a condition node; every key is optional so shape errors can be
/// reported precisely instead of falling through untagged variants.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCondition {
    all: Option<Vec<Condition>>,
    any: Option<Vec<Condition>>,
    not: Option<Box<Condition>>,
    field: Option<String>,
    equals: Option<String>,
    not_equals: Option<String>,
    #[serde(rename = "in")]
    in_list: Option<Vec<String>>,
    not_in: Option<Vec<String>>,
    equals_field: Option<String>,
    not_equals_field: Option<String>,
}

impl TryFrom<RawCondition> for Condition {
    type Error = String;

    fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
        let compound = [
            raw.all.map(|all| Condition::All { all }),
            raw.any.map(|any| Condition::Any { any }),
            raw.not.map(|not| Condition::Not { not }),
        ];
        let operators = [
            raw.equals.map(Operator::Equals),
            raw.not_equals.map(Operator::NotEquals),
            raw.in_list.map(Operator::In),
            raw.not_in.map(Operator::NotIn),
            raw.equals_field.map(Operator::EqualsField),
            raw.not_equals_field.map(Operator::NotEqualsField),
        ];
        let mut compound = compound.into_iter().flatten();
        let mut operators = operators.into_iter().flatten();

        match (
            compound.next(),
            compound.next(),
            raw.field,
            operators.next(),
            operators.next(),
        ) {
            (Some(condition), None, None, None, _) => Ok(condition),
            (None, None, Some(field), Some(operator), None) => {
                Ok(Condition::Leaf(LeafCondition { field, operator }))
            }
            (Some(_), Some(_), ..) => {
                Err("a condition may use only one of `all`, `any` or `not`".to_string())
            }
            (Some(_), ..) => Err(
                "`all`, `any` and `not` cannot be combined with `field` or operator keys"
                    .to_string(),
            ),
            (None, _, Some(field), Some(_), Some(_)) => {
                Err(format!("condition on '{field}' names more than one operator"))
            }
            (None, _, Some(field), None, _) => {
                Err(format!("condition on '{field}' has no operator"))
            }
            _ => Err("condition needs `all`, `any`, `not` or a `field` with an operator"
                .to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawCondition::deserialize(deserializer)?;
        Condition::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredicateError {
    #[error("predicate references unknown field '{field}'")]
    UnknownField { field: String },
    #[error("case does not carry a value for '{field}'")]
    MissingAttribute { field: CaseField },
    #[error("'{value}' is not a valid value for '{field}'")]
    InvalidLiteral { field: CaseField, value: String },
}

impl Condition {
    pub fn leaf(field: impl Into<String>, operator: Operator) -> Self {
        Self::Leaf(LeafCondition {
            field: field.into(),
            operator,
        })
    }

    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::leaf(field, Operator::Equals(value.into()))
    }

    /// Evaluate against a case. Every branch is evaluated so a bad leaf is
    /// reported even when a sibling already decides the result.
    pub fn evaluate(&self, attributes: &CaseAttributes) -> Result<bool, PredicateError> {
        match self {
            Condition::All { all } => {
                all.iter()
                    .try_fold(true, |acc, condition| -> Result<bool, PredicateError> {
                        Ok(condition.evaluate(attributes)? && acc)
                    })
            }
            Condition::Any { any } => {
                any.iter()
                    .try_fold(false, |acc, condition| -> Result<bool, PredicateError> {
                        Ok(condition.evaluate(attributes)? || acc)
                    })
            }
            Condition::Not { not } => Ok(!not.evaluate(attributes)?),
            Condition::Leaf(leaf) => leaf.evaluate(attributes),
        }
    }

    /// Static check that every referenced field exists and every literal is a
    /// possible value of its field.
    pub fn validate(&self) -> Result<(), PredicateError> {
        match self {
            Condition::All { all } => all.iter().try_for_each(Condition::validate),
            Condition::Any { any } => any.iter().try_for_each(Condition::validate),
            Condition::Not { not } => not.validate(),
            Condition::Leaf(leaf) => leaf.validate(),
        }
    }
}

impl LeafCondition {
    fn resolve_field(name: &str) -> Result<CaseField, PredicateError> {
        CaseField::parse(name).ok_or_else(|| PredicateError::UnknownField {
            field: name.to_string(),
        })
    }

    fn evaluate(&self, attributes: &CaseAttributes) -> Result<bool, PredicateError> {
        let field = Self::resolve_field(&self.field)?;
        let actual = attributes
            .value_of(field)
            .ok_or(PredicateError::MissingAttribute { field })?;

        let outcome = match &self.operator {
            Operator::Equals(expected) => field.matches_literal(actual, expected),
            Operator::NotEquals(expected) => !field.matches_literal(actual, expected),
            Operator::In(values) => values
                .iter()
                .any(|expected| field.matches_literal(actual, expected)),
            Operator::NotIn(values) => !values
                .iter()
                .any(|expected| field.matches_literal(actual, expected)),
            Operator::EqualsField(other) | Operator::NotEqualsField(other) => {
                let other = Self::resolve_field(other)?;
                let other_value = attributes
                    .value_of(other)
                    .ok_or(PredicateError::MissingAttribute { field: other })?;
                let same = actual.trim().eq_ignore_ascii_case(other_value.trim());
                matches!(self.operator, Operator::EqualsField(_)) == same
            }
        };

        Ok(outcome)
    }

    fn validate(&self) -> Result<(), PredicateError> {
        let field = Self::resolve_field(&self.field)?;
        let literals: &[String] = match &self.operator {
            Operator::Equals(value) | Operator::NotEquals(value) => std::slice::from_ref(value),
            Operator::In(values) | Operator::NotIn(values) => values.as_slice(),
            Operator::EqualsField(other) | Operator::NotEqualsField(other) => {
                Self::resolve_field(other)?;
                &[]
            }
        };

        for value in literals {
            if field.canonical_literal(value).is_none() {
                return Err(PredicateError::InvalidLiteral {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}
