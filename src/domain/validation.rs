//! Declarative validation rules for feedback submissions.
//!
//! The same `RuleSet` that guards the store is served to the form as JSON,
//! so the client can mirror the checks instead of re-inventing them.
//! Rules are evaluated in declaration order and the first failure wins.

use serde::Serialize;
use thiserror::Error;

use super::feedback::{Submission, ValidatedFeedback};

/// Submission fields that rules can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Rating,
    Comments,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Rating => write!(f, "rating"),
            Self::Comments => write!(f, "comments"),
        }
    }
}

/// A single check applied to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Present and non-blank after trimming.
    Required,
    /// When non-empty, at least `chars` characters long.
    MinLength { chars: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub field: Field,
    pub rule: Rule,
    pub message: String,
}

/// A submission failed one of the rules. No I/O has happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

/// Ordered collection of field rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RuleSet {
    /// `name` and `rating` required; comments length enforced only when
    /// `min_comment_length > 0`.
    pub fn new(min_comment_length: usize) -> Self {
        let mut rules = vec![
            FieldRule {
                field: Field::Name,
                rule: Rule::Required,
                message: "name required".to_string(),
            },
            FieldRule {
                field: Field::Rating,
                rule: Rule::Required,
                message: "rating required".to_string(),
            },
        ];

        if min_comment_length > 0 {
            rules.push(FieldRule {
                field: Field::Comments,
                rule: Rule::MinLength { chars: min_comment_length },
                message: format!("comments must be at least {min_comment_length} characters"),
            });
        }

        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn validate(&self, submission: &Submission) -> Result<ValidatedFeedback, ValidationError> {
        for rule in &self.rules {
            let value = match rule.field {
                Field::Name => submission.name.as_deref(),
                Field::Rating => submission.rating.as_ref().map(|r| r.as_str()),
                Field::Comments => submission.comments.as_deref(),
            };

            let passed = match rule.rule {
                Rule::Required => value.is_some_and(|v| !v.trim().is_empty()),
                Rule::MinLength { chars } => match value {
                    None | Some("") => true,
                    Some(v) => v.chars().count() >= chars,
                },
            };

            if !passed {
                return Err(ValidationError {
                    field: rule.field,
                    message: rule.message.clone(),
                });
            }
        }

        match (&submission.name, &submission.rating) {
            (Some(name), Some(rating)) => Ok(ValidatedFeedback {
                name: name.clone(),
                rating: rating.clone(),
                comments: submission.comments.clone().unwrap_or_default(),
            }),
            // A rule set is always built with both Required rules above.
            (None, _) => Err(ValidationError {
                field: Field::Name,
                message: "name required".to_string(),
            }),
            (_, None) => Err(ValidationError {
                field: Field::Rating,
                message: "rating required".to_string(),
            }),
        }
    }
}
