//! Feedback domain types.
//!
//! A `Submission` is what arrives from the form, a `ValidatedFeedback` is
//! what survives the rule set, and a `FeedbackRecord` is what lands in the
//! persisted log. The on-disk shape (`name`, `rating`, `comments`, `date`)
//! is fixed by the serde attributes here.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The full persisted collection, in insertion order.
pub type FeedbackLog = Vec<FeedbackRecord>;

/// A rating token as submitted by the form.
///
/// The value space is deliberately open: `"5"`, `"excellent"` and the
/// JSON number `4` are all accepted. Numbers are kept in serde_json's
/// text form (`5.0` stays `"5.0"`, `4` stays `"4"`) so the log always
/// stores a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rating(String);

impl Rating {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the token carries no visible characters.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Rating {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Token {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Token::deserialize(deserializer)? {
            Token::Text(s) => Self(s),
            Token::Number(n) => Self(n.to_string()),
        })
    }
}

/// Raw submission as received over HTTP. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl Submission {
    pub fn new(name: &str, rating: &str, comments: Option<&str>) -> Self {
        Self {
            name: Some(name.to_string()),
            rating: Some(Rating::new(rating)),
            comments: comments.map(str::to_string),
        }
    }
}

/// A submission that passed validation. Only built by `RuleSet::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFeedback {
    pub(crate) name: String,
    pub(crate) rating: Rating,
    pub(crate) comments: String,
}

impl ValidatedFeedback {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stamp the feedback with its submission instant.
    pub fn into_record(self, submitted_at: DateTime<Utc>) -> FeedbackRecord {
        FeedbackRecord {
            name: self.name,
            rating: self.rating,
            comments: self.comments,
            submitted_at: submitted_at.trunc_subsecs(3),
        }
    }
}

/// One entry of the feedback log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub name: String,
    pub rating: Rating,
    /// Older logs may omit the key entirely when no comment was given.
    #[serde(default)]
    pub comments: String,
    #[serde(rename = "date", with = "iso8601_millis")]
    pub submitted_at: DateTime<Utc>,
}

/// Returned to the caller once a record is durably stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Submitter's name, for display.
    pub name: String,
    /// Length of the log after this submission.
    pub total_records: usize,
}

impl Confirmation {
    pub fn message(&self) -> String {
        format!("Thank you, {}!", self.name)
    }
}

/// Current instant at the precision the log stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// `2025-01-01T12:00:00.000Z` on the way out, any RFC 3339 on the way in.
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
