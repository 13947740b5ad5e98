//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to check the validation rules and the log's
//! serialized form across random inputs.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use feedback_store::domain::{Field, FeedbackLog, FeedbackRecord, Rating, RuleSet, Submission};

fn arb_record() -> impl Strategy<Value = FeedbackRecord> {
    (
        "\\PC{1,24}",
        "[1-5]|[a-z]{1,8}",
        "\\PC{0,64}",
        0i64..4_102_444_800_000, // up to 2100-01-01, in ms
    )
        .prop_map(|(name, rating, comments, millis)| FeedbackRecord {
            name,
            rating: Rating::new(rating),
            comments,
            submitted_at: Utc.timestamp_millis_opt(millis).unwrap(),
        })
}

// ── Validation Properties ───────────────────────────────────

proptest! {
    /// A name with a visible character and a non-blank rating always pass.
    #[test]
    fn non_blank_fields_always_validate(
        name in "[ ]{0,3}[A-Za-z][A-Za-z ]{0,20}",
        rating in "[1-5]",
        comments in proptest::option::of("\\PC{0,40}"),
    ) {
        let sub = Submission {
            name: Some(name.clone()),
            rating: Some(Rating::new(rating)),
            comments: comments.clone(),
        };
        let ok = RuleSet::default().validate(&sub);
        prop_assert!(ok.is_ok());
        let record = ok.unwrap().into_record(Utc::now());
        prop_assert_eq!(record.name, name);
        prop_assert_eq!(record.comments, comments.unwrap_or_default());
    }

    /// Whitespace-only names are always rejected on the name field.
    #[test]
    fn blank_names_always_rejected(name in "[ \\t\\n]{0,8}", rating in "[1-5]") {
        let sub = Submission {
            name: Some(name),
            rating: Some(Rating::new(rating)),
            comments: None,
        };
        let err = RuleSet::default().validate(&sub).unwrap_err();
        prop_assert_eq!(err.field, Field::Name);
    }

    /// Non-empty comments pass exactly when they meet the configured length.
    #[test]
    fn comment_length_rule_is_exact(min in 1usize..20, comments in "[a-z]{1,30}") {
        let sub = Submission::new("Alice", "5", Some(&comments));
        let result = RuleSet::new(min).validate(&sub);
        prop_assert_eq!(result.is_ok(), comments.chars().count() >= min);
    }
}

// ── Log Serialization Properties ────────────────────────────

proptest! {
    /// Serializing then loading the log yields the same sequence.
    #[test]
    fn log_round_trips(log in proptest::collection::vec(arb_record(), 0..16)) {
        let bytes = serde_json::to_vec_pretty(&log).unwrap();
        let loaded: FeedbackLog = serde_json::from_slice(&bytes).unwrap();
        prop_assert_eq!(loaded, log);
    }

    /// Every persisted object carries exactly the four documented keys.
    #[test]
    fn persisted_records_have_documented_keys(record in arb_record()) {
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        prop_assert_eq!(obj.len(), 4);
        for key in ["name", "rating", "comments", "date"] {
            prop_assert!(obj.contains_key(key));
        }
    }
}
