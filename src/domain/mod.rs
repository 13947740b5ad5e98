//! Domain layer - feedback records and the rules that admit them.
//!
//! Pure types and checks with no I/O (hexagonal architecture inner ring).

pub mod feedback;
pub mod validation;

pub use feedback::{
    Confirmation, FeedbackLog, FeedbackRecord, Rating, Submission, ValidatedFeedback,
};
pub use validation::{Field, FieldRule, Rule, RuleSet, ValidationError};
