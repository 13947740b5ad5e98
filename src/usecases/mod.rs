//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain rules with the repository port.
//!
//! Use cases:
//! - `FeedbackService::submit`: validate → stamp → append → confirm

pub mod submit_feedback;

pub use submit_feedback::{FeedbackService, SubmitError};
