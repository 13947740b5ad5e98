//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use-case layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `FeedbackRepository`: exclusive, linearized access to the feedback log

pub mod repository;

pub use repository::{FeedbackRepository, StoreError};
