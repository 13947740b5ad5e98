//! Persistence Adapters - JSON File Storage
//!
//! Implements the `FeedbackRepository` port with a single JSON document
//! rewritten atomically under a single-writer lock.

pub mod json_store;

pub use json_store::JsonFileStore;
