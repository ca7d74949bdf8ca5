//! Developer tooling: read-only views of a running session.
//!
//! # Invariants
//! - Tools never mutate the session they inspect.

mod inspector;

pub use inspector::{SessionInspector, SessionSummary};
