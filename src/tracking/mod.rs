//! Hit ingestion and aggregation
//!
//! The beacon path resolves a visitor identity and records a hit, never
//! failing. The dashboard path aggregates stored hits and reports failures.

pub mod aggregate;
pub mod identity;
pub mod recorder;

pub use aggregate::{rank, AggregateError, AggregateResult, Aggregator, TOP_N};
pub use identity::{Identity, IDENTITY_COOKIE};
pub use recorder::{normalize_referer, HitRecorder, RecordOutcome};
