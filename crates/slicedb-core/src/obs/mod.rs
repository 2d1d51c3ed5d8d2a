//! Scan tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! execution semantics. Every event is also emitted through `tracing`.

mod sink;

pub use sink::{NoopTraceSink, ScanTraceEvent, ScanTraceSink, emit};
