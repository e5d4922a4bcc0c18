//! Observability system: structured logging and metrics
//!
//! Logging rides on the tracing crate with env-controlled formats; metrics
//! are collected in a process-global collector exported on `GET /metrics`.

pub mod logging;
pub mod metrics;

// Re-export for convenience
pub use logging::{init_default_logging, init_logging, LogFormat};
pub use metrics::{metrics, MetricsCollector, MetricsSnapshot};

// Span macros for structured logging
pub use logging::{match_span, request_span};
