//! suggestd - keyword-rule task suggestion service
//!
//! A single-endpoint HTTP service that accepts a natural-language utterance
//! plus session metadata and answers with a suggested task identifier,
//! matched via static keyword rules.
//!
//! # Overview
//!
//! Two components carry the real logic:
//! - An immutable [`matcher::RuleTable`] of trigger phrases and category
//!   keyword sets, built once at startup and shared read-only.
//! - A [`matcher::MatcherService`] that normalizes the utterance and
//!   evaluates it in fixed precedence order, wrapped in a bounded
//!   [`matcher::RetryExecutor`] to absorb injected transient failures.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use suggestd::matcher::{
//!     MatcherService, RandomInjector, RetryExecutor, RuleTable, TaskSuggester,
//! };
//!
//! # async fn example() -> suggestd::error::SuggestResult<()> {
//! let service = MatcherService::new(
//!     Arc::new(RuleTable::standard()),
//!     RetryExecutor::new(3, Duration::from_millis(100)),
//!     Arc::new(RandomInjector::disabled()),
//! );
//!
//! let task = service.suggest_task("I forgot my password").await?;
//! assert_eq!(task, "ResetPasswordTask");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod matcher;
pub mod observability;
pub mod server;
pub mod testing;

pub use config::ServiceConfig;
pub use error::{SuggestError, SuggestResult};
pub use matcher::{MatcherService, RetryExecutor, RuleTable, TaskSuggester};
pub use server::ApiServer;
