//! Utterance-to-task matching engine
//!
//! Three pieces, consumed in order: the immutable `RuleTable` built at
//! startup, the `MatcherService` that evaluates an utterance against it with
//! fixed precedence, and the `RetryExecutor` that absorbs the transient
//! failures injected into each match attempt.

pub mod injector;
pub mod retry;
pub mod rules;
pub mod service;

pub use injector::{FailureInjector, RandomInjector};
pub use retry::RetryExecutor;
pub use rules::{
    Category, RuleTable, CHECK_ORDER_STATUS_TASK, NO_TASK_FOUND, RESET_PASSWORD_TASK,
};
pub use service::{MatcherService, TaskSuggester};
