//! Matcher core: decides a task label for a raw utterance
//!
//! The `MatcherService` evaluates an utterance against the rule table in a
//! fixed precedence order, wrapped in the bounded retry executor to absorb
//! the injected transient failures of the match step.

use crate::error::{SuggestError, SuggestResult};
use crate::matcher::injector::FailureInjector;
use crate::matcher::retry::RetryExecutor;
use crate::matcher::rules::{
    Category, RuleTable, CHECK_ORDER_STATUS_TASK, NO_TASK_FOUND, RESET_PASSWORD_TASK,
};
use crate::observability::metrics::metrics;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The one logical operation the service core exposes to its callers
#[async_trait]
pub trait TaskSuggester: Send + Sync {
    /// Suggest a task label for the utterance
    ///
    /// Always yields exactly one label on success. Fails with
    /// `OperationExhausted` when the match step keeps failing transiently.
    async fn suggest_task(&self, utterance: &str) -> SuggestResult<String>;
}

/// Keyword-rule matcher with retry
pub struct MatcherService {
    rules: Arc<RuleTable>,
    retry: RetryExecutor,
    injector: Arc<dyn FailureInjector>,
}

impl MatcherService {
    /// Create a matcher over the given rule table and failure injector
    pub fn new(
        rules: Arc<RuleTable>,
        retry: RetryExecutor,
        injector: Arc<dyn FailureInjector>,
    ) -> Self {
        Self {
            rules,
            retry,
            injector,
        }
    }

    /// Classify an utterance without failure injection or retry
    ///
    /// Pure function of the input: normalize to lowercase, then direct rule
    /// lookup, password category, order category, `NoTaskFound` - stopping
    /// at the first hit.
    pub fn classify(&self, utterance: &str) -> String {
        let normalized = utterance.to_lowercase();

        if let Some(task) = self.rules.lookup_direct(&normalized) {
            return task.to_string();
        }

        if self.rules.is_category_match(Category::Password, &normalized) {
            debug!("Password category matched");
            return RESET_PASSWORD_TASK.to_string();
        }

        if self.rules.is_category_match(Category::Order, &normalized) {
            debug!("Order category matched");
            return CHECK_ORDER_STATUS_TASK.to_string();
        }

        debug!(utterance = %utterance, "No matching task found");
        NO_TASK_FOUND.to_string()
    }

    /// One match attempt: injection check, then classification
    fn match_once(&self, utterance: &str) -> SuggestResult<String> {
        metrics().match_attempt();

        if self.injector.should_fail() {
            warn!("Simulated external dependency failure");
            metrics().transient_failure();
            return Err(SuggestError::transient("External dependency failure"));
        }

        Ok(self.classify(utterance))
    }
}

#[async_trait]
impl TaskSuggester for MatcherService {
    async fn suggest_task(&self, utterance: &str) -> SuggestResult<String> {
        info!(utterance = %utterance, "Processing utterance");

        // Empty input is valid, not a failure: answer immediately and keep
        // the retry machinery out of the path entirely
        if utterance.trim().is_empty() {
            warn!("Empty utterance provided");
            metrics().empty_utterance();
            return Ok(NO_TASK_FOUND.to_string());
        }

        let task = match self
            .retry
            .execute(|| async { self.match_once(utterance) })
            .await
        {
            Ok(task) => task,
            Err(e) => {
                metrics().retries_exhausted();
                return Err(e);
            }
        };

        info!(task = %task, utterance = %utterance, "Suggested task");
        metrics().task_suggested(&task);
        Ok(task)
    }
}
