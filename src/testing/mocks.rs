//! Mock implementations for testing
//!
//! Provides a scripted failure injector for driving the retry path
//! deterministically, and a mock suggester for exercising the HTTP boundary
//! without the real matching engine.

use crate::error::{SuggestError, SuggestResult};
use crate::matcher::FailureInjector;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Failure injector that replays a scripted sequence of outcomes
///
/// Each `should_fail` call consumes the next scripted outcome; once the
/// script is exhausted, every further attempt succeeds. `always()` keeps
/// failing forever instead.
pub struct ScriptedInjector {
    script: Mutex<VecDeque<bool>>,
    always_fail: bool,
    calls: AtomicU32,
}

impl ScriptedInjector {
    /// Injector that never fails
    pub fn never() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            always_fail: false,
            calls: AtomicU32::new(0),
        }
    }

    /// Injector that fails every attempt
    pub fn always() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            always_fail: true,
            calls: AtomicU32::new(0),
        }
    }

    /// Injector that fails the first `n` attempts, then succeeds
    pub fn fail_times(n: usize) -> Self {
        Self {
            script: Mutex::new(std::iter::repeat(true).take(n).collect()),
            always_fail: false,
            calls: AtomicU32::new(0),
        }
    }

    /// Injector replaying an explicit outcome sequence (true = fail)
    pub fn from_script(outcomes: Vec<bool>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            always_fail: false,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of attempts observed so far
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FailureInjector for ScriptedInjector {
    fn should_fail(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.always_fail {
            return true;
        }

        self.script
            .lock()
            .map(|mut script| script.pop_front().unwrap_or(false))
            .unwrap_or(false)
    }
}

/// Mock suggester with a canned answer or a canned failure
pub struct MockSuggester {
    response: Option<String>,
    calls: AtomicU32,
}

impl MockSuggester {
    /// Suggester that always answers with the given label
    pub fn single_response<S: Into<String>>(task: S) -> Self {
        Self {
            response: Some(task.into()),
            calls: AtomicU32::new(0),
        }
    }

    /// Suggester that always fails with retry exhaustion
    pub fn with_failure() -> Self {
        Self {
            response: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of suggestion calls observed
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl crate::matcher::TaskSuggester for MockSuggester {
    async fn suggest_task(&self, _utterance: &str) -> SuggestResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.response {
            Some(task) => Ok(task.clone()),
            None => Err(SuggestError::exhausted(3)),
        }
    }
}
