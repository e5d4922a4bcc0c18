//! Pluggable failure injection for the match step
//!
//! The match operation simulates an unreliable external dependency. The
//! injection decision lives behind a trait so production uses a random check
//! while tests script exact failure sequences (see `testing::mocks`).

use rand::Rng;

/// Decides whether a single match attempt should fail transiently
///
/// Implementations must be safe to share across concurrent requests; the
/// decision is independent of utterance content.
pub trait FailureInjector: Send + Sync {
    /// True when the current attempt should be failed
    fn should_fail(&self) -> bool;
}

/// Production injector: fails each attempt with a fixed probability
#[derive(Debug, Clone)]
pub struct RandomInjector {
    failure_rate: f64,
}

impl RandomInjector {
    /// Create an injector with the given per-attempt failure probability
    pub fn new(failure_rate: f64) -> Self {
        Self { failure_rate }
    }

    /// Injector that never fails (useful when wiring the service for demos)
    pub fn disabled() -> Self {
        Self { failure_rate: 0.0 }
    }
}

impl FailureInjector for RandomInjector {
    fn should_fail(&self) -> bool {
        rand::thread_rng().gen::<f64>() < self.failure_rate
    }
}
