//! Static rule table for utterance-to-task matching
//!
//! Holds the direct trigger-phrase mappings and the category keyword sets
//! used for fallback matching. The table is built once at startup and never
//! mutated afterwards; it is shared read-only across concurrent requests.

use tracing::debug;

/// Task label returned when no rule or category matches
pub const NO_TASK_FOUND: &str = "NoTaskFound";
/// Task label for password-related utterances
pub const RESET_PASSWORD_TASK: &str = "ResetPasswordTask";
/// Task label for order-related utterances
pub const CHECK_ORDER_STATUS_TASK: &str = "CheckOrderStatusTask";

/// Keyword categories used for fallback matching when no direct phrase hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Password,
    Order,
}

/// Immutable phrase-to-task mapping plus category keyword sets
///
/// Direct rules are kept as an ordered list of pairs: when several trigger
/// phrases occur in the same utterance, the first inserted rule wins. Category
/// matching is deliberately loose - an utterance containing any core noun OR
/// any action verb of a category counts as a match, so a bare "check" already
/// maps to the order category. That policy is inherited behavior, kept as-is.
#[derive(Debug, Clone)]
pub struct RuleTable {
    /// Direct trigger phrase -> task label, in match-precedence order
    rules: Vec<(String, String)>,
    password_nouns: Vec<String>,
    password_verbs: Vec<String>,
    order_nouns: Vec<String>,
    order_verbs: Vec<String>,
}

impl RuleTable {
    /// Create an empty rule table with the default category keyword sets
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            password_nouns: to_strings(&["password", "login", "sign in", "authenticate"]),
            password_verbs: to_strings(&["reset", "forgot", "forgotten"]),
            order_nouns: to_strings(&["order", "purchase", "delivery", "shipment", "tracking"]),
            order_verbs: to_strings(&["check", "track", "status"]),
        }
    }

    /// Add a direct rule. Later rules rank below earlier ones when both match.
    ///
    /// Phrases are stored lowercased; lookup expects a normalized utterance.
    pub fn with_rule<P, T>(mut self, phrase: P, task: T) -> Self
    where
        P: Into<String>,
        T: Into<String>,
    {
        self.rules.push((phrase.into().to_lowercase(), task.into()));
        self
    }

    /// Build the stock rule table shipped with the service
    pub fn standard() -> Self {
        Self::new()
            .with_rule("reset password", RESET_PASSWORD_TASK)
            .with_rule("forgot password", RESET_PASSWORD_TASK)
            .with_rule("check order", CHECK_ORDER_STATUS_TASK)
            .with_rule("track order", CHECK_ORDER_STATUS_TASK)
    }

    /// Number of direct rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table holds no direct rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the task for the first trigger phrase contained in the utterance
    ///
    /// The utterance must already be lowercased. Returns `None` when no
    /// phrase is found as a substring.
    pub fn lookup_direct(&self, normalized_utterance: &str) -> Option<&str> {
        for (phrase, task) in &self.rules {
            if normalized_utterance.contains(phrase.as_str()) {
                debug!(phrase = %phrase, task = %task, "Direct rule matched");
                return Some(task);
            }
        }
        None
    }

    /// Whether the utterance contains any noun OR any verb of the category
    pub fn is_category_match(&self, category: Category, normalized_utterance: &str) -> bool {
        let (nouns, verbs) = match category {
            Category::Password => (&self.password_nouns, &self.password_verbs),
            Category::Order => (&self.order_nouns, &self.order_verbs),
        };

        nouns
            .iter()
            .chain(verbs.iter())
            .any(|keyword| normalized_utterance.contains(keyword.as_str()))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
