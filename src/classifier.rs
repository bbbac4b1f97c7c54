//! Local keyword classifier used when no remote completion is available
//!
//! Utterances are lower-cased and matched against an ordered list of
//! word-boundary patterns. The first matching rule supplies the reply;
//! when nothing matches, a clarifying question is returned.

use regex::Regex;
use serde::Deserialize;

/// Reply used when no category rule matches
pub const DEFAULT_REPLY: &str =
    "I understand. Could you provide a bit more detail so I can better assist you with your request?";

/// Built-in categories as (name, pattern, reply), in evaluation order
///
/// Boundaries are ASCII-only, so a keyword next to an accented letter
/// still counts as a whole word.
const BUILTIN_RULES: &[(&str, &str, &str)] = &[
    (
        "greeting",
        r"(?-u:\b)(hello|hi|hey|good morning|good afternoon)(?-u:\b)",
        "Hello! How can I assist you today?",
    ),
    (
        "help",
        r"(?-u:\b)(help|assist|support)(?-u:\b)",
        "I'm here to help! I can answer questions, provide information, or connect you with the right department. What do you need assistance with?",
    ),
    (
        "hours",
        r"(?-u:\b)(hours|open|available|time)(?-u:\b)",
        "We're available 24/7 through this AI agent. For specific department hours, please let me know which department you're interested in.",
    ),
    (
        "pricing",
        r"(?-u:\b)(price|cost|fee|charge)(?-u:\b)",
        "I'd be happy to discuss pricing with you. Could you tell me which specific product or service you're interested in?",
    ),
    (
        "appointment",
        r"(?-u:\b)(appointment|schedule|book|meeting)(?-u:\b)",
        "I can help you schedule an appointment. What date and time works best for you?",
    ),
    (
        "contact",
        r"(?-u:\b)(contact|reach|speak|talk to|representative)(?-u:\b)",
        "You can reach our team at support@example.com or I can transfer you to a human representative. Would you like me to do that?",
    ),
    (
        "thanks",
        r"(?-u:\b)(thank|thanks)(?-u:\b)",
        "You're welcome! Is there anything else I can help you with today?",
    ),
    (
        "goodbye",
        r"(?-u:\b)(bye|goodbye|see you|end call)(?-u:\b)",
        "Thank you for calling! Have a great day. Feel free to reach out anytime you need assistance.",
    ),
    (
        "order",
        r"(?-u:\b)(order|status|tracking|delivery)(?-u:\b)",
        "I can help you check on your order status. Could you please provide your order number?",
    ),
    (
        "problem",
        r"(?-u:\b)(problem|issue|not working|broken|error)(?-u:\b)",
        "I'm sorry to hear you're experiencing an issue. Can you describe the problem in more detail so I can better assist you?",
    ),
];

/// Operator-defined category rule from the config file
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRuleConfig {
    /// Category name used in logs
    pub name: String,
    /// Regex matched against the lower-cased utterance
    pub pattern: String,
    /// Reply text returned on match
    pub reply: String,
}

/// Compiled category rule
#[derive(Debug, Clone)]
pub struct CategoryRule {
    name: String,
    pattern: Regex,
    reply: String,
}

impl CategoryRule {
    /// Compile a rule
    ///
    /// # Errors
    ///
    /// Returns error if the regex pattern is invalid
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        reply: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            reply: reply.into(),
        })
    }

    /// Category name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reply text
    #[must_use]
    pub fn reply(&self) -> &str {
        &self.reply
    }

    fn matches(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }
}

/// Outcome of classifying one utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Name of the matching category, `None` for the default reply
    pub category: Option<&'a str>,
    /// Reply text
    pub reply: &'a str,
}

/// Ordered, first-match-wins keyword classifier
#[derive(Debug, Clone)]
pub struct LocalClassifier {
    rules: Vec<CategoryRule>,
    default_reply: String,
}

impl Default for LocalClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LocalClassifier {
    /// Classifier with only the built-in categories
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
            default_reply: DEFAULT_REPLY.to_string(),
        }
    }

    /// Classifier with operator rules evaluated ahead of the built-in ones
    ///
    /// Invalid rules are logged and skipped. An empty default reply
    /// override is ignored.
    #[must_use]
    pub fn with_config(extra: &[CategoryRuleConfig], default_reply: Option<&str>) -> Self {
        let mut rules: Vec<CategoryRule> = extra
            .iter()
            .filter_map(|r| match CategoryRule::new(&r.name, &r.pattern, &r.reply) {
                Ok(rule) if !rule.reply.trim().is_empty() => Some(rule),
                Ok(_) => {
                    tracing::warn!(category = %r.name, "category rule has empty reply, skipping");
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        category = %r.name,
                        pattern = %r.pattern,
                        error = %e,
                        "invalid category pattern, skipping"
                    );
                    None
                }
            })
            .collect();

        if !rules.is_empty() {
            tracing::info!(count = rules.len(), "loaded custom category rules");
        }

        rules.extend(builtin_rules());

        let default_reply = default_reply
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_REPLY)
            .to_string();

        Self {
            rules,
            default_reply,
        }
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Classify an utterance
    #[must_use]
    pub fn classify(&self, utterance: &str) -> Classification<'_> {
        let lowered = utterance.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(
                Classification {
                    category: None,
                    reply: &self.default_reply,
                },
                |rule| Classification {
                    category: Some(rule.name.as_str()),
                    reply: &rule.reply,
                },
            )
    }

    /// Reply text for an utterance
    #[must_use]
    pub fn reply(&self, utterance: &str) -> &str {
        self.classify(utterance).reply
    }
}

fn builtin_rules() -> Vec<CategoryRule> {
    BUILTIN_RULES
        .iter()
        .filter_map(
            |(name, pattern, reply)| match CategoryRule::new(*name, pattern, *reply) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    tracing::warn!(
                        category = %name,
                        error = %e,
                        "built-in category failed to compile, skipping"
                    );
                    None
                }
            },
        )
        .collect()
}
