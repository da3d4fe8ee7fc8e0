use fancy_regex::Regex;
use thiserror::Error;
use tracing::warn;

/// Ordered `(label, pattern)` pairs. Declaration order is evaluation order.
pub type RuleTable = [(&'static str, &'static str)];

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("pattern for category '{label}' failed to compile ('{pattern}'): {source}")]
    CompilationFailed {
        label: &'static str,
        pattern: String,
        #[source]
        source: fancy_regex::Error,
    },

    #[error("routing pattern '{name}' failed to compile ('{pattern}'): {source}")]
    RoutingPatternFailed {
        name: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A single pattern and the category it assigns.
#[derive(Debug, Clone)]
pub struct Rule {
    label: &'static str,
    regex: Regex,
}

impl Rule {
    pub fn new(label: &'static str, pattern: &str) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|source| RuleError::CompilationFailed {
            label,
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { label, regex })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Search anywhere in `text`. An evaluation failure counts as no match.
    pub fn is_match(&self, text: &str) -> bool {
        match self.regex.is_match(text) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(
                    category = self.label,
                    error = %e,
                    "Rule evaluation failed, treating as no match"
                );
                false
            }
        }
    }
}

/// Ordered rule list shared by all four taxonomies.
///
/// The cascade has no fallback of its own: an empty result means
/// "uncategorized by rule" and the caller picks the taxonomy's fallback label.
#[derive(Debug, Clone)]
pub struct RuleCascade {
    rules: Vec<Rule>,
}

impl RuleCascade {
    pub fn new(table: &RuleTable) -> Result<Self, RuleError> {
        let rules = table
            .iter()
            .map(|(label, pattern)| Rule::new(label, pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Label of the first rule in declaration order that matches.
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(text))
            .map(Rule::label)
    }

    /// Labels of every matching rule, in declaration order.
    pub fn all_matches(&self, text: &str) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.is_match(text))
            .map(Rule::label)
            .collect()
    }
}
