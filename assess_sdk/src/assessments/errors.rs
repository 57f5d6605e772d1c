/// A field rule that cannot be compiled
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("An assessment needs at least one rule")]
    NoRules,

    #[error("Rule {rule}: pointer '{pointer}' must be empty or start with '/'")]
    InvalidPointer { rule: String, pointer: String },

    #[error("Rule {rule}: 'equals' needs a value")]
    MissingValue { rule: String },

    #[error("Rule {rule}: 'matches' needs a pattern")]
    MissingPattern { rule: String },

    #[error("Rule {rule}: invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}
