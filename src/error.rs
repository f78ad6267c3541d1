use thiserror::Error;

/// Problems with a caller-supplied advice category table. Reported when the
/// classifier is built, never while classifying.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid category pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Category table is empty")]
    EmptyTable,
}
