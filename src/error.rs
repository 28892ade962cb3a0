// ⚠️ Error types - one enum for the whole seeding pipeline
// Plan validation, gateway calls, persistence and fixture consumption

use thiserror::Error;

/// Result type alias for seeding operations
pub type Result<T> = std::result::Result<T, SeedsError>;

#[derive(Error, Debug)]
pub enum SeedsError {
    /// Plan rejected before any gateway call was made
    #[error("invalid seeds plan: {0}")]
    InvalidPlan(String),

    /// Gateway answered with a non-success status
    #[error("gateway call '{operation}' failed with status {status}: {message}")]
    Gateway {
        operation: String,
        status: u16,
        message: String,
    },

    /// Connection, timeout or response decoding failure
    #[error("gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Operations were planned on an account that ended up with no card
    #[error("account '{account_id}' has no card to make operations with")]
    MissingCard { account_id: String },

    /// Load requested for a scenario that was never built
    #[error("missing fixture data: scenario '{scenario}' has not been built")]
    NotBuilt { scenario: String },

    /// Every seeded user has already been handed out
    #[error("fixture data exhausted: all {total} users of scenario '{scenario}' were consumed")]
    Exhausted { scenario: String, total: usize },

    #[error("user index {index} out of range (scenario has {total} users)")]
    UserIndexOutOfRange { index: usize, total: usize },

    #[error("unknown seeds scenario: {0}")]
    UnknownScenario(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("export error: {0}")]
    Export(#[from] csv::Error),
}

impl SeedsError {
    /// True for the two "fixture data not available" cases
    pub fn is_missing_fixtures(&self) -> bool {
        matches!(self, SeedsError::NotBuilt { .. } | SeedsError::Exhausted { .. })
    }

    pub(crate) fn gateway(operation: &str, status: u16, message: impl Into<String>) -> Self {
        SeedsError::Gateway {
            operation: operation.to_string(),
            status,
            message: message.into(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
