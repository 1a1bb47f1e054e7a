//! Error types for the agent runtime

use thiserror::Error;

/// Errors that can occur during agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    /// No adapter exists for the requested provider name
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The requested role name is not part of the team
    #[error("Unsupported role: {0}")]
    UnsupportedRole(String),

    /// The role registry has no entry for the role
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// The role-to-model table has no usable model for the role
    #[error("No model configured for role: {0}")]
    NoModelForRole(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider call error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors specific to provider API calls
#[derive(Debug, Error)]
pub enum ProviderError {
    /// API returned a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_connect() {
            ProviderError::Network(format!("Connection error: {}", err))
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
