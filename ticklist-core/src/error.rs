//! Error types for Ticklist operations

use crate::catalog::CatalogError;
use crate::tools::RegistryError;

/// Result type for Ticklist operations
pub type Result<T> = std::result::Result<T, TicklistError>;

/// Error types for the Ticklist crate
#[derive(Debug, thiserror::Error)]
pub enum TicklistError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Catalog operation failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Transport-level failure (read, write, framing)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool registration failed
    #[error("Tool registry error: {0}")]
    Registry(#[from] RegistryError),
}
