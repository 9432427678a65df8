//! services/client/src/error.rs
//!
//! Defines the primary error type for the portfolio client.

use crate::config::ConfigError;
use portfolio_core::ports::PortError;
use portfolio_core::ranking::RankingError;

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A reorder request referenced a slot outside the working list.
    #[error("Ranking error: {0}")]
    Ranking(#[from] RankingError),

    /// One or more rank updates in a save batch failed. Already-applied updates stay applied.
    #[error("Failed to save ranks for projects {failed:?}")]
    RankSave { failed: Vec<i64> },

    /// Represents a standard Input/Output error (e.g., reading stdin).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
