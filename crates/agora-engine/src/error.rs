//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the drain cycle.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: agora_core::config::ConfigError,
    },

    /// Reading envelopes or writing responses failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Seeding or auditing the in-memory ledger failed.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: agora_ledger::LedgerError,
    },

    /// The decision-maker queue rejected an envelope.
    #[error("decision maker error: {source}")]
    DecisionMaker {
        /// The underlying queue error.
        #[from]
        source: agora_core::decision_maker::DecisionMakerError,
    },

    /// A response could not be serialized.
    #[error("serialization error: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The envelope producer task panicked or was cancelled.
    #[error("producer task failed: {source}")]
    Producer {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
