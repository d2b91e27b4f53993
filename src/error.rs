use thiserror::Error;

/// Main error type for the claimer
#[derive(Error, Debug)]
pub enum JagerError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Address parsing error: {0}")]
    AddressParsing(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // Node errors
    #[error("Cannot reach node at {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("Remote read failed in {op}: {reason}")]
    RemoteRead { op: &'static str, reason: String },

    #[error("Cannot decode {op} response: {reason}")]
    Decode { op: &'static str, reason: String },

    // Transaction errors
    #[error("No signing key configured; {op} needs a private key")]
    NoCredential { op: &'static str },

    #[error("Transaction submission failed in {op}: {reason}")]
    Submission { op: &'static str, reason: String },

    #[error("Transaction {tx_hash} not confirmed after {waited_secs}s")]
    ConfirmationTimeout { tx_hash: String, waited_secs: u64 },

    // Crypto/signing errors
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Signature error: {0}")]
    Signature(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl JagerError {
    /// Whether the polling loop must stop on this error.
    ///
    /// Node, decode and transaction failures are per-tick; the next tick
    /// re-reads state.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::AddressParsing(_)
                | Self::Validation(_)
                | Self::Connection { .. }
                | Self::NoCredential { .. }
                | Self::Wallet(_)
                | Self::Signature(_)
        )
    }

    pub(crate) fn remote_read(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self::RemoteRead {
            op,
            reason: err.to_string(),
        }
    }

    pub(crate) fn decode(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            op,
            reason: err.to_string(),
        }
    }
}

/// Result type alias for JagerError
pub type Result<T> = std::result::Result<T, JagerError>;
