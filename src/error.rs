use thiserror::Error;

/// Failures a PIR participant can surface to its caller.
///
/// Shape mismatches between ciphertexts handed to the mux gadget inside a
/// single process are caller bugs and stay `assert!`s; everything that can
/// arrive from a peer or a config file goes through this enum.
#[derive(Debug, Error)]
pub enum PirError {
    /// Setup-time sizing failure, e.g. one record does not fit a plaintext.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Query or key material whose shape disagrees with the negotiated
    /// parameters. The server rejects instead of best-effort decoding.
    #[error("protocol shape mismatch: {0}")]
    Protocol(String),

    /// A wire blob whose length is inconsistent with the expected layout.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// Network exchange failed. Retry policy lives with the driver; a retry
    /// must build a fresh query since queries are single use.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<Box<bincode::ErrorKind>> for PirError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        PirError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PirError>;
