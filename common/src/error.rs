use thiserror::Error;

/// The crate's error taxonomy. Only `ProtocolShape` is meant to surface to
/// an HTTP caller (as a 400); the rest are handled internally — `Config`
/// and `Resource` are fatal at startup, `Transient` and `Invariant` trigger
/// the documented fallback chain and are logged, never raised.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("transient remote error: {0}")]
    Transient(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("malformed request: {0}")]
    ProtocolShape(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type AppResult<T> = Result<T, AppError>;
