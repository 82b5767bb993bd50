//! Error types for Herald

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Client already released: {0}")]
    AlreadyReleased(&'static str),

    #[error("Failed to release {resource}: {message}")]
    Release {
        resource: &'static str,
        message: String,
    },

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Short machine-readable name of the failure
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "InvalidConfiguration",
            Error::Serialization(_) => "SerializationError",
            Error::AlreadyReleased(_) => "AlreadyReleased",
            Error::Release { .. } => "ReleaseError",
            Error::Dispatch(_) => "DispatchError",
            Error::Io(_) => "IoError",
            Error::Other(_) => "InternalError",
        }
    }
}
