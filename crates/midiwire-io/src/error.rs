//! Error types for the MIDI engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected argument or framing, nothing was transmitted.
    #[error(transparent)]
    Protocol(#[from] midiwire_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// The protocol error, if this send was rejected before reaching the sink.
    pub fn as_protocol(&self) -> Option<&midiwire_core::Error> {
        match self {
            Error::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
