//! Centralized error type for the midiwire umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Protocol(#[from] midiwire_core::Error),

    #[cfg(feature = "io")]
    #[error(transparent)]
    Engine(#[from] midiwire_io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
