//! Error types for the MIDI wire protocol.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `position` is 1-based and counts the parameters of the function that was called.
    #[error("argument {position} out of range: {value} not in {min}..={max}")]
    ArgumentOutOfRange {
        position: u8,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("SysEx buffer does not start with 0xF0")]
    MissingSysExStart,

    #[error("SysEx buffer does not end with 0xF7")]
    MissingSysExEnd,

    #[error("message does not start with a status byte")]
    MissingStatus,

    #[error("channel {0} out of range")]
    ChannelOutOfRange(u8),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Shift an argument position, used when a public function forwards to an inner one
    /// whose parameter list differs.
    pub(crate) fn renumber(self, from: u8, to: u8) -> Self {
        match self {
            Error::ArgumentOutOfRange {
                position,
                value,
                min,
                max,
            } if position == from => Error::ArgumentOutOfRange {
                position: to,
                value,
                min,
                max,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reject `value` unless it fits in 7 bits.
#[inline]
pub(crate) fn check_7bit(position: u8, value: u8) -> Result<u8> {
    if value > crate::status::DATA_MAX {
        return Err(Error::ArgumentOutOfRange {
            position,
            value: value as i32,
            min: 0,
            max: crate::status::DATA_MAX as i32,
        });
    }
    Ok(value)
}

/// Reject `value` unless it fits in 14 bits.
#[inline]
pub(crate) fn check_14bit(position: u8, value: u16) -> Result<u16> {
    if value > crate::status::FOURTEEN_BIT_MAX {
        return Err(Error::ArgumentOutOfRange {
            position,
            value: value as i32,
            min: 0,
            max: crate::status::FOURTEEN_BIT_MAX as i32,
        });
    }
    Ok(value)
}
