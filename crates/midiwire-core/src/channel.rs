//! MIDI channels and the per-engine channel configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// One of the 16 MIDI channels, or `Any` (no filtering).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    Ch1 = 0,
    Ch2 = 1,
    Ch3 = 2,
    Ch4 = 3,
    Ch5 = 4,
    Ch6 = 5,
    Ch7 = 6,
    Ch8 = 7,
    Ch9 = 8,
    Ch10 = 9,
    Ch11 = 10,
    Ch12 = 11,
    Ch13 = 12,
    Ch14 = 13,
    Ch15 = 14,
    Ch16 = 15,
    Any = 16,
}

impl Channel {
    const ALL: [Channel; 17] = [
        Channel::Ch1,
        Channel::Ch2,
        Channel::Ch3,
        Channel::Ch4,
        Channel::Ch5,
        Channel::Ch6,
        Channel::Ch7,
        Channel::Ch8,
        Channel::Ch9,
        Channel::Ch10,
        Channel::Ch11,
        Channel::Ch12,
        Channel::Ch13,
        Channel::Ch14,
        Channel::Ch15,
        Channel::Ch16,
        Channel::Any,
    ];

    /// `0..=15` map to Ch1..Ch16, `16` maps to `Any`.
    #[inline]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Channel encoded in the low nibble of a status byte.
    #[inline]
    pub fn from_status(status: u8) -> Self {
        Self::ALL[(status & 0x0F) as usize]
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_any(self) -> bool {
        self == Channel::Any
    }

    /// True if a message on `channel` passes this channel used as a receive filter.
    #[inline]
    pub fn accepts(self, channel: Channel) -> bool {
        self.is_any() || self == channel
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::ChannelOutOfRange(value))
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> Self {
        channel as u8
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Any => write!(f, "any"),
            ch => write!(f, "{}", ch.as_u8() + 1),
        }
    }
}

const NO_SOURCE: u8 = u8::MAX;

/// Send channel, receive filter and last observed source channel of one engine.
///
/// The decoder is the only writer of the last source channel; readers see the
/// most recent store. Setters reject invalid values and leave state untouched.
#[derive(Debug)]
pub struct ChannelState {
    send: AtomicU8,
    receive: AtomicU8,
    last_source: AtomicU8,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::from_parts(Channel::Ch1, Channel::Any)
    }
}

impl ChannelState {
    /// `send` must be a concrete channel; `Any` has no wire encoding.
    pub fn new(send: Channel, receive: Channel) -> Result<Self> {
        if send.is_any() {
            return Err(Error::ChannelOutOfRange(send.as_u8()));
        }
        Ok(Self::from_parts(send, receive))
    }

    fn from_parts(send: Channel, receive: Channel) -> Self {
        let last_source = if receive.is_any() {
            NO_SOURCE
        } else {
            receive.as_u8()
        };
        Self {
            send: AtomicU8::new(send.as_u8()),
            receive: AtomicU8::new(receive.as_u8()),
            last_source: AtomicU8::new(last_source),
        }
    }

    #[inline]
    pub fn send_channel(&self) -> Channel {
        Channel::from_status(self.send.load(Ordering::Acquire))
    }

    /// Channel used by sends that don't name one. `Any` has no wire encoding and is rejected.
    pub fn set_send_channel(&self, channel: u8) -> Result<()> {
        match Channel::from_u8(channel) {
            Some(ch) if !ch.is_any() => {
                self.send.store(ch.as_u8(), Ordering::Release);
                Ok(())
            }
            _ => Err(Error::ChannelOutOfRange(channel)),
        }
    }

    #[inline]
    pub fn receive_channel(&self) -> Channel {
        Channel::from_u8(self.receive.load(Ordering::Acquire)).unwrap_or(Channel::Any)
    }

    /// Filter for incoming channel messages. A concrete channel is also recorded as the
    /// last source channel.
    pub fn set_receive_channel(&self, channel: u8) -> Result<()> {
        let ch = Channel::try_from(channel)?;
        self.receive.store(ch.as_u8(), Ordering::Release);
        if !ch.is_any() {
            self.last_source.store(ch.as_u8(), Ordering::Release);
        }
        Ok(())
    }

    /// Channel of the most recent accepted channel message, if any arrived yet.
    #[inline]
    pub fn last_source_channel(&self) -> Option<Channel> {
        match self.last_source.load(Ordering::Acquire) {
            NO_SOURCE => None,
            raw => Channel::from_u8(raw),
        }
    }

    #[inline]
    pub(crate) fn record_source(&self, channel: Channel) {
        self.last_source.store(channel.as_u8(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_numbering() {
        assert_eq!(Channel::from_u8(0), Some(Channel::Ch1));
        assert_eq!(Channel::from_u8(15), Some(Channel::Ch16));
        assert_eq!(Channel::from_u8(16), Some(Channel::Any));
        assert_eq!(Channel::from_u8(17), None);
        assert_eq!(Channel::from_status(0x93), Channel::Ch4);
        assert_eq!(Channel::Ch10.to_string(), "10");
        assert_eq!(Channel::Any.to_string(), "any");
    }

    #[test]
    fn test_filter_accepts() {
        assert!(Channel::Any.accepts(Channel::Ch3));
        assert!(Channel::Ch3.accepts(Channel::Ch3));
        assert!(!Channel::Ch5.accepts(Channel::Ch3));
    }

    #[test]
    fn test_defaults() {
        let state = ChannelState::default();
        assert_eq!(state.send_channel(), Channel::Ch1);
        assert_eq!(state.receive_channel(), Channel::Any);
        assert_eq!(state.last_source_channel(), None);
    }

    #[test]
    fn test_new_rejects_any_send_channel() {
        assert!(matches!(
            ChannelState::new(Channel::Any, Channel::Any),
            Err(Error::ChannelOutOfRange(16))
        ));

        let state = ChannelState::new(Channel::Ch7, Channel::Ch2).unwrap();
        assert_eq!(state.send_channel(), Channel::Ch7);
        assert_eq!(state.receive_channel(), Channel::Ch2);
        assert_eq!(state.last_source_channel(), Some(Channel::Ch2));
    }

    #[test]
    fn test_send_channel_validation() {
        let state = ChannelState::default();
        assert!(state.set_send_channel(9).is_ok());
        assert_eq!(state.send_channel(), Channel::Ch10);

        assert_eq!(state.set_send_channel(16), Err(Error::ChannelOutOfRange(16)));
        assert_eq!(state.set_send_channel(200), Err(Error::ChannelOutOfRange(200)));
        assert_eq!(state.send_channel(), Channel::Ch10);
    }

    #[test]
    fn test_receive_channel_validation() {
        let state = ChannelState::default();
        assert!(state.set_receive_channel(4).is_ok());
        assert_eq!(state.receive_channel(), Channel::Ch5);
        assert_eq!(state.last_source_channel(), Some(Channel::Ch5));

        assert!(state.set_receive_channel(16).is_ok());
        assert_eq!(state.receive_channel(), Channel::Any);
        assert_eq!(state.last_source_channel(), Some(Channel::Ch5));

        assert_eq!(state.set_receive_channel(17), Err(Error::ChannelOutOfRange(17)));
        assert_eq!(state.receive_channel(), Channel::Any);
    }
}
