//! One MIDI connection: send path, receive state machine and channel configuration.
//!
//! ## Quick Start
//!
//! ```
//! use midiwire_io::{Channel, MidiEngine, MidiEvent};
//!
//! let engine = MidiEngine::builder(Vec::<u8>::new())
//!     .receive_channel(Channel::Ch5)
//!     .build()?;
//!
//! engine.send_note_on(60, 100, None)?;
//! engine.send_hires_nrpn(300, 8000, Channel::Ch2)?;
//!
//! // Hand the receive half to whatever delivers bytes
//! let (output, mut input) = engine.split(Vec::<MidiEvent>::new());
//! input.receive(&[0x94, 60, 100]);
//! assert_eq!(input.handler().len(), 1);
//! # let _ = output;
//! # Ok::<(), midiwire_io::Error>(())
//! ```

mod builder;

pub use builder::MidiEngineBuilder;

use std::ops::Deref;
use std::sync::Arc;

use midiwire_core::{Channel, ChannelState, Decoded, Decoder};

use crate::clock::ClockGenerator;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::handler::MidiHandler;
use crate::input::MidiInput;
use crate::output::MidiOutput;
use crate::transport::MidiSink;

/// A protocol engine over one transmit sink.
///
/// Derefs to [`MidiOutput`] for sends. The decoder is driven through
/// [`feed`](Self::feed), or moved to a receive thread with [`split`](Self::split).
pub struct MidiEngine<S> {
    output: MidiOutput<S>,
    decoder: Decoder,
}

impl<S: MidiSink> MidiEngine<S> {
    pub fn builder(sink: S) -> MidiEngineBuilder<S> {
        MidiEngineBuilder::new(sink)
    }

    pub fn new(sink: S) -> Self {
        let channels = Arc::new(ChannelState::default());
        Self {
            decoder: Decoder::new(Arc::clone(&channels)),
            output: MidiOutput::with_channels(sink, channels),
        }
    }

    /// Send half. Clone it to send from other threads.
    #[inline]
    pub fn output(&self) -> &MidiOutput<S> {
        &self.output
    }

    #[inline]
    pub fn channels(&self) -> &Arc<ChannelState> {
        self.output.channels()
    }

    /// Current settings.
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            send_channel: self.send_channel(),
            receive_channel: self.receive_channel(),
            sysex_capacity: self.decoder.sysex_capacity(),
        }
    }

    // ==================== Channel State ====================

    pub fn send_channel(&self) -> Channel {
        self.channels().send_channel()
    }

    /// `channel`: 0-15. Any (16) and larger values are rejected.
    pub fn set_send_channel(&self, channel: u8) -> Result<()> {
        Ok(self.channels().set_send_channel(channel)?)
    }

    pub fn receive_channel(&self) -> Channel {
        self.channels().receive_channel()
    }

    /// `channel`: 0-15, or 16 for Any.
    pub fn set_receive_channel(&self, channel: u8) -> Result<()> {
        Ok(self.channels().set_receive_channel(channel)?)
    }

    pub fn last_source_channel(&self) -> Option<Channel> {
        self.channels().last_source_channel()
    }

    // ==================== Receive ====================

    pub fn feed(&mut self, byte: u8) -> Option<Decoded> {
        self.decoder.feed(byte)
    }

    pub fn feed_slice<'a>(&'a mut self, bytes: &'a [u8]) -> impl Iterator<Item = Decoded> + 'a {
        self.decoder.feed_slice(bytes)
    }

    /// Separate the send half from the receive half, binding `handler` to the latter.
    pub fn split<H: MidiHandler>(self, handler: H) -> (MidiOutput<S>, MidiInput<H>) {
        (self.output, MidiInput::new(self.decoder, handler))
    }
}

impl<S: MidiSink + 'static> MidiEngine<S> {
    /// A clock generator sending through this engine's sink.
    pub fn clock(&self) -> Result<ClockGenerator<S>> {
        ClockGenerator::new(self.output.clone())
    }
}

impl<S> Deref for MidiEngine<S> {
    type Target = MidiOutput<S>;

    fn deref(&self) -> &MidiOutput<S> {
        &self.output
    }
}
