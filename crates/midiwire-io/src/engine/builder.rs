//! MidiEngine builder.

use std::sync::Arc;

use midiwire_core::{Channel, ChannelState, Decoder};
use tracing::debug;

use super::MidiEngine;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::output::MidiOutput;
use crate::transport::MidiSink;

pub struct MidiEngineBuilder<S> {
    sink: S,
    config: EngineConfig,
}

impl<S: MidiSink> MidiEngineBuilder<S> {
    pub(super) fn new(sink: S) -> Self {
        Self {
            sink,
            config: EngineConfig::default(),
        }
    }

    /// Replace every setting at once.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn send_channel(mut self, channel: Channel) -> Self {
        self.config.send_channel = channel;
        self
    }

    pub fn receive_channel(mut self, channel: Channel) -> Self {
        self.config.receive_channel = channel;
        self
    }

    pub fn sysex_capacity(mut self, capacity: usize) -> Self {
        self.config.sysex_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<MidiEngine<S>> {
        self.config.validate()?;

        let channels = Arc::new(ChannelState::new(
            self.config.send_channel,
            self.config.receive_channel,
        )?);
        let decoder = Decoder::with_capacity(Arc::clone(&channels), self.config.sysex_capacity);
        let output = MidiOutput::with_channels(self.sink, channels);

        debug!(
            send = %self.config.send_channel,
            receive = %self.config.receive_channel,
            sysex_capacity = self.config.sysex_capacity,
            "MIDI engine built"
        );

        Ok(MidiEngine { output, decoder })
    }
}
