//! Validated sends bound to a transmit sink.
//!
//! Every send validates its arguments first and hands the finished message to the
//! sink in one locked call, so messages from different threads never interleave on
//! the wire. Composite NRPN sequences count as one message.

use crate::error::{Error, Result};
use crate::transport::MidiSink;
use midiwire_core::encode::{self, WireMessage};
use midiwire_core::{status, Channel, ChannelState, MidiEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Send half of an engine. Clone is cheap (Arc internally); clones share the sink and
/// the channel configuration.
///
/// Channel arguments accept a [`Channel`] or `None`, which selects the configured
/// send channel.
pub struct MidiOutput<S> {
    sink: Arc<Mutex<S>>,
    channels: Arc<ChannelState>,
}

impl<S> Clone for MidiOutput<S> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            channels: Arc::clone(&self.channels),
        }
    }
}

impl<S: MidiSink> MidiOutput<S> {
    pub fn new(sink: S) -> Self {
        Self::with_channels(sink, Arc::new(ChannelState::default()))
    }

    pub fn with_channels(sink: S, channels: Arc<ChannelState>) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            channels,
        }
    }

    #[inline]
    pub fn channels(&self) -> &Arc<ChannelState> {
        &self.channels
    }

    /// Run `f` with exclusive access to the sink. No send can reach the wire meanwhile.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut sink = self.sink.lock();
        f(&mut *sink)
    }

    #[inline]
    fn resolve(&self, channel: impl Into<Option<Channel>>) -> Channel {
        channel
            .into()
            .unwrap_or_else(|| self.channels.send_channel())
    }

    pub(crate) fn transmit(&self, bytes: &[u8]) -> Result<()> {
        self.sink.lock().transmit(bytes).map_err(|err| {
            debug!(error = %err, len = bytes.len(), "sink rejected MIDI message");
            Error::Io(err)
        })
    }

    fn send_wire(&self, wire: midiwire_core::Result<WireMessage>) -> Result<()> {
        match wire {
            Ok(bytes) => self.transmit(&bytes),
            Err(err) => {
                debug!(error = %err, "MIDI send rejected");
                Err(err.into())
            }
        }
    }

    // ==================== Channel Voice ====================

    pub fn send_note_on(
        &self,
        note: u8,
        velocity: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::note_on(note, velocity, self.resolve(channel)))
    }

    pub fn send_note_off(
        &self,
        note: u8,
        velocity: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::note_off(note, velocity, self.resolve(channel)))
    }

    pub fn send_poly_aftertouch(
        &self,
        note: u8,
        pressure: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::poly_aftertouch(note, pressure, self.resolve(channel)))
    }

    pub fn send_mono_aftertouch(
        &self,
        pressure: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::mono_aftertouch(pressure, self.resolve(channel)))
    }

    pub fn send_cc(
        &self,
        control: u8,
        value: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::control_change(control, value, self.resolve(channel)))
    }

    pub fn send_program_change(
        &self,
        program: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::program_change(program, self.resolve(channel)))
    }

    /// `value`: signed 14-bit (-8192 to 8191), 0 is center.
    pub fn send_pitch_bend(&self, value: i16, channel: impl Into<Option<Channel>>) -> Result<()> {
        self.send_wire(encode::pitch_bend(value, self.resolve(channel)))
    }

    // ==================== NRPN ====================

    /// 14-bit parameter and value as CC 99, 98, 6, 38 in one write.
    pub fn send_hires_nrpn(
        &self,
        parameter: u16,
        value: u16,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::hires_nrpn(parameter, value, self.resolve(channel)))
    }

    pub fn send_hires_nrpn_split(
        &self,
        parameter_msb: u8,
        parameter_lsb: u8,
        value: u16,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::hires_nrpn_split(
            parameter_msb,
            parameter_lsb,
            value,
            self.resolve(channel),
        ))
    }

    pub fn send_hires_nrpn_parts(
        &self,
        parameter_msb: u8,
        parameter_lsb: u8,
        value_msb: u8,
        value_lsb: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::hires_nrpn_parts(
            parameter_msb,
            parameter_lsb,
            value_msb,
            value_lsb,
            self.resolve(channel),
        ))
    }

    /// 14-bit parameter, 7-bit value as CC 99, 98, 6 in one write.
    pub fn send_lores_nrpn(
        &self,
        parameter: u16,
        value: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::lores_nrpn(parameter, value, self.resolve(channel)))
    }

    pub fn send_lores_nrpn_parts(
        &self,
        parameter_msb: u8,
        parameter_lsb: u8,
        value: u8,
        channel: impl Into<Option<Channel>>,
    ) -> Result<()> {
        self.send_wire(encode::lores_nrpn_parts(
            parameter_msb,
            parameter_lsb,
            value,
            self.resolve(channel),
        ))
    }

    // ==================== System Common ====================

    /// `bytes` must be framed by 0xF0 and 0xF7.
    pub fn send_sysex(&self, bytes: &[u8]) -> Result<()> {
        self.send_wire(encode::sysex(bytes))
    }

    pub fn send_timecode_quarter_frame(&self, quarter_frame: u8) -> Result<()> {
        self.send_wire(encode::timecode_quarter_frame(quarter_frame))
    }

    /// `beats`: 14-bit position in sixteenth notes.
    pub fn send_song_position(&self, beats: u16) -> Result<()> {
        self.send_wire(encode::song_position(beats))
    }

    pub fn send_song_select(&self, song: u8) -> Result<()> {
        self.send_wire(encode::song_select(song))
    }

    pub fn send_tune_request(&self) -> Result<()> {
        self.transmit(&[status::TUNE_REQUEST])
    }

    // ==================== System Real-Time ====================

    pub fn send_clock_tick(&self) -> Result<()> {
        self.transmit(&[status::CLOCK_TICK])
    }

    pub fn send_start(&self) -> Result<()> {
        self.transmit(&[status::START])
    }

    pub fn send_continue(&self) -> Result<()> {
        self.transmit(&[status::CONTINUE])
    }

    pub fn send_stop(&self) -> Result<()> {
        self.transmit(&[status::STOP])
    }

    pub fn send_active_sense(&self) -> Result<()> {
        self.transmit(&[status::ACTIVE_SENSE])
    }

    pub fn send_reset(&self) -> Result<()> {
        self.transmit(&[status::SYSTEM_RESET])
    }

    // ==================== Generic ====================

    /// Validate and send any event on the channel it carries.
    pub fn send(&self, event: &MidiEvent) -> Result<()> {
        self.send_wire(encode::encode(event))
    }

    /// Send bytes as-is in one write. The caller is responsible for their validity.
    pub fn send_raw(&self, bytes: &[u8]) -> Result<()> {
        self.transmit(bytes)
    }
}
