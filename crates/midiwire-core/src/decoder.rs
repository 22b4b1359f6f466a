//! Byte-at-a-time MIDI receive state machine.
//!
//! The decoder is idle until a status byte arrives, then either dispatches at once
//! (zero-length system messages), collects a fixed number of data bytes, or
//! accumulates a SysEx message until 0xF7. Each call to [`Decoder::feed`] decides
//! on its own whether a message completed, so bytes may be delivered singly or in
//! batches with identical results.
//!
//! Malformed input never errors: stray data bytes are dropped, and a status byte
//! that interrupts an incomplete message starts a new one. System real-time bytes
//! are dispatched immediately without disturbing a message in progress.

use crate::channel::{Channel, ChannelState};
use crate::event::MidiEvent;
use crate::status::{self, Command};
use std::sync::Arc;
use tracing::{trace, warn};

/// SysEx accumulation limit, framing bytes included.
pub const DEFAULT_SYSEX_CAPACITY: usize = 256;

/// Output of a decoding step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    Event(MidiEvent),
    /// A SysEx message reached the buffer capacity without a terminator and was dropped.
    SysExDropped { discarded: usize },
}

impl Decoded {
    pub fn into_event(self) -> Option<MidiEvent> {
        match self {
            Decoded::Event(event) => Some(event),
            Decoded::SysExDropped { .. } => None,
        }
    }
}

/// Fixed-length message awaiting its data bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Voice(Command, Channel),
    TimecodeQuarterFrame,
    SongPosition,
    SongSelect,
}

impl Pending {
    fn data_len(self) -> u8 {
        match self {
            Pending::Voice(command, _) => command.data_len(),
            Pending::SongPosition => 2,
            Pending::TimecodeQuarterFrame | Pending::SongSelect => 1,
        }
    }

    fn build(self, data: [u8; 2]) -> MidiEvent {
        let [first, second] = data;
        match self {
            Pending::Voice(command, channel) => match command {
                Command::NoteOff => MidiEvent::note_off(channel, first, second),
                Command::NoteOn => MidiEvent::note_on(channel, first, second),
                Command::PolyAftertouch => MidiEvent::poly_aftertouch(channel, first, second),
                Command::ControlChange => MidiEvent::control_change(channel, first, second),
                Command::ProgramChange => MidiEvent::program_change(channel, first),
                Command::MonoAftertouch => MidiEvent::mono_aftertouch(channel, first),
                Command::PitchBend => MidiEvent::pitch_bend(
                    channel,
                    status::join_14bit(first, second) as i16 - status::PITCH_BEND_CENTER,
                ),
            },
            Pending::TimecodeQuarterFrame => MidiEvent::TimecodeQuarterFrame(first),
            Pending::SongPosition => MidiEvent::SongPosition(status::join_14bit(first, second)),
            Pending::SongSelect => MidiEvent::SongSelect(first),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Data {
        pending: Pending,
        data: [u8; 2],
        received: u8,
    },
    SysEx,
}

pub struct Decoder {
    state: State,
    sysex: Vec<u8>,
    sysex_capacity: usize,
    channels: Arc<ChannelState>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Arc::new(ChannelState::default()))
    }
}

impl Decoder {
    pub fn new(channels: Arc<ChannelState>) -> Self {
        Self::with_capacity(channels, DEFAULT_SYSEX_CAPACITY)
    }

    /// `sysex_capacity` is clamped to at least 2 bytes (an empty framed message).
    pub fn with_capacity(channels: Arc<ChannelState>, sysex_capacity: usize) -> Self {
        let sysex_capacity = sysex_capacity.max(2);
        Self {
            state: State::Idle,
            sysex: Vec::with_capacity(sysex_capacity),
            sysex_capacity,
            channels,
        }
    }

    pub fn channels(&self) -> &Arc<ChannelState> {
        &self.channels
    }

    #[inline]
    pub fn sysex_capacity(&self) -> usize {
        self.sysex_capacity
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Drop any partial message and return to idle.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.sysex.clear();
    }

    /// Consume one byte. Returns the message it completed, if any.
    pub fn feed(&mut self, byte: u8) -> Option<Decoded> {
        match self.state {
            State::SysEx => self.accumulate_sysex(byte),
            State::Idle if status::is_data(byte) => {
                trace!(byte, "discarding stray data byte");
                None
            }
            State::Idle => self.begin(byte),
            State::Data { .. } if status::is_realtime(byte) => self.begin(byte),
            // A status byte is never data, so the partial message is dropped instead of counted.
            State::Data { pending, .. } if status::is_status(byte) => {
                trace!(?pending, status = byte, "status byte interrupted incomplete message");
                self.state = State::Idle;
                self.begin(byte)
            }
            State::Data {
                pending,
                mut data,
                received,
            } => {
                data[received as usize] = byte;
                let received = received + 1;
                if received == pending.data_len() {
                    self.state = State::Idle;
                    Some(Decoded::Event(self.dispatch(pending, data)))
                } else {
                    self.state = State::Data {
                        pending,
                        data,
                        received,
                    };
                    None
                }
            }
        }
    }

    /// Decode a batch of bytes lazily, in arrival order.
    pub fn feed_slice<'a>(&'a mut self, bytes: &'a [u8]) -> impl Iterator<Item = Decoded> + 'a {
        bytes.iter().filter_map(move |&byte| self.feed(byte))
    }

    fn begin(&mut self, status_byte: u8) -> Option<Decoded> {
        if let Some(command) = Command::from_nibble(status_byte >> 4) {
            let channel = Channel::from_status(status_byte);
            if self.channels.receive_channel().accepts(channel) {
                self.await_data(Pending::Voice(command, channel));
            } else {
                trace!(%channel, "message filtered by receive channel");
            }
            return None;
        }

        let event = match status_byte {
            status::TIMECODE_QUARTER_FRAME => {
                self.await_data(Pending::TimecodeQuarterFrame);
                return None;
            }
            status::SONG_POSITION_POINTER => {
                self.await_data(Pending::SongPosition);
                return None;
            }
            status::SONG_SELECT => {
                self.await_data(Pending::SongSelect);
                return None;
            }
            status::SYSEX_BEGIN => {
                self.sysex.clear();
                self.sysex.push(status_byte);
                self.state = State::SysEx;
                return None;
            }
            status::SYSEX_END => {
                trace!("discarding SysEx end outside of SysEx");
                return None;
            }
            status::TUNE_REQUEST => MidiEvent::TuneRequest,
            status::CLOCK_TICK => MidiEvent::ClockTick,
            status::START => MidiEvent::Start,
            status::CONTINUE => MidiEvent::Continue,
            status::STOP => MidiEvent::Stop,
            status::ACTIVE_SENSE => MidiEvent::ActiveSense,
            status::SYSTEM_RESET => MidiEvent::SystemReset,
            undefined => MidiEvent::Unknown(vec![undefined]),
        };
        Some(Decoded::Event(event))
    }

    #[inline]
    fn await_data(&mut self, pending: Pending) {
        self.state = State::Data {
            pending,
            data: [0; 2],
            received: 0,
        };
    }

    fn dispatch(&self, pending: Pending, data: [u8; 2]) -> MidiEvent {
        if let Pending::Voice(_, channel) = pending {
            self.channels.record_source(channel);
        }
        pending.build(data)
    }

    fn accumulate_sysex(&mut self, byte: u8) -> Option<Decoded> {
        self.sysex.push(byte);

        if byte == status::SYSEX_END {
            let event = MidiEvent::SysEx(self.sysex.clone());
            self.sysex.clear();
            self.state = State::Idle;
            return Some(Decoded::Event(event));
        }

        if self.sysex.len() >= self.sysex_capacity {
            let discarded = self.sysex.len();
            warn!(
                capacity = self.sysex_capacity,
                "SysEx exceeded buffer capacity, dropping"
            );
            self.sysex.clear();
            self.state = State::Idle;
            return Some(Decoded::SysExDropped { discarded });
        }

        None
    }
}
