//! MIDI 1.0 events as carried on the wire.

use crate::channel::Channel;
use crate::status::{self, Command};
use serde::{Deserialize, Serialize};

/// One complete MIDI message.
///
/// Channel messages carry the channel they were received on (or are to be sent on).
/// Pitch bend is de-biased: `0` is center, range `-8192..=8191`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MidiEvent {
    NoteOff {
        channel: Channel,
        note: u8,
        velocity: u8,
    },
    NoteOn {
        channel: Channel,
        note: u8,
        velocity: u8,
    },
    PolyAftertouch {
        channel: Channel,
        note: u8,
        pressure: u8,
    },
    ControlChange {
        channel: Channel,
        control: u8,
        value: u8,
    },
    ProgramChange {
        channel: Channel,
        program: u8,
    },
    MonoAftertouch {
        channel: Channel,
        pressure: u8,
    },
    PitchBend {
        channel: Channel,
        value: i16,
    },
    TimecodeQuarterFrame(u8),
    SongPosition(u16),
    SongSelect(u8),
    TuneRequest,
    ClockTick,
    Start,
    Continue,
    Stop,
    ActiveSense,
    SystemReset,
    /// Complete SysEx message including the 0xF0/0xF7 framing bytes.
    SysEx(Vec<u8>),
    /// Undefined status byte, preserved raw.
    Unknown(Vec<u8>),
}

impl MidiEvent {
    #[inline]
    pub fn note_on(channel: Channel, note: u8, velocity: u8) -> Self {
        MidiEvent::NoteOn {
            channel,
            note,
            velocity,
        }
    }

    #[inline]
    pub fn note_off(channel: Channel, note: u8, velocity: u8) -> Self {
        MidiEvent::NoteOff {
            channel,
            note,
            velocity,
        }
    }

    #[inline]
    pub fn control_change(channel: Channel, control: u8, value: u8) -> Self {
        MidiEvent::ControlChange {
            channel,
            control,
            value,
        }
    }

    #[inline]
    pub fn program_change(channel: Channel, program: u8) -> Self {
        MidiEvent::ProgramChange { channel, program }
    }

    #[inline]
    pub fn pitch_bend(channel: Channel, value: i16) -> Self {
        MidiEvent::PitchBend { channel, value }
    }

    #[inline]
    pub fn poly_aftertouch(channel: Channel, note: u8, pressure: u8) -> Self {
        MidiEvent::PolyAftertouch {
            channel,
            note,
            pressure,
        }
    }

    #[inline]
    pub fn mono_aftertouch(channel: Channel, pressure: u8) -> Self {
        MidiEvent::MonoAftertouch { channel, pressure }
    }

    /// Channel voice command, `None` for system messages.
    pub fn command(&self) -> Option<Command> {
        match self {
            MidiEvent::NoteOff { .. } => Some(Command::NoteOff),
            MidiEvent::NoteOn { .. } => Some(Command::NoteOn),
            MidiEvent::PolyAftertouch { .. } => Some(Command::PolyAftertouch),
            MidiEvent::ControlChange { .. } => Some(Command::ControlChange),
            MidiEvent::ProgramChange { .. } => Some(Command::ProgramChange),
            MidiEvent::MonoAftertouch { .. } => Some(Command::MonoAftertouch),
            MidiEvent::PitchBend { .. } => Some(Command::PitchBend),
            _ => None,
        }
    }

    /// Status byte this event is sent with. SysEx and unknown events report their first byte.
    pub fn status(&self) -> u8 {
        match self {
            MidiEvent::TimecodeQuarterFrame(_) => status::TIMECODE_QUARTER_FRAME,
            MidiEvent::SongPosition(_) => status::SONG_POSITION_POINTER,
            MidiEvent::SongSelect(_) => status::SONG_SELECT,
            MidiEvent::TuneRequest => status::TUNE_REQUEST,
            MidiEvent::ClockTick => status::CLOCK_TICK,
            MidiEvent::Start => status::START,
            MidiEvent::Continue => status::CONTINUE,
            MidiEvent::Stop => status::STOP,
            MidiEvent::ActiveSense => status::ACTIVE_SENSE,
            MidiEvent::SystemReset => status::SYSTEM_RESET,
            MidiEvent::SysEx(bytes) | MidiEvent::Unknown(bytes) => {
                bytes.first().copied().unwrap_or(status::SYSEX_BEGIN)
            }
            channel_msg => match (channel_msg.command(), channel_msg.channel()) {
                (Some(cmd), Some(ch)) => cmd.status(ch.as_u8()),
                _ => 0,
            },
        }
    }

    #[inline]
    pub fn channel(&self) -> Option<Channel> {
        match *self {
            MidiEvent::NoteOff { channel, .. }
            | MidiEvent::NoteOn { channel, .. }
            | MidiEvent::PolyAftertouch { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::ProgramChange { channel, .. }
            | MidiEvent::MonoAftertouch { channel, .. }
            | MidiEvent::PitchBend { channel, .. } => Some(channel),
            _ => None,
        }
    }

    #[inline]
    pub fn is_channel_message(&self) -> bool {
        self.command().is_some()
    }

    /// System real-time messages (clock, start, continue, stop, active sense, reset).
    #[inline]
    pub fn is_realtime(&self) -> bool {
        matches!(
            self,
            MidiEvent::ClockTick
                | MidiEvent::Start
                | MidiEvent::Continue
                | MidiEvent::Stop
                | MidiEvent::ActiveSense
                | MidiEvent::SystemReset
        )
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self, MidiEvent::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// Note off, or note on with velocity 0.
    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(
            self,
            MidiEvent::NoteOff { .. } | MidiEvent::NoteOn { velocity: 0, .. }
        )
    }

    #[inline]
    pub fn note(&self) -> Option<u8> {
        match *self {
            MidiEvent::NoteOn { note, .. }
            | MidiEvent::NoteOff { note, .. }
            | MidiEvent::PolyAftertouch { note, .. } => Some(note),
            _ => None,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Option<u8> {
        match *self {
            MidiEvent::NoteOn { velocity, .. } | MidiEvent::NoteOff { velocity, .. } => {
                Some(velocity)
            }
            _ => None,
        }
    }
}
