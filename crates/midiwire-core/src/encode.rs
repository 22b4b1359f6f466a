//! Validated serialization of MIDI events into wire bytes.
//!
//! Every function checks its arguments before producing any bytes. Argument errors
//! are numbered after the function's own parameter list (1-based); the channel is
//! always the last parameter and only fails when it is [`Channel::Any`].

use crate::channel::Channel;
use crate::error::{check_14bit, check_7bit, Error, Result};
use crate::event::MidiEvent;
use crate::status::{self, nrpn, Command};
use smallvec::{smallvec, SmallVec};

/// Serialized message. Inline storage fits the longest fixed sequence (a 4-part NRPN).
pub type WireMessage = SmallVec<[u8; 12]>;

#[inline]
fn voice_status(command: Command, channel: Channel) -> Result<u8> {
    if channel.is_any() {
        return Err(Error::ChannelOutOfRange(channel.as_u8()));
    }
    Ok(command.status(channel.as_u8()))
}

pub fn note_on(note: u8, velocity: u8, channel: Channel) -> Result<WireMessage> {
    let note = check_7bit(1, note)?;
    let velocity = check_7bit(2, velocity)?;
    Ok(smallvec![voice_status(Command::NoteOn, channel)?, note, velocity])
}

pub fn note_off(note: u8, velocity: u8, channel: Channel) -> Result<WireMessage> {
    let note = check_7bit(1, note)?;
    let velocity = check_7bit(2, velocity)?;
    Ok(smallvec![voice_status(Command::NoteOff, channel)?, note, velocity])
}

pub fn poly_aftertouch(note: u8, pressure: u8, channel: Channel) -> Result<WireMessage> {
    let note = check_7bit(1, note)?;
    let pressure = check_7bit(2, pressure)?;
    Ok(smallvec![
        voice_status(Command::PolyAftertouch, channel)?,
        note,
        pressure
    ])
}

pub fn mono_aftertouch(pressure: u8, channel: Channel) -> Result<WireMessage> {
    let pressure = check_7bit(1, pressure)?;
    Ok(smallvec![
        voice_status(Command::MonoAftertouch, channel)?,
        pressure
    ])
}

pub fn control_change(control: u8, value: u8, channel: Channel) -> Result<WireMessage> {
    let control = check_7bit(1, control)?;
    let value = check_7bit(2, value)?;
    Ok(smallvec![
        voice_status(Command::ControlChange, channel)?,
        control,
        value
    ])
}

pub fn program_change(program: u8, channel: Channel) -> Result<WireMessage> {
    let program = check_7bit(1, program)?;
    Ok(smallvec![
        voice_status(Command::ProgramChange, channel)?,
        program
    ])
}

/// `value` is signed around center: `-8192..=8191`.
pub fn pitch_bend(value: i16, channel: Channel) -> Result<WireMessage> {
    let min = -status::PITCH_BEND_CENTER;
    let max = status::PITCH_BEND_CENTER - 1;
    if !(min..=max).contains(&value) {
        return Err(Error::ArgumentOutOfRange {
            position: 1,
            value: value as i32,
            min: min as i32,
            max: max as i32,
        });
    }
    let (lsb, msb) = status::split_14bit((value + status::PITCH_BEND_CENTER) as u16);
    Ok(smallvec![voice_status(Command::PitchBend, channel)?, lsb, msb])
}

pub fn timecode_quarter_frame(quarter_frame: u8) -> Result<WireMessage> {
    let quarter_frame = check_7bit(1, quarter_frame)?;
    Ok(smallvec![status::TIMECODE_QUARTER_FRAME, quarter_frame])
}

/// Position in MIDI beats (sixteenth notes), `0..=16383`.
pub fn song_position(beats: u16) -> Result<WireMessage> {
    let (lsb, msb) = status::split_14bit(check_14bit(1, beats)?);
    Ok(smallvec![status::SONG_POSITION_POINTER, lsb, msb])
}

pub fn song_select(song: u8) -> Result<WireMessage> {
    let song = check_7bit(1, song)?;
    Ok(smallvec![status::SONG_SELECT, song])
}

/// A framed SysEx message, passed through unchanged.
pub fn sysex(bytes: &[u8]) -> Result<WireMessage> {
    if bytes.first() != Some(&status::SYSEX_BEGIN) {
        return Err(Error::MissingSysExStart);
    }
    if bytes.len() < 2 || bytes.last() != Some(&status::SYSEX_END) {
        return Err(Error::MissingSysExEnd);
    }
    Ok(SmallVec::from_slice(bytes))
}

/// High resolution NRPN: 14-bit parameter and 14-bit value.
pub fn hires_nrpn(parameter: u16, value: u16, channel: Channel) -> Result<WireMessage> {
    let (param_lsb, param_msb) = status::split_14bit(check_14bit(1, parameter)?);
    let (value_lsb, value_msb) = status::split_14bit(check_14bit(2, value)?);
    hires_nrpn_parts(param_msb, param_lsb, value_msb, value_lsb, channel)
}

/// High resolution NRPN with the parameter given as MSB/LSB and a 14-bit value.
pub fn hires_nrpn_split(
    parameter_msb: u8,
    parameter_lsb: u8,
    value: u16,
    channel: Channel,
) -> Result<WireMessage> {
    check_7bit(1, parameter_msb)?;
    check_7bit(2, parameter_lsb)?;
    let (value_lsb, value_msb) = status::split_14bit(check_14bit(3, value)?);
    hires_nrpn_parts(parameter_msb, parameter_lsb, value_msb, value_lsb, channel)
}

/// High resolution NRPN from four 7-bit parts: CC 99, 98, 6, 38.
pub fn hires_nrpn_parts(
    parameter_msb: u8,
    parameter_lsb: u8,
    value_msb: u8,
    value_lsb: u8,
    channel: Channel,
) -> Result<WireMessage> {
    let parameter_msb = check_7bit(1, parameter_msb)?;
    let parameter_lsb = check_7bit(2, parameter_lsb)?;
    let value_msb = check_7bit(3, value_msb)?;
    let value_lsb = check_7bit(4, value_lsb)?;
    let cc = voice_status(Command::ControlChange, channel)?;
    Ok(smallvec![
        cc,
        nrpn::PARAMETER_MSB,
        parameter_msb,
        cc,
        nrpn::PARAMETER_LSB,
        parameter_lsb,
        cc,
        nrpn::DATA_ENTRY_MSB,
        value_msb,
        cc,
        nrpn::DATA_ENTRY_LSB,
        value_lsb,
    ])
}

/// Low resolution NRPN: 14-bit parameter, 7-bit value.
pub fn lores_nrpn(parameter: u16, value: u8, channel: Channel) -> Result<WireMessage> {
    let (param_lsb, param_msb) = status::split_14bit(check_14bit(1, parameter)?);
    lores_nrpn_parts(param_msb, param_lsb, value, channel).map_err(|e| e.renumber(3, 2))
}

/// Low resolution NRPN from three 7-bit parts: CC 99, 98, 6.
pub fn lores_nrpn_parts(
    parameter_msb: u8,
    parameter_lsb: u8,
    value: u8,
    channel: Channel,
) -> Result<WireMessage> {
    let parameter_msb = check_7bit(1, parameter_msb)?;
    let parameter_lsb = check_7bit(2, parameter_lsb)?;
    let value = check_7bit(3, value)?;
    let cc = voice_status(Command::ControlChange, channel)?;
    Ok(smallvec![
        cc,
        nrpn::PARAMETER_MSB,
        parameter_msb,
        cc,
        nrpn::PARAMETER_LSB,
        parameter_lsb,
        cc,
        nrpn::DATA_ENTRY_MSB,
        value,
    ])
}

/// Serialize any event. Fields are numbered in declaration order, channel excluded.
///
/// `Unknown` events are emitted as stored, but must lead with a status byte.
pub fn encode(event: &MidiEvent) -> Result<WireMessage> {
    match *event {
        MidiEvent::NoteOff {
            channel,
            note,
            velocity,
        } => note_off(note, velocity, channel),
        MidiEvent::NoteOn {
            channel,
            note,
            velocity,
        } => note_on(note, velocity, channel),
        MidiEvent::PolyAftertouch {
            channel,
            note,
            pressure,
        } => poly_aftertouch(note, pressure, channel),
        MidiEvent::ControlChange {
            channel,
            control,
            value,
        } => control_change(control, value, channel),
        MidiEvent::ProgramChange { channel, program } => program_change(program, channel),
        MidiEvent::MonoAftertouch { channel, pressure } => mono_aftertouch(pressure, channel),
        MidiEvent::PitchBend { channel, value } => pitch_bend(value, channel),
        MidiEvent::TimecodeQuarterFrame(value) => timecode_quarter_frame(value),
        MidiEvent::SongPosition(beats) => song_position(beats),
        MidiEvent::SongSelect(song) => song_select(song),
        MidiEvent::SysEx(ref bytes) => sysex(bytes),
        MidiEvent::Unknown(ref bytes) => match bytes.first() {
            Some(&first) if status::is_status(first) => Ok(SmallVec::from_slice(bytes)),
            _ => Err(Error::MissingStatus),
        },
        ref system => Ok(smallvec![system.status()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midi_msg::{ChannelVoiceMsg, MidiMsg};

    fn reference(channel: u8, msg: ChannelVoiceMsg) -> Vec<u8> {
        MidiMsg::ChannelVoice {
            channel: midi_msg::Channel::from_u8(channel),
            msg,
        }
        .to_midi()
    }

    #[test]
    fn test_note_on_default_example() {
        let bytes = note_on(60, 100, Channel::Ch1).unwrap();
        assert_eq!(bytes.as_slice(), &[0x90, 0x3C, 0x64]);
    }

    #[test]
    fn test_pitch_bend_center() {
        let bytes = pitch_bend(0, Channel::Ch1).unwrap();
        assert_eq!(bytes.as_slice(), &[0xE0, 0x00, 0x40]);
    }

    #[test]
    fn test_pitch_bend_extremes() {
        assert_eq!(
            pitch_bend(-8192, Channel::Ch1).unwrap().as_slice(),
            &[0xE0, 0x00, 0x00]
        );
        assert_eq!(
            pitch_bend(8191, Channel::Ch1).unwrap().as_slice(),
            &[0xE0, 0x7F, 0x7F]
        );
        assert!(matches!(
            pitch_bend(8192, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 1, value: 8192, .. })
        ));
        assert!(matches!(
            pitch_bend(-8193, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 1, .. })
        ));
    }

    #[test]
    fn test_matches_reference_encoder() {
        assert_eq!(
            note_on(64, 127, Channel::Ch6).unwrap().to_vec(),
            reference(5, ChannelVoiceMsg::NoteOn { note: 64, velocity: 127 })
        );
        assert_eq!(
            note_off(0, 0, Channel::Ch16).unwrap().to_vec(),
            reference(15, ChannelVoiceMsg::NoteOff { note: 0, velocity: 0 })
        );
        assert_eq!(
            program_change(42, Channel::Ch10).unwrap().to_vec(),
            reference(9, ChannelVoiceMsg::ProgramChange { program: 42 })
        );
        assert_eq!(
            mono_aftertouch(99, Channel::Ch2).unwrap().to_vec(),
            reference(1, ChannelVoiceMsg::ChannelPressure { pressure: 99 })
        );
        assert_eq!(
            poly_aftertouch(60, 12, Channel::Ch3).unwrap().to_vec(),
            reference(2, ChannelVoiceMsg::PolyPressure { note: 60, pressure: 12 })
        );
        assert_eq!(
            pitch_bend(1000, Channel::Ch1).unwrap().to_vec(),
            reference(0, ChannelVoiceMsg::PitchBend { bend: 9192 })
        );
    }

    #[test]
    fn test_argument_positions() {
        assert!(matches!(
            note_on(128, 0, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 1, .. })
        ));
        assert!(matches!(
            control_change(7, 200, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 2, value: 200, .. })
        ));
        assert!(matches!(
            song_position(16384),
            Err(Error::ArgumentOutOfRange { position: 1, .. })
        ));
        assert_eq!(
            note_on(60, 100, Channel::Any),
            Err(Error::ChannelOutOfRange(16))
        );
    }

    #[test]
    fn test_system_common() {
        assert_eq!(song_position(300).unwrap().as_slice(), &[0xF2, 0x2C, 0x02]);
        assert_eq!(song_select(5).unwrap().as_slice(), &[0xF3, 5]);
        assert_eq!(timecode_quarter_frame(0x31).unwrap().as_slice(), &[0xF1, 0x31]);
        assert_eq!(encode(&MidiEvent::TuneRequest).unwrap().as_slice(), &[0xF6]);
        assert_eq!(encode(&MidiEvent::SystemReset).unwrap().as_slice(), &[0xFF]);
    }

    #[test]
    fn test_sysex_framing() {
        assert_eq!(sysex(&[0x01, 0x02, 0xF7]), Err(Error::MissingSysExStart));
        assert_eq!(sysex(&[0xF0, 0x01, 0x02]), Err(Error::MissingSysExEnd));
        assert_eq!(sysex(&[]), Err(Error::MissingSysExStart));
        assert_eq!(sysex(&[0xF0]), Err(Error::MissingSysExEnd));

        let framed = [0xF0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 0xF7];
        assert_eq!(sysex(&framed).unwrap().as_slice(), &framed);
    }

    #[test]
    fn test_hires_nrpn_sequence() {
        let bytes = hires_nrpn(300, 8000, Channel::Ch1).unwrap();
        assert_eq!(
            bytes.as_slice(),
            &[0xB0, 99, 2, 0xB0, 98, 44, 0xB0, 6, 62, 0xB0, 38, 64]
        );

        let split = hires_nrpn_split(2, 44, 8000, Channel::Ch1).unwrap();
        assert_eq!(split, bytes);
    }

    #[test]
    fn test_nrpn_argument_numbering() {
        assert!(matches!(
            hires_nrpn(16384, 0, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 1, .. })
        ));
        assert!(matches!(
            hires_nrpn(0, 16384, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 2, .. })
        ));
        assert!(matches!(
            hires_nrpn_split(1, 1, 20000, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 3, .. })
        ));
        assert!(matches!(
            hires_nrpn_parts(1, 1, 1, 128, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 4, .. })
        ));
        assert!(matches!(
            lores_nrpn(5, 128, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 2, value: 128, .. })
        ));
        assert!(matches!(
            lores_nrpn_parts(5, 1, 128, Channel::Ch1),
            Err(Error::ArgumentOutOfRange { position: 3, .. })
        ));
    }

    #[test]
    fn test_lores_nrpn_sequence() {
        let bytes = lores_nrpn(130, 127, Channel::Ch4).unwrap();
        assert_eq!(
            bytes.as_slice(),
            &[0xB3, 99, 1, 0xB3, 98, 2, 0xB3, 6, 127]
        );
    }

    #[test]
    fn test_encode_dispatches_by_kind() {
        let event = MidiEvent::control_change(Channel::Ch2, 74, 64);
        assert_eq!(encode(&event).unwrap().as_slice(), &[0xB1, 74, 64]);

        let bad = MidiEvent::note_on(Channel::Ch1, 60, 128);
        assert!(matches!(
            encode(&bad),
            Err(Error::ArgumentOutOfRange { position: 2, .. })
        ));

        let unknown = MidiEvent::Unknown(vec![0xF5]);
        assert_eq!(encode(&unknown).unwrap().as_slice(), &[0xF5]);
    }

    #[test]
    fn test_encode_unknown_requires_status() {
        assert_eq!(
            encode(&MidiEvent::Unknown(vec![])),
            Err(Error::MissingStatus)
        );
        assert_eq!(
            encode(&MidiEvent::Unknown(vec![0x3C, 0x40])),
            Err(Error::MissingStatus)
        );
        assert_eq!(
            encode(&MidiEvent::Unknown(vec![0xF4, 0x01])).unwrap().as_slice(),
            &[0xF4, 0x01]
        );
    }
}
