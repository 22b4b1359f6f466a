//! MIDI 1.0 message catalog: command nibbles, system status bytes and data lengths.

/// Channel voice commands, stored as the high nibble of the status byte.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyAftertouch = 0xA,
    ControlChange = 0xB,
    ProgramChange = 0xC,
    MonoAftertouch = 0xD,
    PitchBend = 0xE,
}

impl Command {
    /// Classify the high nibble of a status byte. `0xF` (system) and data nibbles yield `None`.
    #[inline]
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x8 => Some(Command::NoteOff),
            0x9 => Some(Command::NoteOn),
            0xA => Some(Command::PolyAftertouch),
            0xB => Some(Command::ControlChange),
            0xC => Some(Command::ProgramChange),
            0xD => Some(Command::MonoAftertouch),
            0xE => Some(Command::PitchBend),
            _ => None,
        }
    }

    /// Number of data bytes following the status byte.
    #[inline]
    pub fn data_len(self) -> u8 {
        match self {
            Command::ProgramChange | Command::MonoAftertouch => 1,
            _ => 2,
        }
    }

    /// Status byte for this command on `channel` (0-15).
    #[inline]
    pub fn status(self, channel: u8) -> u8 {
        ((self as u8) << 4) | (channel & 0x0F)
    }
}

pub const SYSEX_BEGIN: u8 = 0xF0;
pub const TIMECODE_QUARTER_FRAME: u8 = 0xF1;
pub const SONG_POSITION_POINTER: u8 = 0xF2;
pub const SONG_SELECT: u8 = 0xF3;
pub const TUNE_REQUEST: u8 = 0xF6;
pub const SYSEX_END: u8 = 0xF7;
pub const CLOCK_TICK: u8 = 0xF8;
pub const START: u8 = 0xFA;
pub const CONTINUE: u8 = 0xFB;
pub const STOP: u8 = 0xFC;
pub const ACTIVE_SENSE: u8 = 0xFE;
pub const SYSTEM_RESET: u8 = 0xFF;

/// Controller numbers used by an NRPN sequence.
pub mod nrpn {
    pub const PARAMETER_MSB: u8 = 99;
    pub const PARAMETER_LSB: u8 = 98;
    pub const DATA_ENTRY_MSB: u8 = 6;
    pub const DATA_ENTRY_LSB: u8 = 38;
}

/// Largest 7-bit data value.
pub const DATA_MAX: u8 = 0x7F;

/// Largest 14-bit value (pitch bend wire value, song position, NRPN fields).
pub const FOURTEEN_BIT_MAX: u16 = 0x3FFF;

/// Offset applied to signed pitch bend values on the wire.
pub const PITCH_BEND_CENTER: i16 = 0x2000;

/// MIDI clock resolution.
pub const CLOCKS_PER_QUARTER_NOTE: u32 = 24;

#[inline]
pub fn is_status(byte: u8) -> bool {
    byte & 0x80 != 0
}

#[inline]
pub fn is_data(byte: u8) -> bool {
    byte & 0x80 == 0
}

/// System real-time bytes may appear between the bytes of any other message.
#[inline]
pub fn is_realtime(byte: u8) -> bool {
    byte >= CLOCK_TICK
}

/// Split a 14-bit value into its wire order (LSB, MSB).
#[inline]
pub fn split_14bit(value: u16) -> (u8, u8) {
    ((value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8)
}

#[inline]
pub fn join_14bit(lsb: u8, msb: u8) -> u16 {
    ((msb as u16 & 0x7F) << 7) | (lsb as u16 & 0x7F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_nibbles() {
        assert_eq!(Command::from_nibble(0x9), Some(Command::NoteOn));
        assert_eq!(Command::from_nibble(0xE), Some(Command::PitchBend));
        assert_eq!(Command::from_nibble(0xF), None);
        assert_eq!(Command::from_nibble(0x7), None);
        assert_eq!(Command::NoteOn.status(0), 0x90);
        assert_eq!(Command::ControlChange.status(15), 0xBF);
    }

    #[test]
    fn test_data_lengths() {
        assert_eq!(Command::ProgramChange.data_len(), 1);
        assert_eq!(Command::MonoAftertouch.data_len(), 1);
        assert_eq!(Command::NoteOff.data_len(), 2);
        assert_eq!(Command::PitchBend.data_len(), 2);
    }

    #[test]
    fn test_14bit_split() {
        assert_eq!(split_14bit(8192), (0x00, 0x40));
        assert_eq!(split_14bit(FOURTEEN_BIT_MAX), (0x7F, 0x7F));
        assert_eq!(join_14bit(0x00, 0x40), 8192);
        assert_eq!(join_14bit(0x7F, 0x7F), FOURTEEN_BIT_MAX);
    }

    #[test]
    fn test_byte_classes() {
        assert!(is_status(0x80));
        assert!(is_data(0x7F));
        assert!(is_realtime(CLOCK_TICK));
        assert!(is_realtime(SYSTEM_RESET));
        assert!(!is_realtime(SYSEX_END));
    }
}
