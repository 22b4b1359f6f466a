//! MIDI 1.0 wire protocol.
//!
//! Message catalog, validated encoders and a byte-stream decoder. No I/O happens
//! here: encoders produce byte buffers and the decoder consumes bytes one at a time.
//!
//! # Example
//!
//! ```
//! use midiwire_core::{encode, Channel, Decoded, Decoder, MidiEvent};
//!
//! let bytes = encode::note_on(60, 100, Channel::Ch1)?;
//! assert_eq!(bytes.as_slice(), &[0x90, 0x3C, 0x64]);
//!
//! let mut decoder = Decoder::default();
//! let decoded: Vec<Decoded> = decoder.feed_slice(&bytes).collect();
//! assert_eq!(
//!     decoded,
//!     vec![Decoded::Event(MidiEvent::note_on(Channel::Ch1, 60, 100))]
//! );
//! # Ok::<(), midiwire_core::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod status;
pub use status::Command;

mod channel;
pub use channel::{Channel, ChannelState};

mod event;
pub use event::MidiEvent;

pub mod encode;
pub use encode::WireMessage;

mod decoder;
pub use decoder::{Decoded, Decoder, DEFAULT_SYSEX_CAPACITY};

mod utils;
pub use utils::{f32_to_value, f64_to_value, value_to_f32, value_to_f64};
