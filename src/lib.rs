//! # midiwire - MIDI 1.0 wire protocol engine
//!
//! Built from two subsystems:
//! - **midiwire-core** - Message catalog, events, validated encoders, byte-stream decoder
//! - **midiwire-io** - Transports, atomic sends, receive loop, clock generator
//!
//! ## Quick Start
//!
//! ```
//! # #[cfg(feature = "io")]
//! # fn main() -> midiwire::Result<()> {
//! use midiwire::prelude::*;
//! use std::time::Duration;
//!
//! let (tx, rx) = crossbeam_channel::unbounded::<Vec<u8>>();
//! let engine = MidiEngine::builder(tx).build()?;
//!
//! engine.send_note_on(60, 100, None)?;
//! assert_eq!(rx.recv().unwrap(), vec![0x90, 0x3C, 0x64]);
//!
//! let clock = engine.clock()?;
//! clock.set_interval(Duration::from_millis(500), true, false)?;
//! clock.stop(true)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "io"))]
//! # fn main() {}
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - `io`
//! - `io` - Engine, transports and clock generator (without it only the protocol is built)

/// Re-export of midiwire-core for direct access
pub use midiwire_core as core;

/// Re-export of midiwire-io for direct access
#[cfg(feature = "io")]
pub use midiwire_io as io;

mod error;
pub use error::{Error, Result};

pub use midiwire_core::{encode, status, Channel, ChannelState, Decoded, Decoder, MidiEvent};

#[cfg(feature = "io")]
pub use midiwire_io::{
    ClockGenerator, EngineConfig, MidiEngine, MidiEngineBuilder, MidiHandler, MidiInput,
    MidiOutput, MidiSink, MidiSource,
};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Channel, Decoded, Decoder, Error, MidiEvent, Result};

    pub use midiwire_core::{f32_to_value, f64_to_value, value_to_f32, value_to_f64};

    #[cfg(feature = "io")]
    pub use midiwire_io::{
        handler_fn, packet_channel, ClockGenerator, EngineConfig, MidiEngine, MidiHandler,
        MidiInput, MidiOutput, MidiSink, MidiSource, ReadSource, WriteSink,
    };
}
