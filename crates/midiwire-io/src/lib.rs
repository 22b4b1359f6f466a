//! MIDI 1.0 engine over injected transports.
//!
//! Binds the protocol in `midiwire-core` to a transmit sink and a byte source,
//! adds atomic sends safe to call from several threads, and a clock generator.
//!
//! - **Transports**: [`MidiSink`] and [`MidiSource`] with adapters for `Write`,
//!   `Read` and crossbeam channels
//! - **Send**: [`MidiOutput`], validated and atomic per message (NRPN included)
//! - **Receive**: [`MidiInput`] feeding a [`MidiHandler`]
//! - **Clock**: [`ClockGenerator`], 24 ticks per quarter note
//! - **Engine**: [`MidiEngine`] tying them together

pub mod error;
pub use error::{Error, Result};

pub mod transport;
pub use transport::{packet_channel, MidiSink, MidiSource, PacketSource, ReadSource, WriteSink};

mod handler;
pub use handler::{handler_fn, FnHandler, MidiHandler};

mod output;
pub use output::MidiOutput;

mod input;
pub use input::MidiInput;

mod clock;
pub use clock::ClockGenerator;

mod config;
pub use config::EngineConfig;

mod engine;
pub use engine::{MidiEngine, MidiEngineBuilder};

pub use midiwire_core::{
    encode, status, Channel, ChannelState, Command, Decoded, Decoder, MidiEvent, WireMessage,
};
