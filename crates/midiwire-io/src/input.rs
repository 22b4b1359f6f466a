//! Receive half: a decoder bound to a handler.

use crate::error::Result;
use crate::handler::MidiHandler;
use crate::transport::MidiSource;
use midiwire_core::{ChannelState, Decoded, Decoder};
use std::io;
use std::sync::Arc;

const READ_CHUNK: usize = 256;

/// Drives a [`Decoder`] from bytes delivered in any chunking and passes completed
/// events to a [`MidiHandler`].
pub struct MidiInput<H> {
    decoder: Decoder,
    handler: H,
}

impl<H: MidiHandler> MidiInput<H> {
    pub fn new(decoder: Decoder, handler: H) -> Self {
        Self { decoder, handler }
    }

    #[inline]
    pub fn channels(&self) -> &Arc<ChannelState> {
        self.decoder.channels()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Discard any partially received message.
    pub fn reset(&mut self) {
        self.decoder.reset();
    }

    pub fn receive_byte(&mut self, byte: u8) {
        if let Some(decoded) = self.decoder.feed(byte) {
            deliver(&mut self.handler, decoded);
        }
    }

    /// Feed a packet or any slice of the byte stream.
    pub fn receive(&mut self, bytes: &[u8]) {
        for decoded in self.decoder.feed_slice(bytes) {
            deliver(&mut self.handler, decoded);
        }
    }

    /// One read from `source`. Returns the byte count, 0 once the source is exhausted.
    pub fn read_from<M: MidiSource + ?Sized>(
        &mut self,
        source: &mut M,
        buf: &mut [u8],
    ) -> Result<usize> {
        let n = loop {
            match source.read_bytes(buf) {
                Ok(n) => break n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        self.receive(&buf[..n]);
        Ok(n)
    }

    /// Read until the source is exhausted.
    pub fn run<M: MidiSource + ?Sized>(&mut self, source: &mut M) -> Result<()> {
        let mut buf = [0u8; READ_CHUNK];
        while self.read_from(source, &mut buf)? > 0 {}
        Ok(())
    }
}

#[inline]
fn deliver<H: MidiHandler>(handler: &mut H, decoded: Decoded) {
    match decoded {
        Decoded::Event(event) => handler.handle_event(event),
        Decoded::SysExDropped { discarded } => handler.sysex_dropped(discarded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{packet_channel, ReadSource};
    use midiwire_core::{Channel, MidiEvent};
    use std::io::Cursor;

    fn input() -> MidiInput<Vec<MidiEvent>> {
        MidiInput::new(Decoder::default(), Vec::new())
    }

    #[test]
    fn test_receive_split_across_packets() {
        let mut input = input();
        input.receive(&[0x90]);
        input.receive(&[60]);
        assert!(input.handler().is_empty());
        input.receive(&[100, 0xC0, 3]);
        assert_eq!(
            input.into_handler(),
            vec![
                MidiEvent::note_on(Channel::Ch1, 60, 100),
                MidiEvent::program_change(Channel::Ch1, 3),
            ]
        );
    }

    #[test]
    fn test_run_reads_until_exhausted() {
        let mut input = input();
        let mut source = ReadSource::new(Cursor::new(vec![0xF0, 0x01, 0xF7, 0xFA]));
        input.run(&mut source).unwrap();
        assert_eq!(
            input.handler(),
            &vec![MidiEvent::SysEx(vec![0xF0, 0x01, 0xF7]), MidiEvent::Start]
        );
    }

    #[test]
    fn test_packet_channel_feeds_input() {
        let (tx, mut source) = packet_channel();
        let producer = std::thread::spawn(move || {
            for packet in [vec![0xB2, 74], vec![90], vec![0xF8]] {
                tx.send(packet).unwrap();
            }
        });

        let mut input = input();
        input.run(&mut source).unwrap();
        producer.join().unwrap();

        assert_eq!(
            input.into_handler(),
            vec![
                MidiEvent::control_change(Channel::Ch3, 74, 90),
                MidiEvent::ClockTick,
            ]
        );
    }

    #[derive(Default)]
    struct Counting {
        events: usize,
        dropped: Vec<usize>,
    }

    impl MidiHandler for Counting {
        fn handle_event(&mut self, _event: MidiEvent) {
            self.events += 1;
        }

        fn sysex_dropped(&mut self, discarded: usize) {
            self.dropped.push(discarded);
        }
    }

    #[test]
    fn test_sysex_overflow_notifies_handler() {
        let decoder = Decoder::with_capacity(Arc::new(ChannelState::default()), 4);
        let mut input = MidiInput::new(decoder, Counting::default());
        input.receive(&[0xF0, 1, 2, 3, 4, 5, 0x90, 60, 100]);
        assert_eq!(input.handler().dropped, vec![4]);
        assert_eq!(input.handler().events, 1);
    }
}
