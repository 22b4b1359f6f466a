//! Transport seams: where wire bytes leave and enter the engine.
//!
//! A [`MidiSink`] receives each finished message in a single call, so whatever it
//! wraps sees complete messages only. A [`MidiSource`] yields bytes in arrival
//! order with no framing guarantees; the decoder handles any split.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io::{self, Read, Write};

/// Synchronous transmit collaborator.
pub trait MidiSink: Send {
    /// Write one complete message. Returns once the bytes are queued or sent.
    fn transmit(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<S: MidiSink + ?Sized> MidiSink for Box<S> {
    fn transmit(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).transmit(bytes)
    }
}

/// Collects everything transmitted, back to back.
impl MidiSink for Vec<u8> {
    fn transmit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// One packet per message.
impl MidiSink for Sender<Vec<u8>> {
    fn transmit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.send(bytes.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "packet receiver dropped"))
    }
}

/// Adapts any `Write` (serial port, file, socket). Each message is written in full
/// and flushed.
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
}

impl<W: Write + Send> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> MidiSink for WriteSink<W> {
    fn transmit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()
    }
}

/// Byte source collaborator.
pub trait MidiSource: Send {
    /// Fill `buf` with up to `buf.len()` bytes. `Ok(0)` means the source is exhausted.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<M: MidiSource + ?Sized> MidiSource for Box<M> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_bytes(buf)
    }
}

/// Adapts any `Read`.
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
}

impl<R: Read + Send> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Send> MidiSource for ReadSource<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Packets pushed from another thread, typically a platform receive callback.
///
/// Created by [`packet_channel`]. Reads block until a packet arrives and report
/// exhaustion once every sender is gone and all packets are consumed.
pub struct PacketSource {
    receiver: Receiver<Vec<u8>>,
    packet: Vec<u8>,
    offset: usize,
}

impl PacketSource {
    /// Pending bytes of the current packet plus queued packets, without blocking.
    pub fn try_read_bytes(&mut self, buf: &mut [u8]) -> usize {
        let mut written = 0;
        while written < buf.len() {
            if self.offset == self.packet.len() {
                match self.receiver.try_recv() {
                    Ok(packet) => self.load(packet),
                    Err(_) => break,
                }
                continue;
            }
            written += self.copy_into(&mut buf[written..]);
        }
        written
    }

    fn load(&mut self, packet: Vec<u8>) {
        self.packet = packet;
        self.offset = 0;
    }

    fn copy_into(&mut self, buf: &mut [u8]) -> usize {
        let remaining = &self.packet[self.offset..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.offset += n;
        n
    }
}

impl MidiSource for PacketSource {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.offset == self.packet.len() {
            match self.receiver.recv() {
                Ok(packet) => self.load(packet),
                Err(_) => return Ok(0),
            }
        }
        Ok(self.copy_into(buf))
    }
}

/// Sender half is the context handle a receive callback captures; the
/// [`PacketSource`] half feeds a [`MidiInput`](crate::MidiInput).
pub fn packet_channel() -> (Sender<Vec<u8>>, PacketSource) {
    let (sender, receiver) = unbounded();
    (
        sender,
        PacketSource {
            receiver,
            packet: Vec::new(),
            offset: 0,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_vec_sink_appends() {
        let mut sink: Vec<u8> = Vec::new();
        sink.transmit(&[0x90, 60, 100]).unwrap();
        sink.transmit(&[0xF8]).unwrap();
        assert_eq!(sink, vec![0x90, 60, 100, 0xF8]);
    }

    #[test]
    fn test_channel_sink_one_packet_per_message() {
        let (mut tx, rx) = unbounded::<Vec<u8>>();
        tx.transmit(&[0xB0, 7, 100]).unwrap();
        tx.transmit(&[0xFA]).unwrap();
        assert_eq!(rx.try_recv().unwrap(), vec![0xB0, 7, 100]);
        assert_eq!(rx.try_recv().unwrap(), vec![0xFA]);

        drop(rx);
        let err = tx.transmit(&[0xFC]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_write_sink() {
        let mut sink = WriteSink::new(Cursor::new(Vec::new()));
        sink.transmit(&[0xC0, 5]).unwrap();
        assert_eq!(sink.into_inner().into_inner(), vec![0xC0, 5]);
    }

    #[test]
    fn test_read_source() {
        let mut source = ReadSource::new(Cursor::new(vec![0x90, 60, 100]));
        let mut buf = [0u8; 2];
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 2);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 1);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_packet_source_splits_and_drains() {
        let (tx, mut source) = packet_channel();
        tx.send(vec![0x90, 60, 100]).unwrap();
        tx.send(Vec::new()).unwrap();
        tx.send(vec![0xF8]).unwrap();
        drop(tx);

        let mut buf = [0u8; 2];
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 2);
        assert_eq!(buf, [0x90, 60]);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 100);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 0xF8);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_packet_source_try_read_spans_packets() {
        let (tx, mut source) = packet_channel();
        tx.send(vec![0x90, 60]).unwrap();
        tx.send(vec![100, 0xF8]).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(source.try_read_bytes(&mut buf), 4);
        assert_eq!(&buf[..4], &[0x90, 60, 100, 0xF8]);
        assert_eq!(source.try_read_bytes(&mut buf), 0);
    }
}
