//! Receive-side event delivery.

use crate::MidiEvent;
use crossbeam_channel::Sender;
use tracing::trace;

/// Receives decoded events from a [`MidiInput`](crate::MidiInput).
pub trait MidiHandler: Send {
    fn handle_event(&mut self, event: MidiEvent);

    /// An incoming SysEx overran the buffer and was dropped.
    fn sysex_dropped(&mut self, _discarded: usize) {}
}

impl<H: MidiHandler + ?Sized> MidiHandler for Box<H> {
    fn handle_event(&mut self, event: MidiEvent) {
        (**self).handle_event(event)
    }

    fn sysex_dropped(&mut self, discarded: usize) {
        (**self).sysex_dropped(discarded)
    }
}

impl MidiHandler for Vec<MidiEvent> {
    fn handle_event(&mut self, event: MidiEvent) {
        self.push(event);
    }
}

/// Forwards events to another thread. Events are dropped once the receiver is gone.
impl MidiHandler for Sender<MidiEvent> {
    fn handle_event(&mut self, event: MidiEvent) {
        if self.send(event).is_err() {
            trace!("event receiver dropped");
        }
    }
}

/// Closure handler, see [`handler_fn`].
pub struct FnHandler<F>(F);

impl<F: FnMut(MidiEvent) + Send> MidiHandler for FnHandler<F> {
    fn handle_event(&mut self, event: MidiEvent) {
        (self.0)(event)
    }
}

pub fn handler_fn<F: FnMut(MidiEvent) + Send>(f: F) -> FnHandler<F> {
    FnHandler(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use midiwire_core::Channel;

    #[test]
    fn test_fn_handler() {
        let mut notes = Vec::new();
        {
            let mut handler = handler_fn(|event: MidiEvent| notes.extend(event.note()));
            handler.handle_event(MidiEvent::note_on(Channel::Ch1, 60, 100));
            handler.handle_event(MidiEvent::ClockTick);
            handler.sysex_dropped(256);
        }
        assert_eq!(notes, vec![60]);
    }

    #[test]
    fn test_channel_handler_survives_disconnect() {
        let (mut tx, rx) = crossbeam_channel::unbounded::<MidiEvent>();
        tx.handle_event(MidiEvent::Start);
        assert_eq!(rx.try_recv().unwrap(), MidiEvent::Start);
        drop(rx);
        tx.handle_event(MidiEvent::Stop);
    }
}
