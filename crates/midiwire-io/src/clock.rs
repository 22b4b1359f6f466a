//! MIDI clock generator: 24 ticks per quarter note on a background thread.
//!
//! The schedule lives behind one mutex paired with a condition variable. The clock
//! thread holds that mutex while it transmits a tick, and `set_interval`/`stop`
//! hold it while they change the schedule and send Start, Continue or Stop. So a
//! tick never fires mid-update, and no tick is emitted after `stop` returns. Lock
//! order is always schedule then sink.

use crate::error::{Error, Result};
use crate::output::MidiOutput;
use crate::transport::MidiSink;
use midiwire_core::status;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

struct Schedule {
    /// Tick period, `None` while stopped.
    interval: Option<Duration>,
    next_tick: Instant,
    shutdown: bool,
}

struct ClockShared {
    schedule: Mutex<Schedule>,
    wake: Condvar,
}

pub struct ClockGenerator<S: MidiSink + 'static> {
    shared: Arc<ClockShared>,
    output: MidiOutput<S>,
    thread_handle: Option<JoinHandle<()>>,
}

impl<S: MidiSink + 'static> ClockGenerator<S> {
    /// Spawn the clock thread in the stopped state.
    pub fn new(output: MidiOutput<S>) -> Result<Self> {
        let shared = Arc::new(ClockShared {
            schedule: Mutex::new(Schedule {
                interval: None,
                next_tick: Instant::now(),
                shutdown: false,
            }),
            wake: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let thread_output = output.clone();
        let handle = thread::Builder::new()
            .name("midi-clock".into())
            .spawn(move || clock_loop(thread_shared, thread_output))?;

        Ok(Self {
            shared,
            output,
            thread_handle: Some(handle),
        })
    }

    /// Start ticking, or retime a running clock, at `quarter_note / 24` per tick.
    ///
    /// From the stopped state the first tick goes out immediately, preceded by Start
    /// if `send_start` is set, otherwise by Continue if `send_continue` is set. A
    /// running clock is retimed with its next tick one new interval from now.
    pub fn set_interval(
        &self,
        quarter_note: Duration,
        send_start: bool,
        send_continue: bool,
    ) -> Result<()> {
        let interval = quarter_note / status::CLOCKS_PER_QUARTER_NOTE;
        if interval.is_zero() {
            return Err(Error::InvalidConfig(format!(
                "quarter note {:?} too short for a clock tick",
                quarter_note
            )));
        }

        let mut schedule = self.shared.schedule.lock();
        if send_start {
            self.output.send_start()?;
        } else if send_continue {
            self.output.send_continue()?;
        }

        let now = Instant::now();
        schedule.next_tick = match schedule.interval {
            Some(_) => now + interval,
            None => now,
        };
        schedule.interval = Some(interval);
        debug!(?interval, "MIDI clock running");

        self.shared.wake.notify_all();
        Ok(())
    }

    /// Same as [`set_interval`](Self::set_interval) with the period given in beats per minute.
    pub fn set_tempo_bpm(&self, bpm: f64, send_start: bool, send_continue: bool) -> Result<()> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(Error::InvalidConfig(format!("tempo {} BPM", bpm)));
        }
        let quarter_note = Duration::try_from_secs_f64(60.0 / bpm)
            .map_err(|_| Error::InvalidConfig(format!("tempo {} BPM", bpm)))?;
        self.set_interval(quarter_note, send_start, send_continue)
    }

    /// Stop ticking. No tick is transmitted after this returns.
    pub fn stop(&self, send_stop: bool) -> Result<()> {
        let mut schedule = self.shared.schedule.lock();
        schedule.interval = None;
        debug!("MIDI clock stopped");
        self.shared.wake.notify_all();
        if send_stop {
            self.output.send_stop()?;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.shared.schedule.lock().interval.is_some()
    }

    /// Current tick period, `None` while stopped.
    pub fn interval(&self) -> Option<Duration> {
        self.shared.schedule.lock().interval
    }

    /// Stop the thread and wait for it to exit. Also runs on drop.
    pub fn shutdown(&mut self) {
        {
            let mut schedule = self.shared.schedule.lock();
            schedule.shutdown = true;
            self.shared.wake.notify_all();
        }

        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                warn!("MIDI clock thread panicked");
            }
        }
    }
}

impl<S: MidiSink + 'static> Drop for ClockGenerator<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn clock_loop<S: MidiSink>(shared: Arc<ClockShared>, output: MidiOutput<S>) {
    let mut schedule = shared.schedule.lock();
    loop {
        if schedule.shutdown {
            break;
        }

        let Some(interval) = schedule.interval else {
            shared.wake.wait(&mut schedule);
            continue;
        };

        let deadline = schedule.next_tick;
        if Instant::now() < deadline {
            shared.wake.wait_until(&mut schedule, deadline);
            continue;
        }

        let now = Instant::now();
        schedule.next_tick = if now.duration_since(deadline) >= interval {
            now + interval
        } else {
            deadline + interval
        };

        if let Err(err) = output.send_clock_tick() {
            warn!(error = %err, "MIDI clock tick not transmitted");
        }
    }
    debug!("MIDI clock thread exiting");
}
