//! Background threads bridging the transport layer and the processor.
//!
//! The transport side feeds wire events over a channel into dispatcher
//! intake; a separate thread applies queued changes on a fixed cadence,
//! standing in for the per-frame hook of a module's processing loop. Both
//! threads stop when their `running` flag clears or the channel closes.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::debug;

use crate::{dispatch::ChangeDispatcher, event::ChangeEvent};

const INTAKE_POLL_INTERVAL_MS: u64 = 100;

/// Drain transport events into dispatcher intake.
pub fn spawn_intake_worker(
    dispatcher: Arc<ChangeDispatcher>,
    events: Receiver<ChangeEvent>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("settings-intake".into())
        .spawn(move || {
            while running.load(Ordering::Relaxed) {
                match events.recv_timeout(Duration::from_millis(INTAKE_POLL_INTERVAL_MS)) {
                    Ok(event) => dispatcher.on_change_event(&event),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!(module = dispatcher.module_index(), "settings intake stopped");
        })
        .expect("failed to spawn settings intake thread")
}

/// Apply queued changes every `interval`.
pub fn spawn_dispatch_worker(
    dispatcher: Arc<ChangeDispatcher>,
    running: Arc<AtomicBool>,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("settings-dispatch".into())
        .spawn(move || {
            let ticker = crossbeam_channel::tick(interval);
            while running.load(Ordering::Relaxed) {
                if ticker.recv().is_err() {
                    break;
                }
                dispatcher.process_pending();
            }
            debug!(module = dispatcher.module_index(), "settings dispatch stopped");
        })
        .expect("failed to spawn settings dispatch thread")
}
