//! Host trait implementations backed by the simulated medium.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use gathertree::{Delay, Id, Transceiver};

use crate::medium::Medium;

/// A station's radio: transmits into the shared medium, receives from its
/// own queue.
pub struct SimRadio {
    id: Id,
    medium: Arc<Medium>,
    rx: Receiver<Vec<u8>>,
}

impl SimRadio {
    /// Attach a new station to the medium.
    pub fn new(medium: &Arc<Medium>, id: Id) -> Self {
        let rx = medium.register(id);
        Self {
            id,
            medium: Arc::clone(medium),
            rx,
        }
    }

    /// The station's identifier on the medium.
    pub fn id(&self) -> Id {
        self.id
    }
}

impl Transceiver for SimRadio {
    fn transmit(&mut self, frame: &[u8]) {
        self.medium.broadcast(self.id, frame);
    }

    fn receive(&mut self, buf: &mut [u8], timeout_ms: u32) -> usize {
        let frame = if timeout_ms == 0 {
            self.rx.recv().ok()
        } else {
            self.rx
                .recv_timeout(Duration::from_millis(u64::from(timeout_ms)))
                .ok()
        };
        match frame {
            Some(frame) => {
                let len = frame.len().min(buf.len());
                buf[..len].copy_from_slice(&frame[..len]);
                len
            }
            None => 0,
        }
    }

    fn is_channel_busy(&mut self) -> bool {
        self.medium.is_busy()
    }
}

/// Delay source backed by the operating system clock.
pub struct SimDelay;

impl Delay for SimDelay {
    fn sleep_us(&mut self, duration_us: u32) {
        thread::sleep(Duration::from_micros(u64::from(duration_us)));
    }
}
