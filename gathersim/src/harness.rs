//! Thread-per-node harness for end-to-end rounds.
//!
//! Each node runs its blocking round on its own OS thread, exactly as it
//! would occupy a microcontroller's single execution context. Collector
//! payloads are forwarded into a channel; the channel closing signals the
//! end of the collector's round.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use gathertree::{Config, Id, Node};

use crate::host::{SimDelay, SimRadio};
use crate::medium::Medium;

/// One payload as seen by the collector callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    /// Originating sensor.
    pub from: Id,
    /// Payload bytes.
    pub payload: Vec<u8>,
}

/// Spawn a sensor round on its own thread.
pub fn spawn_sensor(medium: &Arc<Medium>, id: Id, payload: &[u8]) -> JoinHandle<()> {
    let radio = SimRadio::new(medium, id);
    let config = Config::sensor(id, payload.len()).expect("valid sensor config");
    let mut node = Node::new(radio, SimDelay, config);
    node.payload_mut().copy_from_slice(payload);

    thread::Builder::new()
        .name(format!("sensor-{id}"))
        .spawn(move || node.run(|_, _| {}))
        .expect("spawn sensor thread")
}

/// Spawn a collector round on its own thread.
///
/// Returns the join handle and a channel carrying every payload the
/// collector's callback receives. The channel disconnects when the round
/// ends.
pub fn spawn_collector(medium: &Arc<Medium>, id: Id) -> (JoinHandle<()>, Receiver<Collected>) {
    let radio = SimRadio::new(medium, id);
    let config = Config::collector(id).expect("valid collector config");
    let mut node = Node::new(radio, SimDelay, config);

    let (tx, rx): (Sender<Collected>, Receiver<Collected>) = unbounded();
    let handle = thread::Builder::new()
        .name(format!("collector-{id}"))
        .spawn(move || {
            node.run(|from, payload| {
                let _ = tx.send(Collected {
                    from,
                    payload: payload.to_vec(),
                });
            });
        })
        .expect("spawn collector thread");

    (handle, rx)
}
