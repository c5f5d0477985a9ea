//! Shared broadcast medium.
//!
//! All stations transmit into one [`Medium`]. A transmitted frame is
//! delivered immediately to the receive queue of every station with an
//! active topology link to the transmitter, minus per-link random loss and
//! any scripted drop rules. Every frame is also recorded for post-run
//! invariant checks.
//!
//! Loss uses a seeded multiplicative congruential generator so simulations
//! are reproducible run to run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{unbounded, Receiver, Sender};
use gathertree::{Header, Id};
use hashbrown::HashMap;
use log::trace;

use crate::metrics::{FrameRecord, MediumMetrics};
use crate::topology::Topology;

/// Scripted frame drop: the predicate is evaluated against each transmitted
/// frame and, while uses remain, a match suppresses delivery to every
/// station. Used to fault specific frames deterministically.
pub struct DropRule {
    predicate: Box<dyn Fn(&FrameRecord) -> bool + Send>,
    remaining: u32,
}

impl DropRule {
    /// Drop the first matching frame, then expire.
    pub fn once<P>(predicate: P) -> Self
    where
        P: Fn(&FrameRecord) -> bool + Send + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            remaining: 1,
        }
    }

    /// Drop the first `count` matching frames, then expire.
    pub fn times<P>(count: u32, predicate: P) -> Self
    where
        P: Fn(&FrameRecord) -> bool + Send + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            remaining: count,
        }
    }
}

struct MediumState {
    topology: Topology,
    stations: HashMap<Id, Sender<Vec<u8>>>,
    metrics: MediumMetrics,
    drop_rules: Vec<DropRule>,
    rng_state: u64,
}

/// The shared air between all simulated stations.
pub struct Medium {
    state: Mutex<MediumState>,
    /// Carrier-sense flag, held while a delivery is in progress.
    busy: AtomicBool,
}

impl Medium {
    /// Create a medium over the given topology with a loss RNG seed.
    pub fn new(topology: Topology, seed: u64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MediumState {
                topology,
                stations: HashMap::new(),
                metrics: MediumMetrics::new(),
                drop_rules: Vec::new(),
                rng_state: seed,
            }),
            busy: AtomicBool::new(false),
        })
    }

    /// Register a station and return its receive queue.
    pub(crate) fn register(&self, id: Id) -> Receiver<Vec<u8>> {
        let (tx, rx) = unbounded();
        self.state.lock().unwrap().stations.insert(id, tx);
        rx
    }

    /// Install a drop rule.
    pub fn add_drop_rule(&self, rule: DropRule) {
        self.state.lock().unwrap().drop_rules.push(rule);
    }

    /// Adjust the loss rate of an existing link.
    pub fn set_loss_rate(&self, a: Id, b: Id, rate: f64) {
        let mut st = self.state.lock().unwrap();
        if let Some(link) = st.topology.get_link_mut(a, b) {
            link.loss_rate = rate.clamp(0.0, 1.0);
        }
    }

    /// Snapshot of the metrics collected so far.
    pub fn metrics(&self) -> MediumMetrics {
        self.state.lock().unwrap().metrics.clone()
    }

    /// Carrier sense as observed by the stations.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Broadcast a frame from `from` to every reachable station.
    pub fn broadcast(&self, from: Id, frame: &[u8]) {
        self.busy.store(true, Ordering::SeqCst);
        let mut st = self.state.lock().unwrap();

        let record = FrameRecord {
            from,
            header: Header::decode(frame).ok(),
            bytes: frame.to_vec(),
        };
        trace!("air: {} sends {:?} ({} bytes)", from, record.msg_type(), frame.len());
        st.metrics.frames_sent += 1;

        let mut suppressed = false;
        for rule in st.drop_rules.iter_mut() {
            if rule.remaining > 0 && (rule.predicate)(&record) {
                rule.remaining -= 1;
                suppressed = true;
                trace!("air: frame from {} suppressed by drop rule", from);
                break;
            }
        }

        if suppressed {
            st.metrics.frames_dropped += 1;
        } else {
            for dest in st.topology.neighbors(from) {
                if !st.stations.contains_key(&dest) {
                    continue;
                }
                let loss = st
                    .topology
                    .get_link(from, dest)
                    .map(|l| l.loss_rate)
                    .unwrap_or(1.0);
                if loss > 0.0 && Self::random_f64(&mut st.rng_state) < loss {
                    st.metrics.frames_dropped += 1;
                    continue;
                }
                // A closed queue means the station's thread is gone; the
                // frame is simply lost, like any radio talking to nobody.
                if st.stations[&dest].send(frame.to_vec()).is_ok() {
                    st.metrics.frames_delivered += 1;
                } else {
                    st.metrics.frames_dropped += 1;
                }
            }
        }

        st.metrics.frames.push(record);
        drop(st);
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Generate a random f64 in [0, 1).
    fn random_f64(state: &mut u64) -> f64 {
        *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (*state >> 11) as f64 / (1u64 << 53) as f64
    }
}
