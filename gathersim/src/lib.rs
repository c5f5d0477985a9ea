//! gathersim - in-memory broadcast medium and harness for gathertree
//!
//! Simulates a network of gathertree nodes sharing one radio channel. Nodes
//! run their real blocking rounds on OS threads; the medium delivers every
//! transmission to all topologically reachable stations, applies per-link
//! loss and scripted drop rules, and records every frame for invariant
//! checks.
//!
//! # Module Structure
//!
//! - [`topology`] - Links and connectivity (fully connected, chain, star)
//! - [`medium`] - The shared air: delivery, loss, drop rules, carrier sense
//! - [`metrics`] - Frame log and counters
//! - [`host`] - `Transceiver`/`Delay` implementations over the medium
//! - [`harness`] - Thread-per-node round spawning

pub mod harness;
pub mod host;
pub mod medium;
pub mod metrics;
pub mod topology;

pub use harness::{spawn_collector, spawn_sensor, Collected};
pub use host::{SimDelay, SimRadio};
pub use medium::{DropRule, Medium};
pub use metrics::{FrameRecord, MediumMetrics};
pub use topology::{Link, Topology};
