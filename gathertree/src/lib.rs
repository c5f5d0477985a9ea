//! gathertree - single-round tree collection for broadcast radios
//!
//! A minimal protocol for gathering one fixed-size payload from every sensor
//! in range of a shared broadcast medium (sub-GHz radio, powerline, audio).
//! Each collection round forms a tree rooted at the collector: nodes invite
//! children, children relay their subtrees' payloads upward hop by hop, and
//! the collector hands every payload, tagged with its originating sensor's
//! id, to a user callback.
//!
//! # Key Properties
//!
//! - Strictly synchronous and single-threaded: one blocking `run` per round
//! - No heap allocation; three fixed 255-byte buffers per node
//! - Hop-by-hop reliability via acks and bounded retries
//! - Channel access by carrier sense plus deterministic per-id backoff
//! - No state survives a round; the tree is rebuilt from scratch every time
//!
//! # Example
//!
//! ```ignore
//! use gathertree::{Config, Node};
//!
//! // Implement Transceiver and Delay for your platform...
//!
//! let config = Config::sensor(device_id, 4)?;
//! let mut node = Node::new(radio, timer, config);
//! node.payload_mut().copy_from_slice(&reading.to_le_bytes());
//! node.run(|_, _| {});
//! ```
//!
//! # Module Structure
//!
//! - [`types`] - Identifiers, message kinds, protocol constants
//! - [`wire`] - Frame header codec over caller-provided byte regions
//! - [`traits`] - `Transceiver` and `Delay` host traits
//! - [`config`] - Validated per-node configuration and role selection
//! - [`node`] - The `Node` struct, buffers, and the `run` entry point
//! - [`link`] - Backoff, carrier sense, framed receive, reliable delivery
//! - [`children`] - Child enumeration
//! - [`round`] - Sensor round state machine
//! - [`collect`] - Collector drain loop

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod traits;
pub mod types;
pub mod wire;

mod children;
mod collect;
mod link;
mod node;
mod round;

// Re-export main types at crate root
pub use config::{Config, Role};
pub use node::Node;
pub use traits::{Delay, Transceiver};
pub use types::{Error, Id, MsgType, BROADCAST, HEADER_SIZE, MAX_DATA_LENGTH, MAX_PACKET_SIZE};
pub use wire::{DecodeError, Header};
