//! Node state and round entry point.
//!
//! A [`Node`] owns the host handles and the three fixed buffers the protocol
//! operates on. All round state beyond these buffers lives on the stack of
//! [`Node::run`] and is discarded when the round ends; nothing persists
//! across rounds.
//!
//! # Buffers
//!
//! - `tx_buf`: staging area for every outgoing frame. Frames are encoded
//!   (or copied, for proxied data) here immediately before transmission, so
//!   retransmissions within a delivery always resend identical bytes.
//! - `data_buf`: the sensor's outgoing data frame. The header is encoded at
//!   construction; the payload area is handed to the user through
//!   [`Node::payload_mut`] and must be filled before the round starts.
//! - `rx_buf`: reception target, overwritten by every receive call.
//!
//! Received payloads are only valid until the next receive; the collector
//! callback gets a borrowed view for exactly that reason.

use crate::config::{Config, Role};
use crate::traits::{Delay, Transceiver};
use crate::types::{Id, MsgType, BACKOFF_BASE_US, BACKOFF_SPAN_US};
use crate::types::{HEADER_SIZE, MAX_PACKET_SIZE};
use crate::wire::Header;

/// A protocol node, generic over the host transceiver and delay source.
pub struct Node<T, D> {
    pub(crate) transceiver: T,
    pub(crate) delay: D,
    config: Config,
    /// Per-node backoff, a pure function of the id; cached at construction.
    pub(crate) backoff_us: u32,
    pub(crate) tx_buf: [u8; MAX_PACKET_SIZE],
    pub(crate) data_buf: [u8; MAX_PACKET_SIZE],
    pub(crate) rx_buf: [u8; MAX_PACKET_SIZE],
    /// Length of the frame currently held in `rx_buf`.
    pub(crate) rx_len: usize,
}

impl<T, D> Node<T, D>
where
    T: Transceiver,
    D: Delay,
{
    /// Create a node from host handles and a validated configuration.
    pub fn new(transceiver: T, delay: D, config: Config) -> Self {
        let mut node = Self {
            transceiver,
            delay,
            config,
            backoff_us: (config.id() % BACKOFF_SPAN_US) + BACKOFF_BASE_US,
            tx_buf: [0u8; MAX_PACKET_SIZE],
            data_buf: [0u8; MAX_PACKET_SIZE],
            rx_buf: [0u8; MAX_PACKET_SIZE],
            rx_len: 0,
        };
        // Pre-encode the data frame header; only the receiver field is
        // rewritten once the parent is known.
        Header::new(MsgType::Data, config.id(), 0).encode(&mut node.data_buf);
        node
    }

    /// This node's identifier.
    pub fn id(&self) -> Id {
        self.config.id()
    }

    /// This node's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the transceiver reference.
    pub fn transceiver(&self) -> &T {
        &self.transceiver
    }

    /// Mutable access to the sensor's payload area.
    ///
    /// Fill this before calling [`Node::run`]; the node owns the buffer for
    /// the duration of the round. Empty for collectors, whose frames carry
    /// no payload.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let len = self.config.data_length();
        &mut self.data_buf[HEADER_SIZE..HEADER_SIZE + len]
    }

    /// Run one collection round.
    ///
    /// For the collector, `on_payload` is invoked exactly once per
    /// successfully received data frame with the originating sensor's id and
    /// a payload view that is valid only for the duration of the call; it
    /// must not call back into the node. For sensors the callback is unused.
    ///
    /// A sensor with no reachable parent blocks in parent discovery
    /// indefinitely; round-level supervision is the host's responsibility.
    pub fn run<F>(&mut self, mut on_payload: F)
    where
        F: FnMut(Id, &[u8]),
    {
        match self.config.role() {
            Role::Collector => self.run_collector(&mut on_payload),
            Role::Sensor { .. } => self.run_sensor(),
        }
    }

    /// Encode a header-only frame into `tx_buf`; returns the frame length.
    pub(crate) fn stage_header(&mut self, msg_type: MsgType, receiver: Id) -> usize {
        Header::new(msg_type, self.config.id(), receiver).encode(&mut self.tx_buf)
    }

    /// Copy the sensor's data frame into `tx_buf` addressed to `receiver`;
    /// returns the frame length.
    pub(crate) fn stage_own_data(&mut self, receiver: Id) -> usize {
        let len = HEADER_SIZE + self.config.data_length();
        Header::new(MsgType::Data, self.config.id(), receiver).encode(&mut self.data_buf);
        self.tx_buf[..len].copy_from_slice(&self.data_buf[..len]);
        len
    }

    /// Copy the received frame into `tx_buf` with the receiver rewritten to
    /// `receiver`; the transmitter field keeps the originator. Returns the
    /// frame length.
    pub(crate) fn stage_forward(&mut self, header: Header, receiver: Id) -> usize {
        let len = self.rx_len;
        self.tx_buf[..len].copy_from_slice(&self.rx_buf[..len]);
        Header::new(header.msg_type, header.transmitter, receiver).encode(&mut self.tx_buf);
        len
    }

    /// Payload view of the frame currently held in `rx_buf`.
    pub(crate) fn rx_payload(&self) -> &[u8] {
        &self.rx_buf[HEADER_SIZE..self.rx_len]
    }
}
