//! Link layer: carrier-sensed transmission with randomized backoff, framed
//! reception, and acknowledgement-driven reliable delivery.
//!
//! All blocking in the protocol happens here: backoff sleeps, carrier-sense
//! polls, and receive timeouts. The round state machines above this layer
//! are pure sequencing.

use log::{debug, trace};

use crate::node::Node;
use crate::traits::{Delay, Transceiver};
use crate::types::{Id, MsgType, ACK_ATTEMPTS, ACK_TIMEOUT_MS, DELIVER_ATTEMPTS, HEADER_SIZE};
use crate::wire::Header;

/// Reliable delivery exhausted every attempt without a matching ack.
///
/// Never surfaced to the host; callers either retry at the protocol layer
/// (parent discovery) or silently abandon (own data, end-of-data).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DeliveryFailed;

impl<T, D> Node<T, D>
where
    T: Transceiver,
    D: Delay,
{
    /// Sleep for this node's backoff interval.
    ///
    /// The interval is `(id % 9000) + 1000` microseconds: deterministic per
    /// node, so contending nodes with distinct ids retry at distinct times.
    fn backoff(&mut self) {
        self.delay.sleep_us(self.backoff_us);
    }

    /// Sleep in backoff intervals until the channel is observed idle.
    fn wait_channel_clear(&mut self) {
        while self.transceiver.is_channel_busy() {
            self.backoff();
        }
    }

    /// Transmit the staged frame with backoff and carrier sense.
    ///
    /// Sleeps one backoff interval unconditionally, then further intervals
    /// while the channel is busy. No acknowledgement is awaited here.
    pub(crate) fn transmit_framed(&mut self, len: usize) {
        self.backoff();
        self.wait_channel_clear();
        trace!("node {}: tx {} bytes", self.id(), len);
        self.transceiver.transmit(&self.tx_buf[..len]);
    }

    /// Transmit an acknowledgement to `receiver`.
    ///
    /// Skips the unconditional backoff sleep: the peer is waiting with a
    /// tight per-attempt timeout, so the ack only carrier-senses before
    /// transmitting.
    pub(crate) fn transmit_ack(&mut self, receiver: Id) {
        let len = self.stage_header(MsgType::Ack, receiver);
        self.wait_channel_clear();
        trace!("node {}: ack -> {}", self.id(), receiver);
        self.transceiver.transmit(&self.tx_buf[..len]);
    }

    /// Receive one frame, returning its decoded header.
    ///
    /// Returns `None` when the timeout elapses or the received bytes do not
    /// form a valid header; both are treated identically by callers. A
    /// timeout of 0 blocks until a frame arrives. The frame bytes stay in
    /// the receive buffer until the next receive call.
    pub(crate) fn receive_framed(&mut self, timeout_ms: u32) -> Option<Header> {
        let len = self.transceiver.receive(&mut self.rx_buf, timeout_ms);
        if len < HEADER_SIZE {
            return None;
        }
        self.rx_len = len;
        match Header::decode(&self.rx_buf[..len]) {
            Ok(header) => {
                trace!(
                    "node {}: rx {:?} {} -> {}",
                    self.id(),
                    header.msg_type,
                    header.transmitter,
                    header.receiver
                );
                Some(header)
            }
            Err(_) => None,
        }
    }

    /// Receive up to `max_attempts` frames, returning the first one the
    /// predicate accepts.
    ///
    /// Frames failing the predicate are silently dropped and consume an
    /// attempt. A timeout ends the wait early.
    pub(crate) fn receive_matching<P>(
        &mut self,
        predicate: P,
        max_attempts: u8,
        timeout_ms: u32,
    ) -> Option<Header>
    where
        P: Fn(&Header) -> bool,
    {
        for _ in 0..max_attempts {
            match self.receive_framed(timeout_ms) {
                Some(header) if predicate(&header) => return Some(header),
                Some(_) => continue,
                None => return None,
            }
        }
        None
    }

    /// Reliable unicast of the staged frame.
    ///
    /// Transmits up to [`DELIVER_ATTEMPTS`] times, each followed by a short
    /// wait for an acknowledgement that mirrors the frame's addressing: the
    /// ack must come from the frame's receiver and be addressed to the
    /// frame's transmitter. For frames this node originates that means an
    /// ack addressed to itself; for proxied frames it is the originator's
    /// id, which is all the upstream node can see.
    pub(crate) fn deliver(&mut self, len: usize) -> Result<(), DeliveryFailed> {
        // The staged frame is immutable for the whole delivery; its header
        // defines the expected ack addressing.
        let frame = Header::decode(&self.tx_buf[..len]).map_err(|_| DeliveryFailed)?;

        for _ in 0..DELIVER_ATTEMPTS {
            self.transmit_framed(len);
            let ack = self.receive_matching(
                |h| {
                    h.msg_type == MsgType::Ack
                        && h.transmitter == frame.receiver
                        && h.receiver == frame.transmitter
                },
                ACK_ATTEMPTS,
                ACK_TIMEOUT_MS,
            );
            if ack.is_some() {
                return Ok(());
            }
        }

        debug!(
            "node {}: delivery of {:?} to {} exhausted {} attempts",
            self.id(),
            frame.msg_type,
            frame.receiver,
            DELIVER_ATTEMPTS
        );
        Err(DeliveryFailed)
    }
}
