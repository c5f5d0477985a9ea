//! Sensor round state machine.
//!
//! One round walks the sensor through five phases in order:
//!
//! ```text
//! AwaitParent -> CountingChildren -> ProxyingChildren -> SendingOwnData -> SendingEndOfData
//! ```
//!
//! Parent discovery has no timeout: a sensor with no reachable parent stays
//! in the first phase until the host intervenes. Every later phase bounds
//! its waiting with receive timeouts.

use log::debug;

use crate::node::Node;
use crate::traits::{Delay, Transceiver};
use crate::types::{Id, MsgType, DRAIN_TIMEOUT_MS};

impl<T, D> Node<T, D>
where
    T: Transceiver,
    D: Delay,
{
    /// Run one round in the sensor role.
    pub(crate) fn run_sensor(&mut self) {
        let parent = self.find_parent();
        let children = self.count_children();
        self.proxy_children(parent, children);

        // Delivery failures end the round either way; the payload is simply
        // lost for this round.
        let len = self.stage_own_data(parent);
        let _ = self.deliver(len);
        let len = self.stage_header(MsgType::EndOfData, parent);
        let _ = self.deliver(len);

        debug!("node {}: round complete", self.id());
    }

    /// Block until an invitation arrives and is answered.
    ///
    /// Invitations are broadcast, so the receiver field is not inspected.
    /// Anything other than `IAmParent` is skipped, and a failed `IAmChild`
    /// delivery restarts discovery from the top.
    fn find_parent(&mut self) -> Id {
        loop {
            let Some(header) = self.receive_framed(0) else {
                continue;
            };
            if header.msg_type != MsgType::IAmParent {
                continue;
            }

            let parent = header.transmitter;
            let len = self.stage_header(MsgType::IAmChild, parent);
            if self.deliver(len).is_ok() {
                debug!("node {}: adopted parent {}", self.id(), parent);
                return parent;
            }
            debug!(
                "node {}: parent {} never acknowledged, listening again",
                self.id(),
                parent
            );
        }
    }

    /// Forward child traffic upward until every child subtree has drained.
    ///
    /// Each acked `Data` frame is re-addressed to the parent and delivered
    /// with the originator's transmitter id intact, so the collector can
    /// attribute the payload to its source. `EndOfData` frames are consumed,
    /// one per child. A fully silent window abandons whatever subtrees
    /// remain.
    fn proxy_children(&mut self, parent: Id, child_count: u32) {
        let mut remaining = child_count;
        while remaining > 0 {
            let Some(header) = self.receive_framed(DRAIN_TIMEOUT_MS) else {
                debug!(
                    "node {}: abandoning {} unfinished subtrees",
                    self.id(),
                    remaining
                );
                return;
            };
            if header.receiver != self.id() {
                continue;
            }
            match header.msg_type {
                MsgType::EndOfData => {
                    self.transmit_ack(header.transmitter);
                    remaining -= 1;
                }
                MsgType::Data => {
                    self.transmit_ack(header.transmitter);
                    let len = self.stage_forward(header, parent);
                    let _ = self.deliver(len);
                }
                _ => {}
            }
        }
    }
}
