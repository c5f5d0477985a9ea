//! Child enumeration: broadcast an invitation, then count the responses.
//!
//! Shared by both roles: sensors enumerate children before proxying, the
//! collector enumerates before draining.

use log::debug;

use crate::node::Node;
use crate::traits::{Delay, Transceiver};
use crate::types::{MsgType, BROADCAST, ENUMERATION_WINDOW_MS};

impl<T, D> Node<T, D>
where
    T: Transceiver,
    D: Delay,
{
    /// Invite children and count the ones that respond.
    ///
    /// Broadcasts a single `IAmParent` (backoff and carrier sense, no ack),
    /// then listens in 100 ms windows. Every `IAmChild` addressed to this
    /// node is acked and counted; the first window yielding anything else
    /// (silence or unrelated traffic) closes enumeration.
    ///
    /// Responses are not deduplicated by transmitter: a child whose ack was
    /// lost re-sends `IAmChild` and is counted twice. The drain loops
    /// tolerate the inflated count by timing out on the missing subtree.
    pub(crate) fn count_children(&mut self) -> u32 {
        let len = self.stage_header(MsgType::IAmParent, BROADCAST);
        self.transmit_framed(len);

        let mut count = 0u32;
        loop {
            match self.receive_framed(ENUMERATION_WINDOW_MS) {
                Some(header)
                    if header.receiver == self.id() && header.msg_type == MsgType::IAmChild =>
                {
                    self.transmit_ack(header.transmitter);
                    count += 1;
                    debug!(
                        "node {}: adopted child {} ({} so far)",
                        self.id(),
                        header.transmitter,
                        count
                    );
                }
                _ => {
                    debug!("node {}: enumeration closed with {} children", self.id(), count);
                    return count;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::config::Config;
    use crate::traits::test_impls::{RecordingDelay, ScriptedTransceiver};
    use crate::types::Id;
    use crate::wire::Header;

    fn node(id: Id) -> Node<ScriptedTransceiver, RecordingDelay> {
        Node::new(
            ScriptedTransceiver::new(),
            RecordingDelay::new(),
            Config::sensor(id, 0).unwrap(),
        )
    }

    #[test]
    fn test_quiet_medium_counts_zero() {
        let mut n = node(5);
        assert_eq!(n.count_children(), 0);

        // The invitation still went out, as a broadcast.
        assert_eq!(n.transceiver.tx_log.len(), 1);
        let invite = Header::decode(&n.transceiver.tx_log[0]).unwrap();
        assert_eq!(invite, Header::new(MsgType::IAmParent, 5, BROADCAST));
    }

    #[test]
    fn test_children_are_acked_and_counted() {
        let mut n = node(5);
        n.transceiver
            .push_rx_header(Header::new(MsgType::IAmChild, 8, 5));
        n.transceiver
            .push_rx_header(Header::new(MsgType::IAmChild, 9, 5));

        assert_eq!(n.count_children(), 2);

        // Invitation, then one ack per child.
        let acks: std::vec::Vec<Header> = n.transceiver.tx_log[1..]
            .iter()
            .map(|f| Header::decode(f).unwrap())
            .collect();
        assert_eq!(
            acks,
            [
                Header::new(MsgType::Ack, 5, 8),
                Header::new(MsgType::Ack, 5, 9),
            ]
        );
    }

    #[test]
    fn test_duplicate_child_counted_twice() {
        let mut n = node(5);
        n.transceiver
            .push_rx_header(Header::new(MsgType::IAmChild, 8, 5));
        n.transceiver
            .push_rx_header(Header::new(MsgType::IAmChild, 8, 5));

        assert_eq!(n.count_children(), 2);
    }

    #[test]
    fn test_unrelated_frame_closes_enumeration() {
        let mut n = node(5);
        n.transceiver
            .push_rx_header(Header::new(MsgType::IAmChild, 8, 5));
        // A neighbor starting its own enumeration.
        n.transceiver
            .push_rx_header(Header::new(MsgType::IAmParent, 8, BROADCAST));
        // Never reached.
        n.transceiver
            .push_rx_header(Header::new(MsgType::IAmChild, 9, 5));

        assert_eq!(n.count_children(), 1);
    }

    #[test]
    fn test_response_for_other_parent_closes_enumeration() {
        let mut n = node(5);
        n.transceiver
            .push_rx_header(Header::new(MsgType::IAmChild, 8, 6));

        assert_eq!(n.count_children(), 0);
        // No ack for a response addressed to someone else.
        assert_eq!(n.transceiver.tx_log.len(), 1);
    }
}
