//! Collector drain loop.
//!
//! The collector enumerates its children, then receives until every child
//! subtree has reported end-of-data. Each data frame is handed to the user
//! callback tagged with the originating sensor's id.

use log::debug;

use crate::node::Node;
use crate::traits::{Delay, Transceiver};
use crate::types::{Id, MsgType, DRAIN_TIMEOUT_MS};

impl<T, D> Node<T, D>
where
    T: Transceiver,
    D: Delay,
{
    /// Run one round in the collector role.
    ///
    /// Both `Data` and `EndOfData` frames are acked; leaving end-of-data
    /// unacked would make the sender spend its whole retry budget on a
    /// marker that was already consumed.
    pub(crate) fn run_collector<F>(&mut self, on_payload: &mut F)
    where
        F: FnMut(Id, &[u8]),
    {
        let mut remaining = self.count_children();
        while remaining > 0 {
            let Some(header) = self.receive_framed(DRAIN_TIMEOUT_MS) else {
                debug!(
                    "node {}: abandoning round with {} subtrees undrained",
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
                    remaining -= 1;
                    self.transmit_ack(header.transmitter);
                }
                MsgType::Data => {
                    on_payload(header.transmitter, self.rx_payload());
                    self.transmit_ack(header.transmitter);
                }
                _ => {}
            }
        }
        debug!("node {}: all subtrees drained", self.id());
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use crate::config::Config;
    use crate::traits::test_impls::{RecordingDelay, ScriptedTransceiver};
    use crate::types::HEADER_SIZE;
    use crate::wire::Header;

    fn collector(id: Id) -> Node<ScriptedTransceiver, RecordingDelay> {
        Node::new(
            ScriptedTransceiver::new(),
            RecordingDelay::new(),
            Config::collector(id).unwrap(),
        )
    }

    fn data_frame(transmitter: Id, receiver: Id, payload: &[u8]) -> Vec<u8> {
        let mut frame = std::vec![0u8; HEADER_SIZE + payload.len()];
        Header::new(MsgType::Data, transmitter, receiver).encode(&mut frame);
        frame[HEADER_SIZE..].copy_from_slice(payload);
        frame
    }

    #[test]
    fn test_drain_dispatches_payloads() {
        let mut n = collector(1);
        let t = &mut n.transceiver;
        t.push_rx_header(Header::new(MsgType::IAmChild, 2, 1));
        t.push_timeout(); // enumeration closes
        t.push_rx(&data_frame(2, 1, &[0xAA, 0xBB]));
        t.push_rx_header(Header::new(MsgType::EndOfData, 2, 1));

        let mut collected = Vec::new();
        n.run_collector(&mut |from, payload| collected.push((from, payload.to_vec())));

        assert_eq!(collected, [(2, std::vec![0xAA, 0xBB])]);

        // Invitation, child ack, data ack, end-of-data ack.
        let sent: Vec<Header> = n
            .transceiver
            .tx_log
            .iter()
            .map(|f| Header::decode(f).unwrap())
            .collect();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[2], Header::new(MsgType::Ack, 1, 2));
        assert_eq!(sent[3], Header::new(MsgType::Ack, 1, 2));
    }

    #[test]
    fn test_drain_attributes_forwarded_payloads_to_originator() {
        let mut n = collector(1);
        let t = &mut n.transceiver;
        t.push_rx_header(Header::new(MsgType::IAmChild, 2, 1));
        t.push_timeout();
        // Sensor 2 forwards sensor 3's payload; the frame keeps 3 as
        // transmitter.
        t.push_rx(&data_frame(3, 1, &[0x02]));
        t.push_rx(&data_frame(2, 1, &[0x01]));
        t.push_rx_header(Header::new(MsgType::EndOfData, 2, 1));

        let mut collected = Vec::new();
        n.run_collector(&mut |from, payload| collected.push((from, payload.to_vec())));

        assert_eq!(
            collected,
            [(3, std::vec![0x02]), (2, std::vec![0x01])]
        );
    }

    #[test]
    fn test_drain_ignores_misaddressed_data() {
        let mut n = collector(1);
        let t = &mut n.transceiver;
        t.push_rx_header(Header::new(MsgType::IAmChild, 2, 1));
        t.push_timeout();
        t.push_rx(&data_frame(2, 9, &[0x77])); // not for us
        t.push_rx_header(Header::new(MsgType::EndOfData, 2, 1));

        let mut collected = Vec::new();
        n.run_collector(&mut |from, payload| collected.push((from, payload.to_vec())));

        assert!(collected.is_empty());
    }

    #[test]
    fn test_drain_abandons_on_silence() {
        let mut n = collector(1);
        let t = &mut n.transceiver;
        t.push_rx_header(Header::new(MsgType::IAmChild, 2, 1));
        t.push_rx_header(Header::new(MsgType::IAmChild, 2, 1)); // duplicate, counted twice
        t.push_timeout();
        t.push_rx(&data_frame(2, 1, &[0x01]));
        t.push_rx_header(Header::new(MsgType::EndOfData, 2, 1));
        t.push_timeout(); // second subtree never drains

        let mut collected = Vec::new();
        n.run_collector(&mut |from, payload| collected.push((from, payload.to_vec())));

        // The payload still arrived exactly once.
        assert_eq!(collected, [(2, std::vec![0x01])]);
    }

    #[test]
    fn test_no_children_no_drain() {
        let mut n = collector(1);
        n.transceiver.push_timeout();

        let mut calls = 0;
        n.run_collector(&mut |_, _| calls += 1);

        assert_eq!(calls, 0);
        assert_eq!(n.transceiver.tx_log.len(), 1); // just the invitation
    }
}
