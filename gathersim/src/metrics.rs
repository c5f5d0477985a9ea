//! Metrics collected by the simulated medium.

use gathertree::{Header, Id, MsgType};

/// One frame as handed to the medium, before loss is applied.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    /// Station that transmitted the frame.
    pub from: Id,
    /// Decoded header, if the bytes form one.
    pub header: Option<Header>,
    /// Raw frame bytes.
    pub bytes: Vec<u8>,
}

impl FrameRecord {
    /// The frame's message type, if the header decoded.
    pub fn msg_type(&self) -> Option<MsgType> {
        self.header.map(|h| h.msg_type)
    }
}

/// Medium metrics collected over a simulation.
#[derive(Debug, Clone, Default)]
pub struct MediumMetrics {
    /// Total frames handed to the medium.
    pub frames_sent: u64,
    /// Frame deliveries to individual stations.
    pub frames_delivered: u64,
    /// Deliveries suppressed by loss rate or drop rules.
    pub frames_dropped: u64,
    /// Every transmitted frame, in transmission order.
    pub frames: Vec<FrameRecord>,
}

impl MediumMetrics {
    /// Create new empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames of the given type transmitted by `from`.
    pub fn count_sent(&self, from: Id, msg_type: MsgType) -> usize {
        self.frames
            .iter()
            .filter(|r| r.from == from && r.msg_type() == Some(msg_type))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gathertree::HEADER_SIZE;

    #[test]
    fn test_count_sent() {
        let mut metrics = MediumMetrics::new();
        for (from, msg_type) in [(1, MsgType::Ack), (1, MsgType::Ack), (2, MsgType::Data)] {
            let mut bytes = vec![0u8; HEADER_SIZE];
            let header = Header::new(msg_type, from, 0);
            header.encode(&mut bytes);
            metrics.frames.push(FrameRecord {
                from,
                header: Some(header),
                bytes,
            });
        }

        assert_eq!(metrics.count_sent(1, MsgType::Ack), 2);
        assert_eq!(metrics.count_sent(2, MsgType::Data), 1);
        assert_eq!(metrics.count_sent(2, MsgType::Ack), 0);
    }
}
