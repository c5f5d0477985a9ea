//! Core types and constants for the gathertree protocol.

use core::fmt;

// Frame layout limits. A frame is a 12-byte header followed by the payload;
// the whole frame must fit a single radio transmission.
pub const MAX_PACKET_SIZE: usize = 255;
pub const HEADER_SIZE: usize = 12;
pub const MAX_DATA_LENGTH: usize = MAX_PACKET_SIZE - HEADER_SIZE;

/// Receiver identifier accepted by every node.
pub const BROADCAST: Id = 0;

// Timing constants
/// Transmission attempts per reliable delivery before giving up.
pub const DELIVER_ATTEMPTS: u8 = 10;
/// Receive attempts while waiting for an acknowledgement after one transmission.
pub const ACK_ATTEMPTS: u8 = 3;
/// Per-attempt acknowledgement wait in milliseconds. Kept tight because the
/// acking side skips the backoff sleep (see ack transmission in `link`).
pub const ACK_TIMEOUT_MS: u32 = 10;
/// Child enumeration listen window in milliseconds.
pub const ENUMERATION_WINDOW_MS: u32 = 100;
/// Drain/proxy listen window in milliseconds. A window this long with no
/// frame at all means the remaining subtrees are unreachable.
pub const DRAIN_TIMEOUT_MS: u32 = 5000;

// Backoff: every node sleeps (id % BACKOFF_SPAN_US) + BACKOFF_BASE_US
// microseconds before a non-ack transmission, so nodes with distinct ids
// (modulo the span) contend for the channel at different times.
pub(crate) const BACKOFF_BASE_US: u32 = 1000;
pub(crate) const BACKOFF_SPAN_US: u32 = 9000;

/// 32-bit node identifier. Zero is reserved as the broadcast receiver.
pub type Id = u32;

/// Message kind carried in the frame header.
///
/// Discriminants are the on-wire values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum MsgType {
    /// Broadcast invitation: the transmitter accepts children this round.
    IAmParent = 0,
    /// Response to an invitation, unicast to the prospective parent.
    IAmChild = 1,
    /// Payload frame, attributed to the originating sensor.
    Data = 2,
    /// End-of-stream marker: the transmitter's subtree is fully drained.
    EndOfData = 3,
    /// Link-layer acknowledgement.
    Ack = 4,
}

impl MsgType {
    /// Map an on-wire discriminant back to a message kind.
    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(MsgType::IAmParent),
            1 => Some(MsgType::IAmChild),
            2 => Some(MsgType::Data),
            3 => Some(MsgType::EndOfData),
            4 => Some(MsgType::Ack),
            _ => None,
        }
    }
}

/// Error type for node configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Identifier 0 is reserved for broadcast.
    ReservedId,
    /// Sensor payload exceeds `MAX_DATA_LENGTH`.
    PayloadTooLarge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReservedId => write!(f, "id 0 is reserved for broadcast"),
            Error::PayloadTooLarge => {
                write!(f, "payload exceeds {} bytes", MAX_DATA_LENGTH)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_limits() {
        assert_eq!(HEADER_SIZE, 12);
        assert_eq!(MAX_DATA_LENGTH, 243);
        assert_eq!(HEADER_SIZE + MAX_DATA_LENGTH, MAX_PACKET_SIZE);
    }

    #[test]
    fn test_msg_type_discriminants() {
        for raw in 0..5 {
            let kind = MsgType::from_u32(raw).unwrap();
            assert_eq!(kind as u32, raw);
        }
        assert_eq!(MsgType::from_u32(5), None);
        assert_eq!(MsgType::from_u32(u32::MAX), None);
    }
}
