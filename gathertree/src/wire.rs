//! Wire format serialization and deserialization.
//!
//! A frame is a fixed 12-byte header followed by 0 to 243 payload bytes:
//!
//! ```text
//! [msg_type: u32 le] [transmitter_id: u32 le] [receiver_id: u32 le] [payload...]
//! ```
//!
//! All integers are little-endian on the wire; hosts with big-endian layouts
//! byte-swap through the explicit `Reader`/`Writer` accessors. The codec never
//! allocates: it reads and writes caller-provided byte regions.

use crate::types::{Id, MsgType, HEADER_SIZE};

/// Decoding error types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame shorter than the fixed header.
    UnexpectedEof,
    /// Unknown message type discriminant.
    InvalidMessageType,
}

/// Zero-copy reader over a byte slice.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a new reader over a byte slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Read a fixed number of bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.pos + len > self.buf.len() {
            return Err(DecodeError::UnexpectedEof);
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a u32 in little-endian format.
    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Writer for encoding frames into a caller-provided buffer.
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    /// Create a writer over a byte region.
    ///
    /// The caller guarantees the region is large enough for what it encodes;
    /// frame sizes are bounded by `MAX_PACKET_SIZE` at the call sites.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Write a slice of bytes.
    pub fn write_bytes(&mut self, v: &[u8]) {
        self.buf[self.pos..self.pos + v.len()].copy_from_slice(v);
        self.pos += v.len();
    }

    /// Write a u32 in little-endian format.
    pub fn write_u32_le(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    /// Finish writing and return the number of bytes written.
    pub fn finish(self) -> usize {
        self.pos
    }
}

/// Decoded frame header.
///
/// The payload is not part of the header; receivers take it as the byte
/// region following the first `HEADER_SIZE` bytes of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Kind of message.
    pub msg_type: MsgType,
    /// Id of the transmitting node. For proxied data frames this stays the
    /// originating sensor, not the forwarding hop.
    pub transmitter: Id,
    /// Id of the intended receiver (0 means broadcast).
    pub receiver: Id,
}

impl Header {
    /// Create a header.
    pub fn new(msg_type: MsgType, transmitter: Id, receiver: Id) -> Self {
        Self {
            msg_type,
            transmitter,
            receiver,
        }
    }

    /// Encode the header into the first `HEADER_SIZE` bytes of `buf`.
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> usize {
        let mut w = Writer::new(&mut buf[..HEADER_SIZE]);
        w.write_u32_le(self.msg_type as u32);
        w.write_u32_le(self.transmitter);
        w.write_u32_le(self.receiver);
        w.finish()
    }

    /// Decode a header from the start of a received frame.
    ///
    /// Frames shorter than `HEADER_SIZE` and unknown message types are
    /// rejected; the caller treats both as "no frame".
    pub fn decode(frame: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(frame);
        let raw_type = r.read_u32_le()?;
        let msg_type = MsgType::from_u32(raw_type).ok_or(DecodeError::InvalidMessageType)?;
        let transmitter = r.read_u32_le()?;
        let receiver = r.read_u32_le()?;
        Ok(Self {
            msg_type,
            transmitter,
            receiver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BROADCAST;

    #[test]
    fn test_header_roundtrip() {
        let cases = [
            Header::new(MsgType::IAmParent, 1, BROADCAST),
            Header::new(MsgType::IAmChild, 2, 1),
            Header::new(MsgType::Data, 0xDEAD_BEEF, 7),
            Header::new(MsgType::EndOfData, 3, 2),
            Header::new(MsgType::Ack, u32::MAX, 1),
        ];

        for header in cases {
            let mut buf = [0u8; HEADER_SIZE];
            let written = header.encode(&mut buf);
            assert_eq!(written, HEADER_SIZE);
            assert_eq!(Header::decode(&buf), Ok(header));
        }
    }

    #[test]
    fn test_wire_layout_is_little_endian() {
        let header = Header::new(MsgType::Data, 0x0102_0304, 0x0A0B_0C0D);
        let mut buf = [0u8; HEADER_SIZE];
        header.encode(&mut buf);

        assert_eq!(
            buf,
            [
                0x02, 0x00, 0x00, 0x00, // Data
                0x04, 0x03, 0x02, 0x01, // transmitter
                0x0D, 0x0C, 0x0B, 0x0A, // receiver
            ]
        );
    }

    #[test]
    fn test_short_frame_rejected() {
        for len in 0..HEADER_SIZE {
            let buf = [0u8; HEADER_SIZE];
            assert_eq!(
                Header::decode(&buf[..len]),
                Err(DecodeError::UnexpectedEof),
                "length {} should be too short",
                len
            );
        }
    }

    #[test]
    fn test_unknown_msg_type_rejected() {
        let mut buf = [0u8; HEADER_SIZE];
        Header::new(MsgType::Ack, 1, 2).encode(&mut buf);
        buf[0] = 5; // first byte of the little-endian discriminant
        assert_eq!(Header::decode(&buf), Err(DecodeError::InvalidMessageType));
    }

    #[test]
    fn test_decode_ignores_trailing_payload() {
        let mut buf = [0u8; HEADER_SIZE + 3];
        Header::new(MsgType::Data, 9, 4).encode(&mut buf);
        buf[HEADER_SIZE..].copy_from_slice(&[0xAA, 0xBB, 0xCC]);

        let header = Header::decode(&buf).unwrap();
        assert_eq!(header.msg_type, MsgType::Data);
        assert_eq!(header.transmitter, 9);
        assert_eq!(header.receiver, 4);
    }
}
