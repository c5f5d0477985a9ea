//! Host traits for transceiver and timing abstraction.
//!
//! These traits are the only surface between the protocol and the platform.
//! They allow the same state machine to run over different:
//! - Radios (sub-GHz transceivers, powerline modems, simulated media)
//! - Timing sources (busy-wait loops, RTOS delays, `std::thread::sleep`)

/// Byte-level transceiver over a shared broadcast medium.
///
/// Designed around the most constrained transport (a sub-GHz radio) where:
/// - All transmissions are broadcasts (no unicast at the radio layer)
/// - MTU is 255 bytes
/// - Reception is blocking with a millisecond timeout
///
/// The protocol owns the transceiver exclusively for the duration of a
/// collection round.
pub trait Transceiver {
    /// Broadcast a frame to all neighbors.
    ///
    /// Best-effort: blocks until the bytes have been handed to the radio,
    /// with no delivery feedback. Reliability is layered on top via
    /// acknowledgements.
    fn transmit(&mut self, frame: &[u8]);

    /// Receive one frame into `buf`.
    ///
    /// Blocks for at most `timeout_ms` milliseconds; `timeout_ms == 0` means
    /// wait indefinitely. Returns the number of bytes received, or 0 on
    /// timeout or radio error. The written bytes are only meaningful until
    /// the next call.
    fn receive(&mut self, buf: &mut [u8], timeout_ms: u32) -> usize;

    /// Carrier sense: is any transmission currently observed on the medium?
    ///
    /// May be a conservative approximation; the protocol only uses it to
    /// reduce collision probability, never for correctness.
    fn is_channel_busy(&mut self) -> bool;
}

/// Blocking delay source.
pub trait Delay {
    /// Block for at least `duration_us` microseconds.
    ///
    /// Precision better than a millisecond is not required but improves
    /// contention recovery, since per-node backoffs differ by microseconds.
    fn sleep_us(&mut self, duration_us: u32);
}
