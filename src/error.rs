//! Driver error type
//!
//! Register and frame-memory access fail only when the SPI bus does. Payload
//! buffer operations fail when a fixed-width value does not fit or is not
//! available. Variable-length buffer operations never fail, they clamp.

use regiface::errors::Error as RegifaceError;

/// Errors returned by the MRF24J40 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// SPI communication failed
    Bus,
    /// A register value read from the chip could not be decoded
    Deserialization,
    /// A fixed-width write did not fit in the transmit buffer. Nothing was written.
    BufferOverflow {
        /// Bytes the write needed
        requested: usize,
        /// Bytes left in the transmit buffer
        available: usize,
    },
    /// A fixed-width read asked for more bytes than the receive buffer holds.
    /// The read cursor was not moved.
    BufferUnderrun {
        /// Bytes the read needed
        requested: usize,
        /// Bytes left to read
        available: usize,
    },
    /// `send_packet` was called with nothing written since `start_packet`
    EmptyPacket,
    /// RXIF did not clear within the configured receive flush timeout
    Timeout,
}

impl From<RegifaceError> for Error {
    fn from(err: RegifaceError) -> Self {
        match err {
            RegifaceError::BusError => Error::Bus,
            _ => Error::Deserialization,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus => f.write_str("SPI bus error"),
            Error::Deserialization => f.write_str("invalid register value"),
            Error::BufferOverflow {
                requested,
                available,
            } => write!(
                f,
                "transmit buffer overflow: {requested} bytes requested, {available} available"
            ),
            Error::BufferUnderrun {
                requested,
                available,
            } => write!(
                f,
                "receive buffer underrun: {requested} bytes requested, {available} available"
            ),
            Error::EmptyPacket => f.write_str("no payload to send"),
            Error::Timeout => f.write_str("timed out waiting for RX flush"),
        }
    }
}
