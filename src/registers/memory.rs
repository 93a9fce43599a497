//! Frame memory map
//!
//! Frame memory shares the long address space with the long registers and
//! is always accessed with long addressing.

/// TX normal FIFO. Byte 0 is the header length, byte 1 the frame length,
/// the frame itself starts at byte 2.
pub const TX_NORMAL_FIFO: u16 = 0x000;

/// RX FIFO. Byte 0 is the received frame length (including FCS), the frame
/// starts at byte 1.
pub const RX_FIFO: u16 = 0x300;

