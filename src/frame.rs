//! IEEE 802.15.4 MAC framing
//!
//! Every frame the driver sends is a data frame without security, frame
//! pending or acknowledgement request, using intra-PAN (PAN ID compression)
//! addressing with 16-bit short addresses on both ends.
//!
//! The TX normal FIFO expects two length bytes ahead of the frame itself, so
//! the header written to frame memory is [`MHR_SIZE`] bytes long:
//!
//! | Offset | Field                  |
//! |--------|------------------------|
//! | 0      | header length          |
//! | 1      | frame length           |
//! | 2..4   | frame control (LE)     |
//! | 4      | sequence number        |
//! | 5..7   | PAN ID (LE)            |
//! | 7..9   | destination address (LE) |
//! | 9..11  | source address (LE)    |

use bitflags::bitflags;

/// Bytes written to frame memory ahead of the payload
pub const MHR_SIZE: usize = 11;
/// MAC footer (FCS) appended by the chip
pub const MFR_SIZE: usize = 2;
/// Largest PSDU the PHY carries
pub const MAX_FRAME_SIZE: usize = 127;
/// Largest payload that fits in one frame
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - MHR_SIZE - MFR_SIZE;

/// Broadcast short address
pub const BROADCAST_ADDRESS: u16 = 0xFFFF;

bitflags! {
    /// Frame control field
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameControl: u16 {
        /// Frame type: data
        const DATA = 0b001;
        /// Security enabled
        const SECURITY = 1 << 3;
        /// Frame pending
        const FRAME_PENDING = 1 << 4;
        /// Acknowledgement request
        const ACK_REQUEST = 1 << 5;
        /// Intra-PAN, the source PAN ID is omitted
        const PAN_ID_COMPRESSION = 1 << 6;
        /// Destination addressing mode: 16-bit short address
        const DST_SHORT_ADDRESS = 0b10 << 10;
        /// Source addressing mode: 16-bit short address
        const SRC_SHORT_ADDRESS = 0b10 << 14;
    }
}

impl FrameControl {
    /// Frame control used for every outgoing frame (0x8841)
    pub const DATA_FRAME: Self = Self::DATA
        .union(Self::PAN_ID_COMPRESSION)
        .union(Self::DST_SHORT_ADDRESS)
        .union(Self::SRC_SHORT_ADDRESS);
}

/// MAC header of an outgoing data frame. Built fresh for every send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacHeader {
    pub sequence_number: u8,
    pub pan_id: u16,
    pub destination: u16,
    pub source: u16,
}

impl MacHeader {
    /// Encodes the header as written to the TX normal FIFO for a payload of
    /// `payload_len` bytes.
    pub fn to_bytes(&self, payload_len: usize) -> [u8; MHR_SIZE] {
        let mut bytes = [0u8; MHR_SIZE];
        bytes[0] = MHR_SIZE as u8;
        bytes[1] = (MHR_SIZE + payload_len) as u8;
        bytes[2..4].copy_from_slice(&FrameControl::DATA_FRAME.bits().to_le_bytes());
        bytes[4] = self.sequence_number;
        bytes[5..7].copy_from_slice(&self.pan_id.to_le_bytes());
        bytes[7..9].copy_from_slice(&self.destination.to_le_bytes());
        bytes[9..11].copy_from_slice(&self.source.to_le_bytes());
        bytes
    }
}

/// Payload length carried by a received frame of `frame_len` bytes
/// (as reported in the first RX FIFO byte), clamped to [`MAX_PAYLOAD_SIZE`].
pub fn payload_len(frame_len: u8) -> usize {
    usize::from(frame_len)
        .saturating_sub(MHR_SIZE + MFR_SIZE)
        .min(MAX_PAYLOAD_SIZE)
}
