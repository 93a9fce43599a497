//! Short-address registers (0x00..=0x3F)
//!
//! This module contains the control registers reached with the one-byte SPI
//! header, including:
//! - MAC receive control and PAN/short address filtering
//! - Transmit triggering and RX FIFO flushing
//! - Interrupt status
//! - Baseband and RF state machine control
//! - Power amplifier, GPIO and CCA calibration values
//!
//! Calibration registers that hold one opaque byte expose a `RECOMMENDED`
//! constant with the value programmed during initialization.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::byte_register_codec;

bitflags! {
    /// RXMCR bit fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RxMacFlags: u8 {
        /// Automatic acknowledgement response disabled
        const NO_ACK_RESPONSE = 1 << 5;
        /// Device is the PAN coordinator
        const PAN_COORDINATOR = 1 << 3;
        /// Device is a coordinator
        const COORDINATOR = 1 << 2;
        /// Accept packets with CRC errors
        const ERROR_PACKETS = 1 << 1;
        /// Promiscuous mode, accept all packets with a valid CRC
        const PROMISCUOUS = 1;
    }
}

/// Receive MAC control register RXMCR (address: 0x00)
///
/// Coordinator mode is the 2-bit field `PAN_COORDINATOR | COORDINATOR`.
/// Other bits must be preserved when toggling it.
#[register(0x00u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct RxMacControl {
    pub flags: RxMacFlags,
}

impl RxMacControl {
    /// Both coordinator bits
    pub const COORDINATOR_MODE: RxMacFlags =
        RxMacFlags::PAN_COORDINATOR.union(RxMacFlags::COORDINATOR);
}

/// PAN ID low byte register PANIDL (address: 0x01)
#[register(0x01u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct PanIdLow {
    pub value: u8,
}

/// PAN ID high byte register PANIDH (address: 0x02)
#[register(0x02u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct PanIdHigh {
    pub value: u8,
}

/// Short address low byte register SADRL (address: 0x03)
#[register(0x03u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct ShortAddressLow {
    pub value: u8,
}

/// Short address high byte register SADRH (address: 0x04)
#[register(0x04u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct ShortAddressHigh {
    pub value: u8,
}

bitflags! {
    /// RXFLUSH bit fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RxFlushFlags: u8 {
        /// Wake signal polarity
        const WAKE_POLARITY = 1 << 6;
        /// Enable the wake pad
        const WAKE_PAD_ENABLE = 1 << 5;
        /// Only accept command frames
        const COMMAND_ONLY = 1 << 3;
        /// Only accept data frames
        const DATA_ONLY = 1 << 2;
        /// Only accept beacon frames
        const BEACON_ONLY = 1 << 1;
        /// Reset the RX FIFO address pointer. Self-clearing.
        const FLUSH = 1;
    }
}

/// Receive FIFO flush register RXFLUSH (address: 0x0D)
#[register(0x0Du16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct RxFlush {
    pub flags: RxFlushFlags,
}

/// Power amplifier control 2 register PACON2 (address: 0x18)
///
/// Recommended value enables the FIFO and sets the transmitter on-time
/// before beacon to 6 symbols.
#[register(0x18u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct PowerAmplifierControl2 {
    pub value: u8,
}

impl PowerAmplifierControl2 {
    pub const RECOMMENDED: Self = Self { value: 0x98 };
}

bitflags! {
    /// TXNCON bit fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TxNormalFlags: u8 {
        /// Frame pending status of the last acknowledgement (read only)
        const FRAME_PENDING_STATUS = 1 << 4;
        /// Transmit as an indirect (GTS) frame
        const INDIRECT = 1 << 3;
        /// Request an acknowledgement
        const ACK_REQUEST = 1 << 2;
        /// Enable security
        const SECURITY_ENABLE = 1 << 1;
        /// Transmit the frame in the TX normal FIFO. Self-clearing.
        const TRIGGER = 1;
    }
}

/// Transmit normal FIFO control register TXNCON (address: 0x1B)
#[register(0x1Bu16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct TxNormalControl {
    pub flags: TxNormalFlags,
}

/// Transmit stabilization register TXSTBL (address: 0x2E)
///
/// Recommended value sets RFSTBL to 9 and MSIFS to 5 symbols.
#[register(0x2Eu16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct TxStabilization {
    pub value: u8,
}

impl TxStabilization {
    pub const RECOMMENDED: Self = Self { value: 0x95 };
}

bitflags! {
    /// INTSTAT bit fields. Flags clear when the register is read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InterruptFlags: u8 {
        /// Sleep alert
        const SLEEP = 1 << 7;
        /// Wake-up alert
        const WAKE = 1 << 6;
        /// Half symbol timer
        const HALF_SYMBOL_TIMER = 1 << 5;
        /// Security key request
        const SECURITY = 1 << 4;
        /// RX FIFO reception complete
        const RX = 1 << 3;
        /// TX GTS2 FIFO transmission complete
        const TX_GTS2 = 1 << 2;
        /// TX GTS1 FIFO transmission complete
        const TX_GTS1 = 1 << 1;
        /// TX normal FIFO transmission complete
        const TX_NORMAL = 1;
    }
}

/// Interrupt status register INTSTAT (address: 0x31)
#[register(0x31u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, Default)]
pub struct InterruptStatus {
    pub flags: InterruptFlags,
}

/// GPIO port register GPIO (address: 0x33)
#[register(0x33u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct Gpio {
    pub value: u8,
}

impl Gpio {
    /// Drives GPIO3 high, which the PA/LNA modules use as the RF switch enable
    pub const RECOMMENDED: Self = Self { value: 0x08 };
}

/// GPIO direction register TRISGPIO (address: 0x34)
#[register(0x34u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct GpioDirection {
    pub value: u8,
}

impl GpioDirection {
    /// GPIO3 as output
    pub const RECOMMENDED: Self = Self { value: 0x08 };
}

bitflags! {
    /// RFCTL bit fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RfControlFlags: u8 {
        /// Hold the RF state machine in reset
        const RF_RESET = 1 << 2;
    }
}

/// RF mode control register RFCTL (address: 0x36)
///
/// Writing `RF_RESET` followed by an empty value restarts the RF state
/// machine, which is required after a channel change. The RF circuitry then
/// needs at least 192 µs to calibrate.
#[register(0x36u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct RfModeControl {
    pub flags: RfControlFlags,
}

bitflags! {
    /// BBREG1 bit fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Baseband1Flags: u8 {
        /// Disable the receiver decoder, so no new frame is written to the RX FIFO
        const RX_DECODE_INVERT = 1 << 2;
    }
}

/// Baseband 1 register BBREG1 (address: 0x39)
#[register(0x39u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct Baseband1 {
    pub flags: Baseband1Flags,
}

/// Baseband 2 register BBREG2 (address: 0x3A)
///
/// Recommended value selects CCA mode 1 (energy detection).
#[register(0x3Au16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct Baseband2 {
    pub value: u8,
}

impl Baseband2 {
    pub const RECOMMENDED: Self = Self { value: 0x80 };
}

/// Baseband 6 register BBREG6 (address: 0x3E)
///
/// Recommended value appends RSSI to each received frame in the RX FIFO.
#[register(0x3Eu16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct Baseband6 {
    pub value: u8,
}

impl Baseband6 {
    pub const RECOMMENDED: Self = Self { value: 0x40 };
}

/// Energy detection threshold for CCA register CCAEDTH (address: 0x3F)
///
/// Recommended threshold is approximately -69 dBm.
#[register(0x3Fu16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct CcaEnergyThreshold {
    pub value: u8,
}

impl CcaEnergyThreshold {
    pub const RECOMMENDED: Self = Self { value: 0x60 };
}

byte_register_codec!(
    PanIdLow,
    PanIdHigh,
    ShortAddressLow,
    ShortAddressHigh,
    PowerAmplifierControl2,
    TxStabilization,
    Gpio,
    GpioDirection,
    Baseband2,
    Baseband6,
    CcaEnergyThreshold,
);

impl FromByteArray for RxMacControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: RxMacFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for RxMacControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for RxFlush {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: RxFlushFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for RxFlush {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for TxNormalControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: TxNormalFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for TxNormalControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for InterruptStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: InterruptFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl FromByteArray for RfModeControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: RfControlFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for RfModeControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for Baseband1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: Baseband1Flags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for Baseband1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinator_mode_is_two_bit_field() {
        assert_eq!(RxMacControl::COORDINATOR_MODE.bits(), 0b0000_1100);
    }

    #[test]
    fn rx_mac_control_keeps_unknown_bits() {
        let reg = RxMacControl::from_bytes([0xC1]).unwrap();
        assert!(reg.flags.contains(RxMacFlags::PROMISCUOUS));
        assert_eq!(reg.to_bytes().unwrap(), [0xC1]);
    }

    #[test]
    fn interrupt_status_rx_flag() {
        let reg = InterruptStatus::from_bytes([0x08]).unwrap();
        assert!(reg.flags.contains(InterruptFlags::RX));
        let reg = InterruptStatus::from_bytes([0xF7]).unwrap();
        assert!(!reg.flags.contains(InterruptFlags::RX));
    }
}
