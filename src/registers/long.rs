//! Long-address registers (0x200..=0x27F)
//!
//! This module contains registers reached with the two-byte SPI header:
//! - RF channel selection and RF optimization
//! - VCO, PLL and transmit filter calibration
//! - Sleep clock configuration
//! - Test mode, which also switches the PA/LNA control outputs

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::byte_register_codec;

/// Lowest IEEE 802.15.4 channel in the 2.4 GHz band
pub const FIRST_CHANNEL: u8 = 11;
/// Highest IEEE 802.15.4 channel in the 2.4 GHz band
pub const LAST_CHANNEL: u8 = 26;

/// RF control 0 register RFCON0 (address: 0x200)
///
/// Selects the channel and the RF optimization setting.
///
/// # Important Notes
/// - The channel field is the offset from channel 11 (0 = 2405 MHz)
/// - An RF state machine reset is required for a new channel to take effect
#[register(0x200u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
pub struct RfControl0 {
    /// Channel offset from 11, bits [7:4]
    pub channel_offset: u8,
    /// RF optimization, bits [3:0]. Recommended value: 0x3
    pub rf_optimize: u8,
}

impl RfControl0 {
    pub const RECOMMENDED_RF_OPTIMIZE: u8 = 0x03;

    /// Builds the register value for an IEEE 802.15.4 channel.
    ///
    /// Returns `None` outside channels 11 to 26.
    pub fn for_channel(channel: u8) -> Option<Self> {
        if !(FIRST_CHANNEL..=LAST_CHANNEL).contains(&channel) {
            return None;
        }
        Some(Self {
            channel_offset: channel - FIRST_CHANNEL,
            rf_optimize: Self::RECOMMENDED_RF_OPTIMIZE,
        })
    }

    /// Channel number this register value selects
    pub fn channel(&self) -> u8 {
        self.channel_offset + FIRST_CHANNEL
    }
}

impl Default for RfControl0 {
    fn default() -> Self {
        Self {
            channel_offset: 0,
            rf_optimize: Self::RECOMMENDED_RF_OPTIMIZE,
        }
    }
}

/// RF control 1 register RFCON1 (address: 0x201)
///
/// VCO optimize control.
#[register(0x201u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct RfControl1 {
    pub value: u8,
}

impl RfControl1 {
    pub const RECOMMENDED: Self = Self { value: 0x01 };
}

/// RF control 2 register RFCON2 (address: 0x202)
///
/// Enables the PLL.
#[register(0x202u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct RfControl2 {
    pub value: u8,
}

impl RfControl2 {
    pub const RECOMMENDED: Self = Self { value: 0x80 };
}

/// RF control 6 register RFCON6 (address: 0x206)
///
/// TX filter and 20 MHz clock recovery control.
#[register(0x206u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct RfControl6 {
    pub value: u8,
}

impl RfControl6 {
    pub const RECOMMENDED: Self = Self { value: 0x90 };
}

/// RF control 7 register RFCON7 (address: 0x207)
///
/// Sleep clock selection. Recommended value selects the internal 100 kHz
/// oscillator.
#[register(0x207u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct RfControl7 {
    pub value: u8,
}

impl RfControl7 {
    pub const RECOMMENDED: Self = Self { value: 0x80 };
}

/// RF control 8 register RFCON8 (address: 0x208)
///
/// VCO control.
#[register(0x208u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct RfControl8 {
    pub value: u8,
}

impl RfControl8 {
    pub const RECOMMENDED: Self = Self { value: 0x10 };
}

/// Sleep clock control 1 register SLPCON1 (address: 0x220)
///
/// Recommended value disables CLKOUT and sets the sleep clock divisor.
#[register(0x220u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct SleepClockControl1 {
    pub value: u8,
}

impl SleepClockControl1 {
    pub const RECOMMENDED: Self = Self { value: 0x21 };
}

bitflags! {
    /// TESTMODE bit fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TestModeFlags: u8 {
        /// GPIO0-2 drive the external PA/LNA automatically (3-bit field, 0b111)
        const PA_LNA = 0b0000_0111;
    }
}

/// Test mode register TESTMODE (address: 0x22F)
///
/// # Important Notes
/// - Only the PA/LNA field is touched by the driver, other bits are preserved
/// - Must only be enabled on modules fitted with an external PA/LNA
#[register(0x22Fu16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct TestMode {
    pub flags: TestModeFlags,
}

byte_register_codec!(
    RfControl1,
    RfControl2,
    RfControl6,
    RfControl7,
    RfControl8,
    SleepClockControl1,
);

impl FromByteArray for RfControl0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            channel_offset: bytes[0] >> 4,
            rf_optimize: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for RfControl0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.channel_offset << 4) | (self.rf_optimize & 0x0F)])
    }
}

impl FromByteArray for TestMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: TestModeFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for TestMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}
