//! Driver configuration
//!
//! [`Config`] holds the settings the driver applies to the chip. It is
//! passed to [`Mrf24j40::with_config`](crate::Mrf24j40::with_config) and
//! changed afterwards only through the driver's setters, which keep the chip
//! and the stored copy in sync.

use crate::registers::FIRST_CHANNEL;

/// Default receive flush timeout in microseconds
pub const DEFAULT_RX_FLUSH_TIMEOUT_US: u32 = 10_000;

/// MRF24J40 module variant.
///
/// The MA module has a PCB antenna and no front-end. The MB, MC, MD and ME
/// modules add an external power amplifier and low-noise amplifier that
/// must be driven through the chip's GPIO pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    Mrf24j40Ma,
    Mrf24j40Mb,
    Mrf24j40Mc,
    Mrf24j40Md,
    Mrf24j40Me,
}

impl Variant {
    /// Whether the module carries an external PA/LNA
    pub fn has_external_amplifier(self) -> bool {
        !matches!(self, Self::Mrf24j40Ma)
    }
}

/// Transceiver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// PAN identifier. Default: 0
    pub pan_id: u16,
    /// Short (16-bit) source address. Default: 1. Only written to the chip
    /// by [`set_address`](crate::Mrf24j40::set_address).
    pub address: u16,
    /// IEEE 802.15.4 channel, 11 to 26. Default: 11. Reset to 11 by
    /// [`initialize`](crate::Mrf24j40::initialize).
    pub channel: u8,
    /// Coordinator mode. Default: off. Cleared by
    /// [`initialize`](crate::Mrf24j40::initialize).
    pub coordinator: bool,
    /// Drive an external PA/LNA. Default depends on the [`Variant`]
    pub external_amplifier: bool,
    /// Upper bound on the wait for RXIF to clear after a receive, in
    /// microseconds. `None` waits forever.
    pub rx_flush_timeout_us: Option<u32>,
}

impl Config {
    /// Default configuration for a module variant
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            external_amplifier: variant.has_external_amplifier(),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pan_id: 0,
            address: 1,
            channel: FIRST_CHANNEL,
            coordinator: false,
            external_amplifier: false,
            rx_flush_timeout_us: Some(DEFAULT_RX_FLUSH_TIMEOUT_US),
        }
    }
}
