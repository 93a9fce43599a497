#![cfg_attr(not(test), no_std)]
//! MRF24J40 Radio Driver
//!
//! This crate provides an `embedded-hal` driver for the Microchip MRF24J40
//! IEEE 802.15.4 2.4 GHz transceiver and the MRF24J40MA/MB/MC/MD/ME modules
//! built around it.
//!
//! # Features
//! - Channels 11-26 (2405-2480 MHz)
//! - PAN ID, 16-bit short address and coordinator mode configuration
//! - External PA/LNA control on the MB/MC/MD/ME modules
//! - Data frames with intra-PAN 16-bit addressing
//! - Byte-oriented payload buffers with typed little-endian accessors
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`driver`]: The [`Mrf24j40`] driver
//!   - Chip initialization and configuration
//!   - Packet send and polled receive
//!
//! - [`device`]: Register interface
//!   - Short (6-bit) and long (10-bit) register addressing over SPI
//!   - Typed register and frame memory access
//!
//! - [`registers`]: Register definitions for direct hardware access
//!   - Short address registers (MAC control, interrupts, baseband)
//!   - Long address registers (RF control, test mode)
//!   - [`registers::memory`]: Frame memory map
//!
//! - [`buffer`]: Transmit and receive payload buffers
//! - [`frame`]: IEEE 802.15.4 MAC header
//! - [`config`]: Driver configuration and module variants
//!
//! # Usage
//! Register access is built on the `regiface` crate. Each register is a
//! type whose address selects the short or long addressing frame.
//!
//! 1. Create a [`Mrf24j40`] with your SPI device, a delay provider and an
//!    [`InterruptControl`] implementation
//! 2. Call [`Mrf24j40::initialize`]
//! 3. Set PAN ID, address and channel
//! 4. Start a packet, write the payload and send it
//! 5. Poll [`Mrf24j40::receive_packet`] and read the payload
//!
//! # Important Notes
//! - Every register access is a separate SPI transaction
//! - Out of range channels are ignored without an error
//! - `send_packet` does not wait for the transmission to complete
//! - Only the payload of a received frame is kept, the MAC header and FCS
//!   are dropped
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, spi::SpiDevice};
//! use mrf24j40::{Error, Mrf24j40, NoInterruptControl, Variant};
//!
//! fn ping<SPI: SpiDevice, D: DelayNs>(spi: SPI, delay: D) -> Result<(), Error> {
//!     let mut radio = Mrf24j40::new(spi, delay, NoInterruptControl, Variant::Mrf24j40Ma);
//!     radio.initialize()?;
//!     radio.set_pan_id(0xCAFE)?;
//!     radio.set_channel(15)?;
//!
//!     radio.start_packet().write_str("ping");
//!     radio.send_packet(0x0002)?;
//!
//!     while !radio.receive_packet()? {}
//!     let mut text = [0u8; 16];
//!     if let Some(reply) = radio.reader().read_str(&mut text) {
//!         let _ = reply;
//!     }
//!     Ok(())
//! }
//! ```

#[macro_use]
mod log;

pub mod buffer;
pub mod config;
pub mod device;
pub mod driver;
mod error;
pub mod frame;
mod interrupt;
pub mod registers;

pub use buffer::{PacketReader, PacketWriter};
pub use config::{Config, Variant};
pub use device::{Device, RegisterAddress};
pub use driver::Mrf24j40;
pub use error::Error;
pub use frame::{MacHeader, BROADCAST_ADDRESS, MAX_PAYLOAD_SIZE};
pub use interrupt::{InterruptControl, NoInterruptControl};
