//! MRF24J40 Register Interface
//!
//! This module provides the low-level interface to the MRF24J40 control
//! registers and frame memory over SPI.
//!
//! The chip uses two addressing frames, selected by [`RegisterAddress`]:
//!
//! | Mode  | Byte 0                       | Byte 1                          |
//! |-------|------------------------------|---------------------------------|
//! | Short | `(reg << 1) & 0x7E \| write` | data                            |
//! | Long  | `(reg >> 3) \| 0x80`         | `(reg << 5) \| (write << 4)`    |
//!
//! A long access is followed by a third data byte. Every access transfers a
//! single byte and is wrapped in its own SPI transaction, so chip select is
//! toggled around each one by the [`SpiDevice`](embedded_hal::spi::SpiDevice).
//!
//! # Example
//! ```no_run
//! use mrf24j40::{Device, RegisterAddress, registers::PanIdLow};
//!
//! fn dump<SPI: embedded_hal::spi::SpiDevice>(spi: SPI) -> Result<(), regiface::errors::Error> {
//!     let mut device = Device::new(spi);
//!
//!     // Typed register access
//!     let _pan_low: PanIdLow = device.read_register()?;
//!
//!     // Raw access to the TX normal FIFO
//!     device.write(RegisterAddress::Long(0x000), 11)?;
//!     Ok(())
//! }
//! ```

use core::convert::Infallible;

use embedded_hal::spi::Operation;
use regiface::{errors::Error as RegifaceError, ReadableRegister, ToByteArray, WritableRegister};

/// Highest register id in the short address space
const SHORT_ADDRESS_MAX: u16 = 0x3F;

/// Address of a single byte in one of the two register address spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterAddress {
    /// 6-bit short address (control registers 0x00..=0x3F)
    Short(u8),
    /// 10-bit long address (long registers and frame memory)
    Long(u16),
}

impl RegisterAddress {
    /// Maps a register id to its address space. Ids up to 0x3F are short
    /// registers, everything above is long.
    pub fn from_id(id: u16) -> Self {
        if id <= SHORT_ADDRESS_MAX {
            Self::Short(id as u8)
        } else {
            Self::Long(id)
        }
    }

    /// Encodes the SPI header for this address. Returns the header bytes and
    /// how many of them are used.
    pub fn header(self, write: bool) -> ([u8; 2], usize) {
        match self {
            Self::Short(reg) => ([((reg << 1) & 0x7E) | u8::from(write), 0], 1),
            Self::Long(reg) => {
                let reg = reg & 0x3FF;
                let low = (reg << 5) as u8;
                (
                    [(reg >> 3) as u8 | 0x80, if write { low | 0x10 } else { low }],
                    2,
                )
            }
        }
    }
}

/// Register access layer for the MRF24J40.
///
/// This struct wraps an SPI interface and provides single byte, typed
/// register and frame memory access.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Wraps the SPI device the MRF24J40 is attached to. No bus traffic
    /// happens until the first access.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Gives back the SPI device, for example to share the bus with another
    /// peripheral once the radio is no longer used.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Device<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Reads one byte from the device.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn read(&mut self, address: RegisterAddress) -> Result<u8, RegifaceError> {
        let (header, len) = address.header(false);
        let mut value = [0u8];

        self.spi
            .transaction(&mut [
                Operation::Write(&header[..len]),
                Operation::Read(&mut value),
            ])
            .map_err(|_| RegifaceError::BusError)?;

        Ok(value[0])
    }

    /// Writes one byte to the device.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write(&mut self, address: RegisterAddress, value: u8) -> Result<(), RegifaceError> {
        let (header, len) = address.header(true);

        self.spi
            .transaction(&mut [Operation::Write(&header[..len]), Operation::Write(&[value])])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Reads a register value from the device.
    ///
    /// # Type Parameters
    /// * `R` - Single byte register type implementing ReadableRegister with u16 ID
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    /// * `RegifaceError::DeserializationError` - Failed to parse register value
    pub fn read_register<R>(&mut self) -> Result<R, RegifaceError>
    where
        R: ReadableRegister<IdType = u16, Array = [u8; 1]>,
    {
        let raw_value = self.read(RegisterAddress::from_id(R::id()))?;

        R::from_bytes([raw_value]).map_err(|_| RegifaceError::DeserializationError)
    }

    /// Writes a value to a device register.
    ///
    /// # Type Parameters
    /// * `R` - Single byte register type implementing WritableRegister with u16 ID
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), RegifaceError>
    where
        R: WritableRegister<IdType = u16, Error = Infallible, Array = [u8; 1]>,
    {
        let [raw_value] = match register.to_bytes() {
            Ok(bytes) => bytes,
            Err(never) => match never {},
        };

        self.write(RegisterAddress::from_id(R::id()), raw_value)
    }

    /// Read-modify-write of a register. Bits not touched by `f` keep the
    /// value read from the device.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    /// * `RegifaceError::DeserializationError` - Failed to parse register value
    pub fn modify_register<R, F>(&mut self, f: F) -> Result<(), RegifaceError>
    where
        R: ReadableRegister<IdType = u16, Array = [u8; 1]>
            + WritableRegister<Error = Infallible, Array = [u8; 1]>,
        F: FnOnce(&mut R),
    {
        let mut register = self.read_register::<R>()?;
        f(&mut register);
        self.write_register(register)
    }

    /// Writes bytes to frame memory, one long-addressed access per byte.
    ///
    /// # Arguments
    /// * `offset` - Long address of the first byte
    /// * `bytes` - Data to write
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write_frame_memory(&mut self, offset: u16, bytes: &[u8]) -> Result<(), RegifaceError> {
        for (address, byte) in (offset..).zip(bytes) {
            self.write(RegisterAddress::Long(address), *byte)?;
        }
        Ok(())
    }

    /// Reads bytes from frame memory, one long-addressed access per byte.
    ///
    /// # Arguments
    /// * `offset` - Long address of the first byte
    /// * `bytes` - Buffer to store read data
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn read_frame_memory(
        &mut self,
        offset: u16,
        bytes: &mut [u8],
    ) -> Result<(), RegifaceError> {
        for (address, byte) in (offset..).zip(bytes.iter_mut()) {
            *byte = self.read(RegisterAddress::Long(address))?;
        }
        Ok(())
    }
}
