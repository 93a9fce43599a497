//! Register definitions for the MRF24J40
//! Generated from the MRF24J40 datasheet (DS39776C)
//!
//! The chip exposes two register files. Short-address registers live at
//! `0x00..=0x3F` and are reached with a one-byte SPI header. Long-address
//! registers live at `0x200..=0x27F` and share the long address space with the
//! frame memory (see [`memory`]). Register ids below `0x40` are treated as short
//! addresses by [`Device`](crate::Device).

/// Implements the single-byte `regiface` codecs for registers that hold one
/// raw `value: u8`.
macro_rules! byte_register_codec {
    ($($reg:ty),+ $(,)?) => {
        $(
            impl regiface::FromByteArray for $reg {
                type Error = core::convert::Infallible;
                type Array = [u8; 1];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self { value: bytes[0] })
                }
            }

            impl regiface::ToByteArray for $reg {
                type Error = core::convert::Infallible;
                type Array = [u8; 1];

                fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                    Ok([self.value])
                }
            }
        )+
    };
}

pub(crate) use byte_register_codec;

mod long;
pub mod memory;
mod short;

pub use long::*;
pub use short::*;
