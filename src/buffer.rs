//! Payload buffers
//!
//! [`PacketWriter`] collects the payload of the next outgoing frame and
//! [`PacketReader`] exposes the payload of the last received one. Both hold
//! [`MAX_PAYLOAD_SIZE`] bytes and keep their own cursor.
//!
//! Numbers are stored little-endian, floats as IEEE-754 binary32.
//!
//! # Overflow behavior
//! - Fixed-width writes and reads are all-or-nothing. When the value does not
//!   fit (or is not there) an error is returned and the cursor does not move.
//! - Byte slice and string operations clamp to the space left and return how
//!   many bytes they actually moved.

use crate::frame::MAX_PAYLOAD_SIZE;
use crate::Error;

/// Transmit payload buffer.
#[derive(Debug, Clone)]
pub struct PacketWriter {
    buf: [u8; MAX_PAYLOAD_SIZE],
    len: usize,
}

impl Default for PacketWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketWriter {
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_PAYLOAD_SIZE],
            len: 0,
        }
    }

    /// Discards everything written so far.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Bytes written since the last [`clear`](Self::clear)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes that can still be written
    pub fn remaining(&self) -> usize {
        MAX_PAYLOAD_SIZE - self.len
    }

    /// The payload written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    fn put<const N: usize>(&mut self, bytes: [u8; N]) -> Result<(), Error> {
        if N > self.remaining() {
            return Err(Error::BufferOverflow {
                requested: N,
                available: self.remaining(),
            });
        }
        self.buf[self.len..self.len + N].copy_from_slice(&bytes);
        self.len += N;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.put([value])
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), Error> {
        self.put(value.to_le_bytes())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.put(value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), Error> {
        self.put(value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.put(value.to_le_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), Error> {
        self.put(value.to_le_bytes())
    }

    /// Appends as much of `bytes` as fits and returns the number of bytes
    /// written. Callers must check the count.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        let count = bytes.len().min(self.remaining());
        self.buf[self.len..self.len + count].copy_from_slice(&bytes[..count]);
        self.len += count;
        count
    }

    /// Appends a NUL-terminated string, truncated so that the terminator
    /// always fits.
    ///
    /// Returns the number of bytes written including the terminator, or 0
    /// when the buffer is already full.
    pub fn write_str(&mut self, s: &str) -> usize {
        if self.remaining() == 0 {
            return 0;
        }
        let count = s.len().min(self.remaining() - 1);
        self.write_bytes(&s.as_bytes()[..count]);
        self.buf[self.len] = 0;
        self.len += 1;
        count + 1
    }
}

/// Receive payload buffer.
#[derive(Debug, Clone)]
pub struct PacketReader {
    buf: [u8; MAX_PAYLOAD_SIZE],
    len: usize,
    pos: usize,
}

impl Default for PacketReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketReader {
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_PAYLOAD_SIZE],
            len: 0,
            pos: 0,
        }
    }

    /// Replaces the contents with a freshly received payload of `len` bytes,
    /// filled in by `fill`, and rewinds the cursor.
    ///
    /// The buffer is left empty if `fill` fails.
    pub(crate) fn refill<E>(
        &mut self,
        len: usize,
        fill: impl FnOnce(&mut [u8]) -> Result<(), E>,
    ) -> Result<(), E> {
        let len = len.min(MAX_PAYLOAD_SIZE);
        self.len = 0;
        self.pos = 0;
        fill(&mut self.buf[..len])?;
        self.len = len;
        Ok(())
    }

    /// Size of the last received payload
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes not read yet. This is the only way to tell an exhausted buffer
    /// from a short read.
    pub fn remaining(&self) -> usize {
        self.len - self.pos
    }

    /// The unread part of the payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.pos..self.len]
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        if N > self.remaining() {
            return Err(Error::BufferUnderrun {
                requested: N,
                available: self.remaining(),
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.take::<1>().map(|[b]| b)
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        self.take().map(i16::from_le_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.take().map(u16::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.take().map(i32::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.take().map(u32::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.take().map(f32::from_le_bytes)
    }

    /// Copies up to `out.len()` bytes and returns how many were copied.
    pub fn read_bytes(&mut self, out: &mut [u8]) -> usize {
        let count = out.len().min(self.remaining());
        out[..count].copy_from_slice(&self.buf[self.pos..self.pos + count]);
        self.pos += count;
        count
    }

    /// Returns the string at the cursor, up to but not including the first
    /// NUL, without consuming it.
    pub fn peek_str(&self) -> &[u8] {
        let rest = self.as_bytes();
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        &rest[..end]
    }

    /// Copies a NUL-terminated string into `out`.
    ///
    /// At most `min(out.len(), remaining) - 1` characters are copied and
    /// `out` is always NUL-terminated. The cursor advances past the copied
    /// characters and one terminator byte. Returns the copied characters, or
    /// `None` when nothing is left to read or `out` is empty.
    pub fn read_str<'a>(&mut self, out: &'a mut [u8]) -> Option<&'a [u8]> {
        let size = out.len().min(self.remaining());
        if size == 0 {
            return None;
        }
        let rest = &self.buf[self.pos..self.pos + size - 1];
        let count = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        out[..count].copy_from_slice(&rest[..count]);
        out[count] = 0;
        self.pos += count + 1;
        Some(&out[..count])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_with(payload: &[u8]) -> PacketReader {
        let mut reader = PacketReader::new();
        reader
            .refill::<()>(payload.len(), |buf| {
                buf.copy_from_slice(payload);
                Ok(())
            })
            .unwrap();
        reader
    }

    #[test]
    fn typed_values_round_trip() {
        let mut writer = PacketWriter::new();
        writer.write_u8(0xAB).unwrap();
        writer.write_i16(-2).unwrap();
        writer.write_u16(0xBEEF).unwrap();
        writer.write_i32(-100_000).unwrap();
        writer.write_u32(0xDEAD_BEEF).unwrap();
        writer.write_f32(3.5).unwrap();
        assert_eq!(writer.write_str("hi"), 3);
        assert_eq!(writer.len(), 1 + 2 + 2 + 4 + 4 + 4 + 3);

        let mut reader = reader_with(writer.as_bytes());
        assert_eq!(reader.read_u8(), Ok(0xAB));
        assert_eq!(reader.read_i16(), Ok(-2));
        assert_eq!(reader.read_u16(), Ok(0xBEEF));
        assert_eq!(reader.read_i32(), Ok(-100_000));
        assert_eq!(reader.read_u32(), Ok(0xDEAD_BEEF));
        assert_eq!(reader.read_f32(), Ok(3.5));
        let mut out = [0u8; 8];
        assert_eq!(reader.read_str(&mut out), Some(&b"hi"[..]));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn little_endian_encoding() {
        let mut writer = PacketWriter::new();
        writer.write_u16(0x0102).unwrap();
        writer.write_i32(-2).unwrap();
        assert_eq!(writer.as_bytes(), &[0x02, 0x01, 0xFE, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn fixed_width_write_is_all_or_nothing() {
        let mut writer = PacketWriter::new();
        assert_eq!(writer.write_bytes(&[0u8; MAX_PAYLOAD_SIZE - 3]), MAX_PAYLOAD_SIZE - 3);
        assert_eq!(
            writer.write_u32(1),
            Err(Error::BufferOverflow {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(writer.len(), MAX_PAYLOAD_SIZE - 3);
        writer.write_u16(1).unwrap();
        writer.write_u8(1).unwrap();
        assert!(writer.write_u8(1).is_err());
        assert_eq!(writer.remaining(), 0);
    }

    #[test]
    fn write_bytes_clamps_to_capacity() {
        let mut writer = PacketWriter::new();
        writer.write_bytes(&[1; 100]);
        assert_eq!(writer.write_bytes(&[2; 50]), MAX_PAYLOAD_SIZE - 100);
        assert_eq!(writer.remaining(), 0);
        assert_eq!(writer.len(), MAX_PAYLOAD_SIZE);
        assert_eq!(writer.write_bytes(&[3]), 0);
    }

    #[test]
    fn write_str_with_room() {
        let mut writer = PacketWriter::new();
        assert_eq!(writer.write_str("hello"), 6);
        assert_eq!(writer.as_bytes(), b"hello\0");
    }

    #[test]
    fn write_str_truncates_and_terminates() {
        let mut writer = PacketWriter::new();
        writer.write_bytes(&[0xAA; MAX_PAYLOAD_SIZE - 3]);
        assert_eq!(writer.write_str("hello"), 3);
        assert_eq!(&writer.as_bytes()[MAX_PAYLOAD_SIZE - 3..], b"he\0");
        assert_eq!(writer.write_str("hello"), 0);
    }

    #[test]
    fn write_str_with_single_byte_left() {
        let mut writer = PacketWriter::new();
        writer.write_bytes(&[0xAA; MAX_PAYLOAD_SIZE - 1]);
        assert_eq!(writer.write_str("hello"), 1);
        assert_eq!(writer.as_bytes().last(), Some(&0));
    }

    #[test]
    fn clear_discards_unsent_bytes() {
        let mut writer = PacketWriter::new();
        writer.write_u32(7).unwrap();
        writer.clear();
        assert!(writer.is_empty());
        assert_eq!(writer.remaining(), MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn short_read_leaves_cursor() {
        let mut reader = reader_with(&[1, 2, 3]);
        assert_eq!(
            reader.read_u32(),
            Err(Error::BufferUnderrun {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(reader.remaining(), 3);
        assert_eq!(reader.read_u16(), Ok(0x0201));
        assert!(reader.read_u16().is_err());
        assert_eq!(reader.read_u8(), Ok(3));
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn zero_value_is_distinct_from_exhausted() {
        let mut reader = reader_with(&[0]);
        assert_eq!(reader.read_u8(), Ok(0));
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn read_bytes_clamps() {
        let mut reader = reader_with(&[1, 2, 3]);
        let mut out = [0u8; 8];
        assert_eq!(reader.read_bytes(&mut out), 3);
        assert_eq!(&out[..3], &[1, 2, 3]);
        assert_eq!(reader.read_bytes(&mut out), 0);
    }

    #[test]
    fn peek_does_not_advance() {
        let mut reader = reader_with(b"abc\0def\0");
        assert_eq!(reader.peek_str(), b"abc");
        assert_eq!(reader.peek_str(), b"abc");
        assert_eq!(reader.remaining(), 8);

        let mut out = [0u8; 16];
        assert_eq!(reader.read_str(&mut out), Some(&b"abc"[..]));
        assert_eq!(reader.peek_str(), b"def");
        assert_eq!(reader.read_str(&mut out), Some(&b"def"[..]));
        assert_eq!(reader.read_str(&mut out), None);
        assert_eq!(reader.peek_str(), b"");
    }

    #[test]
    fn read_str_truncates_to_output() {
        let mut reader = reader_with(b"hello\0x");
        let mut out = [0xFFu8; 3];
        assert_eq!(reader.read_str(&mut out), Some(&b"he"[..]));
        assert_eq!(out, [b'h', b'e', 0]);
        // Cursor skips the copied characters plus one byte
        assert_eq!(reader.remaining(), 4);
        assert_eq!(reader.peek_str(), b"lo");
    }

    #[test]
    fn read_str_without_terminator() {
        let mut reader = reader_with(b"abc");
        let mut out = [0u8; 16];
        assert_eq!(reader.read_str(&mut out), Some(&b"ab"[..]));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn read_str_into_empty_output() {
        let mut reader = reader_with(b"abc");
        assert_eq!(reader.read_str(&mut []), None);
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    fn refill_replaces_previous_payload() {
        let mut reader = reader_with(&[1, 2, 3, 4]);
        reader.read_u16().unwrap();
        reader
            .refill::<()>(2, |buf| {
                buf.copy_from_slice(&[9, 8]);
                Ok(())
            })
            .unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.as_bytes(), &[9, 8]);
    }

    #[test]
    fn failed_refill_leaves_buffer_empty() {
        let mut reader = reader_with(&[1, 2, 3]);
        assert_eq!(reader.refill(2, |_| Err("bus")), Err("bus"));
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
    }
}
