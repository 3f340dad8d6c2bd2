//! Field-level primitives shared by every message codec.
//!
//! ITCH frames are fixed-layout big-endian records. Each message starts with
//! the common prefix `tag(1) | stock_locate(2) | tracking_number(2) |
//! timestamp(6)`; the timestamp is a 48-bit nanoseconds-since-midnight value.

use byteorder::{BigEndian, ByteOrder};
use std::time::Duration;

use crate::errors::ItchError;

pub(crate) const TS48_MASK: u64 = (1 << 48) - 1;

#[inline]
pub(crate) fn read_u16(input: &[u8]) -> u16 {
  BigEndian::read_u16(input)
}

#[inline]
pub(crate) fn read_u32(input: &[u8]) -> u32 {
  BigEndian::read_u32(input)
}

#[inline]
pub(crate) fn read_u64(input: &[u8]) -> u64 {
  BigEndian::read_u64(input)
}

#[inline]
pub(crate) fn put_u16(out: &mut [u8], v: u16) {
  BigEndian::write_u16(out, v)
}

#[inline]
pub(crate) fn put_u32(out: &mut [u8], v: u32) {
  BigEndian::write_u32(out, v)
}

#[inline]
pub(crate) fn put_u64(out: &mut [u8], v: u64) {
  BigEndian::write_u64(out, v)
}

/// Read the common-prefix timestamp from a whole frame.
///
/// Bytes 5..11 hold the low 48 bits of the nanosecond count; bytes 3..5 are
/// the tracking number. Reading the six timestamp bytes directly is
/// byte-for-byte equivalent to the masked-u64 window described by the wire
/// format.
#[inline]
pub(crate) fn read_timestamp(frame: &[u8]) -> Duration {
  Duration::from_nanos(BigEndian::read_uint(&frame[5..11], 6))
}

/// Write `tag | stock_locate | tracking_number | timestamp` into the first
/// eleven bytes of `frame`.
#[inline]
pub(crate) fn put_prefix(
  frame: &mut [u8],
  tag: u8,
  stock_locate: u16,
  tracking_number: u16,
  timestamp: Duration,
) {
  frame[0] = tag;
  BigEndian::write_u16(&mut frame[1..3], stock_locate);
  BigEndian::write_u16(&mut frame[3..5], tracking_number);
  BigEndian::write_uint(
    &mut frame[5..11],
    timestamp.as_nanos() as u64 & TS48_MASK,
    6,
  );
}

/// Strip trailing ASCII spaces; interior whitespace is preserved.
#[inline]
pub(crate) fn trim_ascii(input: &[u8]) -> String {
  String::from_utf8_lossy(input)
    .trim_end_matches(' ')
    .to_string()
}

/// Left-justify `text` into `out`, padding with ASCII spaces. Text longer
/// than the field is clamped to the field width.
#[inline]
pub(crate) fn put_ascii(out: &mut [u8], text: &str) {
  let bytes = text.as_bytes();
  let n = bytes.len().min(out.len());
  out[..n].copy_from_slice(&bytes[..n]);
  for b in &mut out[n..] {
    *b = b' ';
  }
}

/// Left-justify and space-pad `text` to exactly `width` bytes. Unlike the
/// message serializers, this errors instead of clamping.
pub fn pad_ascii(text: &str, width: usize) -> Result<Vec<u8>, ItchError> {
  if text.len() > width {
    return Err(ItchError::InvalidPacketSize {
      expected: width,
      got: text.len(),
    });
  }
  let mut out = vec![b' '; width];
  out[..text.len()].copy_from_slice(text.as_bytes());
  Ok(out)
}

#[inline]
pub(crate) fn yes_no(flag: bool) -> u8 {
  if flag {
    b'Y'
  } else {
    b'N'
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamp_window_packs_48_bits() {
    let mut frame = [0u8; 11];
    let ts = Duration::from_nanos(30_339_142_161_035); // 8h25m39.142161035s
    put_prefix(&mut frame, b'S', 7, 0xBEEF, ts);
    assert_eq!(frame[0], b'S');
    assert_eq!(read_u16(&frame[1..3]), 7);
    assert_eq!(read_u16(&frame[3..5]), 0xBEEF);
    assert_eq!(read_timestamp(&frame), ts);
  }

  #[test]
  fn timestamp_high_bits_do_not_leak_into_tracking() {
    let mut frame = [0u8; 11];
    let ts = Duration::from_nanos(TS48_MASK | (0xABu64 << 48));
    put_prefix(&mut frame, b'A', 0, 0x0102, ts);
    assert_eq!(read_u16(&frame[3..5]), 0x0102);
    assert_eq!(read_timestamp(&frame).as_nanos() as u64, TS48_MASK);
  }

  #[test]
  fn ascii_trim_keeps_interior_spaces() {
    assert_eq!(trim_ascii(b"BRK A   "), "BRK A");
    assert_eq!(trim_ascii(b"        "), "");
  }

  #[test]
  fn pad_ascii_rejects_truncation() {
    assert_eq!(pad_ascii("AAPL", 8).unwrap(), b"AAPL    ");
    assert!(pad_ascii("TOOLONGNAME", 8).is_err());
  }
}
