//! Zero-copy raw views for the hot order-flow frames.
//!
//! Book-building consumers spend almost all of their time in `A`, `E`, `D`
//! and `P` frames. These views read fields straight out of the frame buffer
//! without allocating message values, built on `zerocopy::Ref` and
//! big-endian integer wrappers. All structs derive `Unaligned`, so the views
//! are valid at any offset into a feed buffer.
//!
//! Example:
//! ```rust
//! # use finwire::itch::raw::as_order_add_raw;
//! # let frame = {
//! #   let mut f = vec![0u8; 36];
//! #   f[0] = b'A';
//! #   f
//! # };
//! if let Some(view_ref) = as_order_add_raw(&frame) {
//!   let v = &*view_ref; // &OrderAddRaw
//!   let reference = v.reference.get();
//!   let shares = v.shares.get();
//!   let price_raw = v.price.get();
//!   let _ = (reference, shares, price_raw);
//! }
//! ```

use zerocopy::big_endian::{U16 as BeU16, U32 as BeU32, U64 as BeU64};
use zerocopy::{FromBytes, Immutable, KnownLayout, Ref, Unaligned};

/// Common 11-byte frame prefix: tag, stock locate, tracking number and the
/// 48-bit timestamp.
#[repr(C)]
#[derive(Clone, Copy, Debug, Unaligned, KnownLayout, Immutable, FromBytes)]
pub struct PrefixRaw {
  pub tag: u8,                 // 0
  pub stock_locate: BeU16,     // 1..3
  pub tracking_number: BeU16,  // 3..5
  pub timestamp: [u8; 6],      // 5..11
}

impl PrefixRaw {
  /// Nanoseconds since midnight from the 48-bit timestamp field.
  #[inline]
  pub fn timestamp_nanos(&self) -> u64 {
    let t = &self.timestamp;
    (u64::from(t[0]) << 40)
      | (u64::from(t[1]) << 32)
      | (u64::from(t[2]) << 24)
      | (u64::from(t[3]) << 16)
      | (u64::from(t[4]) << 8)
      | u64::from(t[5])
  }
}

/// 36-byte Add Order (`A`) frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Unaligned, KnownLayout, Immutable, FromBytes)]
pub struct OrderAddRaw {
  pub prefix: PrefixRaw,  // 0..11
  pub reference: BeU64,   // 11..19
  pub side: u8,           // 19
  pub shares: BeU32,      // 20..24
  pub stock: [u8; 8],     // 24..32
  pub price: BeU32,       // 32..36 (Price(4) raw)
}

/// 31-byte Order Executed (`E`) frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Unaligned, KnownLayout, Immutable, FromBytes)]
pub struct OrderExecutedRaw {
  pub prefix: PrefixRaw,    // 0..11
  pub reference: BeU64,     // 11..19
  pub shares: BeU32,        // 19..23
  pub match_number: BeU64,  // 23..31
}

/// 19-byte Order Delete (`D`) frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Unaligned, KnownLayout, Immutable, FromBytes)]
pub struct OrderDeleteRaw {
  pub prefix: PrefixRaw,  // 0..11
  pub reference: BeU64,   // 11..19
}

/// 44-byte non-cross Trade (`P`) frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Unaligned, KnownLayout, Immutable, FromBytes)]
pub struct TradeRaw {
  pub prefix: PrefixRaw,    // 0..11
  pub reference: BeU64,     // 11..19
  pub side: u8,             // 19
  pub shares: BeU32,        // 20..24
  pub stock: [u8; 8],       // 24..32
  pub price: BeU32,         // 32..36 (Price(4) raw)
  pub match_number: BeU64,  // 36..44
}

/// Try to view a 36-byte slice as an `A` frame. Validates length and tag.
#[inline]
pub fn as_order_add_raw(slice: &[u8]) -> Option<Ref<&[u8], OrderAddRaw>> {
  tagged(slice, b'A')
}

/// Try to view a 31-byte slice as an `E` frame. Validates length and tag.
#[inline]
pub fn as_order_executed_raw(
  slice: &[u8],
) -> Option<Ref<&[u8], OrderExecutedRaw>> {
  tagged(slice, b'E')
}

/// Try to view a 19-byte slice as a `D` frame. Validates length and tag.
#[inline]
pub fn as_order_delete_raw(
  slice: &[u8],
) -> Option<Ref<&[u8], OrderDeleteRaw>> {
  tagged(slice, b'D')
}

/// Try to view a 44-byte slice as a `P` frame. Validates length and tag.
#[inline]
pub fn as_trade_raw(slice: &[u8]) -> Option<Ref<&[u8], TradeRaw>> {
  tagged(slice, b'P')
}

#[inline]
fn tagged<T>(slice: &[u8], tag: u8) -> Option<Ref<&[u8], T>>
where
  T: Unaligned + KnownLayout + Immutable + FromBytes,
{
  if slice.first() != Some(&tag) {
    return None;
  }
  Ref::<_, T>::from_bytes(slice).ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::itch::{OrderAdd, Price, Side};
  use std::time::Duration;

  #[test]
  fn raw_view_matches_owned_parse() {
    let msg = OrderAdd {
      stock_locate: 42,
      tracking_number: 2,
      timestamp: Duration::from_nanos(34_200_000_000_123),
      reference: 982_451_653,
      side: Side::Buy,
      shares: 300,
      stock: "AAPL".into(),
      price: Price::price4(1_923_400),
    };
    let frame = msg.to_bytes();

    let view = as_order_add_raw(&frame).expect("valid A frame");
    assert_eq!(view.prefix.stock_locate.get(), 42);
    assert_eq!(view.prefix.tracking_number.get(), 2);
    assert_eq!(view.prefix.timestamp_nanos(), 34_200_000_000_123);
    assert_eq!(view.reference.get(), 982_451_653);
    assert_eq!(view.side, b'B');
    assert_eq!(view.shares.get(), 300);
    assert_eq!(&view.stock, b"AAPL    ");
    assert_eq!(view.price.get(), 1_923_400);
  }

  #[test]
  fn wrong_tag_or_length_is_rejected() {
    assert!(as_order_add_raw(&[0u8; 36]).is_none());
    let mut short = vec![0u8; 35];
    short[0] = b'A';
    assert!(as_order_add_raw(&short).is_none());
  }
}
