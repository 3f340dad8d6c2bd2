//! Exact fixed-point prices.
//!
//! ITCH carries prices as unsigned big-endian integers with an implied
//! decimal point: Price(4) has four fractional digits (most fields), Price(8)
//! has eight (MWCB decline levels). Arithmetic and equality stay in integer
//! space; floats are for display only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ItchError;

/// A price as transmitted on the wire: raw integer plus implied scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
  raw: u64,
  scale: u8,
}

impl Price {
  /// Four implied fractional digits (divisor 10 000).
  pub const SCALE4: u8 = 4;
  /// Eight implied fractional digits (divisor 100 000 000).
  pub const SCALE8: u8 = 8;

  pub fn from_fixed(raw: u64, scale: u8) -> Self {
    Price { raw, scale }
  }

  /// A standard Price(4) field, e.g. `190_000` for 19.0000.
  pub fn price4(raw: u32) -> Self {
    Price {
      raw: raw.into(),
      scale: Self::SCALE4,
    }
  }

  /// A Price(8) field, e.g. `304_426_000_000` for 3044.26000000.
  pub fn price8(raw: u64) -> Self {
    Price {
      raw,
      scale: Self::SCALE8,
    }
  }

  pub fn raw(&self) -> u64 {
    self.raw
  }

  pub fn scale(&self) -> u8 {
    self.scale
  }

  /// Decode a right-aligned unsigned big-endian integer field.
  ///
  /// Leading 0x20 bytes are tolerated: a numeric field whose integer part
  /// does not fill the width arrives space-padded on the left, which decodes
  /// as zero padding.
  pub fn from_wire(data: &[u8], scale: u8) -> Result<Self, ItchError> {
    let digits = {
      let mut i = 0;
      while i < data.len() && data[i] == b' ' {
        i += 1;
      }
      &data[i..]
    };
    if digits.len() > 8 {
      return Err(ItchError::InvalidPrice);
    }
    let mut buf = [0u8; 8];
    buf[8 - digits.len()..].copy_from_slice(digits);
    Ok(Price {
      raw: u64::from_be_bytes(buf),
      scale,
    })
  }

  /// Encode as a `width`-byte big-endian integer. Errors when the raw value
  /// does not fit the field.
  pub fn to_wire(&self, width: usize) -> Result<Vec<u8>, ItchError> {
    if width > 8 || (width < 8 && self.raw >> (width * 8) != 0) {
      return Err(ItchError::InvalidPrice);
    }
    let be = self.raw.to_be_bytes();
    Ok(be[8 - width..].to_vec())
  }

  /// The raw value as `u32`, for four-byte fields.
  pub(crate) fn raw_u32(&self) -> u32 {
    self.raw as u32
  }

  /// Lossy float view for display and analytics; never fed back into codecs.
  pub fn as_f64(&self) -> f64 {
    self.raw as f64 / 10u64.pow(self.scale as u32) as f64
  }
}

impl fmt::Display for Price {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let divisor = 10u64.pow(self.scale as u32);
    write!(
      f,
      "{}.{:0width$}",
      self.raw / divisor,
      self.raw % divisor,
      width = self.scale as usize
    )
  }
}
