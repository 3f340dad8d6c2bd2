use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::check_frame;
use crate::errors::ItchError;
use crate::itch::codec;
use crate::itch::price::Price;

/// LULD Auction Collar (`J`): the reference price and the upper/lower collar
/// thresholds for an auction following a limit-up/limit-down pause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuldCollar {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub stock: String,
  pub reference_price: Price,
  pub upper_price: Price,
  pub lower_price: Price,
  /// Number of auction extensions so far.
  pub extension: u32,
}

impl LuldCollar {
  pub const TAG: u8 = b'J';
  pub const SIZE: usize = 35;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(LuldCollar {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      stock: codec::trim_ascii(&data[11..19]),
      reference_price: Price::price4(codec::read_u32(&data[19..23])),
      upper_price: Price::price4(codec::read_u32(&data[23..27])),
      lower_price: Price::price4(codec::read_u32(&data[27..31])),
      extension: codec::read_u32(&data[31..35]),
    })
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    let mut data = vec![0u8; Self::SIZE];
    codec::put_prefix(
      &mut data,
      Self::TAG,
      self.stock_locate,
      self.tracking_number,
      self.timestamp,
    );
    codec::put_ascii(&mut data[11..19], &self.stock);
    codec::put_u32(&mut data[19..23], self.reference_price.raw_u32());
    codec::put_u32(&mut data[23..27], self.upper_price.raw_u32());
    codec::put_u32(&mut data[27..31], self.lower_price.raw_u32());
    codec::put_u32(&mut data[31..35], self.extension);
    data
  }
}

impl TryFrom<&[u8]> for LuldCollar {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
