use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::check_frame;
use crate::errors::ItchError;
use crate::itch::codec;
use crate::itch::price::Price;

/// Order Replace (`U`): cancel-and-replace preserving book priority rules.
/// The original reference is retired and the new reference takes its place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReplace {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub original_reference: u64,
  pub new_reference: u64,
  pub shares: u32,
  pub price: Price,
}

impl OrderReplace {
  pub const TAG: u8 = b'U';
  pub const SIZE: usize = 35;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(OrderReplace {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      original_reference: codec::read_u64(&data[11..19]),
      new_reference: codec::read_u64(&data[19..27]),
      shares: codec::read_u32(&data[27..31]),
      price: Price::price4(codec::read_u32(&data[31..35])),
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
    codec::put_u64(&mut data[11..19], self.original_reference);
    codec::put_u64(&mut data[19..27], self.new_reference);
    codec::put_u32(&mut data[27..31], self.shares);
    codec::put_u32(&mut data[31..35], self.price.raw_u32());
    data
  }
}

impl TryFrom<&[u8]> for OrderReplace {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
