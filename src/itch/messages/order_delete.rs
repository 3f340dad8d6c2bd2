use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::check_frame;
use crate::errors::ItchError;
use crate::itch::codec;

/// Order Delete (`D`): the order is removed from the book entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDelete {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub reference: u64,
}

impl OrderDelete {
  pub const TAG: u8 = b'D';
  pub const SIZE: usize = 19;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(OrderDelete {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      reference: codec::read_u64(&data[11..19]),
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
    codec::put_u64(&mut data[11..19], self.reference);
    data
  }
}

impl TryFrom<&[u8]> for OrderDelete {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
