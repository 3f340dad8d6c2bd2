use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::check_frame;
use crate::errors::ItchError;
use crate::itch::codec;

/// Order Cancel (`X`): a partial cancel; the order remains on the book with
/// reduced size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancel {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub reference: u64,
  /// Shares removed from the displayed size.
  pub canceled_shares: u32,
}

impl OrderCancel {
  pub const TAG: u8 = b'X';
  pub const SIZE: usize = 23;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(OrderCancel {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      reference: codec::read_u64(&data[11..19]),
      canceled_shares: codec::read_u32(&data[19..23]),
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
    codec::put_u32(&mut data[19..23], self.canceled_shares);
    data
  }
}

impl TryFrom<&[u8]> for OrderCancel {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
