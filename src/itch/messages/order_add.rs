use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;
use crate::itch::price::Price;

ascii_enum! {
  /// Book side of an order or trade.
  Side {
    Buy = b'B',
    Sell = b'S',
  }
}

/// Add Order, no MPID attribution (`A`): a new visible order entering the
/// book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAdd {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  /// Day-unique order reference number.
  pub reference: u64,
  pub side: Side,
  pub shares: u32,
  pub stock: String,
  pub price: Price,
}

impl OrderAdd {
  pub const TAG: u8 = b'A';
  pub const SIZE: usize = 36;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(OrderAdd {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      reference: codec::read_u64(&data[11..19]),
      side: Side::from(data[19]),
      shares: codec::read_u32(&data[20..24]),
      stock: codec::trim_ascii(&data[24..32]),
      price: Price::price4(codec::read_u32(&data[32..36])),
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
    data[19] = self.side.code();
    codec::put_u32(&mut data[20..24], self.shares);
    codec::put_ascii(&mut data[24..32], &self.stock);
    codec::put_u32(&mut data[32..36], self.price.raw_u32());
    data
  }
}

impl TryFrom<&[u8]> for OrderAdd {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}

/// Add Order with MPID attribution (`F`): as [`OrderAdd`] plus the
/// four-character participant id the order is attributed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAddAttributed {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub reference: u64,
  pub side: Side,
  pub shares: u32,
  pub stock: String,
  pub price: Price,
  pub attribution: String,
}

impl OrderAddAttributed {
  pub const TAG: u8 = b'F';
  pub const SIZE: usize = 40;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(OrderAddAttributed {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      reference: codec::read_u64(&data[11..19]),
      side: Side::from(data[19]),
      shares: codec::read_u32(&data[20..24]),
      stock: codec::trim_ascii(&data[24..32]),
      price: Price::price4(codec::read_u32(&data[32..36])),
      attribution: codec::trim_ascii(&data[36..40]),
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
    data[19] = self.side.code();
    codec::put_u32(&mut data[20..24], self.shares);
    codec::put_ascii(&mut data[24..32], &self.stock);
    codec::put_u32(&mut data[32..36], self.price.raw_u32());
    codec::put_ascii(&mut data[36..40], &self.attribution);
    data
  }
}

impl TryFrom<&[u8]> for OrderAddAttributed {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
