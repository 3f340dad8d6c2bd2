use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::check_frame;
use crate::errors::ItchError;
use crate::itch::codec;
use crate::itch::price::Price;

/// Order Executed (`E`): a resting order traded at its displayed price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderExecuted {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub reference: u64,
  pub shares: u32,
  /// Match number shared by both sides of the execution.
  pub match_number: u64,
}

impl OrderExecuted {
  pub const TAG: u8 = b'E';
  pub const SIZE: usize = 31;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(OrderExecuted {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      reference: codec::read_u64(&data[11..19]),
      shares: codec::read_u32(&data[19..23]),
      match_number: codec::read_u64(&data[23..31]),
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
    codec::put_u32(&mut data[19..23], self.shares);
    codec::put_u64(&mut data[23..31], self.match_number);
    data
  }
}

impl TryFrom<&[u8]> for OrderExecuted {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}

/// Order Executed With Price (`C`): an execution at a price different from
/// the display price, e.g. a midpoint fill. Non-printable executions are
/// excluded from volume displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderExecutedPrice {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub reference: u64,
  pub shares: u32,
  pub match_number: u64,
  pub printable: bool,
  pub execution_price: Price,
}

impl OrderExecutedPrice {
  pub const TAG: u8 = b'C';
  pub const SIZE: usize = 36;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(OrderExecutedPrice {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      reference: codec::read_u64(&data[11..19]),
      shares: codec::read_u32(&data[19..23]),
      match_number: codec::read_u64(&data[23..31]),
      printable: data[31] == b'Y',
      execution_price: Price::price4(codec::read_u32(&data[32..36])),
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
    codec::put_u32(&mut data[19..23], self.shares);
    codec::put_u64(&mut data[23..31], self.match_number);
    data[31] = codec::yes_no(self.printable);
    codec::put_u32(&mut data[32..36], self.execution_price.raw_u32());
    data
  }
}

impl TryFrom<&[u8]> for OrderExecutedPrice {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
