//! Market-Wide Circuit Breaker messages.
//!
//! The decline levels are the only Price(8) fields in the protocol.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::check_frame;
use crate::errors::ItchError;
use crate::itch::codec;
use crate::itch::price::Price;

/// MWCB Decline Level (`V`): the three S&P 500 decline thresholds for the
/// trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MwcbLevel {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub level_one: Price,
  pub level_two: Price,
  pub level_three: Price,
}

impl MwcbLevel {
  pub const TAG: u8 = b'V';
  pub const SIZE: usize = 35;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(MwcbLevel {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      level_one: Price::price8(codec::read_u64(&data[11..19])),
      level_two: Price::price8(codec::read_u64(&data[19..27])),
      level_three: Price::price8(codec::read_u64(&data[27..35])),
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
    codec::put_u64(&mut data[11..19], self.level_one.raw());
    codec::put_u64(&mut data[19..27], self.level_two.raw());
    codec::put_u64(&mut data[27..35], self.level_three.raw());
    data
  }
}

impl TryFrom<&[u8]> for MwcbLevel {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}

/// MWCB Status (`W`): a breach of one of the decline levels. The level is
/// the ASCII digit `1`, `2` or `3`, kept as the wire byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MwcbStatus {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub breached_level: u8,
}

impl MwcbStatus {
  pub const TAG: u8 = b'W';
  pub const SIZE: usize = 12;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(MwcbStatus {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      breached_level: data[11],
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
    data[11] = self.breached_level;
    data
  }
}

impl TryFrom<&[u8]> for MwcbStatus {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
