//! Trade messages: non-cross prints, cross (auction) prints, and broken
//! trades. Trade messages do not correspond to displayed book orders.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::order_add::Side;
use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;
use crate::itch::price::Price;

ascii_enum! {
  /// Auction category of a cross.
  CrossType {
    Opening = b'O',
    Closing = b'C',
    IpoOrHalted = b'H',
    ExtendedClosing = b'A',
  }
}

/// Trade, non-cross (`P`): an execution against a non-displayed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeNonCross {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub reference: u64,
  pub side: Side,
  pub shares: u32,
  pub stock: String,
  pub price: Price,
  pub match_number: u64,
}

impl TradeNonCross {
  pub const TAG: u8 = b'P';
  pub const SIZE: usize = 44;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(TradeNonCross {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      reference: codec::read_u64(&data[11..19]),
      side: Side::from(data[19]),
      shares: codec::read_u32(&data[20..24]),
      stock: codec::trim_ascii(&data[24..32]),
      price: Price::price4(codec::read_u32(&data[32..36])),
      match_number: codec::read_u64(&data[36..44]),
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
    codec::put_u64(&mut data[36..44], self.match_number);
    data
  }
}

impl TryFrom<&[u8]> for TradeNonCross {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}

/// Cross Trade (`Q`): the bulk print for an auction cross. Share counts are
/// 64-bit here, unlike every other trade message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeCross {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub shares: u64,
  pub stock: String,
  pub cross_price: Price,
  pub match_number: u64,
  pub cross_type: CrossType,
}

impl TradeCross {
  pub const TAG: u8 = b'Q';
  pub const SIZE: usize = 40;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(TradeCross {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      shares: codec::read_u64(&data[11..19]),
      stock: codec::trim_ascii(&data[19..27]),
      cross_price: Price::price4(codec::read_u32(&data[27..31])),
      match_number: codec::read_u64(&data[31..39]),
      cross_type: CrossType::from(data[39]),
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
    codec::put_u64(&mut data[11..19], self.shares);
    codec::put_ascii(&mut data[19..27], &self.stock);
    codec::put_u32(&mut data[27..31], self.cross_price.raw_u32());
    codec::put_u64(&mut data[31..39], self.match_number);
    data[39] = self.cross_type.code();
    data
  }
}

impl TryFrom<&[u8]> for TradeCross {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}

/// Broken Trade (`B`): a previously printed match was busted; consumers must
/// drop it from time-and-sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeBroken {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub match_number: u64,
}

impl TradeBroken {
  pub const TAG: u8 = b'B';
  pub const SIZE: usize = 19;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(TradeBroken {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      match_number: codec::read_u64(&data[11..19]),
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
    codec::put_u64(&mut data[11..19], self.match_number);
    data
  }
}

impl TryFrom<&[u8]> for TradeBroken {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
