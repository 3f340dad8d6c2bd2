use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::trade::CrossType;
use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;
use crate::itch::price::Price;

ascii_enum! {
  ImbalanceDirection {
    Buy = b'B',
    Sell = b'S',
    None = b'N',
    /// Insufficient orders to calculate an imbalance.
    Insufficient = b'O',
  }
}

/// Net Order Imbalance Indicator (`I`): auction-period disclosure of paired
/// and imbalance quantities plus the indicative clearing prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Noii {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub paired_shares: u64,
  pub imbalance_shares: u64,
  pub imbalance_direction: ImbalanceDirection,
  pub stock: String,
  pub far_price: Price,
  pub near_price: Price,
  pub current_reference_price: Price,
  pub cross_type: CrossType,
  /// Price variation indicator, kept as the wire byte (`L`, `1`..`9`, `A`..
  /// or 0x20 when unavailable).
  pub variation_indicator: u8,
}

impl Noii {
  pub const TAG: u8 = b'I';
  pub const SIZE: usize = 50;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(Noii {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      paired_shares: codec::read_u64(&data[11..19]),
      imbalance_shares: codec::read_u64(&data[19..27]),
      imbalance_direction: ImbalanceDirection::from(data[27]),
      stock: codec::trim_ascii(&data[28..36]),
      far_price: Price::price4(codec::read_u32(&data[36..40])),
      near_price: Price::price4(codec::read_u32(&data[40..44])),
      current_reference_price: Price::price4(codec::read_u32(&data[44..48])),
      cross_type: CrossType::from(data[48]),
      variation_indicator: data[49],
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
    codec::put_u64(&mut data[11..19], self.paired_shares);
    codec::put_u64(&mut data[19..27], self.imbalance_shares);
    data[27] = self.imbalance_direction.code();
    codec::put_ascii(&mut data[28..36], &self.stock);
    codec::put_u32(&mut data[36..40], self.far_price.raw_u32());
    codec::put_u32(&mut data[40..44], self.near_price.raw_u32());
    codec::put_u32(&mut data[44..48], self.current_reference_price.raw_u32());
    data[48] = self.cross_type.code();
    data[49] = self.variation_indicator;
    data
  }
}

impl TryFrom<&[u8]> for Noii {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
