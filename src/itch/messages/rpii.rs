use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;

ascii_enum! {
  /// Which side retail price-improving interest is available on.
  InterestFlag {
    Buy = b'B',
    Sell = b'S',
    BothSides = b'A',
    None = b'N',
  }
}

/// Retail Price Improvement Indicator (`N`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rpii {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub stock: String,
  pub interest: InterestFlag,
}

impl Rpii {
  pub const TAG: u8 = b'N';
  pub const SIZE: usize = 20;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(Rpii {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      stock: codec::trim_ascii(&data[11..19]),
      interest: InterestFlag::from(data[19]),
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
    data[19] = self.interest.code();
    data
  }
}

impl TryFrom<&[u8]> for Rpii {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
