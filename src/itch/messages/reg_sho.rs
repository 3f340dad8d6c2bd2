use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;

ascii_enum! {
  /// Reg SHO short-sale price-test states.
  RegShoAction {
    NoPriceTest = b'0',
    PriceTestIntraday = b'1',
    PriceTestRemains = b'2',
  }
}

/// Reg SHO Restriction (`Y`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegSho {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub stock: String,
  pub action: RegShoAction,
}

impl RegSho {
  pub const TAG: u8 = b'Y';
  pub const SIZE: usize = 20;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(RegSho {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      stock: codec::trim_ascii(&data[11..19]),
      action: RegShoAction::from(data[19]),
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
    data[19] = self.action.code();
    data
  }
}

impl TryFrom<&[u8]> for RegSho {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
