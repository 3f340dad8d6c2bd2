use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;

ascii_enum! {
  /// Market center issuing the halt.
  MarketCode {
    Nasdaq = b'Q',
    Bx = b'B',
    Psx = b'X',
  }
}

ascii_enum! {
  HaltAction {
    Halted = b'H',
    TradingResumed = b'T',
  }
}

/// Operational Halt (`h`): an interruption specific to one market center,
/// distinct from a regulatory trading action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalHalt {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub stock: String,
  pub market: MarketCode,
  pub action: HaltAction,
}

impl OperationalHalt {
  pub const TAG: u8 = b'h';
  pub const SIZE: usize = 21;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(OperationalHalt {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      stock: codec::trim_ascii(&data[11..19]),
      market: MarketCode::from(data[19]),
      action: HaltAction::from(data[20]),
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
    data[19] = self.market.code();
    data[20] = self.action.code();
    data
  }
}

impl TryFrom<&[u8]> for OperationalHalt {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
