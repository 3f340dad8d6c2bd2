use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;

ascii_enum! {
  TradingState {
    Halted = b'H',
    Paused = b'P',
    QuotationOnly = b'Q',
    Trading = b'T',
  }
}

/// Stock Trading Action (`H`): per-issue trading-state transition with a
/// four-character reason code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTradingAction {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub stock: String,
  pub trading_state: TradingState,
  pub reserved: u8,
  pub reason: String,
}

impl StockTradingAction {
  pub const TAG: u8 = b'H';
  pub const SIZE: usize = 25;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(StockTradingAction {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      stock: codec::trim_ascii(&data[11..19]),
      trading_state: TradingState::from(data[19]),
      reserved: data[20],
      reason: codec::trim_ascii(&data[21..25]),
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
    data[19] = self.trading_state.code();
    data[20] = self.reserved;
    codec::put_ascii(&mut data[21..25], &self.reason);
    data
  }
}

impl TryFrom<&[u8]> for StockTradingAction {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
