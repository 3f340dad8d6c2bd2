use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;

ascii_enum! {
  /// Daily session lifecycle markers.
  EventCode {
    StartOfMessages = b'O',
    StartOfHours = b'S',
    StartOfMarket = b'Q',
    EndOfMarket = b'M',
    EndOfHours = b'E',
    EndOfMessages = b'C',
  }
}

/// System Event (`S`): signals a session-wide state change such as start of
/// market hours. Stock locate is always zero for this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEvent {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub event_code: EventCode,
}

impl SystemEvent {
  pub const TAG: u8 = b'S';
  pub const SIZE: usize = 12;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(SystemEvent {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      event_code: EventCode::from(data[11]),
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
    data[11] = self.event_code.code();
    data
  }
}

impl TryFrom<&[u8]> for SystemEvent {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
