use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;

ascii_enum! {
  MarketMakerMode {
    Normal = b'N',
    Passive = b'P',
    Syndicate = b'S',
    PreSyndicate = b'R',
    Penalty = b'L',
  }
}

ascii_enum! {
  MarketParticipantState {
    Active = b'A',
    Excused = b'E',
    Withdrawn = b'W',
    Suspended = b'S',
    Deleted = b'D',
  }
}

/// Market Participant Position (`L`): a market maker's registration state in
/// one issue.
///
/// Parsing one of these through a [`Parser`](crate::itch::Parser) session
/// appends it to the session's `market_participants` index under its MPID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantPosition {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub mpid: String,
  pub stock: String,
  pub primary_market_maker: bool,
  pub mode: MarketMakerMode,
  pub state: MarketParticipantState,
}

impl ParticipantPosition {
  pub const TAG: u8 = b'L';
  pub const SIZE: usize = 26;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(ParticipantPosition {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      mpid: codec::trim_ascii(&data[11..15]),
      stock: codec::trim_ascii(&data[15..23]),
      primary_market_maker: data[23] == b'Y',
      mode: MarketMakerMode::from(data[24]),
      state: MarketParticipantState::from(data[25]),
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
    codec::put_ascii(&mut data[11..15], &self.mpid);
    codec::put_ascii(&mut data[15..23], &self.stock);
    data[23] = codec::yes_no(self.primary_market_maker);
    data[24] = self.mode.code();
    data[25] = self.state.code();
    data
  }
}

impl TryFrom<&[u8]> for ParticipantPosition {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
