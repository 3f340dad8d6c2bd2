use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;
use crate::itch::price::Price;

ascii_enum! {
  ReleaseQualifier {
    Anticipated = b'A',
    CanceledPostponed = b'C',
  }
}

/// IPO Quoting Period Update (`K`): anticipated release time (seconds since
/// midnight) and price for an IPO issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpoQuotation {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub stock: String,
  pub release_time: Duration,
  pub qualifier: ReleaseQualifier,
  pub price: Price,
}

impl IpoQuotation {
  pub const TAG: u8 = b'K';
  pub const SIZE: usize = 28;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(IpoQuotation {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      stock: codec::trim_ascii(&data[11..19]),
      release_time: Duration::from_secs(codec::read_u32(&data[19..23]).into()),
      qualifier: ReleaseQualifier::from(data[23]),
      price: Price::price4(codec::read_u32(&data[24..28])),
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
    codec::put_u32(&mut data[19..23], self.release_time.as_secs() as u32);
    data[23] = self.qualifier.code();
    codec::put_u32(&mut data[24..28], self.price.raw_u32());
    data
  }
}

impl TryFrom<&[u8]> for IpoQuotation {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
