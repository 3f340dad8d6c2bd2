use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ascii_enum, check_frame};
use crate::errors::ItchError;
use crate::itch::codec;

ascii_enum! {
  /// Listing venue for an issue.
  MarketCategory {
    NasdaqGlobalSelect = b'Q',
    NasdaqGlobal = b'G',
    NasdaqCapital = b'S',
    Nyse = b'N',
    NyseAmerican = b'A',
    NyseArca = b'P',
    BatsZ = b'Z',
    InvestorsExchange = b'V',
    NotAvailable = b' ',
  }
}

ascii_enum! {
  /// Nasdaq listing-compliance status.
  FinancialStatus {
    Deficient = b'D',
    Delinquent = b'E',
    Bankrupt = b'Q',
    Suspended = b'S',
    DeficientAndBankrupt = b'G',
    DeficientAndDelinquent = b'H',
    DelinquentAndBankrupt = b'J',
    DeficientDelinquentBankrupt = b'K',
    CreationsRedemptionsSuspended = b'C',
    Normal = b'N',
    NotAvailable = b' ',
  }
}

ascii_enum! {
  IssueClassification {
    AmericanDepositoryShare = b'A',
    Bond = b'B',
    CommonStock = b'C',
    DepositoryReceipt = b'F',
    Rule144a = b'I',
    LimitedPartnership = b'L',
    Notes = b'N',
    OrdinaryShare = b'O',
    PreferredStock = b'P',
    OtherSecurities = b'Q',
    Right = b'R',
    SharesOfBeneficialInterest = b'S',
    ConvertibleDebenture = b'T',
    Unit = b'U',
    UnitsBenifInt = b'V',
    Warrant = b'W',
  }
}

ascii_enum! {
  Authenticity {
    Live = b'P',
    Test = b'T',
  }
}

/// Stock Directory (`R`): one per listed issue at start of day, introducing
/// the stock locate code used by every later message for that symbol.
///
/// Parsing one of these through a [`Parser`](crate::itch::Parser) session
/// also updates the session's `directory` and `stock_locates` indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDirectory {
  pub stock_locate: u16,
  pub tracking_number: u16,
  pub timestamp: Duration,
  pub stock: String,
  pub market_category: MarketCategory,
  pub financial_status: FinancialStatus,
  pub round_lot_size: u32,
  pub round_lots_only: bool,
  pub issue_classification: IssueClassification,
  /// Two-character issue sub-type code, trimmed.
  pub issue_subtype: String,
  pub authenticity: Authenticity,
  /// `Y`/`N`/` ` short-sale threshold indicator, kept as the wire byte.
  pub short_sale_threshold: u8,
  pub ipo_flag: u8,
  pub luld_reference_price_tier: u8,
  pub etp_flag: u8,
  pub etp_leverage_factor: u32,
  pub inverse_indicator: bool,
}

impl StockDirectory {
  pub const TAG: u8 = b'R';
  pub const SIZE: usize = 39;

  pub fn parse(data: &[u8]) -> Result<Self, ItchError> {
    check_frame(data, Self::TAG, Self::SIZE)?;
    Ok(StockDirectory {
      stock_locate: codec::read_u16(&data[1..3]),
      tracking_number: codec::read_u16(&data[3..5]),
      timestamp: codec::read_timestamp(data),
      stock: codec::trim_ascii(&data[11..19]),
      market_category: MarketCategory::from(data[19]),
      financial_status: FinancialStatus::from(data[20]),
      round_lot_size: codec::read_u32(&data[21..25]),
      round_lots_only: data[25] == b'Y',
      issue_classification: IssueClassification::from(data[26]),
      issue_subtype: codec::trim_ascii(&data[27..29]),
      authenticity: Authenticity::from(data[29]),
      short_sale_threshold: data[30],
      ipo_flag: data[31],
      luld_reference_price_tier: data[32],
      etp_flag: data[33],
      etp_leverage_factor: codec::read_u32(&data[34..38]),
      inverse_indicator: data[38] == b'Y',
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
    data[19] = self.market_category.code();
    data[20] = self.financial_status.code();
    codec::put_u32(&mut data[21..25], self.round_lot_size);
    data[25] = codec::yes_no(self.round_lots_only);
    data[26] = self.issue_classification.code();
    codec::put_ascii(&mut data[27..29], &self.issue_subtype);
    data[29] = self.authenticity.code();
    data[30] = self.short_sale_threshold;
    data[31] = self.ipo_flag;
    data[32] = self.luld_reference_price_tier;
    data[33] = self.etp_flag;
    codec::put_u32(&mut data[34..38], self.etp_leverage_factor);
    data[38] = codec::yes_no(self.inverse_indicator);
    data
  }
}

impl TryFrom<&[u8]> for StockDirectory {
  type Error = ItchError;

  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    Self::parse(data)
  }
}
