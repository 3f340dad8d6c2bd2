mod ipo_quotation;
mod luld_collar;
mod mwcb;
mod noii;
mod operational_halt;
mod order_add;
mod order_cancel;
mod order_delete;
mod order_executed;
mod order_replace;
mod participant_position;
mod reg_sho;
mod rpii;
mod stock_directory;
mod system_event;
mod trade;
mod trading_action;

pub use self::ipo_quotation::{IpoQuotation, ReleaseQualifier};
pub use self::luld_collar::LuldCollar;
pub use self::mwcb::{MwcbLevel, MwcbStatus};
pub use self::noii::{ImbalanceDirection, Noii};
pub use self::operational_halt::{HaltAction, MarketCode, OperationalHalt};
pub use self::order_add::{OrderAdd, OrderAddAttributed, Side};
pub use self::order_cancel::OrderCancel;
pub use self::order_delete::OrderDelete;
pub use self::order_executed::{OrderExecuted, OrderExecutedPrice};
pub use self::order_replace::OrderReplace;
pub use self::participant_position::{
  MarketMakerMode, MarketParticipantState, ParticipantPosition,
};
pub use self::reg_sho::{RegSho, RegShoAction};
pub use self::rpii::{InterestFlag, Rpii};
pub use self::stock_directory::{
  Authenticity, FinancialStatus, IssueClassification, MarketCategory,
  StockDirectory,
};
pub use self::system_event::{EventCode, SystemEvent};
pub use self::trade::{CrossType, TradeBroken, TradeCross, TradeNonCross};
pub use self::trading_action::{StockTradingAction, TradingState};

use crate::errors::ItchError;

/// Reject frames whose length or leading tag byte does not match the type.
pub(crate) fn check_frame(
  data: &[u8],
  tag: u8,
  size: usize,
) -> Result<(), ItchError> {
  if data.len() != size {
    return Err(ItchError::InvalidPacketSize {
      expected: size,
      got: data.len(),
    });
  }
  if data[0] != tag {
    return Err(ItchError::InvalidPacketType { tag: data[0] });
  }
  Ok(())
}

/// Single-byte ASCII classifier enums. Every enum keeps an `Unknown(u8)` arm
/// so that bytes outside the published code set survive a parse/serialize
/// round trip unchanged.
macro_rules! ascii_enum {
  (
    $(#[$meta:meta])*
    $name:ident { $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)? }
  ) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash,
      serde::Serialize, serde::Deserialize,
    )]
    pub enum $name {
      $($(#[$vmeta])* $variant,)+
      Unknown(u8),
    }

    impl $name {
      /// The wire byte for this code.
      pub fn code(&self) -> u8 {
        match self {
          $(Self::$variant => $code,)+
          Self::Unknown(b) => *b,
        }
      }
    }

    impl From<u8> for $name {
      fn from(b: u8) -> Self {
        match b {
          $($code => Self::$variant,)+
          other => Self::Unknown(other),
        }
      }
    }
  };
}

pub(crate) use ascii_enum;
