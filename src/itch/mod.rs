//! NASDAQ TotalView-ITCH 5.0 codec.
//!
//! Twenty-two fixed-layout message types, a tagged [`Message`] union, and a
//! [`Parser`] session for bulk/stream framing. All codecs are pure functions
//! over byte slices; the only state lives in the parser session's symbol
//! indices.

pub(crate) mod codec;
mod messages;
mod parser;
pub mod price;
pub mod raw;

pub use codec::pad_ascii;
pub use messages::*;
pub use parser::{Config, Parser};
pub use price::Price;

use serde::{Deserialize, Serialize};

use crate::errors::ItchError;

pub const MESSAGE_SYSTEM_EVENT: u8 = b'S';
pub const MESSAGE_STOCK_DIRECTORY: u8 = b'R';
pub const MESSAGE_STOCK_TRADING_ACTION: u8 = b'H';
pub const MESSAGE_REG_SHO: u8 = b'Y';
pub const MESSAGE_PARTICIPANT_POSITION: u8 = b'L';
pub const MESSAGE_MWCB_LEVEL: u8 = b'V';
pub const MESSAGE_MWCB_STATUS: u8 = b'W';
pub const MESSAGE_IPO_QUOTATION: u8 = b'K';
pub const MESSAGE_LULD_COLLAR: u8 = b'J';
pub const MESSAGE_OPERATIONAL_HALT: u8 = b'h';
pub const MESSAGE_ORDER_ADD: u8 = b'A';
pub const MESSAGE_ORDER_ADD_ATTRIBUTED: u8 = b'F';
pub const MESSAGE_ORDER_EXECUTED: u8 = b'E';
pub const MESSAGE_ORDER_EXECUTED_PRICE: u8 = b'C';
pub const MESSAGE_ORDER_CANCEL: u8 = b'X';
pub const MESSAGE_ORDER_DELETE: u8 = b'D';
pub const MESSAGE_ORDER_REPLACE: u8 = b'U';
pub const MESSAGE_TRADE_NON_CROSS: u8 = b'P';
pub const MESSAGE_TRADE_CROSS: u8 = b'Q';
pub const MESSAGE_TRADE_BROKEN: u8 = b'B';
pub const MESSAGE_NOII: u8 = b'I';
pub const MESSAGE_RPII: u8 = b'N';

/// Canonical frame length for a tag byte, or `None` for unknown tags.
pub fn wire_length(tag: u8) -> Option<usize> {
  let len = match tag {
    MESSAGE_SYSTEM_EVENT => SystemEvent::SIZE,
    MESSAGE_STOCK_DIRECTORY => StockDirectory::SIZE,
    MESSAGE_STOCK_TRADING_ACTION => StockTradingAction::SIZE,
    MESSAGE_REG_SHO => RegSho::SIZE,
    MESSAGE_PARTICIPANT_POSITION => ParticipantPosition::SIZE,
    MESSAGE_MWCB_LEVEL => MwcbLevel::SIZE,
    MESSAGE_MWCB_STATUS => MwcbStatus::SIZE,
    MESSAGE_IPO_QUOTATION => IpoQuotation::SIZE,
    MESSAGE_LULD_COLLAR => LuldCollar::SIZE,
    MESSAGE_OPERATIONAL_HALT => OperationalHalt::SIZE,
    MESSAGE_ORDER_ADD => OrderAdd::SIZE,
    MESSAGE_ORDER_ADD_ATTRIBUTED => OrderAddAttributed::SIZE,
    MESSAGE_ORDER_EXECUTED => OrderExecuted::SIZE,
    MESSAGE_ORDER_EXECUTED_PRICE => OrderExecutedPrice::SIZE,
    MESSAGE_ORDER_CANCEL => OrderCancel::SIZE,
    MESSAGE_ORDER_DELETE => OrderDelete::SIZE,
    MESSAGE_ORDER_REPLACE => OrderReplace::SIZE,
    MESSAGE_TRADE_NON_CROSS => TradeNonCross::SIZE,
    MESSAGE_TRADE_CROSS => TradeCross::SIZE,
    MESSAGE_TRADE_BROKEN => TradeBroken::SIZE,
    MESSAGE_NOII => Noii::SIZE,
    MESSAGE_RPII => Rpii::SIZE,
    _ => return None,
  };
  Some(len)
}

/// Any ITCH 5.0 message. The arm is selected by the frame's leading tag
/// byte; `tag` and `to_bytes` are total across the union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
  SystemEvent(SystemEvent),
  StockDirectory(StockDirectory),
  StockTradingAction(StockTradingAction),
  RegSho(RegSho),
  ParticipantPosition(ParticipantPosition),
  MwcbLevel(MwcbLevel),
  MwcbStatus(MwcbStatus),
  IpoQuotation(IpoQuotation),
  LuldCollar(LuldCollar),
  OperationalHalt(OperationalHalt),
  OrderAdd(OrderAdd),
  OrderAddAttributed(OrderAddAttributed),
  OrderExecuted(OrderExecuted),
  OrderExecutedPrice(OrderExecutedPrice),
  OrderCancel(OrderCancel),
  OrderDelete(OrderDelete),
  OrderReplace(OrderReplace),
  TradeNonCross(TradeNonCross),
  TradeCross(TradeCross),
  TradeBroken(TradeBroken),
  Noii(Noii),
  Rpii(Rpii),
}

impl Message {
  /// Parse a single frame (no length prefix), dispatching on the tag byte.
  ///
  /// This is the pure form: it does not touch any session indices. Use
  /// [`Parser::parse_one`] to keep the directory and participant maps
  /// current.
  pub fn parse(data: &[u8]) -> Result<Message, ItchError> {
    let tag = *data.first().ok_or(ItchError::InvalidPacketSize {
      expected: 1,
      got: 0,
    })?;
    let msg = match tag {
      MESSAGE_SYSTEM_EVENT => Message::SystemEvent(SystemEvent::parse(data)?),
      MESSAGE_STOCK_DIRECTORY => {
        Message::StockDirectory(StockDirectory::parse(data)?)
      }
      MESSAGE_STOCK_TRADING_ACTION => {
        Message::StockTradingAction(StockTradingAction::parse(data)?)
      }
      MESSAGE_REG_SHO => Message::RegSho(RegSho::parse(data)?),
      MESSAGE_PARTICIPANT_POSITION => {
        Message::ParticipantPosition(ParticipantPosition::parse(data)?)
      }
      MESSAGE_MWCB_LEVEL => Message::MwcbLevel(MwcbLevel::parse(data)?),
      MESSAGE_MWCB_STATUS => Message::MwcbStatus(MwcbStatus::parse(data)?),
      MESSAGE_IPO_QUOTATION => {
        Message::IpoQuotation(IpoQuotation::parse(data)?)
      }
      MESSAGE_LULD_COLLAR => Message::LuldCollar(LuldCollar::parse(data)?),
      MESSAGE_OPERATIONAL_HALT => {
        Message::OperationalHalt(OperationalHalt::parse(data)?)
      }
      MESSAGE_ORDER_ADD => Message::OrderAdd(OrderAdd::parse(data)?),
      MESSAGE_ORDER_ADD_ATTRIBUTED => {
        Message::OrderAddAttributed(OrderAddAttributed::parse(data)?)
      }
      MESSAGE_ORDER_EXECUTED => {
        Message::OrderExecuted(OrderExecuted::parse(data)?)
      }
      MESSAGE_ORDER_EXECUTED_PRICE => {
        Message::OrderExecutedPrice(OrderExecutedPrice::parse(data)?)
      }
      MESSAGE_ORDER_CANCEL => Message::OrderCancel(OrderCancel::parse(data)?),
      MESSAGE_ORDER_DELETE => Message::OrderDelete(OrderDelete::parse(data)?),
      MESSAGE_ORDER_REPLACE => {
        Message::OrderReplace(OrderReplace::parse(data)?)
      }
      MESSAGE_TRADE_NON_CROSS => {
        Message::TradeNonCross(TradeNonCross::parse(data)?)
      }
      MESSAGE_TRADE_CROSS => Message::TradeCross(TradeCross::parse(data)?),
      MESSAGE_TRADE_BROKEN => Message::TradeBroken(TradeBroken::parse(data)?),
      MESSAGE_NOII => Message::Noii(Noii::parse(data)?),
      MESSAGE_RPII => Message::Rpii(Rpii::parse(data)?),
      tag => return Err(ItchError::InvalidPacketType { tag }),
    };
    Ok(msg)
  }

  /// The tag byte identifying this message on the wire.
  pub fn tag(&self) -> u8 {
    match self {
      Message::SystemEvent(_) => MESSAGE_SYSTEM_EVENT,
      Message::StockDirectory(_) => MESSAGE_STOCK_DIRECTORY,
      Message::StockTradingAction(_) => MESSAGE_STOCK_TRADING_ACTION,
      Message::RegSho(_) => MESSAGE_REG_SHO,
      Message::ParticipantPosition(_) => MESSAGE_PARTICIPANT_POSITION,
      Message::MwcbLevel(_) => MESSAGE_MWCB_LEVEL,
      Message::MwcbStatus(_) => MESSAGE_MWCB_STATUS,
      Message::IpoQuotation(_) => MESSAGE_IPO_QUOTATION,
      Message::LuldCollar(_) => MESSAGE_LULD_COLLAR,
      Message::OperationalHalt(_) => MESSAGE_OPERATIONAL_HALT,
      Message::OrderAdd(_) => MESSAGE_ORDER_ADD,
      Message::OrderAddAttributed(_) => MESSAGE_ORDER_ADD_ATTRIBUTED,
      Message::OrderExecuted(_) => MESSAGE_ORDER_EXECUTED,
      Message::OrderExecutedPrice(_) => MESSAGE_ORDER_EXECUTED_PRICE,
      Message::OrderCancel(_) => MESSAGE_ORDER_CANCEL,
      Message::OrderDelete(_) => MESSAGE_ORDER_DELETE,
      Message::OrderReplace(_) => MESSAGE_ORDER_REPLACE,
      Message::TradeNonCross(_) => MESSAGE_TRADE_NON_CROSS,
      Message::TradeCross(_) => MESSAGE_TRADE_CROSS,
      Message::TradeBroken(_) => MESSAGE_TRADE_BROKEN,
      Message::Noii(_) => MESSAGE_NOII,
      Message::Rpii(_) => MESSAGE_RPII,
    }
  }

  /// Serialize back to a canonical-length frame.
  pub fn to_bytes(&self) -> Vec<u8> {
    match self {
      Message::SystemEvent(m) => m.to_bytes(),
      Message::StockDirectory(m) => m.to_bytes(),
      Message::StockTradingAction(m) => m.to_bytes(),
      Message::RegSho(m) => m.to_bytes(),
      Message::ParticipantPosition(m) => m.to_bytes(),
      Message::MwcbLevel(m) => m.to_bytes(),
      Message::MwcbStatus(m) => m.to_bytes(),
      Message::IpoQuotation(m) => m.to_bytes(),
      Message::LuldCollar(m) => m.to_bytes(),
      Message::OperationalHalt(m) => m.to_bytes(),
      Message::OrderAdd(m) => m.to_bytes(),
      Message::OrderAddAttributed(m) => m.to_bytes(),
      Message::OrderExecuted(m) => m.to_bytes(),
      Message::OrderExecutedPrice(m) => m.to_bytes(),
      Message::OrderCancel(m) => m.to_bytes(),
      Message::OrderDelete(m) => m.to_bytes(),
      Message::OrderReplace(m) => m.to_bytes(),
      Message::TradeNonCross(m) => m.to_bytes(),
      Message::TradeCross(m) => m.to_bytes(),
      Message::TradeBroken(m) => m.to_bytes(),
      Message::Noii(m) => m.to_bytes(),
      Message::Rpii(m) => m.to_bytes(),
    }
  }
}
