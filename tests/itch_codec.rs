//! Byte-level contracts for the ITCH message codecs: round trips, canonical
//! sizes, and captured wire frames.

use std::time::Duration;

use finwire::itch::{
  CrossType, EventCode, ImbalanceDirection, InterestFlag, IpoQuotation,
  LuldCollar, Message, MwcbLevel, MwcbStatus, Noii, OperationalHalt,
  OrderAdd, OrderAddAttributed, OrderCancel, OrderDelete, OrderExecuted,
  OrderExecutedPrice, OrderReplace, ParticipantPosition, RegSho, Rpii, Side,
  StockDirectory, StockTradingAction, SystemEvent, TradeBroken, TradeCross,
  TradeNonCross,
};
use finwire::itch::{
  Authenticity, FinancialStatus, HaltAction, IssueClassification,
  MarketCategory, MarketCode, MarketMakerMode, MarketParticipantState,
  RegShoAction, ReleaseQualifier, TradingState,
};
use finwire::{ItchError, Price};

fn ts(nanos: u64) -> Duration {
  Duration::from_nanos(nanos)
}

/// One representative value per message type.
fn samples() -> Vec<Message> {
  vec![
    Message::SystemEvent(SystemEvent {
      stock_locate: 0,
      tracking_number: 1,
      timestamp: ts(11_280_000_000_007),
      event_code: EventCode::StartOfMarket,
    }),
    Message::StockDirectory(StockDirectory {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(11_300_000_010_000),
      stock: "AAPL".into(),
      market_category: MarketCategory::NasdaqGlobalSelect,
      financial_status: FinancialStatus::Normal,
      round_lot_size: 100,
      round_lots_only: false,
      issue_classification: IssueClassification::CommonStock,
      issue_subtype: "C".into(),
      authenticity: Authenticity::Live,
      short_sale_threshold: b'N',
      ipo_flag: b'N',
      luld_reference_price_tier: b'1',
      etp_flag: b'N',
      etp_leverage_factor: 0,
      inverse_indicator: false,
    }),
    Message::StockTradingAction(StockTradingAction {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(11_310_000_000_000),
      stock: "AAPL".into(),
      trading_state: TradingState::Trading,
      reserved: b' ',
      reason: "T1".into(),
    }),
    Message::RegSho(RegSho {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(11_320_000_000_000),
      stock: "AAPL".into(),
      action: RegShoAction::PriceTestIntraday,
    }),
    Message::ParticipantPosition(ParticipantPosition {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(11_330_000_000_000),
      mpid: "GSCO".into(),
      stock: "AAPL".into(),
      primary_market_maker: true,
      mode: MarketMakerMode::Normal,
      state: MarketParticipantState::Active,
    }),
    Message::MwcbLevel(MwcbLevel {
      stock_locate: 0,
      tracking_number: 0,
      timestamp: ts(11_340_000_000_000),
      level_one: Price::price8(304_426_000_000),
      level_two: Price::price8(284_785_000_000),
      level_three: Price::price8(261_872_000_000),
    }),
    Message::MwcbStatus(MwcbStatus {
      stock_locate: 0,
      tracking_number: 0,
      timestamp: ts(11_350_000_000_000),
      breached_level: b'1',
    }),
    Message::IpoQuotation(IpoQuotation {
      stock_locate: 0,
      tracking_number: 0,
      timestamp: ts(30_339_142_161_035),
      stock: "BDTX".into(),
      release_time: Duration::from_secs(36_600),
      qualifier: ReleaseQualifier::Anticipated,
      price: Price::price4(190_000),
    }),
    Message::LuldCollar(LuldCollar {
      stock_locate: 6764,
      tracking_number: 0,
      timestamp: ts(36_356_111_353_705),
      stock: "RKDA".into(),
      reference_price: Price::price4(54_300),
      upper_price: Price::price4(59_700),
      lower_price: Price::price4(44_400),
      extension: 1,
    }),
    Message::OperationalHalt(OperationalHalt {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(11_360_000_000_000),
      stock: "AAPL".into(),
      market: MarketCode::Nasdaq,
      action: HaltAction::Halted,
    }),
    Message::OrderAdd(OrderAdd {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_001_234),
      reference: 36_110,
      side: Side::Buy,
      shares: 100,
      stock: "AAPL".into(),
      price: Price::price4(1_923_400),
    }),
    Message::OrderAddAttributed(OrderAddAttributed {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_002_000),
      reference: 36_111,
      side: Side::Sell,
      shares: 250,
      stock: "AAPL".into(),
      price: Price::price4(1_924_000),
      attribution: "NITE".into(),
    }),
    Message::OrderExecuted(OrderExecuted {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_003_000),
      reference: 36_110,
      shares: 100,
      match_number: 900_001,
    }),
    Message::OrderExecutedPrice(OrderExecutedPrice {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_004_000),
      reference: 36_111,
      shares: 50,
      match_number: 900_002,
      printable: true,
      execution_price: Price::price4(1_923_900),
    }),
    Message::OrderCancel(OrderCancel {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_005_000),
      reference: 36_111,
      canceled_shares: 200,
    }),
    Message::OrderDelete(OrderDelete {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_006_000),
      reference: 36_111,
    }),
    Message::OrderReplace(OrderReplace {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_007_000),
      original_reference: 36_110,
      new_reference: 36_200,
      shares: 80,
      price: Price::price4(1_923_000),
    }),
    Message::TradeNonCross(TradeNonCross {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_008_000),
      reference: 0,
      side: Side::Buy,
      shares: 300,
      stock: "AAPL".into(),
      price: Price::price4(1_923_500),
      match_number: 900_003,
    }),
    Message::TradeCross(TradeCross {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_199_000_000_000),
      shares: 1_250_000,
      stock: "AAPL".into(),
      cross_price: Price::price4(1_920_000),
      match_number: 900_004,
      cross_type: CrossType::Opening,
    }),
    Message::TradeBroken(TradeBroken {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_009_000),
      match_number: 900_003,
    }),
    Message::Noii(Noii {
      stock_locate: 6377,
      tracking_number: 0,
      timestamp: ts(34_100_000_000_000),
      paired_shares: 40_000,
      imbalance_shares: 12_500,
      imbalance_direction: ImbalanceDirection::Buy,
      stock: "PRU".into(),
      far_price: Price::price4(801_200),
      near_price: Price::price4(801_700),
      current_reference_price: Price::price4(801_500),
      cross_type: CrossType::Closing,
      variation_indicator: b'A',
    }),
    Message::Rpii(Rpii {
      stock_locate: 5244,
      tracking_number: 0,
      timestamp: ts(34_200_000_010_000),
      stock: "AAPL".into(),
      interest: InterestFlag::BothSides,
    }),
  ]
}

#[test]
fn every_variant_round_trips() {
  let samples = samples();
  assert_eq!(samples.len(), 22);
  for message in samples {
    let frame = message.to_bytes();
    assert_eq!(frame[0], message.tag());
    let reparsed = Message::parse(&frame)
      .unwrap_or_else(|e| panic!("tag {}: {}", message.tag() as char, e));
    assert_eq!(reparsed, message, "tag {}", message.tag() as char);
  }
}

#[test]
fn serialized_frames_have_canonical_length() {
  let expected: &[(u8, usize)] = &[
    (b'S', 12),
    (b'R', 39),
    (b'H', 25),
    (b'Y', 20),
    (b'L', 26),
    (b'V', 35),
    (b'W', 12),
    (b'K', 28),
    (b'J', 35),
    (b'h', 21),
    (b'A', 36),
    (b'F', 40),
    (b'E', 31),
    (b'C', 36),
    (b'X', 23),
    (b'D', 19),
    (b'U', 35),
    (b'P', 44),
    (b'Q', 40),
    (b'B', 19),
    (b'I', 50),
    (b'N', 20),
  ];
  for message in samples() {
    let (_, len) = expected
      .iter()
      .find(|(tag, _)| *tag == message.tag())
      .expect("known tag");
    assert_eq!(
      message.to_bytes().len(),
      *len,
      "tag {}",
      message.tag() as char
    );
  }
}

#[test]
fn wrong_length_frames_are_rejected() {
  for message in samples() {
    let frame = message.to_bytes();

    let short = &frame[..frame.len() - 1];
    assert!(
      matches!(
        Message::parse(short),
        Err(ItchError::InvalidPacketSize { .. })
      ),
      "short frame accepted for tag {}",
      message.tag() as char
    );

    let mut long = frame.clone();
    long.push(0);
    assert!(
      matches!(
        Message::parse(&long),
        Err(ItchError::InvalidPacketSize { .. })
      ),
      "long frame accepted for tag {}",
      message.tag() as char
    );
  }
}

#[test]
fn unknown_tag_is_rejected() {
  assert!(matches!(
    Message::parse(&[b'z'; 20]),
    Err(ItchError::InvalidPacketType { tag: b'z' })
  ));
  assert!(matches!(
    Message::parse(&[]),
    Err(ItchError::InvalidPacketSize { .. })
  ));
}

#[test]
fn unknown_enum_bytes_survive_round_trips() {
  let mut frame = SystemEvent {
    stock_locate: 0,
    tracking_number: 0,
    timestamp: ts(1),
    event_code: EventCode::StartOfMessages,
  }
  .to_bytes();
  frame[11] = b'?';

  let parsed = SystemEvent::parse(&frame).unwrap();
  assert_eq!(parsed.event_code, EventCode::Unknown(b'?'));
  assert_eq!(parsed.to_bytes(), frame);
}

#[test]
fn ipo_quotation_wire_vector() {
  // Captured BDTX IPO quotation.
  let frame: &[u8] = &[
    0x4B, 0x00, 0x00, 0x00, 0x00, 0x1B, 0x97, 0xE1, 0xCA, 0x92, 0x8B, 0x42,
    0x44, 0x54, 0x58, 0x20, 0x20, 0x20, 0x20, 0x00, 0x00, 0x8E, 0xF8, 0x41,
    0x00, 0x02, 0xE6, 0x30,
  ];

  let parsed = IpoQuotation::parse(frame).unwrap();
  assert_eq!(parsed.stock_locate, 0);
  assert_eq!(parsed.tracking_number, 0);
  // 8h25m39.142161035s after midnight
  assert_eq!(parsed.timestamp, ts(30_339_142_161_035));
  assert_eq!(parsed.stock, "BDTX");
  assert_eq!(parsed.release_time, Duration::from_secs(36_600));
  assert_eq!(parsed.qualifier, ReleaseQualifier::Anticipated);
  assert_eq!(parsed.price, Price::price4(190_000)); // 19.0000
  assert_eq!(parsed.to_bytes(), frame);
}

#[test]
fn luld_collar_wire_vector() {
  // Captured RKDA auction collar.
  let frame: &[u8] = &[
    0x4A, 0x1A, 0x6C, 0x00, 0x00, 0x21, 0x10, 0x14, 0xA2, 0xF7, 0x69, 0x52,
    0x4B, 0x44, 0x41, 0x20, 0x20, 0x20, 0x20, 0x00, 0x00, 0xD4, 0x1C, 0x00,
    0x00, 0xE9, 0x34, 0x00, 0x00, 0xAD, 0x70, 0x00, 0x00, 0x00, 0x01,
  ];

  let parsed = LuldCollar::parse(frame).unwrap();
  assert_eq!(parsed.stock_locate, 6764);
  assert_eq!(parsed.stock, "RKDA");
  assert_eq!(parsed.reference_price, Price::price4(54_300)); // 5.43
  assert_eq!(parsed.upper_price, Price::price4(59_700)); // 5.97
  assert_eq!(parsed.lower_price, Price::price4(44_400)); // 4.44
  assert_eq!(parsed.extension, 1);
  assert_eq!(parsed.to_bytes(), frame);
}

#[test]
fn mwcb_level_wire_vector() {
  let frame: &[u8] = &[
    0x56, 0x00, 0x00, 0x00, 0x00, 0x16, 0xEC, 0x46, 0x6A, 0x28, 0x27, 0x00,
    0x00, 0x00, 0x46, 0xE1, 0x34, 0x1E, 0x80, 0x00, 0x00, 0x00, 0x42, 0x4E,
    0x82, 0x3E, 0x40, 0x00, 0x00, 0x00, 0x3C, 0xF8, 0xC9, 0x9C, 0x00,
  ];

  let parsed = MwcbLevel::parse(frame).unwrap();
  assert_eq!(parsed.level_one, Price::price8(304_426_000_000));
  assert_eq!(parsed.level_two, Price::price8(284_785_000_000));
  assert_eq!(parsed.level_three, Price::price8(261_872_000_000));
  assert_eq!(parsed.level_one.to_string(), "3044.26000000");
  assert_eq!(parsed.level_two.to_string(), "2847.85000000");
  assert_eq!(parsed.level_three.to_string(), "2618.72000000");
  assert_eq!(parsed.to_bytes(), frame);
}

#[test]
fn noii_wire_vector() {
  // Pre-open PRU imbalance with insufficient orders: every quantity and
  // price zero, variation indicator space.
  let mut frame = vec![0u8; 50];
  frame[0] = 0x49;
  frame[1..3].copy_from_slice(&[0x18, 0xE9]);
  frame[5..11].copy_from_slice(&[0x1F, 0x08, 0x33, 0xB9, 0x66, 0x5D]);
  frame[27] = 0x4F; // direction 'O'
  frame[28..36].copy_from_slice(b"PRU     ");
  frame[48] = 0x4F; // cross type 'O'
  frame[49] = 0x20;

  let parsed = Noii::parse(&frame).unwrap();
  assert_eq!(parsed.stock_locate, 6377);
  assert_eq!(parsed.stock, "PRU");
  assert_eq!(parsed.paired_shares, 0);
  assert_eq!(parsed.imbalance_shares, 0);
  assert_eq!(parsed.imbalance_direction, ImbalanceDirection::Insufficient);
  assert_eq!(parsed.cross_type, CrossType::Opening);
  assert_eq!(parsed.variation_indicator, 0x20);
  assert_eq!(parsed.far_price, Price::price4(0));
  assert_eq!(parsed.near_price, Price::price4(0));
  assert_eq!(parsed.current_reference_price, Price::price4(0));
  assert_eq!(parsed.to_bytes(), frame);
}

#[test]
fn price_wire_fidelity_across_scales() {
  for raw in [0u64, 1, 9_999, 54_300, 190_000, u32::MAX as u64] {
    let p = Price::from_fixed(raw, Price::SCALE4);
    let wire = p.to_wire(4).unwrap();
    assert_eq!(wire.len(), 4);
    assert_eq!(Price::from_wire(&wire, Price::SCALE4).unwrap(), p);
  }
  for raw in [0u64, 304_426_000_000, u64::MAX] {
    let p = Price::from_fixed(raw, Price::SCALE8);
    let wire = p.to_wire(8).unwrap();
    assert_eq!(wire.len(), 8);
    assert_eq!(Price::from_wire(&wire, Price::SCALE8).unwrap(), p);
  }
}

#[test]
fn prices_with_equal_raw_but_different_scale_differ() {
  assert_ne!(
    Price::from_fixed(190_000, Price::SCALE4),
    Price::from_fixed(190_000, Price::SCALE8)
  );
}

#[test]
fn tracking_number_and_timestamp_share_the_wire_window() {
  // The tracking number occupies the two bytes right above the 48-bit
  // timestamp; neither may bleed into the other.
  for (tracking, nanos) in [
    (0u16, 0u64),
    (0xFFFF, (1 << 48) - 1),
    (0x0102, 30_339_142_161_035),
    (1, 86_399_999_999_999),
  ] {
    let message = SystemEvent {
      stock_locate: 0,
      tracking_number: tracking,
      timestamp: ts(nanos),
      event_code: EventCode::EndOfMessages,
    };
    let frame = message.to_bytes();
    assert_eq!(u16::from_be_bytes([frame[3], frame[4]]), tracking);
    let parsed = SystemEvent::parse(&frame).unwrap();
    assert_eq!(parsed.tracking_number, tracking);
    assert_eq!(parsed.timestamp, ts(nanos));
  }
}

#[test]
fn padded_text_fields_parse_back_trimmed() {
  let add = OrderAdd {
    stock_locate: 1,
    tracking_number: 0,
    timestamp: ts(1),
    reference: 7,
    side: Side::Sell,
    shares: 1,
    stock: "BRK A".into(),
    price: Price::price4(1),
  };
  let frame = add.to_bytes();
  assert_eq!(&frame[24..32], b"BRK A   ");
  assert_eq!(OrderAdd::parse(&frame).unwrap().stock, "BRK A");
}
