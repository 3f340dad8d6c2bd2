//! SoupBinTCP envelope and body layouts, byte for byte.

use bytes::Bytes;
use finwire::soupbin::{Packet, RejectReason};
use finwire::SoupError;

#[test]
fn login_request_layout() {
  let packet = Packet::LoginRequest {
    username: "test".into(),
    password: "test".into(),
    requested_session: String::new(),
    requested_sequence: 0,
    heartbeat_timeout_ms: 1000,
  };
  let wire = packet.to_bytes();

  assert_eq!(wire.len(), 54);
  assert_eq!(&wire[0..2], &[0x00, 52]); // length excludes itself
  assert_eq!(wire[2], b'L');
  assert_eq!(&wire[3..9], b"test  ");
  assert_eq!(&wire[9..19], b"test      ");
  assert_eq!(&wire[19..29], b"          ");
  assert_eq!(&wire[29..49], b"                   0");
  assert_eq!(&wire[49..54], b"1000 ");

  assert_eq!(Packet::from_frame(&wire[2..]).unwrap(), packet);
}

#[test]
fn login_accepted_layout() {
  let packet = Packet::LoginAccepted {
    session: "ABCDEFGHIJ".into(),
    sequence: 1,
  };
  let wire = packet.to_bytes();

  assert_eq!(wire.len(), 33);
  assert_eq!(&wire[0..2], &[0x00, 31]);
  assert_eq!(wire[2], b'A');
  assert_eq!(&wire[3..13], b"ABCDEFGHIJ");
  assert_eq!(&wire[13..33], b"                   1");

  assert_eq!(Packet::from_frame(&wire[2..]).unwrap(), packet);
}

#[test]
fn login_rejected_is_two_bytes_long() {
  let packet = Packet::LoginRejected {
    reason: RejectReason::NotAuthorized,
  };
  let wire = packet.to_bytes();
  assert_eq!(wire.as_ref(), &[0x00, 0x02, b'J', b'A']);

  let session_unavailable = Packet::LoginRejected {
    reason: RejectReason::SessionUnavailable,
  };
  assert_eq!(
    session_unavailable.to_bytes().as_ref(),
    &[0x00, 0x02, b'J', b'S']
  );
}

#[test]
fn single_byte_packets() {
  for (packet, tag) in [
    (Packet::LogoutRequest, b'O'),
    (Packet::ClientHeartbeat, b'R'),
    (Packet::ServerHeartbeat, b'H'),
    (Packet::EndOfSession, b'Z'),
  ] {
    let wire = packet.to_bytes();
    assert_eq!(wire.as_ref(), &[0x00, 0x01, tag]);
    assert_eq!(Packet::from_frame(&wire[2..]).unwrap(), packet);
  }
}

#[test]
fn data_packets_wrap_opaque_payloads() {
  let payload = Bytes::from_static(b"itch frame bytes");
  let sequenced = Packet::SequencedData(payload.clone());
  let wire = sequenced.to_bytes();
  assert_eq!(wire.len(), 2 + 1 + payload.len());
  assert_eq!(u16::from_be_bytes([wire[0], wire[1]]) as usize, 1 + payload.len());
  assert_eq!(wire[2], b'S');
  assert_eq!(&wire[3..], payload.as_ref());
  assert_eq!(Packet::from_frame(&wire[2..]).unwrap(), sequenced);

  let unsequenced = Packet::UnsequencedData(payload.clone());
  assert_eq!(unsequenced.to_bytes()[2], b'U');
}

#[test]
fn debug_packets_use_the_plus_envelope() {
  let packet = Packet::Debug("hello".into());
  let wire = packet.to_bytes();
  assert_eq!(wire[2], b'+');
  assert_eq!(&wire[3..], b"hello");
  assert_eq!(Packet::from_frame(&wire[2..]).unwrap(), packet);
}

#[test]
fn zero_length_data_payload_is_valid() {
  let wire = Packet::SequencedData(Bytes::new()).to_bytes();
  assert_eq!(wire.as_ref(), &[0x00, 0x01, b'S']);
  assert_eq!(
    Packet::from_frame(&wire[2..]).unwrap(),
    Packet::SequencedData(Bytes::new())
  );
}

#[test]
fn malformed_frames_are_rejected() {
  assert!(matches!(
    Packet::from_frame(&[]),
    Err(SoupError::InvalidPacketSize { .. })
  ));
  assert!(matches!(
    Packet::from_frame(&[b'?', 1, 2]),
    Err(SoupError::InvalidPacketType { tag: b'?' })
  ));
  // Login request frame cut short.
  assert!(matches!(
    Packet::from_frame(&[b'L', b'u']),
    Err(SoupError::InvalidPacketSize { expected: 52, .. })
  ));

  // Non-decimal sequence field.
  let mut frame = vec![b'A'];
  frame.extend_from_slice(b"ABCDEFGHIJ");
  frame.extend_from_slice(b"            not-a-seq");
  frame.truncate(31);
  assert!(matches!(
    Packet::from_frame(&frame),
    Err(SoupError::MalformedField("sequence"))
  ));
}

#[test]
fn max_sequence_fills_the_field_exactly() {
  let packet = Packet::LoginAccepted {
    session: "SESSION   ".into(),
    sequence: u64::MAX,
  };
  let wire = packet.to_bytes();
  assert_eq!(&wire[13..33], b"18446744073709551615");
  assert_eq!(Packet::from_frame(&wire[2..]).unwrap(), packet);
}
