//! SoupBinTCP packet codec.
//!
//! Every packet on the wire is a two-byte big-endian length (excluding
//! itself), a one-byte type, and `length - 1` bytes of body. Login packet
//! text fields are fixed-width ASCII: names and session ids left-justified,
//! sequence numbers right-justified, all space-padded.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::errors::SoupError;

pub const PACKET_LOGIN_REQUEST: u8 = b'L';
pub const PACKET_LOGIN_ACCEPTED: u8 = b'A';
pub const PACKET_LOGIN_REJECTED: u8 = b'J';
pub const PACKET_LOGOUT_REQUEST: u8 = b'O';
pub const PACKET_CLIENT_HEARTBEAT: u8 = b'R';
pub const PACKET_SERVER_HEARTBEAT: u8 = b'H';
pub const PACKET_END_OF_SESSION: u8 = b'Z';
pub const PACKET_SEQUENCED_DATA: u8 = b'S';
pub const PACKET_UNSEQUENCED_DATA: u8 = b'U';
pub const PACKET_DEBUG: u8 = b'+';

/// Frame length (type byte included) of each fixed-size packet.
const FRAME_LOGIN_REQUEST: usize = 52;
const FRAME_LOGIN_ACCEPTED: usize = 31;
const FRAME_LOGIN_REJECTED: usize = 2;

/// Why the server turned a login away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
  /// Bad credentials, or the connection did not open with a Login Request.
  NotAuthorized,
  /// No such session, or no session exists at all.
  SessionUnavailable,
  Unknown(u8),
}

impl RejectReason {
  pub fn code(&self) -> u8 {
    match self {
      RejectReason::NotAuthorized => b'A',
      RejectReason::SessionUnavailable => b'S',
      RejectReason::Unknown(b) => *b,
    }
  }
}

impl From<u8> for RejectReason {
  fn from(b: u8) -> Self {
    match b {
      b'A' => RejectReason::NotAuthorized,
      b'S' => RejectReason::SessionUnavailable,
      other => RejectReason::Unknown(other),
    }
  }
}

/// Any SoupBinTCP packet. Data payloads are opaque to this layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
  LoginRequest {
    username: String,
    password: String,
    requested_session: String,
    requested_sequence: u64,
    heartbeat_timeout_ms: u32,
  },
  LoginAccepted {
    session: String,
    sequence: u64,
  },
  LoginRejected {
    reason: RejectReason,
  },
  LogoutRequest,
  ClientHeartbeat,
  ServerHeartbeat,
  EndOfSession,
  SequencedData(Bytes),
  UnsequencedData(Bytes),
  Debug(String),
}

impl Packet {
  pub fn tag(&self) -> u8 {
    match self {
      Packet::LoginRequest { .. } => PACKET_LOGIN_REQUEST,
      Packet::LoginAccepted { .. } => PACKET_LOGIN_ACCEPTED,
      Packet::LoginRejected { .. } => PACKET_LOGIN_REJECTED,
      Packet::LogoutRequest => PACKET_LOGOUT_REQUEST,
      Packet::ClientHeartbeat => PACKET_CLIENT_HEARTBEAT,
      Packet::ServerHeartbeat => PACKET_SERVER_HEARTBEAT,
      Packet::EndOfSession => PACKET_END_OF_SESSION,
      Packet::SequencedData(_) => PACKET_SEQUENCED_DATA,
      Packet::UnsequencedData(_) => PACKET_UNSEQUENCED_DATA,
      Packet::Debug(_) => PACKET_DEBUG,
    }
  }

  /// Encode as a complete wire frame including the length prefix.
  pub fn to_bytes(&self) -> Bytes {
    match self {
      Packet::LoginRequest {
        username,
        password,
        requested_session,
        requested_sequence,
        heartbeat_timeout_ms,
      } => {
        let mut buf = BytesMut::with_capacity(2 + FRAME_LOGIN_REQUEST);
        buf.put_u16(FRAME_LOGIN_REQUEST as u16);
        buf.put_u8(PACKET_LOGIN_REQUEST);
        put_left(&mut buf, username, 6);
        put_left(&mut buf, password, 10);
        put_left(&mut buf, requested_session, 10);
        put_right_decimal(&mut buf, *requested_sequence, 20);
        put_left(&mut buf, &heartbeat_timeout_ms.to_string(), 5);
        buf.freeze()
      }
      Packet::LoginAccepted { session, sequence } => {
        let mut buf = BytesMut::with_capacity(2 + FRAME_LOGIN_ACCEPTED);
        buf.put_u16(FRAME_LOGIN_ACCEPTED as u16);
        buf.put_u8(PACKET_LOGIN_ACCEPTED);
        put_left(&mut buf, session, 10);
        put_right_decimal(&mut buf, *sequence, 20);
        buf.freeze()
      }
      Packet::LoginRejected { reason } => {
        let mut buf = BytesMut::with_capacity(2 + FRAME_LOGIN_REJECTED);
        buf.put_u16(FRAME_LOGIN_REJECTED as u16);
        buf.put_u8(PACKET_LOGIN_REJECTED);
        buf.put_u8(reason.code());
        buf.freeze()
      }
      Packet::LogoutRequest
      | Packet::ClientHeartbeat
      | Packet::ServerHeartbeat
      | Packet::EndOfSession => {
        let mut buf = BytesMut::with_capacity(3);
        buf.put_u16(1);
        buf.put_u8(self.tag());
        buf.freeze()
      }
      Packet::SequencedData(data) | Packet::UnsequencedData(data) => {
        let mut buf = BytesMut::with_capacity(3 + data.len());
        buf.put_u16(1 + data.len() as u16);
        buf.put_u8(self.tag());
        buf.put_slice(data);
        buf.freeze()
      }
      Packet::Debug(text) => {
        let mut buf = BytesMut::with_capacity(3 + text.len());
        buf.put_u16(1 + text.len() as u16);
        buf.put_u8(PACKET_DEBUG);
        buf.put_slice(text.as_bytes());
        buf.freeze()
      }
    }
  }

  /// Decode a frame (type byte plus body, no length prefix).
  pub fn from_frame(frame: &[u8]) -> Result<Packet, SoupError> {
    let tag = *frame.first().ok_or(SoupError::InvalidPacketSize {
      expected: 1,
      got: 0,
    })?;
    match tag {
      PACKET_LOGIN_REQUEST => {
        expect_frame(frame, FRAME_LOGIN_REQUEST)?;
        Ok(Packet::LoginRequest {
          username: trim(&frame[1..7]),
          password: trim(&frame[7..17]),
          requested_session: trim(&frame[17..27]),
          requested_sequence: parse_decimal(&frame[27..47], "sequence")?,
          heartbeat_timeout_ms: parse_decimal(&frame[47..52], "heartbeat")?
            as u32,
        })
      }
      PACKET_LOGIN_ACCEPTED => {
        expect_frame(frame, FRAME_LOGIN_ACCEPTED)?;
        Ok(Packet::LoginAccepted {
          session: trim(&frame[1..11]),
          sequence: parse_decimal(&frame[11..31], "sequence")?,
        })
      }
      PACKET_LOGIN_REJECTED => {
        expect_frame(frame, FRAME_LOGIN_REJECTED)?;
        Ok(Packet::LoginRejected {
          reason: RejectReason::from(frame[1]),
        })
      }
      PACKET_LOGOUT_REQUEST => Ok(Packet::LogoutRequest),
      PACKET_CLIENT_HEARTBEAT => Ok(Packet::ClientHeartbeat),
      PACKET_SERVER_HEARTBEAT => Ok(Packet::ServerHeartbeat),
      PACKET_END_OF_SESSION => Ok(Packet::EndOfSession),
      PACKET_SEQUENCED_DATA => Ok(Packet::SequencedData(
        Bytes::copy_from_slice(&frame[1..]),
      )),
      PACKET_UNSEQUENCED_DATA => Ok(Packet::UnsequencedData(
        Bytes::copy_from_slice(&frame[1..]),
      )),
      PACKET_DEBUG => Ok(Packet::Debug(
        String::from_utf8_lossy(&frame[1..]).into_owned(),
      )),
      tag => Err(SoupError::InvalidPacketType { tag }),
    }
  }
}

/// Read one packet off the wire: length prefix, then the frame it promises.
pub(crate) async fn read_packet<R>(reader: &mut R) -> Result<Packet, SoupError>
where
  R: AsyncRead + Unpin,
{
  let mut len_buf = [0u8; 2];
  reader.read_exact(&mut len_buf).await?;
  let len = u16::from_be_bytes(len_buf) as usize;
  if len == 0 {
    return Err(SoupError::InvalidPacketSize {
      expected: 1,
      got: 0,
    });
  }
  let mut frame = vec![0u8; len];
  reader.read_exact(&mut frame).await?;
  Packet::from_frame(&frame)
}

fn put_left(buf: &mut BytesMut, text: &str, width: usize) {
  let bytes = text.as_bytes();
  let n = bytes.len().min(width);
  buf.put_slice(&bytes[..n]);
  buf.put_bytes(b' ', width - n);
}

fn put_right_decimal(buf: &mut BytesMut, value: u64, width: usize) {
  let digits = value.to_string();
  let pad = width.saturating_sub(digits.len());
  buf.put_bytes(b' ', pad);
  buf.put_slice(&digits.as_bytes()[digits.len().saturating_sub(width)..]);
}

fn trim(field: &[u8]) -> String {
  String::from_utf8_lossy(field).trim().to_string()
}

fn parse_decimal(
  field: &[u8],
  name: &'static str,
) -> Result<u64, SoupError> {
  String::from_utf8_lossy(field)
    .trim()
    .parse::<u64>()
    .map_err(|_| SoupError::MalformedField(name))
}

fn expect_frame(frame: &[u8], expected: usize) -> Result<(), SoupError> {
  if frame.len() != expected {
    return Err(SoupError::InvalidPacketSize {
      expected,
      got: frame.len(),
    });
  }
  Ok(())
}
