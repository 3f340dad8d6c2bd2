use thiserror::Error;

/// Errors produced by the ITCH codec and framer.
#[derive(Debug, Error)]
pub enum ItchError {
  /// A frame's length did not match the canonical length for its type.
  #[error("expected data len={expected} but got={got}")]
  InvalidPacketSize { expected: usize, got: usize },

  /// The leading tag byte is not a known ITCH 5.0 message type.
  #[error("invalid packet type={tag}")]
  InvalidPacketType { tag: u8 },

  /// A price value cannot be represented at the requested width or scale.
  #[error("invalid price")]
  InvalidPrice,

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

/// Errors produced by the SoupBinTCP client, server and packet codec.
#[derive(Debug, Error)]
pub enum SoupError {
  /// Login rejected by the server: bad credentials.
  #[error("not authorized")]
  NotAuthorized,

  /// Login rejected by the server: the requested session does not exist.
  #[error("session not available")]
  SessionUnavailable,

  #[error("expected packet len={expected} but got={got}")]
  InvalidPacketSize { expected: usize, got: usize },

  #[error("invalid packet type={tag}")]
  InvalidPacketType { tag: u8 },

  /// A fixed-width ASCII field did not parse (e.g. a non-decimal sequence).
  #[error("malformed {0} field")]
  MalformedField(&'static str),

  /// A store read past the end of the sequenced message log.
  #[error("sequence {sequence} out of range")]
  SequenceOutOfRange { sequence: u64 },

  #[error("session already exists, call delete_session first")]
  SessionExists,

  #[error("no active session")]
  NoActiveSession,

  /// The client has no live connection; call `login` first.
  #[error("not connected")]
  NotConnected,

  /// The reconnect backoff budget was exhausted without a successful login.
  #[error("failed to reconnect to the server after max retries")]
  ReconnectExhausted,

  #[error(transparent)]
  Io(#[from] std::io::Error),
}
