//! Framing and session state for parsing ITCH feeds.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::io::{BufReader, ErrorKind, Read};
use std::time::Instant;

use super::messages::{ParticipantPosition, StockDirectory};
use super::{codec, wire_length, Message};
use crate::errors::ItchError;

/// Settings for adjusting how messages are parsed.
#[derive(Debug, Clone, Default)]
pub struct Config {
  /// Tag bytes to keep; empty keeps every type. Filtered frames are skipped
  /// by the length table without being decoded.
  pub message_types: Vec<u8>,
  /// Stop after this many frames (0 = no limit).
  pub max_messages: usize,
  /// Buffer size for stream parsing (0 = the `BufReader` default). Bulk
  /// historical file parses benefit from a large buffer.
  pub read_buffer_size: usize,
  /// Whether each message is preceded by a two-byte big-endian length, as in
  /// the historical files NASDAQ publishes.
  pub length_prefixed: bool,
}

/// A parser session.
///
/// Besides the framing configuration, the session owns the lookup tables
/// populated as a side effect of parsing: the stock directory by locate
/// code, the symbol-to-locate map, and the per-MPID market participant
/// positions. Independent sessions never share state, so concurrent parses
/// of different feeds stay isolated.
#[derive(Debug, Default)]
pub struct Parser {
  config: Config,
  /// Most recent `StockDirectory` per stock locate.
  pub directory: HashMap<u16, StockDirectory>,
  /// Trimmed symbol to stock locate.
  pub stock_locates: HashMap<String, u16>,
  /// Append-ordered positions per trimmed MPID.
  pub market_participants: HashMap<String, Vec<ParticipantPosition>>,
}

impl Parser {
  pub fn new(config: Config) -> Self {
    Parser {
      config,
      ..Parser::default()
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  fn wants(&self, tag: u8) -> bool {
    self.config.message_types.is_empty()
      || self.config.message_types.contains(&tag)
  }

  fn index(&mut self, message: &Message) {
    match message {
      Message::StockDirectory(d) => {
        self.stock_locates.insert(d.stock.clone(), d.stock_locate);
        self.directory.insert(d.stock_locate, d.clone());
      }
      Message::ParticipantPosition(p) => {
        self
          .market_participants
          .entry(p.mpid.clone())
          .or_default()
          .push(p.clone());
      }
      _ => {}
    }
  }

  /// Parse a single framed message (no length prefix), updating the session
  /// indices.
  pub fn parse_one(&mut self, data: &[u8]) -> Result<Message, ItchError> {
    let message = Message::parse(data)?;
    self.index(&message);
    Ok(message)
  }

  /// Parse messages from a byte buffer already loaded into memory.
  ///
  /// Frames are delimited by the per-type length table, or by the leading
  /// two-byte length when `length_prefixed` is set. The first malformed
  /// frame stops the parse and surfaces its error; a truncated trailing
  /// frame is malformed.
  pub fn parse_bytes(&mut self, data: &[u8]) -> Result<Vec<Message>, ItchError> {
    let start = Instant::now();
    let mut messages: SmallVec<[Message; 32]> = SmallVec::new();
    let mut frame_count = 0usize;
    let mut pos = 0usize;

    while pos < data.len() {
      if self.config.max_messages > 0 && frame_count >= self.config.max_messages
      {
        break;
      }

      let (frame_start, len) = if self.config.length_prefixed {
        if pos + 2 > data.len() {
          return Err(ItchError::InvalidPacketSize {
            expected: 2,
            got: data.len() - pos,
          });
        }
        (pos + 2, codec::read_u16(&data[pos..pos + 2]) as usize)
      } else {
        let tag = data[pos];
        let len =
          wire_length(tag).ok_or(ItchError::InvalidPacketType { tag })?;
        (pos, len)
      };

      if len == 0 {
        return Err(ItchError::InvalidPacketSize {
          expected: 1,
          got: 0,
        });
      }
      let end = frame_start + len;
      if end > data.len() {
        return Err(ItchError::InvalidPacketSize {
          expected: len,
          got: data.len() - frame_start,
        });
      }

      frame_count += 1;
      pos = end;

      if !self.wants(data[frame_start]) {
        continue;
      }

      let message = Message::parse(&data[frame_start..end])?;
      self.index(&message);
      messages.push(message);
    }

    log_parse_rate(frame_count, start);
    Ok(messages.into_vec())
  }

  /// Parse messages from a reader with the same semantics as
  /// [`parse_bytes`](Self::parse_bytes). End of stream - even in the middle
  /// of a frame - ends the parse cleanly at the last completed message.
  pub fn parse_stream<R: Read>(
    &mut self,
    reader: R,
  ) -> Result<Vec<Message>, ItchError> {
    let mut reader = if self.config.read_buffer_size > 0 {
      BufReader::with_capacity(self.config.read_buffer_size, reader)
    } else {
      BufReader::new(reader)
    };

    let start = Instant::now();
    let mut messages = Vec::new();
    let mut frame_count = 0usize;

    loop {
      if self.config.max_messages > 0 && frame_count >= self.config.max_messages
      {
        break;
      }

      let frame = if self.config.length_prefixed {
        let mut len_buf = [0u8; 2];
        if !read_frame(&mut reader, &mut len_buf)? {
          break;
        }
        let len = u16::from_be_bytes(len_buf) as usize;
        if len == 0 {
          return Err(ItchError::InvalidPacketSize {
            expected: 1,
            got: 0,
          });
        }
        let mut frame = vec![0u8; len];
        if !read_frame(&mut reader, &mut frame)? {
          break;
        }
        frame
      } else {
        let mut tag_buf = [0u8; 1];
        if !read_frame(&mut reader, &mut tag_buf)? {
          break;
        }
        let tag = tag_buf[0];
        let len =
          wire_length(tag).ok_or(ItchError::InvalidPacketType { tag })?;
        let mut frame = vec![0u8; len];
        frame[0] = tag;
        if !read_frame(&mut reader, &mut frame[1..])? {
          break;
        }
        frame
      };

      frame_count += 1;

      if !self.wants(frame[0]) {
        continue;
      }

      let message = Message::parse(&frame)?;
      self.index(&message);
      messages.push(message);
    }

    log_parse_rate(frame_count, start);
    Ok(messages)
  }
}

/// `read_exact` that reports end-of-stream as `Ok(false)` so callers can
/// stop cleanly at the last completed frame. Other I/O errors surface.
fn read_frame<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool, ItchError> {
  match reader.read_exact(buf) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
    Err(e) => Err(e.into()),
  }
}

fn log_parse_rate(frame_count: usize, start: Instant) {
  let elapsed = start.elapsed();
  log::debug!(
    "parsed {} frames in {:?} ({:.2} frames/s)",
    frame_count,
    elapsed,
    frame_count as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
  );
}
