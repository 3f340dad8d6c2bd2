//! Parse an ITCH 5.0 file and print a feed summary.
//!
//! NASDAQ's historical sample files are length-prefixed:
//!
//! ```text
//! cargo run --example itch_dump -- 01302020.NASDAQ_ITCH50
//! ```

use std::collections::BTreeMap;
use std::fs::File;

use finwire::itch::{Config, Parser};

const ONE_GB: usize = 1 << 30;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  env_logger::init();

  let path = std::env::args()
    .nth(1)
    .ok_or("usage: itch_dump <path-to-itch-file>")?;

  let mut parser = Parser::new(Config {
    length_prefixed: true,
    read_buffer_size: ONE_GB,
    ..Config::default()
  });

  let file = File::open(&path)?;
  let messages = parser.parse_stream(file)?;

  let mut counts: BTreeMap<char, usize> = BTreeMap::new();
  for message in &messages {
    *counts.entry(message.tag() as char).or_default() += 1;
  }

  println!("{}: {} messages", path, messages.len());
  for (tag, count) in &counts {
    println!("  {}  {:>12}", tag, count);
  }
  println!(
    "directory: {} symbols, {} market participants",
    parser.directory.len(),
    parser.market_participants.len()
  );

  if let Some(first) = messages.first() {
    println!("first message: {}", serde_json::to_string_pretty(first)?);
  }

  Ok(())
}
