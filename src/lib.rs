#![allow(clippy::cognitive_complexity, clippy::large_enum_variant)]
#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]
#![doc(test(
  no_crate_inject,
  attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! # finwire
//!
//! NASDAQ market-data wire protocols for Rust: a byte-exact
//! TotalView-ITCH 5.0 codec and a SoupBinTCP 4.1 client/server.
//!
//! ## Features
//!
//! - **Byte-exact ITCH codec** - all 22 message types parse and serialize to
//!   identical wire bytes, with exact fixed-point prices and 48-bit
//!   timestamps
//! - **Streaming framer** - bulk in-memory and buffered-reader parsing, with
//!   type filtering, message caps and the length-prefixed historical-file
//!   format
//! - **Session transport** - SoupBinTCP login, sequenced delivery, gap
//!   recovery across reconnects, heartbeats and end-of-session on both the
//!   client and server sides
//! - **Pluggable storage** - the server replays from a [`MessageStore`];
//!   the in-memory default can be swapped for a durable log
//! - **Async-first** - built on Tokio; the ITCH codec itself is pure and
//!   runs anywhere
//!
//! ## Parsing ITCH
//!
//! ```rust
//! use finwire::itch::{Config, Message, Parser};
//!
//! fn main() -> Result<(), finwire::ItchError> {
//!   let feed: &[u8] = &[];
//!   let mut parser = Parser::new(Config {
//!     // Keep only add-order and executed messages.
//!     message_types: vec![b'A', b'E'],
//!     ..Config::default()
//!   });
//!
//!   for message in parser.parse_bytes(feed)? {
//!     if let Message::OrderAdd(add) = message {
//!       println!("{} {}x{} @ {}", add.stock, add.reference, add.shares, add.price);
//!     }
//!   }
//!   Ok(())
//! }
//! ```
//!
//! ## Consuming a SoupBinTCP feed
//!
//! ```rust,no_run
//! use finwire::soupbin::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), finwire::SoupError> {
//!   let mut client = Client::builder("127.0.0.1:5000")
//!     .auth("user", "pass")
//!     .on_sequenced(|payload| {
//!       // Each payload is one message off the sequenced stream,
//!       // e.g. a single ITCH frame.
//!       println!("sequenced: {} bytes", payload.len());
//!     })
//!     .build();
//!
//!   client.login().await?;
//!   // Blocks until end-of-session, reconnecting through network blips.
//!   client.receive().await?;
//!   Ok(())
//! }
//! ```
//!
//! ## Serving a session
//!
//! ```rust,no_run
//! use finwire::soupbin::Server;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), finwire::SoupError> {
//!   let server = Arc::new(
//!     Server::builder()
//!       .on_login(|username, _password| username == "user")
//!       .build(),
//!   );
//!   server.create_session("MORNING   ").await?;
//!
//!   let publisher = server.clone();
//!   tokio::spawn(async move {
//!     let _ = publisher.send_to_session(b"payload").await;
//!   });
//!
//!   server.listen_and_serve("0.0.0.0:5000").await
//! }
//! ```
//!
//! ## Zero-copy raw access (advanced)
//!
//! Book builders that only care about the order-flow messages can view
//! frames in place without allocating, via `zerocopy`-backed unaligned
//! big-endian structs:
//!
//! ```rust
//! use finwire::itch::raw::as_order_add_raw;
//!
//! # let frame = { let mut f = vec![0u8; 36]; f[0] = b'A'; f };
//! if let Some(add) = as_order_add_raw(&frame) {
//!   let _ = (add.reference.get(), add.shares.get(), add.price.get());
//! }
//! ```
//!
//! The two layers are independent: the SoupBin transport treats payloads as
//! opaque bytes, and the ITCH codec never touches a socket. The demo
//! programs under `demos/` show them composed into a feed server and client.

mod errors;
pub mod itch;
pub mod soupbin;

pub use errors::{ItchError, SoupError};
pub use itch::{Config, Message, Parser, Price};
pub use soupbin::{
  Client, ClientBuilder, ExponentialBackoff, MemoryStore, MessageStore,
  Packet, RejectReason, Server, ServerBuilder, HEARTBEAT_PERIOD,
};
