//! SoupBinTCP 4.1 session transport.
//!
//! The session layer NASDAQ uses to carry ITCH (and similar feeds) over
//! TCP: authenticated login, in-order guaranteed sequenced delivery with
//! gap recovery across reconnects, unsequenced client traffic, heartbeats
//! in both directions, and an end-of-session terminator. Payloads are
//! opaque bytes; this module knows nothing about what rides on top of it.

mod backoff;
mod client;
pub mod packet;
mod server;
mod session;
mod store;

pub use backoff::{BackoffState, ExponentialBackoff};
pub use client::{Client, ClientBuilder};
pub use packet::{Packet, RejectReason};
pub use server::{Server, ServerBuilder};
pub use store::{MemoryStore, MessageStore};

use std::time::Duration;

/// Heartbeat cadence on both sides of the connection. The client also
/// advertises this value in its Login Request.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_millis(1000);

/// Grace period on every read: twice the heartbeat period, so a healthy
/// peer always produces at least one packet in time.
pub(crate) const READ_GRACE: Duration = Duration::from_millis(2000);
