//! Consume the demo feed and decode each sequenced payload as ITCH.
//!
//! ```text
//! cargo run --example feed_client
//! ```

use finwire::itch::{Config, Parser};
use finwire::soupbin::Client;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> Result<(), finwire::SoupError> {
  env_logger::init();

  let parser = Arc::new(Mutex::new(Parser::new(Config::default())));
  let decoder = parser.clone();

  let mut client = Client::builder("127.0.0.1:5000")
    .auth("test", "test")
    .on_sequenced(move |payload| {
      match decoder.lock().unwrap().parse_one(payload) {
        Ok(message) => log::info!("{:?}", message),
        Err(e) => log::warn!("undecodable payload: {}", e),
      }
    })
    .on_debug(|text| log::info!("server debug: {}", text))
    .build();

  client.login().await?;
  log::info!(
    "joined session {:?} at sequence {}",
    client.current_session(),
    client.current_sequence_number()
  );

  // Blocks until the server ends the session; reconnects through blips.
  client.receive().await
}
