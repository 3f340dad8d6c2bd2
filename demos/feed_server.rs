//! Serve a synthetic ITCH feed over SoupBinTCP.
//!
//! ```text
//! cargo run --example feed_server
//! ```

use std::sync::Arc;
use std::time::Duration;

use finwire::itch::{OrderAdd, Side};
use finwire::soupbin::Server;
use finwire::Price;

#[tokio::main]
async fn main() -> Result<(), finwire::SoupError> {
  env_logger::init();

  let server = Arc::new(
    Server::builder()
      .on_login(|username, password| {
        username == "test" && password == "test"
      })
      .on_unsequenced(|payload| {
        log::info!("client sent {} unsequenced bytes", payload.len());
      })
      .on_debug(|text| log::info!("client debug: {}", text))
      .build(),
  );
  server.create_session("ABCDEFGHIJ").await?;

  // Publish one synthetic order per second; connected clients receive them
  // as sequenced packets and late joiners replay the backlog.
  let publisher = server.clone();
  tokio::spawn(async move {
    let mut reference = 1u64;
    loop {
      let add = OrderAdd {
        stock_locate: 1,
        tracking_number: 0,
        timestamp: Duration::from_nanos(34_200_000_000_000 + reference),
        reference,
        side: if reference % 2 == 0 { Side::Sell } else { Side::Buy },
        shares: 100,
        stock: "AAPL".into(),
        price: Price::price4((1_900_000 + (reference % 100) * 100) as u32),
      };
      if let Err(e) = publisher.send_to_session(&add.to_bytes()).await {
        log::warn!("publish failed: {}", e);
      }
      reference += 1;
      tokio::time::sleep(Duration::from_secs(1)).await;
    }
  });

  server.listen_and_serve("127.0.0.1:5000").await
}
