//! SoupBinTCP client.

use bytes::Bytes;
use std::fmt;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, timeout, Instant};

use super::backoff::ExponentialBackoff;
use super::packet::{read_packet, Packet, RejectReason};
use super::{HEARTBEAT_PERIOD, READ_GRACE};
use crate::errors::SoupError;

pub type SequencedHandler = Box<dyn FnMut(&[u8]) + Send>;
pub type UnsequencedHandler = Box<dyn FnMut(&[u8]) + Send>;
pub type DebugHandler = Box<dyn FnMut(&str) + Send>;

/// A SoupBinTCP 4.1 client.
///
/// [`login`](Client::login) establishes the session, [`receive`](Client::receive)
/// drives delivery until end-of-session, and [`send`](Client::send) /
/// [`send_debug`](Client::send_debug) carry client-to-server traffic. While
/// logged in, a background task keeps client heartbeats flowing whenever no
/// other packet has been written for a full heartbeat period.
///
/// `receive` transparently replaces a dead connection: it re-runs the login
/// with the stored session id and sequence number under an exponential
/// backoff, and the server resumes delivery at the next unseen message.
pub struct Client {
  server_addr: String,
  username: String,
  password: String,
  session: String,
  sequence: u64,
  // Reserved flag; SoupBinTCP compressed framing is not implemented.
  #[allow(dead_code)]
  compression_enabled: bool,
  backoff: ExponentialBackoff,

  reader: Option<OwnedReadHalf>,
  writer: Option<Arc<Mutex<OwnedWriteHalf>>>,
  heartbeat_handle: Option<JoinHandle<()>>,
  sent_tx: Option<mpsc::UnboundedSender<()>>,

  on_sequenced: Option<SequencedHandler>,
  on_unsequenced: Option<UnsequencedHandler>,
  on_debug: Option<DebugHandler>,
}

impl fmt::Debug for Client {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Client")
      .field("server_addr", &self.server_addr)
      .field("username", &self.username)
      .field("session", &self.session)
      .field("sequence", &self.sequence)
      .field("connected", &self.reader.is_some())
      .finish_non_exhaustive()
  }
}

impl Client {
  pub fn builder(server_addr: impl Into<String>) -> ClientBuilder {
    ClientBuilder::new(server_addr)
  }

  /// The session id currently joined (empty before the first login).
  pub fn current_session(&self) -> &str {
    &self.session
  }

  /// The sequence number of the next sequenced message expected from the
  /// server.
  pub fn current_sequence_number(&self) -> u64 {
    self.sequence
  }

  /// Connect and authenticate, resuming the stored (session, sequence) pair.
  ///
  /// On acceptance the server's session id and starting sequence replace the
  /// stored values and the heartbeat task starts. Rejections surface as
  /// [`SoupError::NotAuthorized`] / [`SoupError::SessionUnavailable`]; any
  /// other failure is an [`SoupError::Io`] the caller may retry.
  pub async fn login(&mut self) -> Result<(), SoupError> {
    // Drop any half-dead connection state from an earlier login.
    self.teardown().await;

    let stream = TcpStream::connect(&self.server_addr).await?;
    let (mut rd, mut wr) = stream.into_split();

    let request = Packet::LoginRequest {
      username: self.username.clone(),
      password: self.password.clone(),
      requested_session: self.session.clone(),
      requested_sequence: self.sequence,
      heartbeat_timeout_ms: HEARTBEAT_PERIOD.as_millis() as u32,
    };
    wr.write_all(&request.to_bytes()).await?;

    let reply = timeout(READ_GRACE, read_packet(&mut rd))
      .await
      .map_err(|_| {
        SoupError::Io(std::io::Error::new(
          ErrorKind::TimedOut,
          "no login response within the read grace period",
        ))
      })??;

    match reply {
      Packet::LoginAccepted { session, sequence } => {
        log::info!(
          "connected to session {:?} starting with sequence {}",
          session,
          sequence
        );
        self.session = session;
        self.sequence = sequence;
      }
      Packet::LoginRejected { reason } => {
        return Err(match reason {
          RejectReason::NotAuthorized => SoupError::NotAuthorized,
          RejectReason::SessionUnavailable => SoupError::SessionUnavailable,
          RejectReason::Unknown(_) => {
            SoupError::MalformedField("login reject reason")
          }
        });
      }
      other => {
        return Err(SoupError::Io(std::io::Error::new(
          ErrorKind::InvalidData,
          format!("unexpected {} packet during login", other.tag() as char),
        )));
      }
    }

    let writer = Arc::new(Mutex::new(wr));
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    self.heartbeat_handle =
      Some(tokio::spawn(run_heartbeat(writer.clone(), sent_rx)));
    self.sent_tx = Some(sent_tx);
    self.reader = Some(rd);
    self.writer = Some(writer);
    Ok(())
  }

  /// Deliver packets until the server ends the session.
  ///
  /// Returns `Ok(())` on End Of Session. A read failure or an expired read
  /// deadline triggers the reconnect loop; if the backoff budget runs out
  /// this returns [`SoupError::ReconnectExhausted`] (or the terminal login
  /// rejection that ended the loop).
  pub async fn receive(&mut self) -> Result<(), SoupError> {
    loop {
      let reader = self.reader.as_mut().ok_or(SoupError::NotConnected)?;

      let packet = match timeout(READ_GRACE, read_packet(reader)).await {
        Ok(Ok(packet)) => packet,
        Ok(Err(e)) => {
          log::warn!("error getting packet: {}", e);
          self.reconnect().await?;
          continue;
        }
        Err(_) => {
          log::warn!("server silent past the read deadline");
          self.reconnect().await?;
          continue;
        }
      };

      match packet {
        Packet::SequencedData(data) => {
          self.sequence += 1;
          if let Some(handler) = self.on_sequenced.as_mut() {
            handler(&data);
          }
        }
        Packet::UnsequencedData(data) => {
          if let Some(handler) = self.on_unsequenced.as_mut() {
            handler(&data);
          }
        }
        Packet::Debug(text) => {
          if let Some(handler) = self.on_debug.as_mut() {
            handler(&text);
          }
        }
        Packet::ServerHeartbeat => log::trace!("received heartbeat packet"),
        Packet::EndOfSession => {
          log::info!("end of session packet");
          self.teardown().await;
          return Ok(());
        }
        other => {
          log::warn!(
            "unexpected packet type {} received",
            other.tag() as char
          );
        }
      }
    }
  }

  /// Send an unsequenced data packet.
  pub async fn send(&self, payload: &[u8]) -> Result<(), SoupError> {
    self
      .write(Packet::UnsequencedData(Bytes::copy_from_slice(payload)))
      .await
  }

  /// Send a debug packet with human-readable text. Not normally used.
  pub async fn send_debug(&self, text: &str) -> Result<(), SoupError> {
    self.write(Packet::Debug(text.to_string())).await
  }

  /// Send a logout request and drop the connection.
  pub async fn logout(&mut self) -> Result<(), SoupError> {
    if let Err(e) = self.write(Packet::LogoutRequest).await {
      log::warn!("failed sending logout request: {}", e);
    }
    self.teardown().await;
    Ok(())
  }

  async fn write(&self, packet: Packet) -> Result<(), SoupError> {
    let writer = self.writer.as_ref().ok_or(SoupError::NotConnected)?;
    let bytes = packet.to_bytes();
    {
      let mut wr = writer.lock().await;
      wr.write_all(&bytes).await?;
    }
    // Writing anything makes a heartbeat redundant for one period.
    if let Some(tx) = &self.sent_tx {
      let _ = tx.send(());
    }
    Ok(())
  }

  async fn reconnect(&mut self) -> Result<(), SoupError> {
    self.teardown().await;
    log::info!(
      "connection error, attempting to relogin to session {:?} with sequence number {}",
      self.session,
      self.sequence
    );

    let mut backoff = self.backoff.start();
    loop {
      match self.login().await {
        Ok(()) => return Ok(()),
        Err(e @ (SoupError::NotAuthorized | SoupError::SessionUnavailable)) => {
          return Err(e);
        }
        Err(e) => {
          let Some(delay) = backoff.next_delay() else {
            log::error!("failed to reconnect to the server after max retries");
            return Err(SoupError::ReconnectExhausted);
          };
          log::info!("retrying connection in {:?} ({})", delay, e);
          sleep(delay).await;
        }
      }
    }
  }

  async fn teardown(&mut self) {
    self.sent_tx = None;
    if let Some(handle) = self.heartbeat_handle.take() {
      handle.abort();
      let _ = handle.await;
    }
    self.reader = None;
    self.writer = None;
  }
}

async fn run_heartbeat(
  writer: Arc<Mutex<OwnedWriteHalf>>,
  mut sent_rx: mpsc::UnboundedReceiver<()>,
) {
  // First tick one full period after login; the login request itself counts
  // as traffic.
  let mut ticker =
    interval_at(Instant::now() + HEARTBEAT_PERIOD, HEARTBEAT_PERIOD);
  loop {
    tokio::select! {
      _ = ticker.tick() => {
        let heartbeat = Packet::ClientHeartbeat.to_bytes();
        let mut wr = writer.lock().await;
        if let Err(e) = wr.write_all(&heartbeat).await {
          log::warn!("failed sending heartbeat: {}", e);
          return;
        }
      }
      sent = sent_rx.recv() => match sent {
        // The application sent a packet of its own; push the next
        // heartbeat a full period out.
        Some(()) => ticker.reset(),
        None => return,
      }
    }
  }
}

/// Configures and constructs a [`Client`].
pub struct ClientBuilder {
  server_addr: String,
  username: String,
  password: String,
  session: String,
  sequence: u64,
  compression_enabled: bool,
  backoff: ExponentialBackoff,
  on_sequenced: Option<SequencedHandler>,
  on_unsequenced: Option<UnsequencedHandler>,
  on_debug: Option<DebugHandler>,
}

impl fmt::Debug for ClientBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ClientBuilder")
      .field("server_addr", &self.server_addr)
      .field("username", &self.username)
      .field("session", &self.session)
      .field("sequence", &self.sequence)
      .finish_non_exhaustive()
  }
}

impl ClientBuilder {
  pub fn new(server_addr: impl Into<String>) -> Self {
    ClientBuilder {
      server_addr: server_addr.into(),
      username: String::new(),
      password: String::new(),
      // Empty session + sequence 0 ask the server for the current session
      // at its most recent message.
      session: String::new(),
      sequence: 0,
      compression_enabled: false,
      backoff: ExponentialBackoff::default(),
      on_sequenced: None,
      on_unsequenced: None,
      on_debug: None,
    }
  }

  /// Credentials sent in the Login Request.
  pub fn auth(
    mut self,
    username: impl Into<String>,
    password: impl Into<String>,
  ) -> Self {
    self.username = username.into();
    self.password = password.into();
    self
  }

  /// Join a specific session at a specific sequence number instead of the
  /// current-session/most-recent default.
  pub fn session(mut self, id: impl Into<String>, sequence: u64) -> Self {
    self.session = id.into();
    self.sequence = sequence;
    self
  }

  /// Reserved: SoupBinTCP compressed framing is not implemented.
  pub fn compression(mut self, enabled: bool) -> Self {
    self.compression_enabled = enabled;
    self
  }

  /// Replace the default reconnect backoff policy.
  pub fn backoff(mut self, policy: ExponentialBackoff) -> Self {
    self.backoff = policy;
    self
  }

  /// Handler for every sequenced payload, in delivery order.
  pub fn on_sequenced(
    mut self,
    handler: impl FnMut(&[u8]) + Send + 'static,
  ) -> Self {
    self.on_sequenced = Some(Box::new(handler));
    self
  }

  /// Handler for unsequenced payloads.
  pub fn on_unsequenced(
    mut self,
    handler: impl FnMut(&[u8]) + Send + 'static,
  ) -> Self {
    self.on_unsequenced = Some(Box::new(handler));
    self
  }

  /// Handler for debug text packets. Not normally used.
  pub fn on_debug(
    mut self,
    handler: impl FnMut(&str) + Send + 'static,
  ) -> Self {
    self.on_debug = Some(Box::new(handler));
    self
  }

  pub fn build(self) -> Client {
    Client {
      server_addr: self.server_addr,
      username: self.username,
      password: self.password,
      session: self.session,
      sequence: self.sequence,
      compression_enabled: self.compression_enabled,
      backoff: self.backoff,
      reader: None,
      writer: None,
      heartbeat_handle: None,
      sent_tx: None,
      on_sequenced: self.on_sequenced,
      on_unsequenced: self.on_unsequenced,
      on_debug: self.on_debug,
    }
  }
}
