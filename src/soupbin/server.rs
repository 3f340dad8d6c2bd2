//! SoupBinTCP server.

use bytes::Bytes;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::time::{interval_at, timeout, Instant};

use super::packet::{read_packet, Packet, RejectReason};
use super::session::Session;
use super::store::MessageStore;
use super::{HEARTBEAT_PERIOD, READ_GRACE};
use crate::errors::SoupError;

type LoginValidator = Box<dyn Fn(&str, &str) -> bool + Send + Sync>;
type PacketHandler = Box<dyn Fn(&[u8]) + Send + Sync>;
type TextHandler = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Handlers {
  login: Option<LoginValidator>,
  unsequenced: Option<PacketHandler>,
  debug: Option<TextHandler>,
}

struct ServerState {
  active: AtomicBool,
  session: Mutex<Option<Session>>,
  /// Highest sequence number stored so far (0 = nothing yet). Connection
  /// service loops watch this to wake their replay cursors.
  high_water: watch::Sender<u64>,
  /// Fired by `delete_session`; every live connection answers with an End
  /// Of Session packet and closes.
  shutdown: broadcast::Sender<()>,
}

impl ServerState {
  async fn snapshot(&self) -> Option<(String, u64)> {
    let guard = self.session.lock().await;
    guard.as_ref().map(|s| (s.id.clone(), s.next_sequence))
  }

  async fn payload(&self, sequence: u64) -> Option<Bytes> {
    let guard = self.session.lock().await;
    guard.as_ref().and_then(|s| s.store.read(sequence).ok())
  }
}

/// A SoupBinTCP 4.1 server hosting at most one session at a time.
///
/// Publish with [`send_to_session`](Server::send_to_session); every
/// connected client receives the stream in sequence order from wherever its
/// login (or reconnect) asked to start.
pub struct Server {
  handlers: Arc<Handlers>,
  state: Arc<ServerState>,
}

impl fmt::Debug for Server {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Server")
      .field("active_session", &self.state.active.load(Ordering::SeqCst))
      .finish_non_exhaustive()
  }
}

impl Server {
  pub fn builder() -> ServerBuilder {
    ServerBuilder::default()
  }

  /// Create the session clients will join. Only one session may be active;
  /// a second call without an intervening `delete_session` fails.
  pub async fn create_session(&self, id: &str) -> Result<(), SoupError> {
    self
      .install_session(Session::new(id))
      .await
  }

  /// Create a session over a caller-supplied store, e.g. a durable log that
  /// already holds messages. Sequencing resumes after the existing
  /// contents.
  pub async fn create_session_with_store(
    &self,
    id: &str,
    store: Box<dyn MessageStore>,
  ) -> Result<(), SoupError> {
    self.install_session(Session::with_store(id, store)).await
  }

  async fn install_session(&self, session: Session) -> Result<(), SoupError> {
    let mut guard = self.state.session.lock().await;
    if guard.is_some() {
      return Err(SoupError::SessionExists);
    }
    let high_water = session.next_sequence - 1;
    *guard = Some(session);
    self.state.active.store(true, Ordering::SeqCst);
    let _ = self.state.high_water.send_replace(high_water);
    Ok(())
  }

  /// End the active session: every live connection receives an End Of
  /// Session packet and is closed, then the session slot is freed. A no-op
  /// when no session exists.
  pub async fn delete_session(&self) -> Result<(), SoupError> {
    let mut guard = self.state.session.lock().await;
    if guard.is_none() {
      return Ok(());
    }
    self.state.active.store(false, Ordering::SeqCst);
    let _ = self.state.shutdown.send(());
    *guard = None;
    Ok(())
  }

  /// Append a payload to the session stream and wake every connection's
  /// replay cursor. Returns the assigned sequence number.
  pub async fn send_to_session(&self, payload: &[u8]) -> Result<u64, SoupError> {
    let sequence = {
      let mut guard = self.state.session.lock().await;
      let session = guard.as_mut().ok_or(SoupError::NoActiveSession)?;
      session.append(Bytes::copy_from_slice(payload))
    };
    let _ = self.state.high_water.send_replace(sequence);
    Ok(sequence)
  }

  /// Bind `addr` and serve connections forever. Returns only if the
  /// listener cannot be bound.
  pub async fn listen_and_serve(&self, addr: &str) -> Result<(), SoupError> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on {}", addr);
    self.serve(listener).await
  }

  /// Accept and serve connections from an existing listener. Useful when
  /// the caller needs the bound address first (ephemeral ports) or sets
  /// socket options itself.
  pub async fn serve(&self, listener: TcpListener) -> Result<(), SoupError> {
    loop {
      let (conn, peer) = match listener.accept().await {
        Ok(accepted) => accepted,
        Err(e) => {
          log::warn!("accept failed: {}", e);
          continue;
        }
      };
      log::info!("client connected {:?}", peer);

      if !self.state.active.load(Ordering::SeqCst) {
        tokio::spawn(async move {
          let mut conn = conn;
          let reject = Packet::LoginRejected {
            reason: RejectReason::SessionUnavailable,
          };
          let _ = conn.write_all(&reject.to_bytes()).await;
        });
        continue;
      }

      let state = self.state.clone();
      let handlers = self.handlers.clone();
      tokio::spawn(async move {
        if let Err(e) = handle_connection(conn, state, handlers).await {
          log::warn!("connection {:?} closed with error: {}", peer, e);
        } else {
          log::info!("connection {:?} closed", peer);
        }
      });
    }
  }
}

async fn handle_connection(
  conn: TcpStream,
  state: Arc<ServerState>,
  handlers: Arc<Handlers>,
) -> Result<(), SoupError> {
  let (mut rd, mut wr) = conn.into_split();

  // Clients must open with a Login Request; give them the same grace period
  // as any other read.
  let login = timeout(READ_GRACE, read_packet(&mut rd)).await;
  let (username, password, requested_session, requested_sequence, client_hb) =
    match login {
      Ok(Ok(Packet::LoginRequest {
        username,
        password,
        requested_session,
        requested_sequence,
        heartbeat_timeout_ms,
      })) => (
        username,
        password,
        requested_session,
        requested_sequence,
        heartbeat_timeout_ms,
      ),
      _ => {
        reject(&mut wr, RejectReason::NotAuthorized).await;
        return Ok(());
      }
    };
  // The reference server runs its own heartbeat period regardless of what
  // the client advertises.
  log::debug!(
    "login request user={:?} (client heartbeat {} ms)",
    username,
    client_hb
  );

  if let Some(check) = &handlers.login {
    if !check(&username, &password) {
      reject(&mut wr, RejectReason::NotAuthorized).await;
      return Ok(());
    }
  }

  let Some((session_id, next_sequence)) = state.snapshot().await else {
    reject(&mut wr, RejectReason::SessionUnavailable).await;
    return Ok(());
  };
  if !requested_session.is_empty() && requested_session != session_id {
    reject(&mut wr, RejectReason::SessionUnavailable).await;
    return Ok(());
  }

  // Sentinel 0 and anything past the end both mean "most recent": start at
  // the next message to be generated.
  let start_sequence =
    if requested_sequence == 0 || requested_sequence > next_sequence {
      next_sequence
    } else {
      requested_sequence
    };
  log::info!("starting sequence for client is {}", start_sequence);

  let accepted = Packet::LoginAccepted {
    session: session_id,
    sequence: start_sequence,
  };
  wr.write_all(&accepted.to_bytes()).await?;

  serve_connection(rd, wr, state, handlers, start_sequence).await
}

async fn serve_connection(
  mut rd: OwnedReadHalf,
  mut wr: OwnedWriteHalf,
  state: Arc<ServerState>,
  handlers: Arc<Handlers>,
  start_sequence: u64,
) -> Result<(), SoupError> {
  // Dedicated reader task; the service loop owns all writes. Reader death
  // (deadline expiry or socket error) surfaces as a closed channel.
  let (pkt_tx, mut pkt_rx) = mpsc::channel::<Packet>(64);
  let reader = tokio::spawn(async move {
    loop {
      match timeout(READ_GRACE, read_packet(&mut rd)).await {
        Ok(Ok(packet)) => {
          if pkt_tx.send(packet).await.is_err() {
            break;
          }
        }
        Ok(Err(e)) => {
          log::debug!("client read ended: {}", e);
          break;
        }
        Err(_) => {
          log::debug!("client silent past the read deadline");
          break;
        }
      }
    }
  });

  let mut cursor = start_sequence;
  let mut high_water = state.high_water.subscribe();
  let mut shutdown = state.shutdown.subscribe();
  let mut ticker =
    interval_at(Instant::now() + HEARTBEAT_PERIOD, HEARTBEAT_PERIOD);
  let mut last_write = Instant::now();

  let result: Result<(), SoupError> = 'serve: loop {
    // Replay everything the cursor has not delivered yet, in order.
    let latest = *high_water.borrow_and_update();
    while cursor <= latest {
      let Some(payload) = state.payload(cursor).await else {
        break;
      };
      let frame = Packet::SequencedData(payload).to_bytes();
      if let Err(e) = wr.write_all(&frame).await {
        break 'serve Err(e.into());
      }
      last_write = Instant::now();
      cursor += 1;
    }

    tokio::select! {
      inbound = pkt_rx.recv() => match inbound {
        None => break Ok(()),
        Some(Packet::LogoutRequest) => {
          log::info!("client logout request");
          break Ok(());
        }
        Some(Packet::ClientHeartbeat) => {}
        Some(Packet::UnsequencedData(data)) => {
          if let Some(handler) = &handlers.unsequenced {
            handler(&data);
          }
        }
        Some(Packet::Debug(text)) => {
          if let Some(handler) = &handlers.debug {
            handler(&text);
          }
        }
        Some(other) => {
          log::warn!(
            "unexpected packet type {} from client",
            other.tag() as char
          );
        }
      },
      changed = high_water.changed() => {
        if changed.is_err() {
          break Ok(());
        }
      }
      _ = shutdown.recv() => {
        let _ = wr.write_all(&Packet::EndOfSession.to_bytes()).await;
        break Ok(());
      }
      _ = ticker.tick() => {
        if last_write.elapsed() >= HEARTBEAT_PERIOD {
          if let Err(e) = wr.write_all(&Packet::ServerHeartbeat.to_bytes()).await {
            break 'serve Err(e.into());
          }
          last_write = Instant::now();
        }
      }
    }
  };

  reader.abort();
  let _ = reader.await;
  result
}

async fn reject(wr: &mut OwnedWriteHalf, reason: RejectReason) {
  let packet = Packet::LoginRejected { reason };
  if let Err(e) = wr.write_all(&packet.to_bytes()).await {
    log::warn!("failed sending login rejected: {}", e);
  }
}

/// Configures and constructs a [`Server`].
#[derive(Default)]
pub struct ServerBuilder {
  handlers: Handlers,
}

impl fmt::Debug for ServerBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServerBuilder").finish_non_exhaustive()
  }
}

impl ServerBuilder {
  pub fn new() -> Self {
    ServerBuilder::default()
  }

  /// Credential check run for every login request; returning `false`
  /// rejects with Not Authorized. Without one, any credentials pass.
  pub fn on_login(
    mut self,
    check: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
  ) -> Self {
    self.handlers.login = Some(Box::new(check));
    self
  }

  /// Handler for unsequenced payloads arriving from clients.
  pub fn on_unsequenced(
    mut self,
    handler: impl Fn(&[u8]) + Send + Sync + 'static,
  ) -> Self {
    self.handlers.unsequenced = Some(Box::new(handler));
    self
  }

  /// Handler for debug text packets arriving from clients.
  pub fn on_debug(
    mut self,
    handler: impl Fn(&str) + Send + Sync + 'static,
  ) -> Self {
    self.handlers.debug = Some(Box::new(handler));
    self
  }

  pub fn build(self) -> Server {
    let (high_water, _) = watch::channel(0);
    let (shutdown, _) = broadcast::channel(1);
    Server {
      handlers: Arc::new(self.handlers),
      state: Arc::new(ServerState {
        active: AtomicBool::new(false),
        session: Mutex::new(None),
        high_water,
        shutdown,
      }),
    }
  }
}
