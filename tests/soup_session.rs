//! End-to-end session tests over loopback sockets: login, ordered
//! delivery, resume, rejection, end-of-session, and heartbeat behavior.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use finwire::soupbin::{Client, Packet, Server};
use finwire::SoupError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::sleep;

async fn start_server(server: Arc<Server>) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap().to_string();
  tokio::spawn(async move {
    let _ = server.serve(listener).await;
  });
  addr
}

fn collecting_client(
  addr: &str,
  sink: Arc<Mutex<Vec<Vec<u8>>>>,
) -> Client {
  Client::builder(addr)
    .auth("test", "test")
    .on_sequenced(move |payload| sink.lock().unwrap().push(payload.to_vec()))
    .build()
}

#[tokio::test]
async fn login_happy_path_and_ordered_delivery() {
  let server = Arc::new(Server::builder().build());
  server.create_session("ABCDEFGHIJ").await.unwrap();
  let addr = start_server(server.clone()).await;

  let received = Arc::new(Mutex::new(Vec::new()));
  let mut client = collecting_client(&addr, received.clone());

  client.login().await.unwrap();
  assert_eq!(client.current_session(), "ABCDEFGHIJ");
  assert_eq!(client.current_sequence_number(), 1);

  for payload in [&b"one"[..], b"two", b"three"] {
    server.send_to_session(payload).await.unwrap();
  }
  // Let the service loop flush to the socket before ending the session.
  sleep(Duration::from_millis(200)).await;
  server.delete_session().await.unwrap();

  client.receive().await.unwrap();

  let received = received.lock().unwrap();
  assert_eq!(
    received.as_slice(),
    &[b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]
  );
  // Pre-incremented on each sequenced packet: next expected is 4.
  assert_eq!(client.current_sequence_number(), 4);
}

#[tokio::test]
async fn resume_replays_from_the_requested_sequence() {
  let server = Arc::new(Server::builder().build());
  server.create_session("ABCDEFGHIJ").await.unwrap();
  let addr = start_server(server.clone()).await;

  for i in 1..=10u32 {
    let payload = format!("message-{}", i);
    server.send_to_session(payload.as_bytes()).await.unwrap();
  }

  let received = Arc::new(Mutex::new(Vec::new()));
  let sink = received.clone();
  let mut client = Client::builder(&addr)
    .auth("test", "test")
    .session("ABCDEFGHIJ", 7)
    .on_sequenced(move |payload| sink.lock().unwrap().push(payload.to_vec()))
    .build();

  client.login().await.unwrap();
  assert_eq!(client.current_sequence_number(), 7);

  sleep(Duration::from_millis(200)).await;
  server.delete_session().await.unwrap();
  client.receive().await.unwrap();

  let received = received.lock().unwrap();
  assert_eq!(
    received.as_slice(),
    &[
      b"message-7".to_vec(),
      b"message-8".to_vec(),
      b"message-9".to_vec(),
      b"message-10".to_vec(),
    ]
  );
  assert_eq!(client.current_sequence_number(), 11);
}

#[tokio::test]
async fn sequence_past_the_end_clamps_to_most_recent() {
  let server = Arc::new(Server::builder().build());
  server.create_session("ABCDEFGHIJ").await.unwrap();
  let addr = start_server(server.clone()).await;

  server.send_to_session(b"old").await.unwrap();

  let mut client = Client::builder(&addr)
    .auth("test", "test")
    .session("ABCDEFGHIJ", 999)
    .build();
  client.login().await.unwrap();
  // Store holds one message, so the next to be generated is 2.
  assert_eq!(client.current_sequence_number(), 2);
}

#[tokio::test]
async fn rejected_credentials_surface_as_not_authorized() {
  let server = Arc::new(
    Server::builder()
      .on_login(|username, password| username == "good" && password == "pw")
      .build(),
  );
  server.create_session("ABCDEFGHIJ").await.unwrap();
  let addr = start_server(server).await;

  let mut client = Client::builder(&addr).auth("bad", "pw").build();
  assert!(matches!(
    client.login().await,
    Err(SoupError::NotAuthorized)
  ));
}

#[tokio::test]
async fn missing_session_surfaces_as_session_unavailable() {
  let server = Arc::new(Server::builder().build());
  let addr = start_server(server).await;

  let mut client = Client::builder(&addr).auth("test", "test").build();
  assert!(matches!(
    client.login().await,
    Err(SoupError::SessionUnavailable)
  ));
}

#[tokio::test]
async fn wrong_session_id_surfaces_as_session_unavailable() {
  let server = Arc::new(Server::builder().build());
  server.create_session("MORNING   ").await.unwrap();
  let addr = start_server(server).await;

  let mut client = Client::builder(&addr)
    .auth("test", "test")
    .session("EVENING   ", 0)
    .build();
  assert!(matches!(
    client.login().await,
    Err(SoupError::SessionUnavailable)
  ));
}

#[tokio::test]
async fn unsequenced_and_debug_packets_reach_the_server_handlers() {
  let unsequenced = Arc::new(Mutex::new(Vec::new()));
  let debugs = Arc::new(Mutex::new(Vec::new()));
  let u_sink = unsequenced.clone();
  let d_sink = debugs.clone();

  let server = Arc::new(
    Server::builder()
      .on_unsequenced(move |payload| {
        u_sink.lock().unwrap().push(payload.to_vec())
      })
      .on_debug(move |text| d_sink.lock().unwrap().push(text.to_string()))
      .build(),
  );
  server.create_session("ABCDEFGHIJ").await.unwrap();
  let addr = start_server(server.clone()).await;

  let mut client = Client::builder(&addr).auth("test", "test").build();
  client.login().await.unwrap();

  client.send(b"order entry").await.unwrap();
  client.send_debug("ping from the client").await.unwrap();
  sleep(Duration::from_millis(200)).await;

  assert_eq!(
    unsequenced.lock().unwrap().as_slice(),
    &[b"order entry".to_vec()]
  );
  assert_eq!(
    debugs.lock().unwrap().as_slice(),
    &["ping from the client".to_string()]
  );
  client.logout().await.unwrap();
}

/// Hand-rolled server harness: accepts one connection at a time and records
/// every inbound frame tag, so client-side wire behavior can be asserted
/// directly.
async fn accept_and_record(
  listener: &TcpListener,
  tags: Arc<Mutex<Vec<u8>>>,
  sequence: u64,
) -> tokio::task::JoinHandle<()> {
  let (mut conn, _) = listener.accept().await.unwrap();
  let mut frame = vec![0u8; 54];
  conn.read_exact(&mut frame).await.unwrap();
  assert_eq!(frame[2], b'L');
  let accepted = Packet::LoginAccepted {
    session: "TEST      ".into(),
    sequence,
  };
  conn.write_all(&accepted.to_bytes()).await.unwrap();

  tokio::spawn(async move {
    loop {
      let mut len_buf = [0u8; 2];
      if conn.read_exact(&mut len_buf).await.is_err() {
        break;
      }
      let len = u16::from_be_bytes(len_buf) as usize;
      let mut frame = vec![0u8; len];
      if conn.read_exact(&mut frame).await.is_err() {
        break;
      }
      tags.lock().unwrap().push(frame[0]);
      // Keep the client's read deadline satisfied.
      let _ = conn.write_all(&Packet::ServerHeartbeat.to_bytes()).await;
    }
  })
}

#[tokio::test]
async fn heartbeats_are_suppressed_while_the_client_is_sending() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap().to_string();
  let tags = Arc::new(Mutex::new(Vec::new()));

  let mut client = Client::builder(&addr).auth("test", "test").build();
  let harness = {
    let tags = tags.clone();
    let login = client.login();
    let accept = accept_and_record(&listener, tags, 1);
    let (login_result, harness) = tokio::join!(login, accept);
    login_result.unwrap();
    harness
  };

  // Application traffic every 300 ms for ~2.5 heartbeat periods; every send
  // resets the heartbeat timer, so none should fire.
  for _ in 0..8 {
    client.send(b"tick").await.unwrap();
    sleep(Duration::from_millis(300)).await;
  }

  let seen = tags.lock().unwrap().clone();
  assert_eq!(seen.len(), 8);
  assert!(
    seen.iter().all(|&tag| tag == b'U'),
    "client heartbeats leaked between sends: {:?}",
    seen
  );

  client.logout().await.unwrap();
  harness.abort();
}

#[tokio::test]
async fn heartbeats_flow_when_the_client_is_idle() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap().to_string();
  let tags = Arc::new(Mutex::new(Vec::new()));

  let mut client = Client::builder(&addr).auth("test", "test").build();
  let harness = {
    let tags = tags.clone();
    let login = client.login();
    let accept = accept_and_record(&listener, tags, 1);
    let (login_result, harness) = tokio::join!(login, accept);
    login_result.unwrap();
    harness
  };

  sleep(Duration::from_millis(2_500)).await;

  let seen = tags.lock().unwrap().clone();
  let heartbeats = seen.iter().filter(|&&tag| tag == b'R').count();
  assert!(
    heartbeats >= 2,
    "expected at least two idle heartbeats, saw {:?}",
    seen
  );

  client.logout().await.unwrap();
  harness.abort();
}

#[tokio::test]
async fn reconnect_resumes_at_the_next_unseen_sequence() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap().to_string();

  let resume_request = Arc::new(Mutex::new(None::<(String, u64)>));
  let handoff = resume_request.clone();
  let harness = tokio::spawn(async move {
    // First connection: accept at sequence 1, deliver three messages, then
    // drop the socket mid-session.
    {
      let (mut conn, _) = listener.accept().await.unwrap();
      let mut frame = vec![0u8; 54];
      conn.read_exact(&mut frame).await.unwrap();
      let accepted = Packet::LoginAccepted {
        session: "TEST      ".into(),
        sequence: 1,
      };
      conn.write_all(&accepted.to_bytes()).await.unwrap();
      for i in 1..=3u8 {
        let payload = bytes::Bytes::copy_from_slice(&[i]);
        conn
          .write_all(&Packet::SequencedData(payload).to_bytes())
          .await
          .unwrap();
      }
    } // connection dropped here

    // Second connection: capture the requested (session, sequence) and end
    // the session cleanly.
    let (mut conn, _) = listener.accept().await.unwrap();
    let mut frame = vec![0u8; 54];
    conn.read_exact(&mut frame).await.unwrap();
    match Packet::from_frame(&frame[2..]).unwrap() {
      Packet::LoginRequest {
        requested_session,
        requested_sequence,
        ..
      } => {
        *handoff.lock().unwrap() =
          Some((requested_session, requested_sequence));
      }
      other => panic!("expected a login request, got {:?}", other),
    }
    let accepted = Packet::LoginAccepted {
      session: "TEST      ".into(),
      sequence: 4,
    };
    conn.write_all(&accepted.to_bytes()).await.unwrap();
    conn
      .write_all(&Packet::EndOfSession.to_bytes())
      .await
      .unwrap();
    sleep(Duration::from_millis(500)).await;
  });

  let delivered = Arc::new(Mutex::new(Vec::new()));
  let sink = delivered.clone();
  let mut client = Client::builder(&addr)
    .auth("test", "test")
    .on_sequenced(move |payload| sink.lock().unwrap().push(payload.to_vec()))
    .build();

  client.login().await.unwrap();
  client.receive().await.unwrap();

  assert_eq!(
    delivered.lock().unwrap().as_slice(),
    &[vec![1], vec![2], vec![3]]
  );
  let (session, sequence) = resume_request.lock().unwrap().clone().unwrap();
  assert_eq!(session, "TEST");
  assert_eq!(sequence, 4, "reconnect must ask for the next unseen message");
  assert_eq!(client.current_sequence_number(), 4);

  harness.await.unwrap();
}
