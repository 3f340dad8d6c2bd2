use bytes::Bytes;

use super::store::{MemoryStore, MessageStore};

/// Server-side session state: a named stream of sequenced messages.
///
/// `next_sequence` starts at 1 and always names the sequence the next
/// appended payload will receive.
#[derive(Debug)]
pub(crate) struct Session {
  pub id: String,
  pub next_sequence: u64,
  pub store: Box<dyn MessageStore>,
}

impl Session {
  pub fn new(id: &str) -> Self {
    Session::with_store(id, Box::new(MemoryStore::new()))
  }

  /// Attach a pre-populated backend; the sequence counter resumes after any
  /// payloads it already holds.
  pub fn with_store(id: &str, store: Box<dyn MessageStore>) -> Self {
    Session {
      id: id.to_string(),
      next_sequence: store.len() as u64 + 1,
      store,
    }
  }

  pub fn append(&mut self, payload: Bytes) -> u64 {
    let sequence = self.store.store(payload);
    self.next_sequence = sequence + 1;
    sequence
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn append_advances_the_sequence() {
    let mut session = Session::new("ABCDEFGHIJ");
    assert_eq!(session.next_sequence, 1);
    assert_eq!(session.append(Bytes::from_static(b"a")), 1);
    assert_eq!(session.append(Bytes::from_static(b"b")), 2);
    assert_eq!(session.next_sequence, 3);
  }

  #[test]
  fn prepopulated_store_resumes_numbering() {
    let mut backing = MemoryStore::new();
    backing.store(Bytes::from_static(b"recovered"));
    let session = Session::with_store("REPLAY    ", Box::new(backing));
    assert_eq!(session.next_sequence, 2);
  }
}
