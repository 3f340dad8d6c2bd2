use rand::Rng;
use std::time::{Duration, Instant};

/// Exponential backoff policy for the client reconnect loop.
///
/// Delays start at `initial_interval` and grow by `multiplier`, jittered by
/// up to `randomization_factor` either way, capped at `max_interval`. Once
/// `max_elapsed` has passed since the first attempt no further delays are
/// produced.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
  pub initial_interval: Duration,
  pub multiplier: f64,
  pub randomization_factor: f64,
  pub max_interval: Duration,
  pub max_elapsed: Duration,
}

impl Default for ExponentialBackoff {
  fn default() -> Self {
    ExponentialBackoff {
      initial_interval: Duration::from_millis(100),
      multiplier: 1.5,
      randomization_factor: 0.1,
      max_interval: Duration::from_secs(5),
      max_elapsed: Duration::from_secs(30),
    }
  }
}

impl ExponentialBackoff {
  pub fn start(&self) -> BackoffState {
    BackoffState {
      policy: self.clone(),
      current: self.initial_interval,
      started: Instant::now(),
    }
  }
}

/// One reconnect attempt sequence.
#[derive(Debug)]
pub struct BackoffState {
  policy: ExponentialBackoff,
  current: Duration,
  started: Instant,
}

impl BackoffState {
  /// The next delay to sleep before retrying, or `None` once the elapsed
  /// budget is spent.
  pub fn next_delay(&mut self) -> Option<Duration> {
    if self.started.elapsed() >= self.policy.max_elapsed {
      return None;
    }
    let spread = self.policy.randomization_factor;
    let jitter = 1.0 + spread * (rand::rng().random::<f64>() * 2.0 - 1.0);
    let delay = self.current.mul_f64(jitter);
    self.current = self
      .current
      .mul_f64(self.policy.multiplier)
      .min(self.policy.max_interval);
    Some(delay)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn delays_grow_toward_the_cap() {
    let mut state = ExponentialBackoff {
      randomization_factor: 0.0,
      ..ExponentialBackoff::default()
    }
    .start();

    let first = state.next_delay().unwrap();
    let second = state.next_delay().unwrap();
    assert_eq!(first, Duration::from_millis(100));
    assert_eq!(second, Duration::from_millis(150));

    let mut last = second;
    for _ in 0..20 {
      last = state.next_delay().unwrap();
    }
    assert_eq!(last, Duration::from_secs(5));
  }

  #[test]
  fn jitter_stays_within_the_randomization_band() {
    let mut state = ExponentialBackoff::default().start();
    let delay = state.next_delay().unwrap();
    assert!(delay >= Duration::from_millis(90));
    assert!(delay <= Duration::from_millis(110));
  }

  #[test]
  fn exhausted_budget_stops_producing_delays() {
    let mut state = ExponentialBackoff {
      max_elapsed: Duration::ZERO,
      ..ExponentialBackoff::default()
    }
    .start();
    assert!(state.next_delay().is_none());
  }
}
