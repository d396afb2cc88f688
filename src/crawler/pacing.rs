//! Pacing between listing pages
//!
//! The harvester fetches one listing page at a time; the pacer makes sure
//! at least the configured delay passes between the start of consecutive
//! listing fetches. Detail fetches made while a page is processed count
//! towards that delay.

use std::time::{Duration, Instant};

/// Enforces a minimum interval between listing fetches
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last_fetch: Option<Instant>,
}

impl Pacer {
    /// Creates a pacer with the given minimum interval
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_fetch: None,
        }
    }

    /// Time left before the next fetch may start
    ///
    /// # Arguments
    ///
    /// * `now` - The current time instant
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_fetch {
            Some(last) => self.delay.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Waits until the next fetch may start, then marks it as started
    pub async fn wait(&mut self) {
        let remaining = self.remaining(Instant::now());
        if !remaining.is_zero() {
            tracing::debug!("Pausing {:?} before next listing page", remaining);
            tokio::time::sleep(remaining).await;
        }
        self.last_fetch = Some(Instant::now());
    }
}
