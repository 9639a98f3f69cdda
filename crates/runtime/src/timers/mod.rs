//! Countdown machinery owned by each session worker.
//!
//! Every countdown is a deadline value polled from the worker's `select!`
//! loop; there is no callback registration and no shared timer table. The
//! authoritative source of truth is the deadline — "seconds remaining" is
//! always a derived read, never separately ticked state.

mod combat;
mod turn;

pub use combat::CombatTimer;
pub use turn::TurnTimer;

use std::future::pending;

use tokio::time::{sleep_until, Duration, Instant};

/// Single-expiry deadline. Armed countdowns resolve [`Countdown::expired`]
/// at their deadline; disarmed ones never resolve it.
///
/// `expired` does not disarm the countdown by itself: the handler that
/// observes the expiry clears or re-arms it, otherwise the owning `select!`
/// loop would spin on an already-elapsed deadline.
#[derive(Debug, Default)]
pub struct Countdown {
    deadline: Option<Instant>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms (or re-arms) the countdown `duration` from now.
    pub fn arm(&mut self, duration: Duration) {
        self.deadline = Some(Instant::now() + duration);
    }

    /// Disarms the countdown. Idempotent.
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until expiry, floored at zero. Zero when disarmed.
    pub fn remaining(&self) -> Duration {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }

    /// Resolves at the deadline; pends forever while disarmed.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => pending().await,
        }
    }
}
