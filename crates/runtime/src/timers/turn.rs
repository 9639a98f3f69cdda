use tokio::time::Duration;

use super::Countdown;

/// The active player's turn clock: one expiring countdown per session, with
/// freeze/resume semantics for the combat sub-phase.
///
/// A paused timer holds no live deadline, only the frozen remainder;
/// resuming re-arms for exactly that remainder, so a pause/resume round trip
/// reproduces the remaining time with no drift.
#[derive(Debug, Default)]
pub struct TurnTimer {
    countdown: Countdown,
    frozen: Option<Duration>,
}

impl TurnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh countdown, superseding any live deadline and any
    /// frozen remainder from an earlier pause.
    pub fn start(&mut self, duration: Duration) {
        self.frozen = None;
        self.countdown.arm(duration);
    }

    /// Freezes the remaining time and drops the live deadline. Pausing an
    /// idle timer freezes zero, which makes the matching resume a no-op.
    pub fn pause(&mut self) {
        self.frozen = Some(self.countdown.remaining());
        self.countdown.clear();
    }

    /// Re-arms for the frozen remainder. No-op (returns `false`) when
    /// nothing was paused or the frozen remainder is zero.
    pub fn resume(&mut self) -> bool {
        match self.frozen.take() {
            Some(remaining) if remaining > Duration::ZERO => {
                self.countdown.arm(remaining);
                true
            }
            _ => false,
        }
    }

    /// Unconditionally cancels the countdown and any frozen state.
    /// Idempotent.
    pub fn stop(&mut self) {
        self.frozen = None;
        self.countdown.clear();
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_armed()
    }

    pub fn is_paused(&self) -> bool {
        self.frozen.is_some()
    }

    /// Time left on the live countdown, floored at zero. Zero while paused
    /// or stopped.
    pub fn remaining(&self) -> Duration {
        self.countdown.remaining()
    }

    /// Resolves at the deadline; pends forever while paused or stopped.
    pub async fn expired(&self) {
        self.countdown.expired().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pause_then_resume_reproduces_the_remaining_time() {
        let mut timer = TurnTimer::new();
        timer.start(Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(11)).await;
        timer.pause();
        assert!(!timer.is_running());
        assert!(timer.is_paused());
        assert_eq!(timer.remaining(), Duration::ZERO);

        // Time spent paused must not erode the frozen remainder.
        tokio::time::advance(Duration::from_secs(500)).await;
        assert!(timer.resume());
        assert_eq!(timer.remaining(), Duration::from_secs(19));
    }

    #[tokio::test(start_paused = true)]
    async fn resume_without_a_pause_is_a_no_op() {
        let mut timer = TurnTimer::new();
        assert!(!timer.resume());

        // Pausing an idle timer freezes zero remaining.
        timer.pause();
        assert!(!timer.resume());
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn start_supersedes_a_frozen_remainder() {
        let mut timer = TurnTimer::new();
        timer.start(Duration::from_secs(30));
        tokio::time::advance(Duration::from_secs(10)).await;
        timer.pause();

        timer.start(Duration::from_secs(5));
        assert!(!timer.is_paused());
        assert_eq!(timer.remaining(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_clears_both_deadline_and_frozen_state() {
        let mut timer = TurnTimer::new();
        timer.start(Duration::from_secs(30));
        timer.pause();
        timer.stop();

        assert!(!timer.is_running());
        assert!(!timer.is_paused());
        assert!(!timer.resume());

        // Stopping again is a no-op, not an error.
        timer.stop();
    }
}
