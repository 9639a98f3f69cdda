use tokio::time::Duration;

use super::Countdown;

/// Repeating round countdown for an active combat.
///
/// The round never stops on its own: the worker observes each expiry and
/// calls [`CombatTimer::restart_round`], modelling successive attack/defense
/// exchanges until combat is explicitly stopped. Starting while already
/// running resets the round rather than stacking a second one.
#[derive(Debug)]
pub struct CombatTimer {
    countdown: Countdown,
    round: Duration,
}

impl CombatTimer {
    pub fn new(round: Duration) -> Self {
        Self {
            countdown: Countdown::new(),
            round,
        }
    }

    /// Begins (or resets) the round countdown at its full duration.
    pub fn start(&mut self) {
        self.countdown.arm(self.round);
    }

    /// Snaps the round back to its full duration, without waiting for the
    /// natural expiry. Same effect as [`CombatTimer::start`]; named for the
    /// call sites that reset mid-round.
    pub fn restart_round(&mut self) {
        self.countdown.arm(self.round);
    }

    /// Cancels the round countdown. Idempotent.
    pub fn stop(&mut self) {
        self.countdown.clear();
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_armed()
    }

    /// Time left in the current round, floored at zero.
    pub fn remaining(&self) -> Duration {
        self.countdown.remaining()
    }

    /// Resolves at the end of the current round; pends forever while
    /// stopped.
    pub async fn expired(&self) {
        self.countdown.expired().await;
    }
}
