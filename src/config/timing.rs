// ABOUTME: Poll budgets and pauses used while a deployment waits on the control plane.
// ABOUTME: Durations are humantime strings ("10s", "2m") with production defaults.

use serde::Deserialize;
use std::time::Duration;

use crate::deploy::Poller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollConfig {
    pub tries: u32,

    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl PollConfig {
    pub const fn new(tries: u32, interval: Duration) -> Self {
        Self { tries, interval }
    }

    pub fn poller(&self) -> Poller {
        Poller::new(self.tries, self.interval)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Waiting for the new pool's healthy capacity.
    #[serde(default = "default_capacity")]
    pub capacity: PollConfig,

    /// Waiting for one legacy member's tasks to drain.
    #[serde(default = "default_drain")]
    pub drain: PollConfig,

    /// Attempts added each time a draining member's task count drops.
    #[serde(default = "default_drain_extension")]
    pub drain_extension: u32,

    /// Waiting for a stack create, update or delete to settle.
    #[serde(default = "default_stack")]
    pub stack: PollConfig,

    /// Pause before a replace starts, leaving time to cancel.
    #[serde(default = "default_replace_grace", with = "humantime_serde")]
    pub replace_grace: Duration,
}

fn default_capacity() -> PollConfig {
    PollConfig::new(30, Duration::from_secs(10))
}

fn default_drain() -> PollConfig {
    PollConfig::new(50, Duration::from_secs(20))
}

fn default_drain_extension() -> u32 {
    10
}

fn default_stack() -> PollConfig {
    PollConfig::new(180, Duration::from_secs(10))
}

fn default_replace_grace() -> Duration {
    Duration::from_secs(10)
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            capacity: default_capacity(),
            drain: default_drain(),
            drain_extension: default_drain_extension(),
            stack: default_stack(),
            replace_grace: default_replace_grace(),
        }
    }
}

impl TimingConfig {
    /// No waiting between attempts and no grace pause. For rehearsals and tests.
    pub fn immediate() -> Self {
        TimingConfig {
            capacity: PollConfig::new(default_capacity().tries, Duration::ZERO),
            drain: PollConfig::new(default_drain().tries, Duration::ZERO),
            drain_extension: default_drain_extension(),
            stack: PollConfig::new(default_stack().tries, Duration::ZERO),
            replace_grace: Duration::ZERO,
        }
    }
}
