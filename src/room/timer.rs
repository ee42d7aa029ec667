use std::time::Duration;
use tokio::time::Instant;

/// Response deadlines for one match.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    /// Window for acknowledging a broadcast.
    pub ack: Duration,
    /// Window for answering a published action set.
    pub decision: Duration,
    /// One-shot reconnect window granted to a dropped seat.
    pub grace: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            ack: Duration::from_secs(1),
            decision: Duration::from_secs(10),
            grace: Duration::from_secs(30),
        }
    }
}

/// Deadline tracking for the response coordinator. Arming replaces any prior
/// deadline, so at most one timer is ever live per match.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            deadline: None,
        }
    }
    pub fn with_defaults() -> Self {
        Self::new(TimerConfig::default())
    }
    pub fn arm_ack(&mut self) {
        self.deadline = Some(Instant::now() + self.config.ack);
    }
    pub fn arm_decision(&mut self) {
        self.deadline = Some(Instant::now() + self.config.decision);
    }
    pub fn arm_grace(&mut self) {
        self.deadline = Some(Instant::now() + self.config.grace);
    }
    pub fn clear(&mut self) {
        self.deadline = None;
    }
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
    pub fn expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
    pub fn config(&self) -> TimerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn default_config() {
        let config = TimerConfig::default();
        assert_eq!(config.ack, Duration::from_secs(1));
        assert_eq!(config.decision, Duration::from_secs(10));
        assert_eq!(config.grace, Duration::from_secs(30));
    }
    #[test]
    fn timer_starts_cleared() {
        let timer = Timer::with_defaults();
        assert!(timer.deadline().is_none());
        assert!(!timer.expired());
    }
    #[test]
    fn timer_sets_deadline() {
        let mut timer = Timer::with_defaults();
        timer.arm_decision();
        assert!(timer.deadline().is_some());
        assert!(!timer.expired());
    }
    #[test]
    fn arming_replaces_the_deadline() {
        let mut timer = Timer::with_defaults();
        timer.arm_grace();
        let first = timer.deadline().unwrap();
        timer.arm_ack();
        assert!(timer.deadline().unwrap() < first);
    }
    #[test]
    fn timer_clears() {
        let mut timer = Timer::with_defaults();
        timer.arm_ack();
        timer.clear();
        assert!(timer.deadline().is_none());
    }
}
