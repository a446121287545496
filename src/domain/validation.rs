//! Click validation oracle.
//!
//! Stands in for an out-of-process fraud check. The service only depends on
//! [`ClickValidator`]; which implementation runs is decided at startup.

use async_trait::async_trait;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Decides whether a click is eligible for a reward.
///
/// Each call is an independent decision. Callers must call it at most once per
/// click and persist the result instead of asking again.
#[async_trait]
pub trait ClickValidator: Send + Sync {
    async fn validate(&self) -> bool;
}

/// Simulated fraud check: waits a fixed delay, then accepts with a fixed probability.
///
/// The delay is a timer await, so only the calling request is suspended.
#[derive(Debug, Clone)]
pub struct SimulatedValidator {
    delay: Duration,
    accept_rate: f64,
}

impl SimulatedValidator {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);
    pub const DEFAULT_ACCEPT_RATE: f64 = 0.5;

    /// `accept_rate` is clamped to `0.0..=1.0`.
    pub fn new(delay: Duration, accept_rate: f64) -> Self {
        Self {
            delay,
            accept_rate: accept_rate.clamp(0.0, 1.0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn accept_rate(&self) -> f64 {
        self.accept_rate
    }
}

impl Default for SimulatedValidator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, Self::DEFAULT_ACCEPT_RATE)
    }
}

#[async_trait]
impl ClickValidator for SimulatedValidator {
    async fn validate(&self) -> bool {
        tokio::time::sleep(self.delay).await;
        rand::rng().random_bool(self.accept_rate)
    }
}

/// Validator with a predetermined answer and no delay.
pub enum FixedValidator {
    AlwaysAccept,
    AlwaysReject,
    /// Answers from the queue in order, rejecting once it runs dry.
    Sequence(Mutex<VecDeque<bool>>),
}

impl FixedValidator {
    pub fn sequence(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self::Sequence(Mutex::new(outcomes.into_iter().collect()))
    }
}

#[async_trait]
impl ClickValidator for FixedValidator {
    async fn validate(&self) -> bool {
        match self {
            Self::AlwaysAccept => true,
            Self::AlwaysReject => false,
            Self::Sequence(queue) => queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_validator_waits_for_delay() {
        let validator = SimulatedValidator::new(Duration::from_millis(500), 1.0);
        let started = tokio::time::Instant::now();

        assert!(validator.validate().await);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_validator_extreme_rates() {
        let always = SimulatedValidator::new(Duration::ZERO, 1.0);
        let never = SimulatedValidator::new(Duration::ZERO, 0.0);

        for _ in 0..50 {
            assert!(always.validate().await);
            assert!(!never.validate().await);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_validator_delays_do_not_serialize() {
        let validator = std::sync::Arc::new(SimulatedValidator::default());
        let started = tokio::time::Instant::now();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let v = validator.clone();
                tokio::spawn(async move { v.validate().await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(started.elapsed() < Duration::from_millis(1000));
    }

    #[test]
    fn test_accept_rate_is_clamped() {
        assert_eq!(SimulatedValidator::new(Duration::ZERO, 1.5).accept_rate(), 1.0);
        assert_eq!(SimulatedValidator::new(Duration::ZERO, -1.0).accept_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_fixed_validator_variants() {
        assert!(FixedValidator::AlwaysAccept.validate().await);
        assert!(!FixedValidator::AlwaysReject.validate().await);
    }

    #[tokio::test]
    async fn test_fixed_validator_sequence_then_rejects() {
        let validator = FixedValidator::sequence([true, false, true]);

        assert!(validator.validate().await);
        assert!(!validator.validate().await);
        assert!(validator.validate().await);
        assert!(!validator.validate().await);
    }
}
