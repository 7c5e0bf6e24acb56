//! Asset load gate
//!
//! Holds the game back until the asset collaborator has delivered
//! everything it was asked for, or until a timeout passes. On timeout the
//! game starts with whatever arrived; missing models become placeholders.

use std::fmt::Display;

use tracing::{info, warn};

/// Seconds to wait for assets before starting anyway.
pub const LOAD_TIMEOUT: f32 = 8.0;

/// How loading ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every asset arrived (or reported failure)
    Complete,
    /// The timeout passed with `missing` assets outstanding
    TimedOut { missing: usize },
}

/// Counts outstanding assets against a deadline.
#[derive(Debug, Clone)]
pub struct LoadGate {
    expected: usize,
    settled: usize,
    elapsed: f32,
    timeout: f32,
    outcome: Option<LoadOutcome>,
    reported: bool,
}

impl LoadGate {
    pub fn new(expected: usize) -> Self {
        Self::with_timeout(expected, LOAD_TIMEOUT)
    }

    pub fn with_timeout(expected: usize, timeout: f32) -> Self {
        let mut gate = Self {
            expected,
            settled: 0,
            elapsed: 0.0,
            timeout,
            outcome: None,
            reported: false,
        };
        gate.check();
        gate
    }

    /// An asset finished loading.
    pub fn asset_loaded(&mut self) {
        self.settle();
    }

    /// An asset failed; it no longer holds the gate.
    pub fn asset_failed(&mut self, name: &str) {
        warn!(asset = name, "asset failed to load, continuing without it");
        self.settle();
    }

    /// Settle one asset from its load result. A failure is logged and
    /// yields `None`.
    pub fn settle_result<T, E: Display>(&mut self, name: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => {
                self.asset_loaded();
                Some(value)
            }
            Err(err) => {
                warn!(asset = name, %err, "load error");
                self.asset_failed(name);
                None
            }
        }
    }

    fn settle(&mut self) {
        if self.outcome.is_none() {
            self.settled = (self.settled + 1).min(self.expected);
            self.check();
        }
    }

    /// Advance the deadline clock.
    pub fn advance(&mut self, delta: f32) {
        if self.outcome.is_some() {
            return;
        }
        self.elapsed += delta.max(0.0);
        if self.elapsed >= self.timeout {
            let missing = self.expected - self.settled;
            warn!(missing, "asset loading timed out, starting with what arrived");
            self.outcome = Some(LoadOutcome::TimedOut { missing });
        }
    }

    fn check(&mut self) {
        if self.outcome.is_none() && self.settled >= self.expected {
            info!(assets = self.expected, "assets loaded");
            self.outcome = Some(LoadOutcome::Complete);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<LoadOutcome> {
        self.outcome
    }

    /// The outcome, the first time it is asked for after loading ends.
    pub fn take_outcome(&mut self) -> Option<LoadOutcome> {
        if self.reported {
            return None;
        }
        let outcome = self.outcome?;
        self.reported = true;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_load_is_ready_immediately() {
        let mut gate = LoadGate::new(0);
        assert!(gate.is_ready());
        assert_eq!(gate.take_outcome(), Some(LoadOutcome::Complete));
        assert_eq!(gate.take_outcome(), None);
    }

    #[test]
    fn test_ready_when_all_settle() {
        let mut gate = LoadGate::new(3);
        gate.asset_loaded();
        gate.asset_failed("hands.glb");
        assert!(!gate.is_ready());
        gate.asset_loaded();
        assert_eq!(gate.outcome(), Some(LoadOutcome::Complete));
    }

    #[test]
    fn test_timeout_proceeds_with_missing() {
        let mut gate = LoadGate::new(4);
        gate.asset_loaded();
        gate.advance(5.0);
        assert!(!gate.is_ready());
        gate.advance(3.0);
        assert_eq!(gate.outcome(), Some(LoadOutcome::TimedOut { missing: 3 }));
    }

    #[test]
    fn test_late_arrivals_do_not_change_outcome() {
        let mut gate = LoadGate::with_timeout(1, 1.0);
        gate.advance(2.0);
        gate.asset_loaded();
        assert_eq!(gate.outcome(), Some(LoadOutcome::TimedOut { missing: 1 }));
    }

    #[test]
    fn test_settle_result_counts_both_outcomes() {
        let mut gate = LoadGate::new(2);
        let world: Option<u32> = gate.settle_result("world.json", Ok::<_, String>(7));
        assert_eq!(world, Some(7));
        assert!(!gate.is_ready());

        let catalog: Option<u32> = gate.settle_result("catalog.json", Err("missing file"));
        assert!(catalog.is_none());
        assert_eq!(gate.take_outcome(), Some(LoadOutcome::Complete));
    }
}
