//! Click entity and its validation lifecycle.

use chrono::{DateTime, Utc};

/// Result of validating a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Valid,
    Invalid,
}

impl ClickOutcome {
    pub fn from_validity(is_valid: bool) -> Self {
        if is_valid { Self::Valid } else { Self::Invalid }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Only valid clicks earn a reward.
    pub fn rewarded(self) -> bool {
        self.is_valid()
    }
}

/// Lifecycle state of a click.
///
/// `Created` moves to one of the two `Validated` variants exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickState {
    Created,
    Validated(ClickOutcome),
}

/// One recorded visit to a short link.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub is_valid: bool,
    pub rewarded: bool,
    pub validated_at: Option<DateTime<Utc>>,
}

impl Click {
    /// A freshly created click that has not been through validation yet.
    pub fn pending(id: i64, link_id: i64, clicked_at: DateTime<Utc>) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            is_valid: false,
            rewarded: false,
            validated_at: None,
        }
    }

    pub fn state(&self) -> ClickState {
        match self.validated_at {
            None => ClickState::Created,
            Some(_) => ClickState::Validated(ClickOutcome::from_validity(self.is_valid)),
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    /// Returns the click with the oracle's outcome applied.
    pub fn validated(mut self, outcome: ClickOutcome, at: DateTime<Utc>) -> Self {
        self.is_valid = outcome.is_valid();
        self.rewarded = outcome.rewarded();
        self.validated_at = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_click_defaults() {
        let now = Utc::now();
        let click = Click::pending(1, 42, now);

        assert_eq!(click.link_id, 42);
        assert_eq!(click.clicked_at, now);
        assert!(!click.is_valid);
        assert!(!click.rewarded);
        assert_eq!(click.state(), ClickState::Created);
    }

    #[test]
    fn test_valid_outcome_sets_reward() {
        let click = Click::pending(1, 42, Utc::now()).validated(ClickOutcome::Valid, Utc::now());

        assert!(click.is_valid);
        assert!(click.rewarded);
        assert_eq!(click.state(), ClickState::Validated(ClickOutcome::Valid));
    }

    #[test]
    fn test_invalid_outcome_withholds_reward() {
        let click = Click::pending(1, 42, Utc::now()).validated(ClickOutcome::Invalid, Utc::now());

        assert!(!click.is_valid);
        assert!(!click.rewarded);
        assert_eq!(click.state(), ClickState::Validated(ClickOutcome::Invalid));
    }
}
