//! Goal progress figures shown on goal cards

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Goal;
use crate::time;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Percentage of the target reached, capped at 100.
///
/// A non-positive target yields 0.
pub fn progress_percent(goal: &Goal) -> Decimal {
    if goal.target_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    goal.current_amount
        .checked_div(goal.target_amount)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .map(|percent| percent.min(HUNDRED))
        .unwrap_or(HUNDRED)
}

/// Progress rounded to whole percent, for labels
pub fn progress_label(goal: &Goal) -> String {
    let rounded = progress_percent(goal)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{}%", rounded)
}

pub fn is_complete(goal: &Goal) -> bool {
    progress_percent(goal) >= HUNDRED
}

/// `target - current`, negative when the goal was exceeded
pub fn remaining_amount(goal: &Goal) -> Decimal {
    goal.target_amount - goal.current_amount
}

/// Amount still missing, or `None` once the goal is reached
pub fn amount_to_go(goal: &Goal) -> Option<Decimal> {
    if is_complete(goal) {
        None
    } else {
        Some(remaining_amount(goal))
    }
}

/// Whole days left until the target date, rounded up
pub fn days_left(goal: &Goal, now: NaiveDateTime) -> i64 {
    time::days_until(goal.target_date, now)
}

pub fn is_overdue(goal: &Goal, now: NaiveDateTime) -> bool {
    days_left(goal, now) < 0
}

/// Colour band of the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    Complete,
    High,
    Medium,
    Low,
    Minimal,
}

impl ProgressTier {
    pub fn of(goal: &Goal) -> Self {
        Self::for_percent(progress_percent(goal))
    }

    pub fn for_percent(percent: Decimal) -> Self {
        if percent >= HUNDRED {
            ProgressTier::Complete
        } else if percent >= Decimal::from(75) {
            ProgressTier::High
        } else if percent >= Decimal::from(50) {
            ProgressTier::Medium
        } else if percent >= Decimal::from(25) {
            ProgressTier::Low
        } else {
            ProgressTier::Minimal
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ProgressTier::Complete => "progress-complete",
            ProgressTier::High => "progress-high",
            ProgressTier::Medium => "progress-medium",
            ProgressTier::Low => "progress-low",
            ProgressTier::Minimal => "progress-minimal",
        }
    }
}

/// How close the target date is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    /// Seven days or fewer
    Imminent(i64),
    /// Thirty days or fewer
    Soon(i64),
    Later(i64),
}

impl Urgency {
    pub fn from_days_left(days: i64) -> Self {
        match days {
            d if d < 0 => Urgency::Overdue,
            d if d <= 7 => Urgency::Imminent(d),
            d if d <= 30 => Urgency::Soon(d),
            d => Urgency::Later(d),
        }
    }

    pub fn of(goal: &Goal, now: NaiveDateTime) -> Self {
        Self::from_days_left(days_left(goal, now))
    }

    pub fn label(&self) -> String {
        match self {
            Urgency::Overdue => "Overdue".to_string(),
            Urgency::Imminent(d) | Urgency::Soon(d) | Urgency::Later(d) => format!("{}d", d),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Urgency::Overdue => "urgency-overdue",
            Urgency::Imminent(_) => "urgency-imminent",
            Urgency::Soon(_) => "urgency-soon",
            Urgency::Later(_) => "urgency-later",
        }
    }
}
