//! Signal strength ranking
//!
//! Strength labels are free text ("HIGH", "EXTREME RISK", "medium - watch").
//! Only the first whitespace-delimited token is ranked, against the fixed
//! vocabulary `EXTREME > HIGH > MEDIUM > LOW`. Anything else is
//! [`StrengthLevel::Unknown`], which ranks below every known level.
//!
//! Two selections are built on that order:
//!
//! - [`strongest_of_day`] picks one day's champion signal.
//! - [`strongest_across_days`] picks the best of several days' champions. Only
//!   a day's champion competes here; a strong runner-up from one day never
//!   beats another day's champion.
//!
//! Both keep the first occurrence on ties.

use crate::model::Signal;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ranked strength vocabulary; `Ord` puts the strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrengthLevel {
    Extreme,
    High,
    Medium,
    Low,
    /// Label whose first token is not in the vocabulary
    Unknown,
}

impl StrengthLevel {
    /// Rank a free-text label by its first token (case-insensitive)
    pub fn from_label(label: &str) -> Self {
        let token = label.split_whitespace().next().unwrap_or_default();
        match token.to_ascii_uppercase().as_str() {
            "EXTREME" => Self::Extreme,
            "HIGH" => Self::High,
            "MEDIUM" => Self::Medium,
            "LOW" => Self::Low,
            _ => Self::Unknown,
        }
    }

    /// Whether `self` ranks strictly ahead of `other`
    pub fn is_stronger_than(self, other: Self) -> bool {
        self < other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extreme => "EXTREME",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The strongest signal of one day, or `None` for no signals
///
/// Left-to-right arg-min over [`StrengthLevel`]; an earlier signal wins a tie.
pub fn strongest_of_day(signals: &[Signal]) -> Option<&Signal> {
    let mut best: Option<(&Signal, StrengthLevel)> = None;
    for signal in signals {
        let level = signal.level();
        match best {
            Some((_, best_level)) if !level.is_stronger_than(best_level) => {}
            _ => best = Some((signal, level)),
        }
    }
    best.map(|(signal, _)| signal)
}

/// A day's champion signal and the date it was observed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedSignal {
    pub date: NaiveDate,
    pub signal: Signal,
}

impl DatedSignal {
    pub fn level(&self) -> StrengthLevel {
        self.signal.level()
    }
}

/// Best of several days' champions, in the order given
///
/// Callers pass one champion per day; an earlier entry wins a tie.
pub fn strongest_across_days<I>(champions: I) -> Option<DatedSignal>
where
    I: IntoIterator<Item = DatedSignal>,
{
    champions.into_iter().fold(None, |best, candidate| match best {
        Some(current) if !candidate.level().is_stronger_than(current.level()) => Some(current),
        _ => Some(candidate),
    })
}

/// Longest rolling window accepted by the service, in days
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// The `days` calendar dates ending at `today`, oldest first
///
/// Every date is listed whether or not the store has data for it. The window
/// is clamped at the earliest representable date.
pub fn window_dates(today: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    let span = Days::new(u64::from(days.saturating_sub(1)));
    let start = today.checked_sub_days(span).unwrap_or(NaiveDate::MIN);
    start
        .iter_days()
        .take_while(move |date| *date <= today)
        .take(usize::try_from(days).unwrap_or(usize::MAX))
}
