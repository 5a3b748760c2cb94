//! Repeat cadences and inclusive date windows
//!
//! Budgets and recurring schedules both repeat on a daily, weekly, monthly or
//! yearly cadence anchored at a start date. Month and year steps are always
//! measured from the anchor so that a schedule starting on the 31st keeps
//! landing on the last day of shorter months without drifting.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a budget period or recurring transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Cadence {
    /// All cadences in display order
    pub const ALL: [Cadence; 4] = [
        Cadence::Daily,
        Cadence::Weekly,
        Cadence::Monthly,
        Cadence::Yearly,
    ];

    /// Move `cycles` whole periods forward from `anchor`
    ///
    /// Saturates at the largest representable date.
    pub fn advance(&self, anchor: NaiveDate, cycles: u32) -> NaiveDate {
        let moved = match self {
            Self::Daily => anchor.checked_add_days(Days::new(u64::from(cycles))),
            Self::Weekly => anchor.checked_add_days(Days::new(u64::from(cycles) * 7)),
            Self::Monthly => anchor.checked_add_months(Months::new(cycles)),
            Self::Yearly => cycles
                .checked_mul(12)
                .and_then(|months| anchor.checked_add_months(Months::new(months))),
        };
        moved.unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive last day of the period that begins on `start`
    pub fn period_end(&self, start: NaiveDate) -> NaiveDate {
        self.cycle(start, 0).end
    }

    /// The `index`-th period of a schedule anchored at `anchor`
    pub fn cycle(&self, anchor: NaiveDate, index: u32) -> DateWindow {
        let start = self.advance(anchor, index);
        let next = self.advance(anchor, index.saturating_add(1));
        let end = next.pred_opt().unwrap_or(next).max(start);
        DateWindow { start, end }
    }

    /// Index of the period of a schedule anchored at `anchor` that contains `date`
    ///
    /// Dates before the anchor belong to the first period.
    pub fn cycle_index(&self, anchor: NaiveDate, date: NaiveDate) -> u32 {
        if date <= anchor {
            return 0;
        }

        let days = (date - anchor).num_days();
        let estimate = match self {
            Self::Daily => days,
            Self::Weekly => days / 7,
            Self::Monthly => months_between(anchor, date),
            Self::Yearly => months_between(anchor, date) / 12,
        };
        let mut index = u32::try_from(estimate.max(0)).unwrap_or(u32::MAX);

        // Month clamping can put the estimate one period off in either direction.
        while index > 0 && self.advance(anchor, index) > date {
            index -= 1;
        }
        while index < u32::MAX && self.advance(anchor, index + 1) <= date {
            index += 1;
        }
        index
    }

    /// The period of a schedule anchored at `anchor` that contains `date`
    pub fn window_containing(&self, anchor: NaiveDate, date: NaiveDate) -> DateWindow {
        self.cycle(anchor, self.cycle_index(anchor, date))
    }

    /// Lowercase label used in storage and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year() - from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

impl FromStr for Cadence {
    type Err = CadenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            _ => Err(CadenceParseError(s.to_string())),
        }
    }
}

/// Error returned when a cadence label is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenceParseError(pub String);

impl fmt::Display for CadenceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown period '{}' (expected daily, weekly, monthly or yearly)",
            self.0
        )
    }
}

impl std::error::Error for CadenceParseError {}

/// An inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window, returning None when `end` precedes `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// A window covering a single day
    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// The calendar month containing `day`
    pub fn month_of(day: NaiveDate) -> Self {
        let start = day.with_day(1).unwrap_or(day);
        Cadence::Monthly.cycle(start, 0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
