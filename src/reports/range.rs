//! Report date ranges

use chrono::{Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::{TrackerError, TrackerResult};
use crate::models::DateWindow;

/// The span of days a report covers, relative to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRange {
    /// Today only
    Daily,
    /// The seven days before today, plus today
    Weekly,
    /// The calendar month containing today
    Monthly,
    /// An explicit inclusive range
    Custom { start: NaiveDate, end: NaiveDate },
}

impl ReportRange {
    /// A custom range; `start` must not be after `end`
    pub fn custom(start: NaiveDate, end: NaiveDate) -> TrackerResult<Self> {
        if start > end {
            return Err(TrackerError::Validation(format!(
                "Report start {} is after end {}",
                start, end
            )));
        }
        Ok(Self::Custom { start, end })
    }

    /// Resolve the range to concrete dates
    pub fn window(&self, today: NaiveDate) -> DateWindow {
        match *self {
            Self::Daily => DateWindow::single_day(today),
            Self::Weekly => DateWindow {
                start: today.checked_sub_days(Days::new(7)).unwrap_or(today),
                end: today,
            },
            Self::Monthly => DateWindow::month_of(today),
            Self::Custom { start, end } => DateWindow { start, end },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Custom { .. } => "Custom",
        }
    }
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { start, end } => write!(f, "Custom ({}..{})", start, end),
            other => write!(f, "{}", other.label()),
        }
    }
}

impl FromStr for ReportRange {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(TrackerError::Validation(format!(
                "Unknown report range '{}'; use daily, weekly or monthly",
                other
            ))),
        }
    }
}
