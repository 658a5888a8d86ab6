//! Pay periods.
//!
//! Payroll runs by quincena: the 1st to the 15th and the 16th to the last day
//! of the month. Record dates are stored as `YYYY-MM-DD` strings and compared
//! lexicographically, so ranges are kept as strings too.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

/// Inclusive date range on `YYYY-MM-DD` strings. Either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    pub fn contains(&self, fecha: &str) -> bool {
        if let Some(from) = self.from.as_deref().filter(|f| !f.is_empty()) {
            if fecha < from {
                return false;
            }
        }
        if let Some(to) = self.to.as_deref().filter(|t| !t.is_empty()) {
            if fecha > to {
                return false;
            }
        }
        true
    }
}

/// Last day of the given month
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// The quincena containing `today`
pub fn quincena_for(today: NaiveDate) -> DateRange {
    let (year, month) = (today.year(), today.month());
    let (start, end) = if today.day() <= 15 {
        (1, 15)
    } else {
        (16, last_day_of_month(year, month))
    };
    DateRange::new(
        format!("{:04}-{:02}-{:02}", year, month, start),
        format!("{:04}-{:02}-{:02}", year, month, end),
    )
}

/// Local calendar date, the reference for "current" periods
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
