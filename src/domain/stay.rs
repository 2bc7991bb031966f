use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{BookingError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of nights between two calendar dates, never less than one.
///
/// Dates carry no time component, so the ceiling of the day difference is the
/// difference itself. Same-day and inverted ranges clamp to a single night.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    u32::try_from(days.max(1)).unwrap_or(u32::MAX)
}

/// A check-in/check-out pair with its night count. Only built through
/// [`StayPeriod::new`] or [`StayPeriod::parse`], so `nights` always matches
/// the dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayPeriod {
    check_in: NaiveDate,
    check_out: NaiveDate,
    nights: u32,
}

impl StayPeriod {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
            nights: nights_between(check_in, check_out),
        }
    }

    /// Parse `YYYY-MM-DD` dates. Only malformed dates are errors; an empty or
    /// inverted range is clamped like any other.
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self> {
        let ci = parse_date(check_in, "check-in")?;
        let co = parse_date(check_out, "check-out")?;
        Ok(Self::new(ci, co))
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> u32 {
        self.nights
    }

    /// True when the requested range was shorter than one night and got
    /// clamped. Callers surface this as a hint, it never blocks a quote.
    pub fn was_clamped(&self) -> bool {
        self.check_out <= self.check_in
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        BookingError::invalid(format!(
            "invalid {field} date '{value}', expected YYYY-MM-DD"
        ))
    })
}

impl std::fmt::Display for StayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} → {} ({} night{})",
            self.check_in.format(DATE_FORMAT),
            self.check_out.format(DATE_FORMAT),
            self.nights,
            if self.nights == 1 { "" } else { "s" }
        )
    }
}
