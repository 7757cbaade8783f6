//! Client-side gig filtering: free-text search, date-range selection and the
//! weekends-only switch.
//!
//! Everything here is pure. "Now" is always passed in as a calendar date so
//! results are reproducible.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Weekday};

use crate::models::Gig;

/// Date-range selector. The numeric codes are the ones the gig table used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    Any,
    ThisWeek,
    ThisMonth,
    NextMonth,
    ThisYear,
    NextYear,
}

impl DateFilter {
    pub const ALL: [DateFilter; 6] = [
        DateFilter::Any,
        DateFilter::ThisWeek,
        DateFilter::ThisMonth,
        DateFilter::NextMonth,
        DateFilter::ThisYear,
        DateFilter::NextYear,
    ];

    pub fn code(self) -> u8 {
        match self {
            DateFilter::Any => 0,
            DateFilter::ThisWeek => 1,
            DateFilter::ThisMonth => 2,
            DateFilter::NextMonth => 3,
            DateFilter::ThisYear => 4,
            DateFilter::NextYear => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateFilter::Any => "Any date",
            DateFilter::ThisWeek => "This week",
            DateFilter::ThisMonth => "This month",
            DateFilter::NextMonth => "Next month",
            DateFilter::ThisYear => "This year",
            DateFilter::NextYear => "Next year",
        }
    }

    /// Inclusive `[start, end]` bounds for this selector, or `None` when the
    /// selector does not restrict dates.
    pub fn range(self, today: NaiveDate) -> Option<DateRange> {
        match self {
            DateFilter::Any => None,
            DateFilter::ThisWeek => {
                let back = u64::from(today.weekday().num_days_from_sunday());
                let start = today.checked_sub_days(Days::new(back))?;
                let end = start.checked_add_days(Days::new(6))?;
                Some(DateRange { start, end })
            }
            DateFilter::ThisMonth => month_range(first_of_month(today)?),
            DateFilter::NextMonth => {
                month_range(first_of_month(today)?.checked_add_months(Months::new(1))?)
            }
            DateFilter::ThisYear => year_range(today.year()),
            DateFilter::NextYear => year_range(today.year() + 1),
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown date filter `{0}` (expected 0-5, any, this-week, this-month, next-month, this-year or next-year)")]
pub struct UnknownDateFilter(String);

impl FromStr for DateFilter {
    type Err = UnknownDateFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        let filter = match normalized.as_str() {
            "0" | "any" | "any-date" => DateFilter::Any,
            "1" | "this-week" | "week" => DateFilter::ThisWeek,
            "2" | "this-month" | "month" => DateFilter::ThisMonth,
            "3" | "next-month" => DateFilter::NextMonth,
            "4" | "this-year" | "year" => DateFilter::ThisYear,
            "5" | "next-year" => DateFilter::NextYear,
            _ => return Err(UnknownDateFilter(s.to_string())),
        };
        Ok(filter)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

fn month_range(start: NaiveDate) -> Option<DateRange> {
    let end = start
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))?;
    Some(DateRange { start, end })
}

fn year_range(year: i32) -> Option<DateRange> {
    Some(DateRange {
        start: NaiveDate::from_ymd_opt(year, 1, 1)?,
        end: NaiveDate::from_ymd_opt(year, 12, 31)?,
    })
}

/// Current filter criteria.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GigQuery {
    pub search: String,
    pub date_filter: DateFilter,
    pub weekends_only: bool,
}

impl GigQuery {
    pub fn is_unrestricted(&self) -> bool {
        self.search.is_empty() && self.date_filter == DateFilter::Any && !self.weekends_only
    }
}

/// Calendar date of a gig. Accepts `YYYY-MM-DD` and falls back to the date
/// part of an RFC 3339 timestamp.
pub fn parse_gig_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

pub fn matches_search(gig: &Gig, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let contains = |field: &str| field.to_lowercase().contains(&needle);

    contains(&gig.artist)
        || gig.types.iter().any(|tag| contains(tag))
        || contains(&gig.venue)
        || contains(&gig.location)
}

pub fn matches_range(date: Option<NaiveDate>, range: Option<&DateRange>) -> bool {
    match (range, date) {
        (None, _) => true,
        (Some(range), Some(date)) => range.contains(date),
        (Some(_), None) => false,
    }
}

/// Weekend here means Friday or Saturday.
pub fn matches_weekend(date: Option<NaiveDate>, weekends_only: bool) -> bool {
    if !weekends_only {
        return true;
    }
    matches!(
        date.map(|d| d.weekday()),
        Some(Weekday::Fri) | Some(Weekday::Sat)
    )
}

/// Gigs passing every criterion, in their original order.
pub fn filter_gigs<'a>(gigs: &'a [Gig], query: &GigQuery, today: NaiveDate) -> Vec<&'a Gig> {
    let range = query.date_filter.range(today);
    if query.date_filter != DateFilter::Any && range.is_none() {
        log::warn!(
            "date filter {:?} has no representable range for {today}",
            query.date_filter
        );
    }

    gigs.iter()
        .filter(|gig| {
            if !matches_search(gig, &query.search) {
                return false;
            }
            let needs_date = range.is_some() || query.weekends_only;
            if !needs_date {
                return true;
            }
            let date = parse_gig_date(&gig.date);
            if date.is_none() {
                log::debug!("gig {} has unparseable date {:?}", gig.id, gig.date);
            }
            matches_range(date, range.as_ref()) && matches_weekend(date, query.weekends_only)
        })
        .collect()
}
