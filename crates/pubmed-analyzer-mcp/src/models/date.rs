//! Year-month dates and date ranges.
//!
//! PubMed publication dates come in several shapes (`2024`, `2024 Mar`,
//! `2024 Mar 15`, `2024 Mar-Apr`, plus ISO-ish numeric forms). Analysis only
//! needs month precision, so everything is reduced to a [`YearMonth`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Month, Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

static PUBMED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})(?:\s+([A-Za-z]{3,9}|\d{1,2})(?:\s*-\s*[A-Za-z]{3,9})?(?:\s+(\d{1,2}))?)?$",
    )
    .expect("valid PubMed date regex")
});

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{1,2})(?:[-/](\d{1,2}))?(?:[T ].*)?$")
        .expect("valid numeric date regex")
});

/// How a date with only a year is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearOnly {
    /// Resolve to January.
    January,
    /// Resolve to December (inclusive range ends).
    December,
    /// Treat as unparseable.
    Reject,
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a year-month; `None` if the month is not 1-12 or the year is not 1-9999.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        ((1..=9999).contains(&year) && (1..=12).contains(&month)).then_some(Self { year, month })
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month. Years 1-9999 are all inside chrono's range,
    /// so the fallbacks here and in `last_day` never apply.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Parse a PubMed or numeric date string.
    ///
    /// Accepts `YYYY`, `YYYY Mon`, `YYYY Mon DD`, `YYYY Mon-Mon` (first month
    /// wins), `YYYY-MM`, `YYYY-MM-DD`, `YYYY/MM` and `YYYY/MM/DD`. A day, when
    /// present, must exist in that month.
    #[must_use]
    pub fn parse(raw: &str, year_only: YearOnly) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (year, month, day) = if let Some(caps) = NUMERIC_DATE.captures(raw) {
            (
                caps.get(1)?.as_str().parse::<i32>().ok()?,
                Some(caps.get(2)?.as_str().parse::<u32>().ok()?),
                caps.get(3).map(|d| d.as_str().parse::<u32>()),
            )
        } else if let Some(caps) = PUBMED_DATE.captures(raw) {
            let month = match caps.get(2) {
                Some(m) => Some(parse_month(m.as_str())?),
                None => None,
            };
            (
                caps.get(1)?.as_str().parse::<i32>().ok()?,
                month,
                caps.get(3).map(|d| d.as_str().parse::<u32>()),
            )
        } else {
            return None;
        };

        let month = match (month, year_only) {
            (Some(m), _) => m,
            (None, YearOnly::January) => 1,
            (None, YearOnly::December) => 12,
            (None, YearOnly::Reject) => return None,
        };

        if let Some(day) = day {
            NaiveDate::from_ymd_opt(year, month, day.ok()?)?;
        }

        Self::new(year, month)
    }
}

fn parse_month(token: &str) -> Option<u32> {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().ok();
    }
    Month::from_str(token).ok().map(|m| m.number_from_month())
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value, YearOnly::Reject).ok_or_else(|| format!("invalid year-month '{value}'"))
    }
}

/// An inclusive, optionally open-ended range of months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First month included.
    pub start: Option<YearMonth>,
    /// Last month included.
    pub end: Option<YearMonth>,
}

impl DateRange {
    /// A range with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { start: None, end: None }
    }

    /// Create a range, rejecting a start after the end.
    pub fn new(start: Option<YearMonth>, end: Option<YearMonth>) -> AnalysisResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AnalysisError::invalid(
                    "start_date",
                    format!("start {s} is after end {e}"),
                ));
            }
        }
        Ok(Self { start, end })
    }

    /// Parse optional bound strings.
    ///
    /// A year-only start means January, a year-only end means December.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> AnalysisResult<Self> {
        let start = parse_bound("start_date", start, YearOnly::January)?;
        let end = parse_bound("end_date", end, YearOnly::December)?;
        Self::new(start, end)
    }

    /// True when at least one bound is set.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Check whether `month` falls inside the range.
    #[must_use]
    pub fn contains(&self, month: YearMonth) -> bool {
        self.start.is_none_or(|s| month >= s) && self.end.is_none_or(|e| month <= e)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (None, None) => f.write_str("all dates"),
            (Some(s), None) => write!(f, "{s} onwards"),
            (None, Some(e)) => write!(f, "up to {e}"),
            (Some(s), Some(e)) => write!(f, "{s} to {e}"),
        }
    }
}

fn parse_bound(
    parameter: &str,
    raw: Option<&str>,
    year_only: YearOnly,
) -> AnalysisResult<Option<YearMonth>> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(r) => YearMonth::parse(r, year_only).map(Some).ok_or_else(|| {
            AnalysisError::invalid(
                parameter,
                format!("'{r}' is not a date (expected YYYY, YYYY-MM or YYYY/MM/DD)"),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_parse_pubmed_forms() {
        assert_eq!(YearMonth::parse("2024 Mar", YearOnly::Reject), Some(ym(2024, 3)));
        assert_eq!(YearMonth::parse("2024 Mar 15", YearOnly::Reject), Some(ym(2024, 3)));
        assert_eq!(YearMonth::parse("2023 Nov-Dec", YearOnly::Reject), Some(ym(2023, 11)));
        assert_eq!(YearMonth::parse("2024 03", YearOnly::Reject), Some(ym(2024, 3)));
        assert_eq!(YearMonth::parse("2024", YearOnly::January), Some(ym(2024, 1)));
        assert_eq!(YearMonth::parse("2024", YearOnly::Reject), None);
    }

    #[test]
    fn test_parse_numeric_forms() {
        assert_eq!(YearMonth::parse("2024-01", YearOnly::Reject), Some(ym(2024, 1)));
        assert_eq!(YearMonth::parse("2024/02/29", YearOnly::Reject), Some(ym(2024, 2)));
        assert_eq!(YearMonth::parse("2024-12-31T10:00:00Z", YearOnly::Reject), Some(ym(2024, 12)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(YearMonth::parse("", YearOnly::January), None);
        assert_eq!(YearMonth::parse("2023 Spring", YearOnly::January), None);
        assert_eq!(YearMonth::parse("2023 Feb 30", YearOnly::January), None);
        assert_eq!(YearMonth::parse("2024-13", YearOnly::January), None);
        assert_eq!(YearMonth::parse("soon", YearOnly::January), None);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(ym(2024, 2).last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(ym(2023, 12).last_day(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(ym(2023, 12).first_day(), NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
    }

    #[test]
    fn test_range_year_bounds_expand() {
        let range = DateRange::parse(Some("2020"), Some("2021")).unwrap();
        assert_eq!(range.start, Some(ym(2020, 1)));
        assert_eq!(range.end, Some(ym(2021, 12)));
        assert!(range.contains(ym(2021, 12)));
        assert!(!range.contains(ym(2022, 1)));
    }

    #[test]
    fn test_range_start_after_end() {
        let err = DateRange::parse(Some("2024/05/01"), Some("2024/01/01")).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_range_bad_bound() {
        let err = DateRange::parse(Some("yesterday"), None).unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn test_year_month_serde_as_string() {
        let json = serde_json::to_string(&ym(2024, 1)).unwrap();
        assert_eq!(json, r#""2024-01""#);
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym(2024, 1));
    }
}
