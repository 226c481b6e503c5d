//! Calendar periods and record bucketing.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{ArticleRecord, DateRange, Granularity, YearMonth};

/// One month, quarter or year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    granularity: Granularity,
    year: i32,
    /// Zero-based position within the year.
    index: u32,
}

impl Period {
    /// The period of `granularity` containing `month`.
    #[must_use]
    pub const fn containing(month: YearMonth, granularity: Granularity) -> Self {
        Self { granularity, year: month.year(), index: (month.month() - 1) / granularity.months() }
    }

    /// Granularity of the period.
    #[must_use]
    pub const fn granularity(self) -> Granularity {
        self.granularity
    }

    /// The following period.
    #[must_use]
    pub const fn next(self) -> Self {
        let per_year = 12 / self.granularity.months();
        if self.index + 1 >= per_year {
            Self { granularity: self.granularity, year: self.year + 1, index: 0 }
        } else {
            Self { granularity: self.granularity, year: self.year, index: self.index + 1 }
        }
    }

    /// `2024-01`, `2024-Q1` or `2024`.
    #[must_use]
    pub fn label(self) -> String {
        match self.granularity {
            Granularity::Month => format!("{:04}-{:02}", self.year, self.index + 1),
            Granularity::Quarter => format!("{:04}-Q{}", self.year, self.index + 1),
            Granularity::Year => format!("{:04}", self.year),
        }
    }

    fn first_month(self) -> u32 {
        self.index * self.granularity.months() + 1
    }

    /// The `offset`-th month of the period. Periods only come from
    /// `containing` a valid `YearMonth` and the buckets stepped from it, so
    /// this is `None` only past year 9999.
    fn month_at(self, offset: u32) -> Option<YearMonth> {
        YearMonth::new(self.year, self.first_month() + offset)
    }

    /// First day of the period.
    #[must_use]
    pub fn start(self) -> NaiveDate {
        self.month_at(0).map_or(NaiveDate::MAX, YearMonth::first_day)
    }

    /// Last day of the period.
    #[must_use]
    pub fn end(self) -> NaiveDate {
        self.month_at(self.granularity.months() - 1).map_or(NaiveDate::MAX, YearMonth::last_day)
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.index).cmp(&(other.year, other.index))
    }
}

/// Records split by date status.
#[derive(Debug, Default)]
pub struct Partition<'r> {
    /// Records with a publication month inside the range.
    pub dated: Vec<(YearMonth, &'r ArticleRecord)>,
    /// Records without a parseable publication date.
    pub undated: usize,
    /// Dated records outside the range.
    pub out_of_range: usize,
}

impl Partition<'_> {
    /// Earliest and latest in-range month.
    #[must_use]
    pub fn span(&self) -> Option<(YearMonth, YearMonth)> {
        let first = self.dated.iter().map(|(m, _)| *m).min()?;
        let last = self.dated.iter().map(|(m, _)| *m).max()?;
        Some((first, last))
    }
}

/// Split `records` into in-range dated, undated and out-of-range.
pub fn partition<'r>(
    records: impl IntoIterator<Item = &'r ArticleRecord>,
    range: &DateRange,
    year_only_as_january: bool,
) -> Partition<'r> {
    let mut out = Partition::default();
    for record in records {
        match record.published(year_only_as_january) {
            None => out.undated += 1,
            Some(month) if range.contains(month) => out.dated.push((month, record)),
            Some(_) => out.out_of_range += 1,
        }
    }
    out
}

/// Group the dated records of `partition` into chronological, gap-free periods.
///
/// The series runs from the range start (or the earliest record) to the
/// range end (or the latest record). A half-open range with no records
/// yields the single period of its one bound.
#[must_use]
pub fn bucket_records<'r>(
    partition: &Partition<'r>,
    granularity: Granularity,
    range: &DateRange,
) -> Vec<(Period, Vec<&'r ArticleRecord>)> {
    let span = partition.span();
    let first = range.start.or(span.map(|(f, _)| f)).or(range.end);
    let last = range.end.or(span.map(|(_, l)| l)).or(range.start);
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let mut grouped: BTreeMap<Period, Vec<&'r ArticleRecord>> = BTreeMap::new();
    for &(month, record) in &partition.dated {
        grouped.entry(Period::containing(month, granularity)).or_default().push(record);
    }

    let end = Period::containing(last, granularity);
    let mut period = Period::containing(first, granularity);
    let mut buckets = Vec::new();
    while period <= end {
        buckets.push((period, grouped.remove(&period).unwrap_or_default()));
        period = period.next();
    }
    buckets
}
