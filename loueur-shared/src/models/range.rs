use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A closed interval of calendar days, `start <= end`, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Range ends on {end}, before its start {start}")]
pub struct InvertedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = InvertedRange;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::ordered(raw.start, raw.end).ok_or(InvertedRange {
            start: raw.start,
            end: raw.end,
        })
    }
}

impl DateRange {
    /// Build a range from two endpoints in either order.
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Build a range from ordered endpoints, `None` when `start > end`.
    pub fn ordered(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count; a single-day range has one day.
    pub fn days(&self) -> u32 {
        let span = (self.end - self.start).num_days() + 1;
        u32::try_from(span).unwrap_or(u32::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Every date of the range in ascending order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..i64::from(self.days())).map(move |offset| start + Duration::days(offset))
    }
}
