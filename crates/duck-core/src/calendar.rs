//! Calendar filters applied to time-indexed tables.
//!
//! [`DateRange`] reproduces membership in a generated sequence of
//! timestamps (`start`, `start + step`, ... up to `end`), so a daily range
//! only admits midnight timestamps. [`MonthSet`] is a small bitset over
//! calendar months.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DuckError, DuckResult};

/// Inclusive, regularly spaced range of timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
}

impl DateRange {
    /// Daily range from `start` to `end`, both inclusive, at midnight.
    pub fn daily(start: NaiveDate, end: NaiveDate) -> DuckResult<Self> {
        Self::with_step(
            start.and_time(NaiveTime::MIN),
            end.and_time(NaiveTime::MIN),
            Duration::days(1),
        )
    }

    pub fn with_step(start: NaiveDateTime, end: NaiveDateTime, step: Duration) -> DuckResult<Self> {
        if step <= Duration::zero() {
            return Err(DuckError::Config("date range step must be positive".into()));
        }
        if end < start {
            return Err(DuckError::Config(format!(
                "date range end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end, step })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// True when `ts` is one of the generated timestamps.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        if *ts < self.start || *ts > self.end {
            return false;
        }
        let offset = *ts - self.start;
        match (offset.num_nanoseconds(), self.step.num_nanoseconds()) {
            (Some(off), Some(step)) => off % step == 0,
            // Offsets beyond ~292 years overflow nanoseconds; fall back to seconds.
            _ => offset.num_seconds() % self.step.num_seconds().max(1) == 0,
        }
    }

    /// Number of timestamps the range generates.
    pub fn len(&self) -> usize {
        let span = (self.end - self.start).num_seconds();
        let step = self.step.num_seconds().max(1);
        (span / step) as usize + 1
    }

    /// A validated range always generates at least `start`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Set of calendar months (1 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthSet(u16);

impl MonthSet {
    pub const ALL: MonthSet = MonthSet(0b1_1111_1111_1110);

    pub fn new<I: IntoIterator<Item = u32>>(months: I) -> DuckResult<Self> {
        let mut set = MonthSet::default();
        for month in months {
            set.insert(month)?;
        }
        Ok(set)
    }

    /// Months `first..=last`, clamped to 1-12.
    pub fn span(first: u32, last: u32) -> Self {
        MonthSet((first.max(1)..=last.min(12)).fold(0, |bits, m| bits | 1 << m))
    }

    pub fn insert(&mut self, month: u32) -> DuckResult<()> {
        if !(1..=12).contains(&month) {
            return Err(DuckError::Parse(format!(
                "month {month} out of range; expected 1-12"
            )));
        }
        self.0 |= 1 << month;
        Ok(())
    }

    pub fn contains(&self, month: u32) -> bool {
        (1..=12).contains(&month) && self.0 & (1 << month) != 0
    }

    /// True when the timestamp's month is a member.
    pub fn contains_date<D: Datelike>(&self, date: &D) -> bool {
        self.contains(date.month())
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=12).filter(move |m| self.contains(*m))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for MonthSet {
    type Err = DuckError;

    /// Parses `"3-7"`, `"3,4,5"` or mixed forms such as `"1,3-5,12"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut set = MonthSet::default();
        for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo = parse_month(lo)?;
                    let hi = parse_month(hi)?;
                    if hi < lo {
                        return Err(DuckError::Parse(format!("empty month range '{part}'")));
                    }
                    for month in lo..=hi {
                        set.insert(month)?;
                    }
                }
                None => set.insert(parse_month(part)?)?,
            }
        }
        if set.is_empty() {
            return Err(DuckError::Parse(format!("no months in '{raw}'")));
        }
        Ok(set)
    }
}

fn parse_month(raw: &str) -> DuckResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| DuckError::Parse(format!("invalid month '{raw}': {e}")))
}

impl fmt::Display for MonthSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let months: Vec<String> = self.iter().map(|m| m.to_string()).collect();
        write!(f, "{}", months.join(","))
    }
}

impl Serialize for MonthSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let months: Vec<u32> = self.iter().collect();
        months.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MonthSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let months = Vec::<u32>::deserialize(deserializer)?;
        MonthSet::new(months).map_err(serde::de::Error::custom)
    }
}
