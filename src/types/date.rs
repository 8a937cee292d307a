// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveTime;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

/// A calendar day.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn parse(s: &str) -> Fallible<Self> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| ErrorReport::new(format!("invalid date: {s}")))?;
        Ok(Self(date))
    }

    /// Midnight UTC at the start of this day.
    pub fn start(self) -> Timestamp {
        Timestamp::new(self.0.and_time(NaiveTime::MIN).and_utc())
    }

    /// Saturates at the earliest representable day.
    pub fn minus_days(self, days: u32) -> Self {
        let date = self
            .0
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self(date)
    }

    /// Number of days from `earlier` to `self`. Negative if `earlier` is
    /// after `self`.
    pub fn days_since(self, earlier: Date) -> i64 {
        (self.0 - earlier.0).num_days()
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() -> Fallible<()> {
        let date = Date::parse("2024-02-29")?;
        assert_eq!(date.to_string(), "2024-02-29");
        assert!(Date::parse("2023-02-29").is_err());
        Ok(())
    }

    #[test]
    fn test_arithmetic() -> Fallible<()> {
        let a = Date::parse("2024-01-01")?;
        let b = Date::parse("2024-01-05")?;
        assert_eq!(b.days_since(a), 4);
        assert_eq!(a.days_since(b), -4);
        assert_eq!(b.minus_days(4), a);
        assert_eq!(b.minus_days(u32::MAX), Date::new(NaiveDate::MIN));
        Ok(())
    }

    #[test]
    fn test_start() -> Fallible<()> {
        let date = Date::parse("2024-01-05")?;
        assert_eq!(date.start().to_rfc3339(), "2024-01-05T00:00:00+00:00");
        Ok(())
    }
}
