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

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::Date;

/// An inclusive range of calendar days.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Window {
    pub start: Date,
    pub end: Date,
}

impl Window {
    pub fn new(start: Date, end: Date) -> Fallible<Self> {
        if start > end {
            return fail(format!("window starts after it ends: {start} > {end}"));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the window, counting both ends.
    pub fn days(&self) -> u32 {
        (self.end.days_since(self.start) + 1) as u32
    }
}

/// A named look-back period ending today.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Year,
    /// From the first day anything was studied.
    All,
    Days(u32),
}

impl TimeRange {
    /// Resolve the range into a concrete window ending on `today`.
    /// `first_study_day` anchors `All`; with no history it collapses to today.
    pub fn window(self, today: Date, first_study_day: Option<Date>) -> Window {
        let start = match self {
            TimeRange::Week => today.minus_days(6),
            TimeRange::Month => today.minus_days(29),
            TimeRange::Year => today.minus_days(364),
            TimeRange::Days(n) => today.minus_days(n.max(1) - 1),
            TimeRange::All => match first_study_day {
                Some(day) if day < today => day,
                _ => today,
            },
        };
        Window { start, end: today }
    }
}

impl FromStr for TimeRange {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            _ => match s.parse::<u32>() {
                Ok(0) | Err(_) => fail(format!(
                    "invalid time range: {s} (expected week, month, year, all, or a number of days)"
                )),
                Ok(n) => Ok(TimeRange::Days(n)),
            },
        }
    }
}

impl TryFrom<String> for TimeRange {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Week => write!(f, "week"),
            TimeRange::Month => write!(f, "month"),
            TimeRange::Year => write!(f, "year"),
            TimeRange::All => write!(f, "all"),
            TimeRange::Days(n) => write!(f, "{n}"),
        }
    }
}
