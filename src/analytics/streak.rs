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

use std::collections::BTreeSet;

use chrono::Duration;
use serde::Serialize;

use crate::types::date::Date;
use crate::types::review::ReviewEvent;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub current: usize,
    pub longest: usize,
}

/// Every distinct day with at least one review, in ascending order.
pub fn study_days<'a>(events: impl IntoIterator<Item = &'a ReviewEvent>) -> Vec<Date> {
    let days: BTreeSet<Date> = events.into_iter().map(|e| e.date.date()).collect();
    days.into_iter().collect()
}

/// Runs of consecutive study days. `days` must be sorted and free of
/// duplicates, as returned by [`study_days`].
///
/// The last run is the current streak only while it is still alive: `now`
/// must be no more than a day past the start of the most recent study day.
pub fn streaks(days: &[Date], now: Timestamp) -> Streaks {
    let Some(last) = days.last() else {
        return Streaks::default();
    };
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<Date> = None;
    for &day in days {
        run = match previous {
            Some(prev) if day.days_since(prev) == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    let current = if now.since(last.start()) <= Duration::days(1) {
        run
    } else {
        0
    };
    Streaks { current, longest }
}
