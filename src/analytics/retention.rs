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

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::date::Date;
use crate::types::review::ReviewEvent;
use crate::types::window::Window;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionDay {
    pub date: Date,
    /// Percentage of the day's reviews that were successful recalls.
    pub retention: f64,
    pub total_reviews: usize,
    pub successful_reviews: usize,
}

/// Per-day retention over the window, oldest day first. Days without reviews
/// are left out.
pub fn retention_history<'a>(
    events: impl IntoIterator<Item = &'a ReviewEvent>,
    window: Window,
) -> Vec<RetentionDay> {
    let mut days: BTreeMap<Date, (usize, usize)> = BTreeMap::new();
    for event in events {
        let date = event.date.date();
        if !window.contains(date) {
            continue;
        }
        let (total, successful) = days.entry(date).or_insert((0, 0));
        *total += 1;
        if event.quality.is_success() {
            *successful += 1;
        }
    }
    days.into_iter()
        .map(|(date, (total, successful))| RetentionDay {
            date,
            retention: 100.0 * successful as f64 / total as f64,
            total_reviews: total,
            successful_reviews: successful,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::types::quality::Quality;
    use crate::types::timestamp::Timestamp;

    fn event(ts: &str, quality: i64) -> Fallible<ReviewEvent> {
        Ok(ReviewEvent::new(
            Timestamp::parse(ts)?,
            Quality::new(quality)?,
        ))
    }

    fn window(start: &str, end: &str) -> Fallible<Window> {
        Window::new(Date::parse(start)?, Date::parse(end)?)
    }

    #[test]
    fn test_single_day() -> Fallible<()> {
        let events = vec![
            event("2024-01-02T08:00:00Z", 1)?,
            event("2024-01-02T09:00:00Z", 3)?,
            event("2024-01-02T10:00:00Z", 4)?,
            event("2024-01-02T23:59:59Z", 5)?,
        ];
        let history = retention_history(&events, window("2024-01-01", "2024-01-31")?);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, Date::parse("2024-01-02")?);
        assert_eq!(history[0].retention, 75.0);
        assert_eq!(history[0].total_reviews, 4);
        assert_eq!(history[0].successful_reviews, 3);
        Ok(())
    }

    #[test]
    fn test_days_are_sorted_and_gaps_omitted() -> Fallible<()> {
        let events = vec![
            event("2024-01-05T08:00:00Z", 0)?,
            event("2024-01-01T08:00:00Z", 5)?,
            event("2024-01-05T09:00:00Z", 5)?,
        ];
        let history = retention_history(&events, window("2024-01-01", "2024-01-31")?);
        let dates: Vec<String> = history.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-05"]);
        assert_eq!(history[0].retention, 100.0);
        assert_eq!(history[1].retention, 50.0);
        Ok(())
    }

    #[test]
    fn test_events_outside_window_ignored() -> Fallible<()> {
        let events = vec![
            event("2023-12-31T23:00:00Z", 5)?,
            event("2024-01-01T00:00:00Z", 2)?,
            event("2024-02-01T00:00:00Z", 5)?,
        ];
        let history = retention_history(&events, window("2024-01-01", "2024-01-31")?);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].retention, 0.0);
        Ok(())
    }

    #[test]
    fn test_no_events() -> Fallible<()> {
        let events: Vec<ReviewEvent> = Vec::new();
        let history = retention_history(&events, window("2024-01-01", "2024-01-31")?);
        assert!(history.is_empty());
        Ok(())
    }
}
