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

use chrono::Duration;
use serde::Serialize;

use crate::types::card_state::CardState;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextDue {
    /// The earliest upcoming due instant.
    pub date: Timestamp,
    /// Cards due in the 24 hours starting at `date`.
    pub cards_count: usize,
}

/// Find the next time cards come due after `now`, and how many come due in
/// the day that follows. Cards already due are not counted.
pub fn next_due<'a>(
    states: impl IntoIterator<Item = &'a CardState> + Clone,
    now: Timestamp,
) -> Option<NextDue> {
    let earliest = states
        .clone()
        .into_iter()
        .map(|s| s.next_review)
        .filter(|ts| *ts > now)
        .min()?;
    let horizon = earliest.plus(Duration::days(1));
    let cards_count = states
        .into_iter()
        .filter(|s| s.next_review >= earliest && s.next_review < horizon)
        .count();
    Some(NextDue {
        date: earliest,
        cards_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    fn due_at(ts: &str) -> Fallible<CardState> {
        let mut state = CardState::new(Timestamp::parse("2024-01-01T00:00:00Z")?);
        state.next_review = Timestamp::parse(ts)?;
        Ok(state)
    }

    #[test]
    fn test_next_due() -> Fallible<()> {
        let now = Timestamp::parse("2024-01-10T12:00:00Z")?;
        let cards = vec![
            due_at("2024-01-09T12:00:00Z")?,
            due_at("2024-01-10T12:00:00Z")?,
            due_at("2024-01-12T18:00:00Z")?,
            due_at("2024-01-11T09:00:00Z")?,
            due_at("2024-01-12T08:59:59Z")?,
            due_at("2024-01-12T09:00:00Z")?,
        ];
        let next = next_due(&cards, now).unwrap();
        assert_eq!(next.date, Timestamp::parse("2024-01-11T09:00:00Z")?);
        assert_eq!(next.cards_count, 2);
        Ok(())
    }

    #[test]
    fn test_nothing_upcoming() -> Fallible<()> {
        let now = Timestamp::parse("2024-01-10T12:00:00Z")?;
        let cards = vec![due_at("2024-01-10T12:00:00Z")?];
        assert_eq!(next_due(&cards, now), None);
        let empty: Vec<CardState> = Vec::new();
        assert_eq!(next_due(&empty, now), None);
        Ok(())
    }
}
