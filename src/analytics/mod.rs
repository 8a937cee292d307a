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

//! Deck-level statistics derived from card states and their review logs.
//! Nothing here reads the clock: "now" is always passed in.

pub mod distribution;
pub mod forecast;
pub mod pace;
pub mod retention;
pub mod streak;

use serde::Serialize;

use crate::analytics::distribution::Distribution;
use crate::analytics::distribution::card_distribution;
use crate::analytics::distribution::status_counts;
use crate::analytics::forecast::NextDue;
use crate::analytics::forecast::next_due;
use crate::analytics::pace::learning_pace;
use crate::analytics::pace::reviews_in_window;
use crate::analytics::retention::RetentionDay;
use crate::analytics::retention::retention_history;
use crate::analytics::streak::streaks;
use crate::analytics::streak::study_days;
use crate::types::card::CardHistory;
use crate::types::card_state::CardState;
use crate::types::card_state::DEFAULT_EASE_FACTOR;
use crate::types::timestamp::Timestamp;
use crate::types::window::Window;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSnapshot {
    pub window: Window,
    pub overview: Overview,
    /// Cards bucketed by review history.
    pub card_distribution: Distribution,
    /// Cards bucketed by the status stored on them. Can disagree with
    /// `card_distribution` when the stored status is stale.
    pub status_counts: Distribution,
    pub performance: Performance,
    pub next_review: Option<NextDue>,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_cards: usize,
    pub due_cards: usize,
    pub total_reviews: usize,
    pub current_streak: usize,
    pub longest_streak: usize,
    /// Reviews per day over the window.
    pub learning_pace: f64,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub avg_ease_factor: f64,
    pub retention_history: Vec<RetentionDay>,
}

/// Compute the statistics for a deck from all of its cards.
///
/// An empty deck is not an error: every count is zero, the average ease
/// factor is the default, and there is no upcoming review.
pub fn compute_deck_analytics(cards: &[CardHistory], window: Window, now: Timestamp) -> DeckSnapshot {
    let states = || cards.iter().map(|c| &c.state);
    let events = || cards.iter().flat_map(|c| c.events.iter());

    let total_reviews = reviews_in_window(events(), window);
    let days = study_days(events());
    let streaks = streaks(&days, now);

    DeckSnapshot {
        window,
        overview: Overview {
            total_cards: cards.len(),
            due_cards: states().filter(|s| s.is_due(now)).count(),
            total_reviews,
            current_streak: streaks.current,
            longest_streak: streaks.longest,
            learning_pace: learning_pace(total_reviews, window),
        },
        card_distribution: card_distribution(states(), now),
        status_counts: status_counts(states()),
        performance: Performance {
            avg_ease_factor: average_ease_factor(states()),
            retention_history: retention_history(events(), window),
        },
        next_review: next_due(states(), now),
    }
}

/// Mean ease factor across the cards. States with an out-of-range ease factor
/// are clamped into range first.
pub fn average_ease_factor<'a>(states: impl IntoIterator<Item = &'a CardState>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for state in states {
        let ease = state.clamped_ease_factor();
        if ease != state.ease_factor {
            log::warn!(
                "Card has inconsistent ease factor {}, using {ease}",
                state.ease_factor
            );
        }
        sum += ease;
        count += 1;
    }
    if count == 0 {
        DEFAULT_EASE_FACTOR
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::scheduler::apply_review;
    use crate::types::date::Date;
    use crate::types::quality::Quality;
    use crate::types::review::ReviewEvent;

    fn window() -> Fallible<Window> {
        Window::new(Date::parse("2024-01-01")?, Date::parse("2024-01-30")?)
    }

    /// Build a card by feeding the scheduler a list of (timestamp, quality)
    /// reviews, the way the database would have recorded them.
    fn card(reviews: &[(&str, i64)]) -> Fallible<CardHistory> {
        let created = Timestamp::parse("2023-12-31T00:00:00Z")?;
        let mut state = CardState::new(created);
        let mut events = Vec::new();
        for (ts, quality) in reviews {
            let ts = Timestamp::parse(ts)?;
            let quality = Quality::new(*quality)?;
            state = apply_review(&state, quality, ts)?;
            events.push(ReviewEvent::new(ts, quality));
        }
        Ok(CardHistory { state, events })
    }

    #[test]
    fn test_empty_deck() -> Fallible<()> {
        let now = Timestamp::parse("2024-01-30T12:00:00Z")?;
        let snapshot = compute_deck_analytics(&[], window()?, now);
        assert_eq!(snapshot.overview.total_cards, 0);
        assert_eq!(snapshot.overview.due_cards, 0);
        assert_eq!(snapshot.overview.total_reviews, 0);
        assert_eq!(snapshot.overview.current_streak, 0);
        assert_eq!(snapshot.overview.longest_streak, 0);
        assert_eq!(snapshot.overview.learning_pace, 0.0);
        assert_eq!(snapshot.card_distribution, Distribution::default());
        assert_eq!(snapshot.status_counts, Distribution::default());
        assert_eq!(snapshot.performance.avg_ease_factor, 2.5);
        assert!(snapshot.performance.retention_history.is_empty());
        assert_eq!(snapshot.next_review, None);
        Ok(())
    }

    #[test]
    fn test_deck() -> Fallible<()> {
        let now = Timestamp::parse("2024-01-05T18:00:00Z")?;
        let cards = vec![
            card(&[])?,
            card(&[("2024-01-01T10:00:00Z", 5), ("2024-01-02T10:00:00Z", 5)])?,
            card(&[("2024-01-03T10:00:00Z", 4), ("2024-01-05T10:00:00Z", 1)])?,
            card(&[("2024-01-05T11:00:00Z", 3)])?,
        ];
        let snapshot = compute_deck_analytics(&cards, window()?, now);

        assert_eq!(snapshot.overview.total_cards, 4);
        assert_eq!(snapshot.overview.total_reviews, 5);
        assert_eq!(snapshot.overview.longest_streak, 3);
        assert_eq!(snapshot.overview.current_streak, 1);
        // 5 reviews over 30 days.
        assert_eq!(snapshot.overview.learning_pace, 0.2);

        // The new card and the lapsed card are due.
        assert_eq!(snapshot.overview.due_cards, 2);
        assert_eq!(
            snapshot.card_distribution,
            Distribution {
                new: 1,
                learning: 2,
                review: 0,
                relearning: 1,
            }
        );
        assert_eq!(snapshot.card_distribution.total(), cards.len());

        let days: Vec<String> = snapshot
            .performance
            .retention_history
            .iter()
            .map(|d| format!("{}={}", d.date, d.retention))
            .collect();
        assert_eq!(
            days,
            vec!["2024-01-01=100", "2024-01-02=100", "2024-01-03=100", "2024-01-05=50"]
        );

        // The card reviewed twice with 5 is due six days after Jan 2; the
        // card reviewed once on Jan 5 is due a day later, which is sooner.
        let next = snapshot.next_review.unwrap();
        assert_eq!(next.date, Timestamp::parse("2024-01-06T11:00:00Z")?);
        assert_eq!(next.cards_count, 1);
        Ok(())
    }

    #[test]
    fn test_average_ease_factor() -> Fallible<()> {
        let cards = vec![
            card(&[("2024-01-01T10:00:00Z", 5)])?,
            card(&[("2024-01-01T10:00:00Z", 3)])?,
        ];
        let avg = average_ease_factor(cards.iter().map(|c| &c.state));
        assert!((avg - (2.6 + 2.36) / 2.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_inconsistent_ease_factor_is_clamped() -> Fallible<()> {
        let mut broken = card(&[])?;
        broken.state.ease_factor = 0.5;
        let avg = average_ease_factor([&broken.state]);
        assert_eq!(avg, 1.3);
        Ok(())
    }

    #[test]
    fn test_read_path_is_idempotent() -> Fallible<()> {
        let now = Timestamp::parse("2024-01-10T00:00:00Z")?;
        let cards = vec![
            card(&[("2024-01-01T10:00:00Z", 5), ("2024-01-02T10:00:00Z", 2)])?,
            card(&[("2024-01-04T10:00:00Z", 4)])?,
        ];
        let before = cards.clone();
        let first = compute_deck_analytics(&cards, window()?, now);
        let second = compute_deck_analytics(&cards, window()?, now);
        assert_eq!(first, second);
        for (a, b) in before.iter().zip(cards.iter()) {
            assert_eq!(a.state, b.state);
            assert_eq!(a.events, b.events);
        }
        Ok(())
    }
}
