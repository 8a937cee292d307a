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

use serde::Serialize;

use crate::types::card_state::CardState;
use crate::types::card_state::CardStatus;
use crate::types::timestamp::Timestamp;

/// Number of cards per status.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize)]
pub struct Distribution {
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub relearning: usize,
}

impl Distribution {
    pub fn add(&mut self, status: CardStatus) {
        match status {
            CardStatus::New => self.new += 1,
            CardStatus::Learning => self.learning += 1,
            CardStatus::Review => self.review += 1,
            CardStatus::Relearning => self.relearning += 1,
        }
    }

    pub fn get(&self, status: CardStatus) -> usize {
        match status {
            CardStatus::New => self.new,
            CardStatus::Learning => self.learning,
            CardStatus::Review => self.review,
            CardStatus::Relearning => self.relearning,
        }
    }

    pub fn total(&self) -> usize {
        self.new + self.learning + self.review + self.relearning
    }
}

/// Bucket cards by their review history (see [`CardState::bucket`]). This is
/// the distribution the analytics report.
pub fn card_distribution<'a>(
    states: impl IntoIterator<Item = &'a CardState>,
    now: Timestamp,
) -> Distribution {
    let mut dist = Distribution::default();
    for state in states {
        dist.add(state.bucket(now));
    }
    dist
}

/// Bucket cards by the status the scheduler last stored on them.
pub fn status_counts<'a>(states: impl IntoIterator<Item = &'a CardState>) -> Distribution {
    let mut dist = Distribution::default();
    for state in states {
        dist.add(state.status);
    }
    dist
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use proptest::prelude::*;

    use super::*;

    fn now() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
    }

    fn reviewed(repetitions: u32, offset_hours: i64) -> CardState {
        let mut state = CardState::new(now());
        state.repetitions = repetitions;
        state.last_reviewed = Some(now().plus(chrono::Duration::days(-1)));
        state.next_review = now().plus(chrono::Duration::hours(offset_hours));
        state
    }

    #[test]
    fn test_distribution() {
        let cards = vec![
            CardState::new(now()),
            reviewed(1, 24),
            reviewed(2, 1),
            reviewed(3, 48),
            reviewed(5, 0),
            reviewed(0, -3),
        ];
        let dist = card_distribution(&cards, now());
        assert_eq!(
            dist,
            Distribution {
                new: 1,
                learning: 2,
                review: 1,
                relearning: 2,
            }
        );
    }

    #[test]
    fn test_field_status_disagrees_with_distribution() {
        // The stored status says learning, but the card has three repetitions
        // and is not due, so the analytics put it in review.
        let mut card = reviewed(3, 72);
        card.status = CardStatus::Learning;
        let cards = vec![card];
        assert_eq!(card_distribution(&cards, now()).review, 1);
        assert_eq!(status_counts(&cards).learning, 1);
    }

    #[test]
    fn test_never_reviewed_card_with_repetitions_is_new() {
        // Inconsistent on its face: repetitions without a last review. It
        // still lands in exactly one bucket.
        let mut card = CardState::new(now());
        card.repetitions = 4;
        card.next_review = now().plus(chrono::Duration::days(3));
        let dist = card_distribution(&[card], now());
        assert_eq!(dist.new, 1);
        assert_eq!(dist.total(), 1);
    }

    fn arb_status() -> impl Strategy<Value = CardStatus> {
        prop_oneof![
            Just(CardStatus::New),
            Just(CardStatus::Learning),
            Just(CardStatus::Review),
            Just(CardStatus::Relearning),
        ]
    }

    prop_compose! {
        fn arb_state()(
            status in arb_status(),
            repetitions in 0u32..8,
            offset_hours in -200i64..200,
            reviewed in any::<bool>(),
        ) -> CardState {
            let mut state = CardState::new(now());
            state.status = status;
            state.repetitions = repetitions;
            state.next_review = now().plus(chrono::Duration::hours(offset_hours));
            if reviewed {
                state.last_reviewed = Some(now().plus(chrono::Duration::days(-2)));
            }
            state
        }
    }

    proptest! {
        #[test]
        fn prop_buckets_partition_cards(cards in proptest::collection::vec(arb_state(), 0..50)) {
            let dist = card_distribution(&cards, now());
            prop_assert_eq!(dist.total(), cards.len());
            let mut recount = Distribution::default();
            for card in &cards {
                let bucket = card.bucket(now());
                recount.add(bucket);
                // The chosen bucket always satisfies its defining predicate.
                let reviewed = card.last_reviewed.is_some();
                let future = card.next_review > now();
                let holds = match bucket {
                    CardStatus::New => !reviewed,
                    CardStatus::Learning => reviewed && card.repetitions <= 2 && future,
                    CardStatus::Review => card.repetitions > 2 && future,
                    CardStatus::Relearning => reviewed && !future,
                };
                prop_assert!(holds);
            }
            for status in CardStatus::ALL {
                prop_assert_eq!(recount.get(status), dist.get(status));
            }
        }
    }
}
