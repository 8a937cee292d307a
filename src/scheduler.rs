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

//! The SM-2 scheduler. A card's state plus one quality score gives the card's
//! next state; nothing else is read or written.

use crate::error::ScheduleError;
use crate::types::card_state::CardState;
use crate::types::card_state::CardStatus;
use crate::types::card_state::MIN_EASE_FACTOR;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// Interval after the first successful recall.
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second consecutive successful recall.
const SECOND_INTERVAL: u32 = 6;

/// Compute the state that follows reviewing a card with the given quality.
/// Out-of-range scores never get this far: they are rejected when the
/// [`Quality`] is built.
///
/// The new interval is computed from the ease factor the card had before this
/// review; the updated ease factor only takes effect on the next one.
pub fn apply_review(
    state: &CardState,
    quality: Quality,
    now: Timestamp,
) -> Result<CardState, ScheduleError> {
    state.check()?;

    let (repetitions, interval_days, status) = if quality.is_success() {
        let (interval, status) = match state.repetitions {
            0 => (FIRST_INTERVAL, CardStatus::Learning),
            1 => (SECOND_INTERVAL, CardStatus::Learning),
            _ => (
                grow_interval(state.interval_days, state.ease_factor),
                CardStatus::Review,
            ),
        };
        (state.repetitions.saturating_add(1), interval, status)
    } else {
        (0, 0, CardStatus::Relearning)
    };

    let ease_factor = new_ease_factor(state.ease_factor, quality);

    Ok(CardState {
        repetitions,
        interval_days,
        ease_factor,
        status,
        next_review: now.plus_days(interval_days),
        last_reviewed: Some(now),
    })
}

/// `EF' = max(1.3, EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))`
pub fn new_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let miss = f64::from(Quality::MAX - quality.value());
    let delta = 0.1 - miss * (0.08 + miss * 0.02);
    (ease_factor + delta).max(MIN_EASE_FACTOR)
}

fn grow_interval(interval_days: u32, ease_factor: f64) -> u32 {
    let next = (f64::from(interval_days) * ease_factor).round();
    if next >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        next as u32
    }
}
