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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::ScheduleError;
use crate::error::fail;
use crate::types::timestamp::Timestamp;

/// The ease factor every new card starts with.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// The ease factor never drops below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    New,
    Learning,
    Review,
    Relearning,
}

impl CardStatus {
    pub const ALL: [CardStatus; 4] = [
        CardStatus::New,
        CardStatus::Learning,
        CardStatus::Review,
        CardStatus::Relearning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::New => "new",
            CardStatus::Learning => "learning",
            CardStatus::Review => "review",
            CardStatus::Relearning => "relearning",
        }
    }
}

impl TryFrom<String> for CardStatus {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "new" => Ok(CardStatus::New),
            "learning" => Ok(CardStatus::Learning),
            "review" => Ok(CardStatus::Review),
            "relearning" => Ok(CardStatus::Relearning),
            _ => fail(format!("Invalid card status: {}", value)),
        }
    }
}

impl ToSql for CardStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CardStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        CardStatus::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// The scheduling state of a single card.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Consecutive successful recalls since the last lapse.
    pub repetitions: u32,
    /// Days from the last review until the next one.
    pub interval_days: u32,
    pub ease_factor: f64,
    /// The status the scheduler assigned on the last transition. This can lag
    /// behind what `repetitions` and `next_review` say; see [`CardState::bucket`].
    pub status: CardStatus,
    pub next_review: Timestamp,
    /// `None` if the card has never been reviewed.
    pub last_reviewed: Option<Timestamp>,
}

impl CardState {
    /// The state of a freshly created card. It is due immediately.
    pub fn new(now: Timestamp) -> Self {
        Self {
            repetitions: 0,
            interval_days: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            status: CardStatus::New,
            next_review: now,
            last_reviewed: None,
        }
    }

    /// A card is due when its next review is at or before `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review <= now
    }

    /// Classify the card from its review history rather than its stored
    /// status. Every card lands in exactly one bucket:
    ///
    /// - never reviewed: `New`;
    /// - reviewed and due: `Relearning`;
    /// - reviewed, not due, at most two repetitions: `Learning`;
    /// - otherwise: `Review`.
    pub fn bucket(&self, now: Timestamp) -> CardStatus {
        match self.last_reviewed {
            None => CardStatus::New,
            Some(_) if self.is_due(now) => CardStatus::Relearning,
            Some(_) if self.repetitions <= 2 => CardStatus::Learning,
            Some(_) => CardStatus::Review,
        }
    }

    /// Refuse states the scheduler cannot safely build on.
    pub fn check(&self) -> Result<(), ScheduleError> {
        if !self.ease_factor.is_finite() {
            return Err(ScheduleError::InconsistentState(format!(
                "ease factor is not a number: {}",
                self.ease_factor
            )));
        }
        if self.ease_factor < MIN_EASE_FACTOR {
            return Err(ScheduleError::InconsistentState(format!(
                "ease factor {} is below the minimum of {MIN_EASE_FACTOR}",
                self.ease_factor
            )));
        }
        Ok(())
    }

    /// The ease factor pulled back into the valid range. A value that is not
    /// a number is replaced by the default.
    pub fn clamped_ease_factor(&self) -> f64 {
        if self.ease_factor.is_finite() {
            self.ease_factor.max(MIN_EASE_FACTOR)
        } else {
            DEFAULT_EASE_FACTOR
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn at(day: u32, hour: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap())
    }

    #[test]
    fn test_new_card() {
        let now = at(1, 9);
        let state = CardState::new(now);
        assert_eq!(state.status, CardStatus::New);
        assert_eq!(state.ease_factor, DEFAULT_EASE_FACTOR);
        assert!(state.is_due(now));
        assert_eq!(state.bucket(now), CardStatus::New);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in CardStatus::ALL {
            let parsed = CardStatus::try_from(status.as_str().to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(CardStatus::try_from("mature".to_string()).is_err());
    }

    #[test]
    fn test_bucket() {
        let now = at(10, 12);
        let mut state = CardState::new(at(1, 0));
        state.last_reviewed = Some(at(9, 12));
        state.next_review = at(11, 12);
        state.repetitions = 2;
        assert_eq!(state.bucket(now), CardStatus::Learning);
        state.repetitions = 3;
        assert_eq!(state.bucket(now), CardStatus::Review);
        state.next_review = now;
        assert_eq!(state.bucket(now), CardStatus::Relearning);
    }

    #[test]
    fn test_stored_status_can_lag_bucket() {
        // Three repetitions but the stored status still says learning.
        let now = at(10, 12);
        let mut state = CardState::new(at(1, 0));
        state.status = CardStatus::Learning;
        state.repetitions = 3;
        state.last_reviewed = Some(at(9, 12));
        state.next_review = at(20, 12);
        assert_eq!(state.bucket(now), CardStatus::Review);
        assert_ne!(state.bucket(now), state.status);
    }

    #[test]
    fn test_check() {
        let mut state = CardState::new(at(1, 0));
        assert!(state.check().is_ok());
        state.ease_factor = 1.2;
        assert!(matches!(
            state.check(),
            Err(ScheduleError::InconsistentState(_))
        ));
        assert_eq!(state.clamped_ease_factor(), MIN_EASE_FACTOR);
        state.ease_factor = f64::NAN;
        assert!(state.check().is_err());
        assert_eq!(state.clamped_ease_factor(), DEFAULT_EASE_FACTOR);
    }
}
