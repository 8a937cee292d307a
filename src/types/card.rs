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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card_state::CardState;
use crate::types::deck::DeckId;
use crate::types::review::ReviewEvent;
use crate::types::timestamp::Timestamp;

pub type CardId = i64;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub deck_id: DeckId,
    pub front: String,
    pub back: String,
    #[serde(flatten)]
    pub state: CardState,
    pub created_at: Timestamp,
}

/// The text of a card, trimmed and validated.
#[derive(Clone, PartialEq, Debug)]
pub struct CardContent {
    front: String,
    back: String,
}

impl CardContent {
    pub fn new(front: &str, back: &str) -> Fallible<Self> {
        let front = front.trim();
        let back = back.trim();
        if front.is_empty() || back.is_empty() {
            return fail("a card needs both a front and a back.");
        }
        Ok(Self {
            front: front.to_string(),
            back: back.to_string(),
        })
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }
}

/// A card's state together with its full review log, oldest first. This is
/// what the analytics are computed from.
#[derive(Clone, Debug)]
pub struct CardHistory {
    pub state: CardState,
    pub events: Vec<ReviewEvent>,
}
