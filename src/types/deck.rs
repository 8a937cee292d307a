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

use crate::types::category::CategoryId;
use crate::types::timestamp::Timestamp;

pub type DeckId = i64;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: DeckId,
    pub category_id: CategoryId,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    /// Only changes when the deck is recounted.
    pub total_cards: u32,
    pub last_studied: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Fields that can be changed on an existing deck. `None` leaves the field
/// as it is.
#[derive(Default)]
pub struct DeckChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}
