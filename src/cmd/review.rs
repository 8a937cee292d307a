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

use crate::cmd::print_json;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card::CardId;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

pub fn review_card(
    coll: &mut Collection,
    card_id: CardId,
    quality: &str,
    now: Timestamp,
) -> Fallible<()> {
    let quality: Quality = quality.parse()?;
    let card = coll.db.record_review(card_id, quality, now)?;
    print_json(&card)
}
