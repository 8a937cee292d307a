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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::category::CategoryId;
use crate::types::deck::DeckId;

/// What to recount.
pub enum RecountTarget {
    All,
    Deck(DeckId),
    Category(CategoryId),
}

pub fn recount_collection(coll: &mut Collection, target: RecountTarget) -> Fallible<()> {
    match target {
        RecountTarget::All => {
            coll.db.recount_all()?;
            log::debug!("Recounted all decks and categories.");
            println!("ok");
        }
        RecountTarget::Deck(id) => {
            let count = coll.db.recount_deck(id)?;
            log::debug!("Deck {id} has {count} cards.");
            println!("{count}");
        }
        RecountTarget::Category(id) => {
            let count = coll.db.recount_category(id)?;
            log::debug!("Category {id} has {count} decks.");
            println!("{count}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_collection;
    use crate::types::card::CardContent;
    use crate::types::category::DEFAULT_ICON;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_recount_collection() -> Fallible<()> {
        let (_dir, mut coll) = create_tmp_collection()?;
        let now = Timestamp::parse("2024-01-01T00:00:00Z")?;
        let category = coll.db.add_category("Languages", DEFAULT_ICON, now)?;
        let deck = coll.db.add_deck(category.id, "German", "", false, now)?;
        coll.db
            .add_card(deck.id, &CardContent::new("Hund", "dog")?, now)?;

        recount_collection(&mut coll, RecountTarget::All)?;
        assert_eq!(coll.db.get_deck(deck.id)?.total_cards, 1);
        assert_eq!(coll.db.get_category(category.id)?.count, 1);
        Ok(())
    }

    #[test]
    fn test_recount_one_deck_or_category() -> Fallible<()> {
        let (_dir, mut coll) = create_tmp_collection()?;
        let now = Timestamp::parse("2024-01-01T00:00:00Z")?;
        let category = coll.db.add_category("Languages", DEFAULT_ICON, now)?;
        let german = coll.db.add_deck(category.id, "German", "", false, now)?;
        let dutch = coll.db.add_deck(category.id, "Dutch", "", false, now)?;
        coll.db
            .add_card(german.id, &CardContent::new("Hund", "dog")?, now)?;
        coll.db
            .add_card(dutch.id, &CardContent::new("hond", "dog")?, now)?;

        recount_collection(&mut coll, RecountTarget::Deck(german.id))?;
        assert_eq!(coll.db.get_deck(german.id)?.total_cards, 1);
        assert_eq!(coll.db.get_deck(dutch.id)?.total_cards, 0);
        assert_eq!(coll.db.get_category(category.id)?.count, 0);

        recount_collection(&mut coll, RecountTarget::Category(category.id))?;
        assert_eq!(coll.db.get_category(category.id)?.count, 2);

        assert!(recount_collection(&mut coll, RecountTarget::Deck(999)).is_err());
        assert!(recount_collection(&mut coll, RecountTarget::Category(999)).is_err());
        Ok(())
    }
}
