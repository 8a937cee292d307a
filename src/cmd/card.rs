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

use clap::Subcommand;
use serde::Serialize;

use crate::cmd::print_json;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card::CardId;
use crate::types::deck::DeckId;
use crate::types::review::ReviewEvent;
use crate::types::timestamp::Timestamp;

#[derive(Subcommand)]
pub enum CardCommand {
    /// Add a card to a deck.
    Add {
        deck: DeckId,
        front: String,
        back: String,
    },
    /// List every card in a deck.
    List { deck: DeckId },
    /// List the cards in a deck that are due, soonest first.
    Due { deck: DeckId },
    /// Show the next card to study in a deck.
    Next { deck: DeckId },
    /// Change a card's front or back.
    Edit {
        id: CardId,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
    },
    /// Delete a card.
    Remove { id: CardId },
    /// Show a card with its review log.
    History { id: CardId },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardWithHistory {
    #[serde(flatten)]
    card: Card,
    reviews: Vec<ReviewEvent>,
}

pub fn run_card_command(coll: &Collection, command: CardCommand, now: Timestamp) -> Fallible<()> {
    let db = &coll.db;
    match command {
        CardCommand::Add { deck, front, back } => {
            let content = CardContent::new(&front, &back)?;
            print_json(&db.add_card(deck, &content, now)?)
        }
        CardCommand::List { deck } => {
            let _ = db.get_deck(deck)?;
            print_json(&db.cards(deck)?)
        }
        CardCommand::Due { deck } => {
            let _ = db.get_deck(deck)?;
            print_json(&db.due_cards(deck, now)?)
        }
        CardCommand::Next { deck } => {
            let _ = db.get_deck(deck)?;
            match db.next_card(deck, now)? {
                Some(card) => print_json(&card),
                None => {
                    println!("No cards due.");
                    Ok(())
                }
            }
        }
        CardCommand::Edit { id, front, back } => {
            print_json(&db.update_card(id, front.as_deref(), back.as_deref())?)
        }
        CardCommand::Remove { id } => {
            db.remove_card(id)?;
            println!("ok");
            Ok(())
        }
        CardCommand::History { id } => {
            let history = CardWithHistory {
                card: db.get_card(id)?,
                reviews: db.review_log(id)?,
            };
            print_json(&history)
        }
    }
}
