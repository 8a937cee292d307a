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

use crate::cmd::print_json;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::category::CategoryId;
use crate::types::deck::DeckChanges;
use crate::types::deck::DeckId;
use crate::types::timestamp::Timestamp;

#[derive(Subcommand)]
pub enum DeckCommand {
    /// Create a deck in a category.
    Add {
        category: CategoryId,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Make the deck visible to everyone.
        #[arg(long)]
        public: bool,
    },
    /// List decks, newest first.
    List {
        #[arg(long)]
        category: Option<CategoryId>,
    },
    /// List public decks, largest first.
    Public,
    /// Change a deck's title, description, or visibility.
    Edit {
        id: DeckId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        public: Option<bool>,
    },
    /// Delete a deck and all of its cards.
    Remove { id: DeckId },
}

pub fn run_deck_command(coll: &Collection, command: DeckCommand, now: Timestamp) -> Fallible<()> {
    let db = &coll.db;
    match command {
        DeckCommand::Add {
            category,
            title,
            description,
            public,
        } => print_json(&db.add_deck(category, &title, &description, public, now)?),
        DeckCommand::List { category } => print_json(&db.decks(category)?),
        DeckCommand::Public => print_json(&db.public_decks()?),
        DeckCommand::Edit {
            id,
            title,
            description,
            public,
        } => {
            let changes = DeckChanges {
                title,
                description,
                is_public: public,
            };
            print_json(&db.update_deck(id, changes)?)
        }
        DeckCommand::Remove { id } => {
            db.remove_deck(id)?;
            println!("ok");
            Ok(())
        }
    }
}
