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
use crate::types::category::DEFAULT_ICON;
use crate::types::timestamp::Timestamp;

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Create a category.
    Add {
        title: String,
        #[arg(long, default_value = DEFAULT_ICON)]
        icon: String,
    },
    /// List categories, newest first.
    List,
    /// Change a category's title or icon.
    Edit {
        id: CategoryId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a category, with all of its decks and cards.
    Remove { id: CategoryId },
}

pub fn run_category_command(
    coll: &Collection,
    command: CategoryCommand,
    now: Timestamp,
) -> Fallible<()> {
    let db = &coll.db;
    match command {
        CategoryCommand::Add { title, icon } => print_json(&db.add_category(&title, &icon, now)?),
        CategoryCommand::List => print_json(&db.categories()?),
        CategoryCommand::Edit { id, title, icon } => {
            print_json(&db.update_category(id, title.as_deref(), icon.as_deref())?)
        }
        CategoryCommand::Remove { id } => {
            db.remove_category(id)?;
            println!("ok");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_collection;

    #[test]
    fn test_category_commands() -> Fallible<()> {
        let (_dir, coll) = create_tmp_collection()?;
        let now = Timestamp::parse("2024-01-01T00:00:00Z")?;
        let add = CategoryCommand::Add {
            title: "Geography".to_string(),
            icon: DEFAULT_ICON.to_string(),
        };
        run_category_command(&coll, add, now)?;
        let id = coll.db.categories()?[0].id;

        let edit = CategoryCommand::Edit {
            id,
            title: None,
            icon: Some("🗺️".to_string()),
        };
        run_category_command(&coll, edit, now)?;
        assert_eq!(coll.db.get_category(id)?.icon, "🗺️");

        run_category_command(&coll, CategoryCommand::List, now)?;
        run_category_command(&coll, CategoryCommand::Remove { id }, now)?;
        assert!(coll.db.categories()?.is_empty());
        assert!(run_category_command(&coll, CategoryCommand::Remove { id }, now).is_err());
        Ok(())
    }
}
