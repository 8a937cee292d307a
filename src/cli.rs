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

use clap::Parser;
use clap::Subcommand;

use crate::cmd::card::CardCommand;
use crate::cmd::card::run_card_command;
use crate::cmd::category::CategoryCommand;
use crate::cmd::category::run_category_command;
use crate::cmd::deck::DeckCommand;
use crate::cmd::deck::run_deck_command;
use crate::cmd::recount::RecountTarget;
use crate::cmd::recount::recount_collection;
use crate::cmd::review::review_card;
use crate::cmd::stats::Period;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_deck_stats;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card::CardId;
use crate::types::category::CategoryId;
use crate::types::date::Date;
use crate::types::deck::DeckId;
use crate::types::timestamp::Timestamp;
use crate::types::window::TimeRange;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(long, short = 'C', global = true)]
    directory: Option<String>,
    /// Act as if the current time were this RFC 3339 instant.
    #[arg(long, global = true)]
    now: Option<Timestamp>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage categories.
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Manage decks.
    Deck {
        #[command(subcommand)]
        command: DeckCommand,
    },
    /// Manage cards.
    Card {
        #[command(subcommand)]
        command: CardCommand,
    },
    /// Record a review of a card.
    Review {
        card: CardId,
        /// How well the card was recalled, from 0 (blackout) to 5 (perfect).
        #[arg(allow_hyphen_values = true)]
        quality: String,
    },
    /// Print statistics for a deck.
    Stats {
        deck: DeckId,
        /// `week`, `month`, `year`, `all`, or a number of days. Defaults to
        /// the collection's configured range.
        #[arg(long, conflicts_with_all = ["from", "to"])]
        range: Option<TimeRange>,
        /// First day of an explicit window, as `YYYY-MM-DD`.
        #[arg(long, requires = "to")]
        from: Option<Date>,
        /// Last day of an explicit window, inclusive.
        #[arg(long, requires = "from")]
        to: Option<Date>,
        #[arg(long, default_value_t = StatsFormat::Json)]
        format: StatsFormat,
    },
    /// Recompute the card and deck counters.
    Recount {
        /// Only recount this deck's cards.
        #[arg(long, conflicts_with = "category")]
        deck: Option<DeckId>,
        /// Only recount this category's decks.
        #[arg(long)]
        category: Option<CategoryId>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let mut coll = Collection::new(cli.directory)?;
    log::debug!("Using collection in {}", coll.directory.display());
    let now = cli.now.unwrap_or_else(Timestamp::now);
    match cli.command {
        Command::Category { command } => run_category_command(&coll, command, now),
        Command::Deck { command } => run_deck_command(&coll, command, now),
        Command::Card { command } => run_card_command(&coll, command, now),
        Command::Review { card, quality } => review_card(&mut coll, card, &quality, now),
        Command::Stats {
            deck,
            range,
            from,
            to,
            format,
        } => {
            let period = match (from, to) {
                (Some(from), Some(to)) => Period::Between(from, to),
                _ => Period::Range(range),
            };
            print_deck_stats(&mut coll, deck, period, format, now)
        }
        Command::Recount { deck, category } => {
            let target = match (deck, category) {
                (Some(id), _) => RecountTarget::Deck(id),
                (None, Some(id)) => RecountTarget::Category(id),
                (None, None) => RecountTarget::All,
            };
            recount_collection(&mut coll, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stats() {
        let cli = Cli::try_parse_from(["flashdeck", "stats", "3", "--range", "week"]);
        match cli.map(|cli| cli.command) {
            Ok(Command::Stats { deck, range, .. }) => {
                assert_eq!(deck, 3);
                assert_eq!(range, Some(TimeRange::Week));
            }
            _ => panic!("expected stats command"),
        }
        let cli = Cli::try_parse_from(["flashdeck", "stats", "3", "--range", "0"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_parse_explicit_window() {
        let cli = Cli::try_parse_from([
            "flashdeck", "stats", "3", "--from", "2024-01-01", "--to", "2024-01-31",
        ]);
        assert!(cli.is_ok());
        let cli = Cli::try_parse_from(["flashdeck", "stats", "3", "--from", "2024-01-01"]);
        assert!(cli.is_err());
        let cli = Cli::try_parse_from([
            "flashdeck", "stats", "3", "--range", "week", "--from", "2024-01-01", "--to",
            "2024-01-31",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_parse_now() {
        let cli = Cli::try_parse_from(["flashdeck", "recount", "--now", "2024-01-05T12:00:00Z"]);
        match cli {
            Ok(cli) => {
                let now = cli.now.map(|ts| ts.to_string());
                assert_eq!(now.as_deref(), Some("2024-01-05T12:00:00+00:00"));
            }
            Err(_) => panic!("expected recount command"),
        }
        let cli = Cli::try_parse_from(["flashdeck", "recount", "--now", "tomorrow"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_parse_recount_target() {
        let cli = Cli::try_parse_from(["flashdeck", "recount", "--deck", "4"]);
        match cli.map(|cli| cli.command) {
            Ok(Command::Recount { deck, category }) => {
                assert_eq!(deck, Some(4));
                assert_eq!(category, None);
            }
            _ => panic!("expected recount command"),
        }
        let cli = Cli::try_parse_from(["flashdeck", "recount", "--deck", "4", "--category", "1"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_parse_directory() {
        let cli = Cli::try_parse_from(["flashdeck", "recount", "-C", "/tmp/deck"]);
        match cli {
            Ok(cli) => assert_eq!(cli.directory.as_deref(), Some("/tmp/deck")),
            Err(_) => panic!("expected recount command"),
        }
    }
}
