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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use maud::DOCTYPE;
use maud::Markup;
use maud::html;
use serde::Serialize;

use crate::analytics::DeckSnapshot;
use crate::analytics::compute_deck_analytics;
use crate::analytics::pace::StudyTime;
use crate::analytics::streak::study_days;
use crate::cmd::print_json;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card_state::CardStatus;
use crate::types::date::Date;
use crate::types::deck::Deck;
use crate::types::deck::DeckId;
use crate::types::timestamp::Timestamp;
use crate::types::window::TimeRange;
use crate::types::window::Window;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// HTML output.
    Html,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Html => write!(f, "html"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    deck: Deck,
    range: String,
    #[serde(flatten)]
    snapshot: DeckSnapshot,
    total_study_time: StudyTime,
}

/// Which days the statistics cover.
pub enum Period {
    /// A range ending today. `None` means the configured default.
    Range(Option<TimeRange>),
    /// An explicit span of days, both ends included.
    Between(Date, Date),
}

pub fn print_deck_stats(
    coll: &mut Collection,
    deck_id: DeckId,
    period: Period,
    format: StatsFormat,
    now: Timestamp,
) -> Fallible<()> {
    let stats = deck_stats(coll, deck_id, period, now)?;
    match format {
        StatsFormat::Html => {
            println!("{}", render_html(&stats).into_string());
            Ok(())
        }
        StatsFormat::Json => print_json(&stats),
    }
}

/// Load a deck's cards and review logs and compute its statistics as of
/// `now`.
pub fn deck_stats(
    coll: &mut Collection,
    deck_id: DeckId,
    period: Period,
    now: Timestamp,
) -> Fallible<DeckStats> {
    let deck = coll.db.get_deck(deck_id)?;
    let cards = coll.db.deck_histories(deck_id)?;
    let (window, range) = match period {
        Period::Range(range) => {
            let range = range.unwrap_or(coll.config.default_range);
            let first_study_day = study_days(cards.iter().flat_map(|c| c.events.iter()))
                .first()
                .copied();
            (range.window(now.date(), first_study_day), range.to_string())
        }
        Period::Between(from, to) => (Window::new(from, to)?, format!("{from}..{to}")),
    };
    log::debug!(
        "Computing stats for deck {deck_id} ({} cards) from {} to {}.",
        cards.len(),
        window.start,
        window.end
    );
    let snapshot = compute_deck_analytics(&cards, window, now);
    let total_study_time = StudyTime::estimate(
        snapshot.overview.total_reviews,
        coll.config.seconds_per_review,
    );
    Ok(DeckStats {
        deck,
        range,
        snapshot,
        total_study_time,
    })
}

fn render_html(stats: &DeckStats) -> Markup {
    let snapshot = &stats.snapshot;
    let overview = &snapshot.overview;
    let body = html! {
        h1 { (stats.deck.title) }
        p.window {
            (snapshot.window.start.to_string()) " to " (snapshot.window.end.to_string())
            " (" (stats.range) ")"
        }
        h2 { "Overview" }
        table {
            tr { th { "Cards" } td { (overview.total_cards) } }
            tr { th { "Due" } td { (overview.due_cards) } }
            tr { th { "Reviews" } td { (overview.total_reviews) } }
            tr { th { "Current streak" } td { (overview.current_streak) " days" } }
            tr { th { "Longest streak" } td { (overview.longest_streak) " days" } }
            tr { th { "Reviews per day" } td { (overview.learning_pace) } }
            tr { th { "Study time" } td { (stats.total_study_time.to_string()) } }
            tr {
                th { "Average ease" }
                td { (format!("{:.2}", snapshot.performance.avg_ease_factor)) }
            }
        }
        h2 { "Cards" }
        table {
            tr { th { "Status" } th { "Cards" } }
            @for status in CardStatus::ALL {
                tr {
                    td { (status.as_str()) }
                    td { (snapshot.card_distribution.get(status)) }
                }
            }
            tr { th { "total" } td { (snapshot.card_distribution.total()) } }
        }
        h2 { "Retention" }
        @if snapshot.performance.retention_history.is_empty() {
            p { "No reviews in this period." }
        } @else {
            table {
                tr { th { "Day" } th { "Reviews" } th { "Recalled" } th { "Retention" } }
                @for day in &snapshot.performance.retention_history {
                    tr {
                        td { (day.date.to_string()) }
                        td { (day.total_reviews) }
                        td { (day.successful_reviews) }
                        td { (format!("{:.0}%", day.retention)) }
                    }
                }
            }
        }
        h2 { "Next review" }
        @match &snapshot.next_review {
            Some(next) => {
                p { (next.date.to_string()) ": " (next.cards_count) " cards" }
            }
            None => {
                p { "Nothing scheduled." }
            }
        }
    };
    page_template(&stats.deck.title, body)
}

fn page_template(heading: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (heading) " · flashdeck" }
                style { (STYLE) }
            }
            body {
                (body)
            }
        }
    }
}

const STYLE: &str = "body { font-family: sans-serif; max-width: 40em; margin: 2em auto; }
table { border-collapse: collapse; }
th, td { padding: 0.25em 1em 0.25em 0; text-align: left; }";
