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

use std::collections::HashMap;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card::CardHistory;
use crate::types::card::CardId;
use crate::types::card_state::CardState;
use crate::types::category::Category;
use crate::types::category::CategoryId;
use crate::types::deck::Deck;
use crate::types::deck::DeckChanges;
use crate::types::deck::DeckId;
use crate::types::quality::Quality;
use crate::types::review::ReviewEvent;
use crate::types::timestamp::Timestamp;

pub struct Database {
    conn: Connection,
}

const CATEGORY_COLUMNS: &str = "category_id, title, icon, count, created_at";

const DECK_COLUMNS: &str = "deck_id, category_id, title, description, is_public, total_cards, last_studied, created_at";

const CARD_COLUMNS: &str = "card_id, deck_id, front, back, repetitions, interval_days, ease_factor, status, next_review, last_reviewed, created_at";

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating database schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    // Categories.

    /// Create a category. Titles are trimmed and must be unique.
    pub fn add_category(&self, title: &str, icon: &str, now: Timestamp) -> Fallible<Category> {
        let title = title.trim();
        if title.is_empty() {
            return fail("category title is empty.");
        }
        if self.find_category_by_title(title)?.is_some() {
            return fail("category already exists.");
        }
        let sql = "insert into categories (title, icon, count, created_at) values (?, ?, 0, ?) returning category_id;";
        let id: CategoryId = self
            .conn
            .query_row(sql, (title, icon, now), |row| row.get(0))?;
        log::debug!("Added category {id}: {title}");
        self.get_category(id)
    }

    /// All categories, newest first.
    pub fn categories(&self) -> Fallible<Vec<Category>> {
        let sql = format!(
            "select {CATEGORY_COLUMNS} from categories order by created_at desc, category_id desc;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_category(&self, id: CategoryId) -> Fallible<Category> {
        let sql = format!("select {CATEGORY_COLUMNS} from categories where category_id = ?;");
        match self
            .conn
            .query_row(&sql, [id], category_from_row)
            .optional()?
        {
            Some(category) => Ok(category),
            None => fail("category not found."),
        }
    }

    /// Change a category's title and/or icon.
    pub fn update_category(
        &self,
        id: CategoryId,
        title: Option<&str>,
        icon: Option<&str>,
    ) -> Fallible<Category> {
        let category = self.get_category(id)?;
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() && t != category.title => {
                if self.find_category_by_title(t)?.is_some() {
                    return fail("category with this title already exists.");
                }
                t.to_string()
            }
            _ => category.title,
        };
        let icon = match icon {
            Some(i) if !i.is_empty() => i.to_string(),
            _ => category.icon,
        };
        self.conn.execute(
            "update categories set title = ?, icon = ? where category_id = ?;",
            (&title, &icon, id),
        )?;
        self.get_category(id)
    }

    /// Delete a category along with its decks and their cards.
    pub fn remove_category(&self, id: CategoryId) -> Fallible<()> {
        let n = self
            .conn
            .execute("delete from categories where category_id = ?;", [id])?;
        if n == 0 {
            return fail("category not found.");
        }
        Ok(())
    }

    fn find_category_by_title(&self, title: &str) -> Fallible<Option<CategoryId>> {
        let sql = "select category_id from categories where title = ?;";
        Ok(self
            .conn
            .query_row(sql, [title], |row| row.get(0))
            .optional()?)
    }

    // Decks.

    /// Create a deck in an existing category. Titles are unique within a
    /// category.
    pub fn add_deck(
        &self,
        category_id: CategoryId,
        title: &str,
        description: &str,
        is_public: bool,
        now: Timestamp,
    ) -> Fallible<Deck> {
        let _ = self.get_category(category_id)?;
        let title = title.trim();
        if title.is_empty() {
            return fail("deck title is empty.");
        }
        if self.find_deck_by_title(category_id, title)?.is_some() {
            return fail("deck already exists in this category.");
        }
        let sql = "insert into decks (category_id, title, description, is_public, total_cards, created_at) values (?, ?, ?, ?, 0, ?) returning deck_id;";
        let id: DeckId = self.conn.query_row(
            sql,
            (category_id, title, description.trim(), is_public, now),
            |row| row.get(0),
        )?;
        log::debug!("Added deck {id}: {title}");
        self.get_deck(id)
    }

    /// All decks, newest first, optionally restricted to one category.
    pub fn decks(&self, category_id: Option<CategoryId>) -> Fallible<Vec<Deck>> {
        let rows = match category_id {
            Some(category_id) => {
                let sql = format!(
                    "select {DECK_COLUMNS} from decks where category_id = ? order by created_at desc, deck_id desc;"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map([category_id], deck_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!(
                    "select {DECK_COLUMNS} from decks order by created_at desc, deck_id desc;"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map([], deck_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    /// Public decks, largest first.
    pub fn public_decks(&self) -> Fallible<Vec<Deck>> {
        let sql = format!(
            "select {DECK_COLUMNS} from decks where is_public = 1 order by total_cards desc, deck_id asc;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], deck_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_deck(&self, id: DeckId) -> Fallible<Deck> {
        let sql = format!("select {DECK_COLUMNS} from decks where deck_id = ?;");
        match self.conn.query_row(&sql, [id], deck_from_row).optional()? {
            Some(deck) => Ok(deck),
            None => fail("deck not found."),
        }
    }

    pub fn update_deck(&self, id: DeckId, changes: DeckChanges) -> Fallible<Deck> {
        let deck = self.get_deck(id)?;
        let title = match changes.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() && t != deck.title => {
                if self.find_deck_by_title(deck.category_id, t)?.is_some() {
                    return fail("deck with this title already exists in this category.");
                }
                t.to_string()
            }
            _ => deck.title,
        };
        let description = match changes.description {
            Some(d) => d.trim().to_string(),
            None => deck.description,
        };
        let is_public = changes.is_public.unwrap_or(deck.is_public);
        self.conn.execute(
            "update decks set title = ?, description = ?, is_public = ? where deck_id = ?;",
            (&title, &description, is_public, id),
        )?;
        self.get_deck(id)
    }

    /// Delete a deck along with its cards and their review logs.
    pub fn remove_deck(&self, id: DeckId) -> Fallible<()> {
        let n = self
            .conn
            .execute("delete from decks where deck_id = ?;", [id])?;
        if n == 0 {
            return fail("deck not found.");
        }
        Ok(())
    }

    fn find_deck_by_title(&self, category_id: CategoryId, title: &str) -> Fallible<Option<DeckId>> {
        let sql = "select deck_id from decks where category_id = ? and title = ?;";
        Ok(self
            .conn
            .query_row(sql, (category_id, title), |row| row.get(0))
            .optional()?)
    }

    // Cards.

    /// Add a new card to a deck. The card starts out new and due immediately.
    pub fn add_card(&self, deck_id: DeckId, content: &CardContent, now: Timestamp) -> Fallible<Card> {
        let _ = self.get_deck(deck_id)?;
        let state = CardState::new(now);
        let sql = "insert into cards (deck_id, front, back, repetitions, interval_days, ease_factor, status, next_review, last_reviewed, created_at) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) returning card_id;";
        let id: CardId = self.conn.query_row(
            sql,
            (
                deck_id,
                content.front(),
                content.back(),
                state.repetitions,
                state.interval_days,
                state.ease_factor,
                state.status,
                state.next_review,
                state.last_reviewed,
                now,
            ),
            |row| row.get(0),
        )?;
        log::debug!("Added card {id} to deck {deck_id}");
        self.get_card(id)
    }

    pub fn get_card(&self, id: CardId) -> Fallible<Card> {
        get_card(&self.conn, id)
    }

    /// All cards in a deck, in insertion order.
    pub fn cards(&self, deck_id: DeckId) -> Fallible<Vec<Card>> {
        let sql = format!("select {CARD_COLUMNS} from cards where deck_id = ? order by card_id;");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([deck_id], card_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Cards in a deck that are due at `now`, soonest first.
    pub fn due_cards(&self, deck_id: DeckId, now: Timestamp) -> Fallible<Vec<Card>> {
        let mut due: Vec<Card> = self
            .cards(deck_id)?
            .into_iter()
            .filter(|card| card.state.is_due(now))
            .collect();
        due.sort_by_key(|card| (card.state.next_review, card.id));
        Ok(due)
    }

    /// The card to study next in a deck, if any is due.
    pub fn next_card(&self, deck_id: DeckId, now: Timestamp) -> Fallible<Option<Card>> {
        Ok(self.due_cards(deck_id, now)?.into_iter().next())
    }

    /// Replace a card's front and/or back. At least one must be given.
    pub fn update_card(&self, id: CardId, front: Option<&str>, back: Option<&str>) -> Fallible<Card> {
        if front.is_none() && back.is_none() {
            return fail("no fields to update.");
        }
        let card = self.get_card(id)?;
        let content = CardContent::new(
            front.unwrap_or(&card.front),
            back.unwrap_or(&card.back),
        )?;
        self.conn.execute(
            "update cards set front = ?, back = ? where card_id = ?;",
            (content.front(), content.back(), id),
        )?;
        self.get_card(id)
    }

    /// Delete a card and its review log.
    pub fn remove_card(&self, id: CardId) -> Fallible<()> {
        let n = self
            .conn
            .execute("delete from cards where card_id = ?;", [id])?;
        if n == 0 {
            return fail("card not found.");
        }
        Ok(())
    }

    // Reviews.

    /// Review a card: run the scheduler, then store the new state and append
    /// the review to the card's log in one transaction. If the scheduler
    /// refuses the review, nothing is written.
    pub fn record_review(&mut self, id: CardId, quality: Quality, now: Timestamp) -> Fallible<Card> {
        let tx = self.conn.transaction()?;
        let card = get_card(&tx, id)?;
        let state = scheduler::apply_review(&card.state, quality, now)?;
        log::debug!(
            "card {id} q={quality} reps={} interval={}d ease={:.2} status={} due={}",
            state.repetitions,
            state.interval_days,
            state.ease_factor,
            state.status.as_str(),
            state.next_review
        );
        update_card_state(&tx, id, &state)?;
        insert_review(&tx, id, &ReviewEvent::new(now, quality))?;
        tx.execute(
            "update decks set last_studied = ? where deck_id = ?;",
            (now, card.deck_id),
        )?;
        let card = get_card(&tx, id)?;
        tx.commit()?;
        Ok(card)
    }

    /// A card's review log, oldest first.
    pub fn review_log(&self, id: CardId) -> Fallible<Vec<ReviewEvent>> {
        let _ = self.get_card(id)?;
        let sql = "select reviewed_at, quality from reviews where card_id = ? order by review_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([id], |row| {
            Ok(ReviewEvent::new(row.get(0)?, row.get(1)?))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Every card in a deck with its review log. Read inside one transaction
    /// so that no card is seen half-way through a review.
    pub fn deck_histories(&mut self, deck_id: DeckId) -> Fallible<Vec<CardHistory>> {
        let tx = self.conn.transaction()?;
        let _ = get_deck_id(&tx, deck_id)?;
        let mut events: HashMap<CardId, Vec<ReviewEvent>> = HashMap::new();
        {
            let sql = "select r.card_id, r.reviewed_at, r.quality from reviews r join cards c on c.card_id = r.card_id where c.deck_id = ? order by r.review_id;";
            let mut stmt = tx.prepare(sql)?;
            let mut rows = stmt.query([deck_id])?;
            while let Some(row) = rows.next()? {
                let card_id: CardId = row.get(0)?;
                let event = ReviewEvent::new(row.get(1)?, row.get(2)?);
                events.entry(card_id).or_default().push(event);
            }
        }
        let cards = {
            let sql =
                format!("select {CARD_COLUMNS} from cards where deck_id = ? order by card_id;");
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt.query_map([deck_id], card_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        tx.commit()?;
        Ok(cards
            .into_iter()
            .map(|card| CardHistory {
                events: events.remove(&card.id).unwrap_or_default(),
                state: card.state,
            })
            .collect())
    }

    // Recounts.

    /// Recompute a deck's card count from scratch and store it.
    pub fn recount_deck(&self, id: DeckId) -> Fallible<u32> {
        let _ = self.get_deck(id)?;
        let count: u32 = self.conn.query_row(
            "select count(*) from cards where deck_id = ?;",
            [id],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "update decks set total_cards = ? where deck_id = ?;",
            (count, id),
        )?;
        Ok(count)
    }

    /// Recompute a category's deck count from scratch and store it.
    pub fn recount_category(&self, id: CategoryId) -> Fallible<u32> {
        let _ = self.get_category(id)?;
        let count: u32 = self.conn.query_row(
            "select count(*) from decks where category_id = ?;",
            [id],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "update categories set count = ? where category_id = ?;",
            (count, id),
        )?;
        Ok(count)
    }

    /// Recount every deck and category.
    pub fn recount_all(&mut self) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "update decks set total_cards = (select count(*) from cards where cards.deck_id = decks.deck_id);
             update categories set count = (select count(*) from decks where decks.category_id = categories.category_id);",
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        title: row.get(1)?,
        icon: row.get(2)?,
        count: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn deck_from_row(row: &Row) -> rusqlite::Result<Deck> {
    Ok(Deck {
        id: row.get(0)?,
        category_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        is_public: row.get(4)?,
        total_cards: row.get(5)?,
        last_studied: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        state: CardState {
            repetitions: row.get(4)?,
            interval_days: row.get(5)?,
            ease_factor: row.get(6)?,
            status: row.get(7)?,
            next_review: row.get(8)?,
            last_reviewed: row.get(9)?,
        },
        created_at: row.get(10)?,
    })
}

fn get_card(conn: &Connection, id: CardId) -> Fallible<Card> {
    let sql = format!("select {CARD_COLUMNS} from cards where card_id = ?;");
    match conn.query_row(&sql, [id], card_from_row).optional()? {
        Some(card) => Ok(card),
        None => fail("card not found."),
    }
}

fn get_deck_id(tx: &Transaction, id: DeckId) -> Fallible<DeckId> {
    let sql = "select deck_id from decks where deck_id = ?;";
    match tx.query_row(sql, [id], |row| row.get(0)).optional()? {
        Some(id) => Ok(id),
        None => fail("deck not found."),
    }
}

fn update_card_state(tx: &Transaction, id: CardId, state: &CardState) -> Fallible<()> {
    let sql = "update cards set repetitions = ?, interval_days = ?, ease_factor = ?, status = ?, next_review = ?, last_reviewed = ? where card_id = ?;";
    tx.execute(
        sql,
        (
            state.repetitions,
            state.interval_days,
            state.ease_factor,
            state.status,
            state.next_review,
            state.last_reviewed,
            id,
        ),
    )?;
    Ok(())
}

type ReviewId = i64;

fn insert_review(tx: &Transaction, card_id: CardId, event: &ReviewEvent) -> Fallible<ReviewId> {
    let sql = "insert into reviews (card_id, reviewed_at, quality) values (?, ?, ?) returning review_id;";
    let review_id: ReviewId =
        tx.query_row(sql, (card_id, event.date, event.quality), |row| row.get(0))?;
    Ok(review_id)
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}
