// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Serialization of book state into outbound recap and delta messages.
//!
//! The book has no wire format of its own; [`BookMsg`] is the neutral message
//! model a publishing layer encodes however it sees fit. Recaps serialize the
//! entire book unconditionally; deltas serialize only the levels and entries
//! touched since the last populate call, so the cost of a delta is bounded by
//! the dirty-set size rather than the book size.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use tidebook_core::UnixNanos;
use ustr::Ustr;

use super::{book::Book, entry::BookEntry, level::PriceLevel};
use crate::{
    enums::{BookAction, BookSide, OrderType},
    identifiers::{EntryId, Symbol},
    types::{Price, Quantity},
};

/// The kind of outbound book message.
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookMsgType {
    /// A full-state snapshot of the book.
    Recap,
    /// An incremental update reflecting only changes since the last message.
    Delta,
}

/// A serialized view of a single entry within a level update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryUpdate {
    /// The entry ID.
    pub id: EntryId,
    /// The action a consumer should apply for this entry.
    pub action: BookAction,
    /// The entry size (zero for delete tombstones).
    pub size: Quantity,
    /// The time of the last update to the entry.
    pub time: UnixNanos,
    /// An optional feed-specific reason code.
    pub reason: Option<Ustr>,
}

impl EntryUpdate {
    fn from_entry(entry: &BookEntry, action: BookAction) -> Self {
        Self {
            id: entry.id,
            action,
            size: entry.size,
            time: entry.time,
            reason: entry.reason,
        }
    }

    fn tombstone(id: EntryId, time: UnixNanos) -> Self {
        Self {
            id,
            action: BookAction::Delete,
            size: Quantity::zero(0),
            time,
            reason: None,
        }
    }
}

/// A serialized view of one price level within a book message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelUpdate {
    /// The price of the level (zero for market-order levels).
    pub price: Price,
    /// The side of the book the level belongs to.
    pub side: BookSide,
    /// The action a consumer should apply for this level.
    pub action: BookAction,
    /// The aggregate size at the level (zero for delete tombstones).
    pub size: Quantity,
    /// The signed raw fixed-point change in aggregate size.
    pub size_change: i64,
    /// The number of entries at the level.
    pub num_entries: u32,
    /// The time of the last update to the level.
    pub time: UnixNanos,
    /// Whether the level is priced (limit) or unpriced (market).
    pub order_type: OrderType,
    /// The serialized entries (changed entries only for deltas).
    pub entries: Vec<EntryUpdate>,
}

impl LevelUpdate {
    fn from_level(level: &PriceLevel) -> Self {
        let mut update = Self::header(level, level.action);
        update.entries = level
            .entries()
            .map(|entry| EntryUpdate::from_entry(entry, entry.action))
            .collect();
        update
    }

    fn header(level: &PriceLevel, action: BookAction) -> Self {
        Self {
            price: level.price,
            side: level.side,
            action,
            size: level.size,
            size_change: level.size_change,
            num_entries: level.num_entries,
            time: level.time,
            order_type: level.order_type,
            entries: Vec::new(),
        }
    }

    fn tombstone(key: LevelKey, time: UnixNanos) -> Self {
        Self {
            price: key.price,
            side: key.side,
            action: BookAction::Delete,
            size: Quantity::zero(0),
            size_change: 0,
            num_entries: 0,
            time,
            order_type: key.order_type,
            entries: Vec::new(),
        }
    }
}

/// An outbound book message holding either a full recap or an incremental delta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookMsg {
    /// The symbol of the originating book.
    pub symbol: Symbol,
    /// The kind of message.
    pub msg_type: BookMsgType,
    /// The time of the last update applied to the originating book.
    pub book_time: UnixNanos,
    /// The serialized levels, bids best-to-worst then asks best-to-worst,
    /// followed by any market-order levels.
    pub levels: Vec<LevelUpdate>,
}

impl BookMsg {
    /// Creates a new empty [`BookMsg`] instance.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            msg_type: BookMsgType::Recap,
            book_time: UnixNanos::default(),
            levels: Vec::new(),
        }
    }

    fn reset(&mut self, symbol: Symbol, msg_type: BookMsgType, book_time: UnixNanos) {
        self.symbol = symbol;
        self.msg_type = msg_type;
        self.book_time = book_time;
        self.levels.clear();
    }
}

/// The key identifying one level slot of a book for dirty tracking.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) struct LevelKey {
    pub side: BookSide,
    pub order_type: OrderType,
    pub price: Price,
}

impl LevelKey {
    pub fn new(side: BookSide, order_type: OrderType, price: Price) -> Self {
        Self {
            side,
            order_type,
            price,
        }
    }

    pub fn from_level(level: &PriceLevel) -> Self {
        Self::new(level.side, level.order_type, level.price)
    }
}

#[derive(Clone, Debug, Default)]
struct LevelDirt {
    action: Option<BookAction>,
    entries: IndexMap<EntryId, BookAction, ahash::RandomState>,
}

/// Accumulated level/entry keys touched since the last populate call.
///
/// Maintained by the [`Book`] as a side effect of every mutating call when
/// delta generation is enabled, and taken atomically by `populate_delta`.
#[derive(Clone, Debug, Default)]
pub(crate) struct DirtyState {
    levels: IndexMap<LevelKey, LevelDirt, ahash::RandomState>,
}

impl DirtyState {
    pub fn mark_level(&mut self, key: LevelKey, action: BookAction) {
        let dirt = self.levels.entry(key).or_default();
        dirt.action = Some(match dirt.action {
            Some(prev) => combine(prev, action),
            None => action,
        });
    }

    pub fn mark_entry(&mut self, key: LevelKey, id: EntryId, action: BookAction) {
        let dirt = self.levels.entry(key).or_default();
        let combined = match dirt.entries.get(&id) {
            Some(prev) => combine(*prev, action),
            None => action,
        };
        dirt.entries.insert(id, combined);
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[allow(dead_code)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }
}

/// Collapses two successive actions on one key into the single action a
/// consumer (which saw neither) should apply.
fn combine(prev: BookAction, next: BookAction) -> BookAction {
    match (prev, next) {
        (BookAction::Add, BookAction::Update) => BookAction::Add,
        (BookAction::Delete, BookAction::Add | BookAction::Update) => BookAction::Add,
        (_, next) => next,
    }
}

impl Book {
    /// Serializes the entire current book state into `msg`, unconditionally.
    ///
    /// Both sides are written best-to-worst, followed by any market-order
    /// levels; the dirty set is cleared so a following `populate_delta` only
    /// reflects changes made after this call.
    ///
    /// Book publishing must be enabled via [`Book::set_generate_deltas`];
    /// otherwise the call is a logged no-op.
    pub fn populate_recap(&mut self, msg: &mut BookMsg) {
        if !self.generate_deltas() {
            log::warn!("populate_recap: book publishing not enabled ({})", self.symbol);
            return;
        }

        msg.reset(self.symbol, BookMsgType::Recap, self.book_time);

        for level in self.bid_iter() {
            msg.levels.push(LevelUpdate::from_level(level));
        }
        for level in self.ask_iter() {
            msg.levels.push(LevelUpdate::from_level(level));
        }
        if let Some(level) = self.bid_market_orders() {
            msg.levels.push(LevelUpdate::from_level(level));
        }
        if let Some(level) = self.ask_market_orders() {
            msg.levels.push(LevelUpdate::from_level(level));
        }

        self.dirty.clear();
    }

    /// Serializes only the levels/entries changed since the last populate call
    /// into `msg`, then clears the dirty set.
    ///
    /// Returns whether anything was written: an unchanged book produces no
    /// message, and callers must not publish an empty delta. Levels and
    /// entries deleted since the last call are written as `Delete` tombstones.
    pub fn populate_delta(&mut self, msg: &mut BookMsg) -> bool {
        if !self.generate_deltas() {
            log::warn!("populate_delta: book publishing not enabled ({})", self.symbol);
            return false;
        }
        if self.dirty.is_empty() {
            log::debug!(
                "populate_delta: no changes to publish from clean book ({})",
                self.symbol,
            );
            return false;
        }

        msg.reset(self.symbol, BookMsgType::Delta, self.book_time);
        let dirty = std::mem::take(&mut self.dirty);

        for (key, dirt) in dirty.levels {
            let found = match key.order_type {
                OrderType::Market => match key.side {
                    BookSide::Bid => self.bid_market_orders(),
                    BookSide::Ask => self.ask_market_orders(),
                },
                OrderType::Limit => self.level_at_price(key.price, key.side),
            };

            match found {
                Some(level) => {
                    let action = dirt.action.unwrap_or(BookAction::Update);
                    let mut update = LevelUpdate::header(level, action);
                    for (id, entry_action) in dirt.entries {
                        match level.entry(&id) {
                            Some(entry) if entry_action != BookAction::Delete => {
                                update.entries.push(EntryUpdate::from_entry(entry, entry_action));
                            }
                            _ => update.entries.push(EntryUpdate::tombstone(id, level.time)),
                        }
                    }
                    msg.levels.push(update);
                }
                None => {
                    let mut update = LevelUpdate::tombstone(key, self.book_time);
                    update.entries = dirt
                        .entries
                        .keys()
                        .map(|id| EntryUpdate::tombstone(*id, self.book_time))
                        .collect();
                    msg.levels.push(update);
                }
            }
        }

        true
    }
}
