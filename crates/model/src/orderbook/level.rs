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

//! Represents an aggregation of book entries at one price on one side of a book.

use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tidebook_core::UnixNanos;

use super::entry::BookEntry;
use crate::{
    enums::{BookAction, BookSide, OrderType},
    events::LevelEvent,
    identifiers::EntryId,
    types::{Price, Quantity},
};

/// Represents an aggregation of book entries at one price on one side of a book.
///
/// A level may track per-entry detail (entry feeds) or carry only aggregate
/// header fields (legacy level-only feeds); both representations coexist in
/// one book. The aggregate `size` is maintained by delta on every entry
/// mutation, never by re-summing, so per-entry updates stay O(1).
///
/// A level with order type `Market` is unpriced (price zero) and is stored in
/// a dedicated per-side slot outside the price ordering of the owning book.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// The price of the level (zero for market-order levels).
    pub price: Price,
    /// The side of the book the level belongs to.
    pub side: BookSide,
    /// The aggregate size at the level.
    pub size: Quantity,
    /// The signed raw fixed-point change in aggregate size since the last event.
    pub size_change: i64,
    /// The number of entries at the level.
    ///
    /// Mirrors the tracked entry count whenever entry detail is present;
    /// carries the feed-reported header value for level-only feeds.
    pub num_entries: u32,
    /// The action which produced the level.
    pub action: BookAction,
    /// The time of the last update to the level.
    pub time: UnixNanos,
    /// Whether the level is priced (limit) or unpriced (market).
    pub order_type: OrderType,
    entries: IndexMap<EntryId, BookEntry>,
}

impl PriceLevel {
    /// Creates a new empty [`PriceLevel`] instance.
    #[must_use]
    pub fn new(price: Price, side: BookSide, order_type: OrderType) -> Self {
        Self {
            price,
            side,
            size: Quantity::zero(0),
            size_change: 0,
            num_entries: 0,
            action: BookAction::Add,
            time: UnixNanos::default(),
            order_type,
            entries: IndexMap::new(),
        }
    }

    /// Creates a new [`PriceLevel`] instance from the header fields of a level event.
    ///
    /// No entry detail is attached; the event's action code is carried as-is
    /// and is typically forced to `Add` before the level enters a book.
    #[must_use]
    pub fn from_event(event: &LevelEvent) -> Self {
        Self {
            price: event.price,
            side: event.side,
            size: event.size,
            size_change: event.size_change,
            num_entries: event.num_entries,
            action: event.action,
            time: event.time,
            order_type: event.order_type,
            entries: IndexMap::new(),
        }
    }

    /// Creates a new unpriced market-order [`PriceLevel`] for the given side.
    #[must_use]
    pub fn market(side: BookSide) -> Self {
        Self::new(Price::zero(0), side, OrderType::Market)
    }

    /// Returns the number of tracked entries at the level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the level tracks no entries.
    ///
    /// Note a level-only level (legacy feeds) is always "empty" in this sense
    /// while still carrying a non-zero aggregate size.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the entry with `id`, if tracked.
    #[must_use]
    pub fn entry(&self, id: &EntryId) -> Option<&BookEntry> {
        self.entries.get(id)
    }

    /// Returns an iterator over the tracked entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &BookEntry> {
        self.entries.values()
    }

    /// Adds an entry to the level, adjusting the aggregate size.
    ///
    /// Adding an entry whose ID is already tracked is treated as an update of
    /// that entry (idempotent apply), adjusting the aggregate by the size
    /// delta rather than double-counting.
    pub fn apply_entry_add(&mut self, entry: BookEntry) {
        if self.entries.contains_key(&entry.id) {
            log::debug!(
                "Duplicate add for entry {} at {} ({}), treating as update",
                entry.id,
                self.price,
                self.side,
            );
            self.apply_entry_update(entry.id, entry.size, entry.time);
            return;
        }

        self.size = self.size.saturating_add(entry.size);
        self.size_change = entry.size.raw as i64;
        self.time = entry.time;
        self.entries.insert(entry.id, entry);
        self.num_entries = self.entries.len() as u32;
    }

    /// Updates the entry with `id` in place, adjusting the aggregate size by
    /// the old → new delta.
    ///
    /// An update for an ID not yet tracked creates the entry (find-or-create
    /// semantics for feeds that skip the initial add).
    pub fn apply_entry_update(&mut self, id: EntryId, size: Quantity, time: UnixNanos) {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                let delta = size.raw as i64 - entry.size.raw as i64;
                entry.set_details(size, time);
                self.size = if delta >= 0 {
                    self.size.saturating_add(Quantity::from_raw(delta as u64, size.precision))
                } else {
                    self.size
                        .saturating_sub(Quantity::from_raw(delta.unsigned_abs(), size.precision))
                };
                self.size_change = delta;
                self.time = time;
            }
            None => {
                self.apply_entry_add(BookEntry::new(id, size, BookAction::Add, time, None));
            }
        }
    }

    /// Removes the entry with `id` from the level, adjusting the aggregate size.
    ///
    /// Removing an unknown ID is a no-op returning `None`; deletion of an
    /// already-absent entry is not an error.
    pub fn remove_entry_by_id(&mut self, id: &EntryId, time: UnixNanos) -> Option<BookEntry> {
        let removed = self.entries.shift_remove(id)?;
        self.size = self.size.saturating_sub(removed.size);
        self.size_change = -(removed.size.raw as i64);
        self.num_entries = self.entries.len() as u32;
        self.time = time;
        Some(removed)
    }

    /// Replaces the level header fields from `other`, recording the size change.
    ///
    /// Tracked entries are left untouched; this is the level-only apply path.
    pub fn set_details(&mut self, other: &Self) {
        self.size_change = other.size.raw as i64 - self.size.raw as i64;
        self.size = other.size;
        self.num_entries = other.num_entries;
        self.time = other.time;
    }

    /// Merges an update-level from the same price into this level.
    ///
    /// Any entries carried by `other` are applied per their action codes, then
    /// the header fields are replaced via [`PriceLevel::set_details`].
    pub fn merge_update(&mut self, other: &Self) {
        for entry in other.entries() {
            match entry.action {
                BookAction::Add => self.apply_entry_add(*entry),
                BookAction::Update => self.apply_entry_update(entry.id, entry.size, entry.time),
                BookAction::Delete => {
                    self.remove_entry_by_id(&entry.id, entry.time);
                }
                BookAction::Unknown => {} // explicitly not handled
            }
        }
        self.set_details(other);
    }

    /// Returns the aggregate size as an `f64`.
    #[must_use]
    pub fn size_f64(&self) -> f64 {
        self.size.as_f64()
    }
}

impl Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({},{},size={},entries={})",
            stringify!(PriceLevel),
            self.side,
            self.price,
            self.size,
            self.num_entries,
        )
    }
}
