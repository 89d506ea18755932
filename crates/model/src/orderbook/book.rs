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

//! A queryable order book maintained from atomic feed updates.

use std::{fmt::Display, io};

use tidebook_core::UnixNanos;

use super::{
    BookConflict, BookIntegrityError, display::pprint_book, entry::BookEntry, ladder::BookLadder,
    level::PriceLevel, publisher::{DirtyState, LevelKey},
};
use crate::{
    enums::{BookAction, BookSide, DataQuality, OrderType},
    identifiers::{EntryId, Symbol},
    types::{Price, Quantity},
};

/// A queryable order book for one symbol, maintained from atomic feed updates.
///
/// Maintains bid and ask price levels in best-to-worst order (bids descending,
/// asks ascending), each level holding zero or more entries keyed by entry ID,
/// plus one optional unpriced market-order level per side.
///
/// The book itself holds no lock; the intended deployment is exactly one
/// writer thread per instance with any number of concurrent readers, mediated
/// by a [`SharedBook`](crate::orderbook::SharedBook).
#[derive(Clone, Debug)]
pub struct Book {
    /// The symbol the book is subscribed to.
    pub symbol: Symbol,
    /// The time of the last update applied to the book.
    pub book_time: UnixNanos,
    /// The health of the data feeding the book.
    pub quality: DataQuality,
    /// Whether the book is consistent with the feed (false after a gap until
    /// the next recap).
    pub is_consistent: bool,
    /// The current count of updates applied to the book.
    pub update_count: u64,
    bids: BookLadder,
    asks: BookLadder,
    bid_market_orders: Option<PriceLevel>,
    ask_market_orders: Option<PriceLevel>,
    generate_deltas: bool,
    pub(crate) dirty: DirtyState,
}

impl Book {
    /// Creates a new [`Book`] instance.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            book_time: UnixNanos::default(),
            quality: DataQuality::Ok,
            is_consistent: true,
            update_count: 0,
            bids: BookLadder::new(BookSide::Bid),
            asks: BookLadder::new(BookSide::Ask),
            bid_market_orders: None,
            ask_market_orders: None,
            generate_deltas: false,
            dirty: DirtyState::default(),
        }
    }

    /// Enables or disables the recording of changes for delta generation.
    ///
    /// When enabled, every mutating call accumulates the touched level/entry
    /// keys for the next `populate_delta` call.
    pub fn set_generate_deltas(&mut self, generate_deltas: bool) {
        self.generate_deltas = generate_deltas;
        if !generate_deltas {
            self.dirty.clear();
        }
    }

    /// Returns whether delta generation is enabled.
    #[must_use]
    pub fn generate_deltas(&self) -> bool {
        self.generate_deltas
    }

    /// Empties all levels and entries from both sides, including the
    /// market-order levels, and resets the data quality to `Ok`.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.bid_market_orders = None;
        self.ask_market_orders = None;
        self.quality = DataQuality::Ok;
        self.dirty.clear();
    }

    /// Inserts a new level into the book, routed by side and order type.
    ///
    /// # Errors
    ///
    /// Returns [`BookConflict::LevelExists`] without mutating the book if a
    /// level already exists at that price and side; callers fall back to
    /// [`Book::update_level`].
    pub fn add_level(&mut self, level: PriceLevel) -> Result<(), BookConflict> {
        let key = LevelKey::from_level(&level);
        let time = level.time;

        match level.order_type {
            OrderType::Market => {
                let slot = self.market_slot_mut(level.side);
                if slot.is_some() {
                    return Err(BookConflict::LevelExists {
                        side: level.side,
                        price: level.price,
                    });
                }
                *slot = Some(level);
            }
            OrderType::Limit => match level.side {
                BookSide::Bid => self.bids.add_level(level)?,
                BookSide::Ask => self.asks.add_level(level)?,
            },
        }

        self.mark_level(key, BookAction::Add);
        self.increment(time);
        Ok(())
    }

    /// Updates the existing level at the incoming level's price and side.
    ///
    /// # Errors
    ///
    /// Returns [`BookConflict::LevelNotFound`] if no such level exists;
    /// callers fall back to [`Book::add_level`].
    pub fn update_level(&mut self, level: PriceLevel) -> Result<(), BookConflict> {
        let key = LevelKey::from_level(&level);
        let time = level.time;

        match level.order_type {
            OrderType::Market => match self.market_slot_mut(level.side).as_mut() {
                Some(found) => found.merge_update(&level),
                None => {
                    return Err(BookConflict::LevelNotFound {
                        side: level.side,
                        price: level.price,
                    });
                }
            },
            OrderType::Limit => match level.side {
                BookSide::Bid => self.bids.update_level(level)?,
                BookSide::Ask => self.asks.update_level(level)?,
            },
        }

        self.mark_level(key, BookAction::Update);
        self.increment(time);
        Ok(())
    }

    /// Removes the level at the given level's price and side entirely,
    /// including all its entries.
    ///
    /// Returns whether a level was removed; deletion of an already-absent
    /// level is a logged no-op, not an error.
    pub fn delete_level(&mut self, level: &PriceLevel) -> bool {
        let key = LevelKey::from_level(level);

        let removed = match level.order_type {
            OrderType::Market => {
                let slot = self.market_slot_mut(level.side);
                if slot.take().is_none() {
                    log::info!(
                        "delete_level: no market-order level on side {} ({})",
                        level.side,
                        self.symbol,
                    );
                    false
                } else {
                    true
                }
            }
            OrderType::Limit => match level.side {
                BookSide::Bid => self.bids.delete_level(level.price).is_some(),
                BookSide::Ask => self.asks.delete_level(level.price).is_some(),
            },
        };

        if removed {
            self.mark_level(key, BookAction::Delete);
            self.increment(level.time);
        }
        removed
    }

    /// Adds an entry to the book, creating the owning level if absent.
    pub fn add_entry(
        &mut self,
        entry: BookEntry,
        price: Price,
        side: BookSide,
        order_type: OrderType,
        time: UnixNanos,
    ) {
        let entry_id = entry.id;
        let mut created = false;

        match order_type {
            OrderType::Market => {
                let slot = self.market_slot_mut(side);
                if slot.is_none() {
                    *slot = Some(PriceLevel::market(side));
                    created = true;
                }
                if let Some(level) = slot.as_mut() {
                    level.apply_entry_add(entry);
                }
            }
            OrderType::Limit => {
                if self.ladder(side).level_at_price(price).is_none() {
                    let _ = self
                        .ladder_mut(side)
                        .add_level(PriceLevel::new(price, side, OrderType::Limit));
                    created = true;
                }
                if let Some(level) = self.ladder_mut(side).level_at_price_mut(price) {
                    level.apply_entry_add(entry);
                }
            }
        }

        let level_action = if created { BookAction::Add } else { BookAction::Update };
        let key = LevelKey::new(side, order_type, price);
        self.mark_entry(key, level_action, entry_id, BookAction::Add);
        self.increment(time);
    }

    /// Updates the entry with `id` at the given price and side, adjusting the
    /// owning level's aggregate size by the old → new delta.
    ///
    /// An update for an ID the level does not yet track creates the entry.
    ///
    /// # Errors
    ///
    /// Returns [`BookConflict::LevelNotFound`] if no level exists at that
    /// price and side; callers treat the update as an implicit add.
    pub fn update_entry(
        &mut self,
        id: EntryId,
        size: Quantity,
        price: Price,
        side: BookSide,
        order_type: OrderType,
        time: UnixNanos,
    ) -> Result<(), BookConflict> {
        match order_type {
            OrderType::Market => match self.market_slot_mut(side).as_mut() {
                Some(level) => level.apply_entry_update(id, size, time),
                None => return Err(BookConflict::LevelNotFound { side, price }),
            },
            OrderType::Limit => match self.ladder_mut(side).level_at_price_mut(price) {
                Some(level) => level.apply_entry_update(id, size, time),
                None => return Err(BookConflict::LevelNotFound { side, price }),
            },
        }

        let key = LevelKey::new(side, order_type, price);
        self.mark_entry(key, BookAction::Update, id, BookAction::Update);
        self.increment(time);
        Ok(())
    }

    /// Removes the entry with `id` from the level at the given price and side.
    ///
    /// The level is **not** removed when its last entry is deleted; levels and
    /// entries have independent lifecycles to tolerate feeds that send entry
    /// deletes without a corresponding level delete. Returns whether an entry
    /// was removed.
    pub fn delete_entry(
        &mut self,
        id: &EntryId,
        price: Price,
        side: BookSide,
        order_type: OrderType,
        time: UnixNanos,
    ) -> bool {
        let removed = match order_type {
            OrderType::Market => match self.market_slot_mut(side).as_mut() {
                Some(level) => level.remove_entry_by_id(id, time).is_some(),
                None => false,
            },
            OrderType::Limit => match self.ladder_mut(side).level_at_price_mut(price) {
                Some(level) => level.remove_entry_by_id(id, time).is_some(),
                None => false,
            },
        };

        if removed {
            let key = LevelKey::new(side, order_type, price);
            self.mark_entry(key, BookAction::Update, *id, BookAction::Delete);
            self.increment(time);
        } else {
            log::debug!("delete_entry: no entry {id} at {price} ({side}) for {}", self.symbol);
        }
        removed
    }

    /// Returns the priced level at `price` on `side`, or `None` if absent.
    ///
    /// Distinguishes "no level" from "level with zero entries": an existing
    /// level is returned even when it tracks no entries.
    #[must_use]
    pub fn level_at_price(&self, price: Price, side: BookSide) -> Option<&PriceLevel> {
        self.ladder(side).level_at_price(price)
    }

    /// Returns a restartable iterator over bid levels in best-to-worst order.
    pub fn bid_iter(&self) -> impl Iterator<Item = &PriceLevel> {
        self.bids.iter()
    }

    /// Returns a restartable iterator over ask levels in best-to-worst order.
    pub fn ask_iter(&self) -> impl Iterator<Item = &PriceLevel> {
        self.asks.iter()
    }

    /// Returns the unpriced bid market-order level, if present.
    #[must_use]
    pub fn bid_market_orders(&self) -> Option<&PriceLevel> {
        self.bid_market_orders.as_ref()
    }

    /// Returns the unpriced ask market-order level, if present.
    #[must_use]
    pub fn ask_market_orders(&self) -> Option<&PriceLevel> {
        self.ask_market_orders.as_ref()
    }

    /// Returns true if the book has any bid levels.
    #[must_use]
    pub fn has_bid(&self) -> bool {
        !self.bids.is_empty()
    }

    /// Returns true if the book has any ask levels.
    #[must_use]
    pub fn has_ask(&self) -> bool {
        !self.asks.is_empty()
    }

    /// Returns the best bid price if available.
    #[must_use]
    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.top().map(|top| top.price)
    }

    /// Returns the best ask price if available.
    #[must_use]
    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.top().map(|top| top.price)
    }

    /// Returns the aggregate size at the best bid price if available.
    #[must_use]
    pub fn best_bid_size(&self) -> Option<Quantity> {
        self.bids.top().map(|top| top.size)
    }

    /// Returns the aggregate size at the best ask price if available.
    #[must_use]
    pub fn best_ask_size(&self) -> Option<Quantity> {
        self.asks.top().map(|top| top.size)
    }

    /// Returns the spread between best ask and bid prices if both exist.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        match (self.best_ask_price(), self.best_bid_price()) {
            (Some(ask), Some(bid)) => Some(ask.as_f64() - bid.as_f64()),
            _ => None,
        }
    }

    /// Returns the midpoint between best ask and bid prices if both exist.
    #[must_use]
    pub fn midpoint(&self) -> Option<f64> {
        match (self.best_ask_price(), self.best_bid_price()) {
            (Some(ask), Some(bid)) => Some((ask.as_f64() + bid.as_f64()) / 2.0),
            _ => None,
        }
    }

    /// Returns the number of bid price levels.
    #[must_use]
    pub fn num_bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Returns the number of ask price levels.
    #[must_use]
    pub fn num_ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Returns the total number of price levels across both sides.
    #[must_use]
    pub fn total_num_levels(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Verifies this book and `rhs` hold identical state, reporting the first
    /// difference found.
    ///
    /// # Errors
    ///
    /// Returns a [`BookIntegrityError`] describing the first mismatch.
    pub fn assert_equal(&self, rhs: &Self) -> Result<(), BookIntegrityError> {
        if self.symbol != rhs.symbol {
            return Err(BookIntegrityError::SymbolMismatch(self.symbol, rhs.symbol));
        }

        for (side, lhs_ladder, rhs_ladder) in [
            (BookSide::Bid, &self.bids, &rhs.bids),
            (BookSide::Ask, &self.asks, &rhs.asks),
        ] {
            if lhs_ladder.len() != rhs_ladder.len() {
                return Err(BookIntegrityError::LevelCountMismatch {
                    side,
                    lhs: lhs_ladder.len(),
                    rhs: rhs_ladder.len(),
                });
            }
            for (lhs_level, rhs_level) in lhs_ladder.iter().zip(rhs_ladder.iter()) {
                if let Some(detail) = levels_differ(lhs_level, rhs_level) {
                    return Err(BookIntegrityError::LevelMismatch { side, detail });
                }
            }
        }

        for (side, lhs_market, rhs_market) in [
            (BookSide::Bid, &self.bid_market_orders, &rhs.bid_market_orders),
            (BookSide::Ask, &self.ask_market_orders, &rhs.ask_market_orders),
        ] {
            let detail = match (lhs_market, rhs_market) {
                (None, None) => None,
                (Some(lhs_level), Some(rhs_level)) => levels_differ(lhs_level, rhs_level),
                (Some(_), None) => Some("present vs [empty]".to_string()),
                (None, Some(_)) => Some("[empty] vs present".to_string()),
            };
            if let Some(detail) = detail {
                return Err(BookIntegrityError::MarketOrdersMismatch { side, detail });
            }
        }

        Ok(())
    }

    /// Writes a human-readable full-state trace of the book to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn dump(&self, out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "Dump book: {}", self.symbol)?;

        for (label, ladder) in [("Bid", &self.bids), ("Ask", &self.asks)] {
            for (i, level) in ladder.iter().enumerate() {
                writeln!(
                    out,
                    "{label} {i} | price={} size={} action={} entries={} time={}",
                    level.price, level.size, level.action, level.num_entries, level.time,
                )?;
                for entry in level.entries() {
                    writeln!(
                        out,
                        "      |    id={} size={} action={} time={}",
                        entry.id, entry.size, entry.action, entry.time,
                    )?;
                }
            }
        }

        for (label, market) in [
            ("Bid", &self.bid_market_orders),
            ("Ask", &self.ask_market_orders),
        ] {
            if let Some(level) = market {
                writeln!(
                    out,
                    "{label} Market Orders | size={} action={} entries={} time={}",
                    level.size, level.action, level.num_entries, level.time,
                )?;
                for entry in level.entries() {
                    writeln!(
                        out,
                        "      |    id={} size={} action={} time={}",
                        entry.id, entry.size, entry.action, entry.time,
                    )?;
                }
            }
        }

        Ok(())
    }

    /// Returns a formatted table of the top `num_levels` of the book.
    #[must_use]
    pub fn pprint(&self, num_levels: usize) -> String {
        pprint_book(self, num_levels)
    }

    fn ladder(&self, side: BookSide) -> &BookLadder {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: BookSide) -> &mut BookLadder {
        match side {
            BookSide::Bid => &mut self.bids,
            BookSide::Ask => &mut self.asks,
        }
    }

    fn market_slot_mut(&mut self, side: BookSide) -> &mut Option<PriceLevel> {
        match side {
            BookSide::Bid => &mut self.bid_market_orders,
            BookSide::Ask => &mut self.ask_market_orders,
        }
    }

    fn mark_level(&mut self, key: LevelKey, action: BookAction) {
        if self.generate_deltas {
            self.dirty.mark_level(key, action);
        }
    }

    fn mark_entry(
        &mut self,
        key: LevelKey,
        level_action: BookAction,
        id: EntryId,
        entry_action: BookAction,
    ) {
        if self.generate_deltas {
            self.dirty.mark_level(key, level_action);
            self.dirty.mark_entry(key, id, entry_action);
        }
    }

    fn increment(&mut self, time: UnixNanos) {
        if time < self.book_time {
            log::warn!(
                "Timestamp should not go backwards: old={}, new={time} ({})",
                self.book_time,
                self.symbol,
            );
        }
        self.book_time = time;
        self.update_count = self.update_count.saturating_add(1);
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(symbol={}, bids={}, asks={}, quality={}, update_count={})",
            stringify!(Book),
            self.symbol,
            self.bids.len(),
            self.asks.len(),
            self.quality,
            self.update_count,
        )
    }
}

fn levels_differ(lhs: &PriceLevel, rhs: &PriceLevel) -> Option<String> {
    if lhs.price != rhs.price {
        return Some(format!("price {} vs {}", lhs.price, rhs.price));
    }
    if lhs.size != rhs.size {
        return Some(format!("size {} vs {} at {}", lhs.size, rhs.size, lhs.price));
    }
    if lhs.len() != rhs.len() {
        return Some(format!("entry count {} vs {} at {}", lhs.len(), rhs.len(), lhs.price));
    }
    for entry in lhs.entries() {
        match rhs.entry(&entry.id) {
            Some(other) if other.size == entry.size => {}
            Some(other) => {
                return Some(format!(
                    "entry {} size {} vs {} at {}",
                    entry.id, entry.size, other.size, lhs.price
                ));
            }
            None => return Some(format!("entry {} missing at {}", entry.id, lhs.price)),
        }
    }
    None
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use rstest::rstest;
    use tidebook_core::UnixNanos;

    use super::*;
    use crate::orderbook::stubs::{book_entry, limit_level};

    fn book() -> Book {
        Book::new(Symbol::from("AAPL.XNGS"))
    }

    #[rstest]
    fn test_new_book_is_empty() {
        let book = book();
        assert!(!book.has_bid());
        assert!(!book.has_ask());
        assert_eq!(book.total_num_levels(), 0);
        assert_eq!(book.quality, DataQuality::Ok);
        assert!(book.is_consistent);
        assert!(book.best_bid_price().is_none());
        assert!(book.spread().is_none());
    }

    #[rstest]
    fn test_add_level_and_lookup() {
        let mut book = book();
        book.add_level(limit_level("100.00", BookSide::Bid, 1000)).unwrap();

        let level = book.level_at_price(Price::from("100.00"), BookSide::Bid).unwrap();
        assert_eq!(level.size, Quantity::from(1000));
        assert!(book.level_at_price(Price::from("100.00"), BookSide::Ask).is_none());
        assert_eq!(book.update_count, 1);
    }

    #[rstest]
    fn test_add_existing_level_fails() {
        let mut book = book();
        book.add_level(limit_level("100.00", BookSide::Bid, 1000)).unwrap();
        assert!(matches!(
            book.add_level(limit_level("100.00", BookSide::Bid, 500)),
            Err(BookConflict::LevelExists { .. })
        ));
    }

    #[rstest]
    fn test_update_missing_level_fails() {
        let mut book = book();
        assert!(matches!(
            book.update_level(limit_level("100.00", BookSide::Ask, 500)),
            Err(BookConflict::LevelNotFound { .. })
        ));
    }

    #[rstest]
    fn test_delete_missing_level_is_noop() {
        let mut book = book();
        assert!(!book.delete_level(&limit_level("100.00", BookSide::Bid, 0)));
        assert_eq!(book.update_count, 0);
    }

    #[rstest]
    fn test_delete_level_cascades_entries() {
        let mut book = book();
        let price = Price::from("100.00");
        book.add_entry(
            book_entry("e1", 1000, 1),
            price,
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(1),
        );

        assert!(book.delete_level(&limit_level("100.00", BookSide::Bid, 0)));
        assert!(book.level_at_price(price, BookSide::Bid).is_none());
        assert!(!book.has_bid());
    }

    #[rstest]
    fn test_add_entry_creates_level() {
        let mut book = book();
        let price = Price::from("101.00");
        book.add_entry(
            book_entry("e1", 500, 1),
            price,
            BookSide::Ask,
            OrderType::Limit,
            UnixNanos::new(1),
        );

        let level = book.level_at_price(price, BookSide::Ask).unwrap();
        assert_eq!(level.size, Quantity::from(500));
        assert_eq!(level.len(), 1);
        assert_eq!(level.num_entries, 1);
    }

    #[rstest]
    fn test_update_entry_without_level_fails() {
        let mut book = book();
        let result = book.update_entry(
            EntryId::from("e1"),
            Quantity::from(100),
            Price::from("100.00"),
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(1),
        );
        assert!(matches!(result, Err(BookConflict::LevelNotFound { .. })));
    }

    #[rstest]
    fn test_delete_last_entry_retains_level() {
        let mut book = book();
        let price = Price::from("100.00");
        book.add_entry(
            book_entry("e1", 1000, 1),
            price,
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(1),
        );
        assert!(book.delete_entry(
            &EntryId::from("e1"),
            price,
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(2),
        ));

        // Levels and entries have independent lifecycles
        let level = book.level_at_price(price, BookSide::Bid).unwrap();
        assert!(level.is_empty());
        assert!(level.size.is_zero());
    }

    #[rstest]
    fn test_delete_missing_entry_is_noop() {
        let mut book = book();
        assert!(!book.delete_entry(
            &EntryId::from("ghost"),
            Price::from("100.00"),
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(1),
        ));
    }

    #[rstest]
    fn test_best_prices_and_spread() {
        let mut book = book();
        book.add_level(limit_level("100.00", BookSide::Bid, 10)).unwrap();
        book.add_level(limit_level("99.00", BookSide::Bid, 20)).unwrap();
        book.add_level(limit_level("101.00", BookSide::Ask, 30)).unwrap();
        book.add_level(limit_level("102.00", BookSide::Ask, 40)).unwrap();

        assert_eq!(book.best_bid_price().unwrap(), Price::from("100.00"));
        assert_eq!(book.best_ask_price().unwrap(), Price::from("101.00"));
        assert_eq!(book.best_bid_size().unwrap(), Quantity::from(10));
        assert_eq!(book.best_ask_size().unwrap(), Quantity::from(30));
        assert_eq!(book.spread().unwrap(), 1.0);
        assert_eq!(book.midpoint().unwrap(), 100.5);
        assert_eq!(book.num_bid_levels(), 2);
        assert_eq!(book.num_ask_levels(), 2);
        assert_eq!(book.total_num_levels(), 4);
    }

    #[rstest]
    fn test_scenario_delete_entry_with_level() {
        // Add two bid levels via entries then delete the first with its level:
        // the remaining book must hold exactly one level at 101 size 2000.
        let mut book = book();
        book.add_entry(
            book_entry("b1", 1000, 1),
            Price::from("100.00"),
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(1),
        );
        book.add_entry(
            book_entry("b2", 2000, 2),
            Price::from("101.00"),
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(2),
        );

        book.delete_entry(
            &EntryId::from("b1"),
            Price::from("100.00"),
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(3),
        );
        book.delete_level(&limit_level("100.00", BookSide::Bid, 0));

        let levels: Vec<&PriceLevel> = book.bid_iter().collect();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].price, Price::from("101.00"));
        assert_eq!(levels[0].size, Quantity::from(2000));
    }

    #[rstest]
    fn test_market_order_levels() {
        let mut book = book();
        book.add_entry(
            book_entry("m1", 700, 1),
            Price::zero(0),
            BookSide::Bid,
            OrderType::Market,
            UnixNanos::new(1),
        );

        let market = book.bid_market_orders().unwrap();
        assert_eq!(market.order_type, OrderType::Market);
        assert_eq!(market.size, Quantity::from(700));
        assert!(book.ask_market_orders().is_none());
        // Market levels live outside the priced ordering
        assert!(!book.has_bid());
    }

    #[rstest]
    fn test_clear_resets_book() {
        let mut book = book();
        book.add_level(limit_level("100.00", BookSide::Bid, 10)).unwrap();
        book.add_entry(
            book_entry("m1", 700, 1),
            Price::zero(0),
            BookSide::Ask,
            OrderType::Market,
            UnixNanos::new(1),
        );
        book.quality = DataQuality::Stale;

        book.clear();
        assert!(!book.has_bid());
        assert!(book.ask_market_orders().is_none());
        assert_eq!(book.quality, DataQuality::Ok);
    }

    #[rstest]
    fn test_assert_equal() {
        let mut lhs = book();
        let mut rhs = book();
        assert!(lhs.assert_equal(&rhs).is_ok());

        lhs.add_level(limit_level("100.00", BookSide::Bid, 10)).unwrap();
        assert!(matches!(
            lhs.assert_equal(&rhs),
            Err(BookIntegrityError::LevelCountMismatch { side: BookSide::Bid, lhs: 1, rhs: 0 })
        ));

        rhs.add_level(limit_level("100.00", BookSide::Bid, 20)).unwrap();
        assert!(matches!(
            lhs.assert_equal(&rhs),
            Err(BookIntegrityError::LevelMismatch { side: BookSide::Bid, .. })
        ));

        let other = Book::new(Symbol::from("MSFT.XNGS"));
        assert!(matches!(
            lhs.assert_equal(&other),
            Err(BookIntegrityError::SymbolMismatch(..))
        ));
    }

    #[rstest]
    fn test_dump_trace() {
        let mut book = book();
        book.add_entry(
            book_entry("e1", 1000, 1),
            Price::from("100.00"),
            BookSide::Bid,
            OrderType::Limit,
            UnixNanos::new(1),
        );

        let mut out = Vec::new();
        book.dump(&mut out).unwrap();
        let trace = String::from_utf8(out).unwrap();
        assert!(trace.contains("Dump book: AAPL.XNGS"));
        assert!(trace.contains("Bid 0 | price=100.00 size=1000"));
        assert!(trace.contains("id=e1 size=1000"));
    }

    #[rstest]
    fn test_shared_book_reader_snapshot_while_writer_mutates() {
        let shared: crate::orderbook::SharedBook = Arc::new(RwLock::new(book()));

        let writer = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for i in 0..100u64 {
                    let mut book = shared.write().unwrap();
                    book.add_entry(
                        book_entry("e1", 100 + i, i),
                        Price::from("100.00"),
                        BookSide::Bid,
                        OrderType::Limit,
                        UnixNanos::new(i),
                    );
                }
            })
        };

        let reader = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let book = shared.read().unwrap();
                    // A consistent multi-field view under one read lock
                    if let Some(level) = book.level_at_price(Price::from("100.00"), BookSide::Bid)
                    {
                        let summed: u64 = level.entries().map(|e| e.size.raw).sum();
                        assert_eq!(level.size.raw, summed);
                    }
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();

        let book = shared.read().unwrap();
        assert_eq!(
            book.level_at_price(Price::from("100.00"), BookSide::Bid).unwrap().size,
            Quantity::from(199)
        );
    }
}
