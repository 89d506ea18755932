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

//! Represents a ladder of price levels for one side of an order book.

use std::{cmp::Ordering, collections::BTreeMap, fmt::Display};

use super::{BookConflict, level::PriceLevel};
use crate::{enums::BookSide, types::Price};

/// Represents a price with a specified side in an order book ladder.
///
/// # Comparison Semantics
///
/// `BookPrice` instances are only meaningfully compared within the same side
/// (i.e., within a single `BookLadder`). Cross-side comparisons are not expected
/// in normal use, as bid and ask ladders maintain separate
/// `BTreeMap<BookPrice, PriceLevel>` collections.
///
/// - Equality requires both `value` and `side` to match.
/// - Ordering is side-dependent: the bid side sorts descending, the ask side
///   ascending, which puts the best price first in either ladder.
#[derive(Clone, Copy, Debug, Eq)]
pub struct BookPrice {
    pub value: Price,
    pub side: BookSide,
}

impl BookPrice {
    /// Creates a new [`BookPrice`] instance.
    #[must_use]
    pub fn new(value: Price, side: BookSide) -> Self {
        Self { value, side }
    }
}

impl PartialEq for BookPrice {
    fn eq(&self, other: &Self) -> bool {
        self.side == other.side && self.value == other.value
    }
}

impl PartialOrd for BookPrice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BookPrice {
    fn cmp(&self, other: &Self) -> Ordering {
        assert_eq!(
            self.side, other.side,
            "BookPrice compared across sides: {:?} vs {:?}",
            self.side, other.side
        );

        match self.side {
            BookSide::Bid => other.value.cmp(&self.value),
            BookSide::Ask => self.value.cmp(&other.value),
        }
    }
}

impl Display for BookPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents a ladder of priced levels for one side of an order book.
///
/// Iteration order is always best-to-worst for the ladder's side; there is no
/// explicit best-price field because the ordering comparator determines it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BookLadder {
    pub side: BookSide,
    pub levels: BTreeMap<BookPrice, PriceLevel>,
}

impl BookLadder {
    /// Creates a new [`BookLadder`] instance.
    #[must_use]
    pub fn new(side: BookSide) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Returns the number of price levels in the ladder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if the ladder has no price levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Removes all price levels (and their entries) from the ladder.
    pub fn clear(&mut self) {
        self.levels.clear();
    }

    /// Inserts a new priced level into the ladder.
    ///
    /// # Errors
    ///
    /// Returns [`BookConflict::LevelExists`] without mutating the ladder if a
    /// level at the same price is already present; the caller is expected to
    /// fall back to [`BookLadder::update_level`].
    pub fn add_level(&mut self, level: PriceLevel) -> Result<(), BookConflict> {
        debug_assert_eq!(level.side, self.side, "level side must match ladder side");

        let key = BookPrice::new(level.price, self.side);
        if self.levels.contains_key(&key) {
            return Err(BookConflict::LevelExists {
                side: self.side,
                price: level.price,
            });
        }
        self.levels.insert(key, level);
        Ok(())
    }

    /// Updates the existing level at the incoming level's price.
    ///
    /// Entries carried by `level` are applied per their action codes, then the
    /// header fields replace the stored level's details.
    ///
    /// # Errors
    ///
    /// Returns [`BookConflict::LevelNotFound`] if no level exists at that
    /// price; the caller is expected to fall back to [`BookLadder::add_level`].
    pub fn update_level(&mut self, level: PriceLevel) -> Result<(), BookConflict> {
        debug_assert_eq!(level.side, self.side, "level side must match ladder side");

        let key = BookPrice::new(level.price, self.side);
        match self.levels.get_mut(&key) {
            Some(found) => {
                found.merge_update(&level);
                Ok(())
            }
            None => Err(BookConflict::LevelNotFound {
                side: self.side,
                price: level.price,
            }),
        }
    }

    /// Removes the level at `price` entirely, including all its entries.
    ///
    /// Returns `None` if no level exists at that price; deletion of an
    /// already-absent level is not an error for the caller.
    pub fn delete_level(&mut self, price: Price) -> Option<PriceLevel> {
        let key = BookPrice::new(price, self.side);
        let removed = self.levels.remove(&key);
        if removed.is_none() {
            log::info!("delete_level: no level at {price} ({})", self.side);
        }
        removed
    }

    /// Returns the level at `price`, or `None` if absent.
    ///
    /// Distinguishes "no level" from "level with zero entries": an existing
    /// level is returned even when it tracks no entries.
    #[must_use]
    pub fn level_at_price(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&BookPrice::new(price, self.side))
    }

    /// Returns a mutable reference to the level at `price`, or `None` if absent.
    #[must_use]
    pub fn level_at_price_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&BookPrice::new(price, self.side))
    }

    /// Returns the best price level in the ladder.
    #[must_use]
    pub fn top(&self) -> Option<&PriceLevel> {
        self.levels.values().next()
    }

    /// Returns a lazy iterator over the levels in best-to-worst order.
    ///
    /// The iterator is restartable: each call produces a fresh traversal.
    pub fn iter(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values()
    }

    /// Returns the total aggregate size across all levels in the ladder.
    #[must_use]
    pub fn sizes(&self) -> f64 {
        self.levels.values().map(PriceLevel::size_f64).sum()
    }
}

impl Display for BookLadder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}(side={})", stringify!(BookLadder), self.side)?;
        for (price, level) in &self.levels {
            writeln!(f, "  {} -> {} entries", price, level.len())?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::enums::OrderType;
    use crate::types::Quantity;

    fn limit_level(price: &str, side: BookSide, size: u64) -> PriceLevel {
        let mut level = PriceLevel::new(Price::from(price), side, OrderType::Limit);
        level.size = Quantity::from(size);
        level
    }

    #[rstest]
    fn test_book_price_bid_sorting() {
        let mut bid_prices = [
            BookPrice::new(Price::from("2.0"), BookSide::Bid),
            BookPrice::new(Price::from("4.0"), BookSide::Bid),
            BookPrice::new(Price::from("1.0"), BookSide::Bid),
            BookPrice::new(Price::from("3.0"), BookSide::Bid),
        ];
        bid_prices.sort();
        assert_eq!(bid_prices[0].value, Price::from("4.0"));
    }

    #[rstest]
    fn test_book_price_ask_sorting() {
        let mut ask_prices = [
            BookPrice::new(Price::from("2.0"), BookSide::Ask),
            BookPrice::new(Price::from("4.0"), BookSide::Ask),
            BookPrice::new(Price::from("1.0"), BookSide::Ask),
            BookPrice::new(Price::from("3.0"), BookSide::Ask),
        ];
        ask_prices.sort();
        assert_eq!(ask_prices[0].value, Price::from("1.0"));
    }

    #[rstest]
    #[should_panic(expected = "BookPrice compared across sides")]
    fn test_book_price_cross_side_comparison_panics() {
        let bid = BookPrice::new(Price::from("1.0"), BookSide::Bid);
        let ask = BookPrice::new(Price::from("1.0"), BookSide::Ask);
        let _ = bid.cmp(&ask);
    }

    #[rstest]
    fn test_add_level() {
        let mut ladder = BookLadder::new(BookSide::Bid);
        assert!(ladder.add_level(limit_level("100.00", BookSide::Bid, 10)).is_ok());
        assert_eq!(ladder.len(), 1);
        assert!(!ladder.is_empty());
    }

    #[rstest]
    fn test_add_existing_level_fails_without_mutation() {
        let mut ladder = BookLadder::new(BookSide::Bid);
        ladder.add_level(limit_level("100.00", BookSide::Bid, 10)).unwrap();

        let result = ladder.add_level(limit_level("100.00", BookSide::Bid, 99));
        assert_eq!(
            result,
            Err(BookConflict::LevelExists {
                side: BookSide::Bid,
                price: Price::from("100.00"),
            })
        );
        // Existing level untouched
        assert_eq!(
            ladder.level_at_price(Price::from("100.00")).unwrap().size,
            Quantity::from(10)
        );
    }

    #[rstest]
    fn test_update_missing_level_fails() {
        let mut ladder = BookLadder::new(BookSide::Ask);
        let result = ladder.update_level(limit_level("100.00", BookSide::Ask, 10));
        assert_eq!(
            result,
            Err(BookConflict::LevelNotFound {
                side: BookSide::Ask,
                price: Price::from("100.00"),
            })
        );
    }

    #[rstest]
    fn test_update_level_replaces_details() {
        let mut ladder = BookLadder::new(BookSide::Bid);
        ladder.add_level(limit_level("100.00", BookSide::Bid, 10)).unwrap();
        ladder.update_level(limit_level("100.00", BookSide::Bid, 25)).unwrap();

        let level = ladder.level_at_price(Price::from("100.00")).unwrap();
        assert_eq!(level.size, Quantity::from(25));
        assert_eq!(level.size_change, Quantity::from(15).raw as i64);
    }

    #[rstest]
    fn test_delete_level_is_idempotent() {
        let mut ladder = BookLadder::new(BookSide::Bid);
        ladder.add_level(limit_level("100.00", BookSide::Bid, 10)).unwrap();

        assert!(ladder.delete_level(Price::from("100.00")).is_some());
        assert!(ladder.delete_level(Price::from("100.00")).is_none());
        assert!(ladder.is_empty());
    }

    #[rstest]
    fn test_bid_iteration_best_to_worst() {
        let mut ladder = BookLadder::new(BookSide::Bid);
        for price in ["99.00", "101.00", "100.00"] {
            ladder.add_level(limit_level(price, BookSide::Bid, 10)).unwrap();
        }

        let prices: Vec<Price> = ladder.iter().map(|l| l.price).collect();
        assert_eq!(
            prices,
            vec![Price::from("101.00"), Price::from("100.00"), Price::from("99.00")]
        );
        assert_eq!(ladder.top().unwrap().price, Price::from("101.00"));
    }

    #[rstest]
    fn test_ask_iteration_best_to_worst() {
        let mut ladder = BookLadder::new(BookSide::Ask);
        for price in ["102.00", "100.00", "101.00"] {
            ladder.add_level(limit_level(price, BookSide::Ask, 10)).unwrap();
        }

        let prices: Vec<Price> = ladder.iter().map(|l| l.price).collect();
        assert_eq!(
            prices,
            vec![Price::from("100.00"), Price::from("101.00"), Price::from("102.00")]
        );
        assert_eq!(ladder.top().unwrap().price, Price::from("100.00"));
    }

    #[rstest]
    fn test_iterator_is_restartable() {
        let mut ladder = BookLadder::new(BookSide::Bid);
        ladder.add_level(limit_level("100.00", BookSide::Bid, 10)).unwrap();

        assert_eq!(ladder.iter().count(), 1);
        assert_eq!(ladder.iter().count(), 1);
    }

    #[rstest]
    fn test_sizes() {
        let mut ladder = BookLadder::new(BookSide::Bid);
        ladder.add_level(limit_level("100.00", BookSide::Bid, 10)).unwrap();
        ladder.add_level(limit_level("99.00", BookSide::Bid, 30)).unwrap();
        assert_eq!(ladder.sizes(), 40.0);
    }

    #[rstest]
    fn test_clear() {
        let mut ladder = BookLadder::new(BookSide::Ask);
        ladder.add_level(limit_level("100.00", BookSide::Ask, 10)).unwrap();
        ladder.clear();
        assert!(ladder.is_empty());
        assert!(ladder.top().is_none());
    }
}
