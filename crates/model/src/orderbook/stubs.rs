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

//! Stub builders and fixtures for order book testing.

use rstest::fixture;
use tidebook_core::UnixNanos;

use super::{book::Book, entry::BookEntry, level::PriceLevel};
use crate::{
    enums::{BookAction, BookSide, OrderType},
    events::{BookEvent, EntryEvent, LevelEvent},
    identifiers::{EntryId, Symbol},
    types::{Price, Quantity},
};

/// Builds a limit [`LevelEvent`] with one-line ergonomics for tests.
#[must_use]
pub fn level_event(price: &str, side: BookSide, size: u64, action: BookAction) -> LevelEvent {
    LevelEvent::new(
        Price::from(price),
        side,
        Quantity::from(size),
        0,
        action,
        1,
        UnixNanos::new(1),
        OrderType::Limit,
        false,
    )
}

/// Builds a limit [`EntryEvent`] with one-line ergonomics for tests.
#[must_use]
pub fn entry_event(id: &str, price: &str, side: BookSide, size: u64, action: BookAction) -> EntryEvent {
    EntryEvent::new(
        EntryId::from(id),
        Price::from(price),
        side,
        Quantity::from(size),
        action,
        UnixNanos::new(1),
        None,
        OrderType::Limit,
        false,
    )
}

/// Builds a resting [`BookEntry`].
#[must_use]
pub fn book_entry(id: &str, size: u64, time: u64) -> BookEntry {
    BookEntry::new(
        EntryId::from(id),
        Quantity::from(size),
        BookAction::Add,
        UnixNanos::new(time),
        None,
    )
}

/// Builds an entry-less limit [`PriceLevel`] carrying an aggregate size.
#[must_use]
pub fn limit_level(price: &str, side: BookSide, size: u64) -> PriceLevel {
    let mut level = PriceLevel::new(Price::from(price), side, OrderType::Limit);
    level.size = Quantity::from(size);
    level
}

/// A canonical recap envelope: two bid levels and one ask level, level-only.
#[must_use]
pub fn recap_envelope() -> Vec<BookEvent> {
    vec![
        BookEvent::BeginBook {
            is_recap: true,
            seq_num: 0,
        },
        BookEvent::Level(level_event("100.00", BookSide::Bid, 1000, BookAction::Add)),
        BookEvent::Level(level_event("99.00", BookSide::Bid, 500, BookAction::Add)),
        BookEvent::Level(level_event("101.00", BookSide::Ask, 800, BookAction::Add)),
        BookEvent::EndBook,
    ]
}

/// A canonical delta envelope updating the best bid of [`recap_envelope`].
#[must_use]
pub fn delta_envelope() -> Vec<BookEvent> {
    vec![
        BookEvent::BeginBook {
            is_recap: false,
            seq_num: 0,
        },
        BookEvent::Level(level_event("100.00", BookSide::Bid, 750, BookAction::Update)),
        BookEvent::EndBook,
    ]
}

/// A small populated book with entry detail on both sides.
#[fixture]
pub fn stub_book() -> Book {
    let mut book = Book::new(Symbol::from("AAPL.XNGS"));
    book.add_entry(
        book_entry("b1", 1000, 1),
        Price::from("100.00"),
        BookSide::Bid,
        OrderType::Limit,
        UnixNanos::new(1),
    );
    book.add_entry(
        book_entry("b2", 500, 2),
        Price::from("99.00"),
        BookSide::Bid,
        OrderType::Limit,
        UnixNanos::new(2),
    );
    book.add_entry(
        book_entry("a1", 800, 3),
        Price::from("101.00"),
        BookSide::Ask,
        OrderType::Limit,
        UnixNanos::new(3),
    );
    book.add_entry(
        book_entry("a2", 300, 4),
        Price::from("102.00"),
        BookSide::Ask,
        OrderType::Limit,
        UnixNanos::new(4),
    );
    book
}
