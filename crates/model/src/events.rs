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

//! Typed events delivered by the feed/dispatch layer.
//!
//! Events for a given symbol arrive strictly in feed sequence order and are
//! grouped into book-update envelopes bounded by [`BookEvent::BeginBook`] and
//! [`BookEvent::EndBook`] markers. A single envelope may carry level-only
//! updates (legacy aggregated feeds), per-entry updates (entry feeds), or a
//! mixture of both; resolving that ambiguity is the job of the
//! [`AtomicBookBuilder`](crate::orderbook::AtomicBookBuilder).

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tidebook_core::UnixNanos;
use ustr::Ustr;

use crate::{
    enums::{BookAction, BookSide, DataQuality, OrderType},
    identifiers::EntryId,
    types::{Price, Quantity},
};

/// A price-level update delivered by the feed.
///
/// When an entry feed is active, the `size`, `size_change`, `action`, and
/// `num_entries` header fields are not dependable and must not be applied to
/// the book; the following [`EntryEvent`]s carry the authoritative detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEvent {
    /// The price of the level (zero for market-order levels).
    pub price: Price,
    /// The side of the book the level belongs to.
    pub side: BookSide,
    /// The aggregate size at the level.
    pub size: Quantity,
    /// The signed raw fixed-point change in aggregate size since the last event.
    pub size_change: i64,
    /// The action to apply.
    pub action: BookAction,
    /// The number of entries at the level.
    pub num_entries: u32,
    /// The time of the update.
    pub time: UnixNanos,
    /// Whether the level is priced (limit) or unpriced (market).
    pub order_type: OrderType,
    /// Whether the event belongs to a recap (full snapshot) or a delta.
    pub is_recap: bool,
}

impl LevelEvent {
    /// Creates a new [`LevelEvent`] instance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        price: Price,
        side: BookSide,
        size: Quantity,
        size_change: i64,
        action: BookAction,
        num_entries: u32,
        time: UnixNanos,
        order_type: OrderType,
        is_recap: bool,
    ) -> Self {
        Self {
            price,
            side,
            size,
            size_change,
            action,
            num_entries,
            time,
            order_type,
            is_recap,
        }
    }
}

impl Display for LevelEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({},{},size={},action={},entries={})",
            stringify!(LevelEvent),
            self.side,
            self.price,
            self.size,
            self.action,
            self.num_entries,
        )
    }
}

/// A single-entry update delivered by the feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryEvent {
    /// The entry ID, unique within its level.
    pub id: EntryId,
    /// The price of the owning level (zero for market-order levels).
    pub price: Price,
    /// The side of the book the entry belongs to.
    pub side: BookSide,
    /// The size of the entry.
    pub size: Quantity,
    /// The action to apply.
    pub action: BookAction,
    /// The time of the update.
    pub time: UnixNanos,
    /// An optional feed-specific reason code for the update.
    pub reason: Option<Ustr>,
    /// Whether the owning level is priced (limit) or unpriced (market).
    pub order_type: OrderType,
    /// Whether the event belongs to a recap (full snapshot) or a delta.
    pub is_recap: bool,
}

impl EntryEvent {
    /// Creates a new [`EntryEvent`] instance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: EntryId,
        price: Price,
        side: BookSide,
        size: Quantity,
        action: BookAction,
        time: UnixNanos,
        reason: Option<Ustr>,
        order_type: OrderType,
        is_recap: bool,
    ) -> Self {
        Self {
            id,
            price,
            side,
            size,
            action,
            time,
            reason,
            order_type,
            is_recap,
        }
    }
}

impl Display for EntryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({},{},{},size={},action={})",
            stringify!(EntryEvent),
            self.id,
            self.side,
            self.price,
            self.size,
            self.action,
        )
    }
}

/// A detected discontinuity in feed sequence numbers.
///
/// The book is left as-is when a gap is reported; recovery is the feed
/// layer's responsibility (typically by requesting a fresh recap).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqGap {
    /// The first missed sequence number.
    pub begin: u64,
    /// The last missed sequence number.
    pub end: u64,
}

impl SeqGap {
    /// Creates a new [`SeqGap`] instance.
    #[must_use]
    pub fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }
}

impl Display for SeqGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}-{})", stringify!(SeqGap), self.begin, self.end)
    }
}

/// A typed event in the per-symbol feed stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BookEvent {
    /// Marks the start of a book-update envelope.
    BeginBook {
        /// Whether the envelope is a recap (full resync) or a delta.
        is_recap: bool,
        /// The feed sequence number of the envelope (zero if unsequenced).
        seq_num: u64,
    },
    /// A price-level update within the current envelope.
    Level(LevelEvent),
    /// A single-entry update within the current envelope.
    Entry(EntryEvent),
    /// Marks the end of a book-update envelope.
    EndBook,
    /// An explicit instruction to empty the book.
    Clear,
    /// A sequence-number gap reported by the feed layer.
    Gap(SeqGap),
    /// A data-quality transition reported by the feed layer.
    Quality(DataQuality),
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn level_event() -> LevelEvent {
        LevelEvent::new(
            Price::from("100.50"),
            BookSide::Bid,
            Quantity::from(1000),
            0,
            BookAction::Add,
            1,
            UnixNanos::new(1),
            OrderType::Limit,
            false,
        )
    }

    #[rstest]
    fn test_level_event_display() {
        assert_eq!(
            level_event().to_string(),
            "LevelEvent(BID,100.50,size=1000,action=ADD,entries=1)"
        );
    }

    #[rstest]
    fn test_entry_event_display() {
        let event = EntryEvent::new(
            EntryId::from("e1"),
            Price::from("100.50"),
            BookSide::Ask,
            Quantity::from(250),
            BookAction::Update,
            UnixNanos::new(2),
            None,
            OrderType::Limit,
            true,
        );
        assert_eq!(
            event.to_string(),
            "EntryEvent(e1,ASK,100.50,size=250,action=UPDATE)"
        );
    }

    #[rstest]
    fn test_book_event_serde_round_trip() {
        let events = vec![
            BookEvent::BeginBook {
                is_recap: true,
                seq_num: 7,
            },
            BookEvent::Level(level_event()),
            BookEvent::EndBook,
            BookEvent::Gap(SeqGap::new(8, 10)),
            BookEvent::Quality(DataQuality::Stale),
        ];
        let json = serde_json::to_string(&events).unwrap();
        let parsed: Vec<BookEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, events);
    }
}
