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

//! Reconciles atomic feed updates into a coherent order book.
//!
//! Feeds deliver either level-only updates with no entry detail (legacy
//! aggregated feeds) or per-entry updates where the accompanying level header
//! fields are not dependable (entry feeds). The builder works correctly for
//! both without knowing in advance which mode is active for a given envelope,
//! by deferring every level by exactly one step:
//!
//! - A level event is buffered, not applied. Any previously buffered level is
//!   applied first.
//! - An entry event is applied directly and *claims* the buffered level — the
//!   buffer is discarded, because in entry mode the level header size, action,
//!   and entry-count fields must not be trusted.
//! - End-of-book flushes a still-buffered level (the last level in the
//!   envelope had no trailing entries).

use super::{BookConflict, book::Book, entry::BookEntry, level::PriceLevel};
use crate::{
    enums::{BookAction, DataQuality, OrderType},
    events::{BookEvent, EntryEvent, LevelEvent, SeqGap},
    identifiers::Symbol,
};

/// Configuration for an [`AtomicBookBuilder`].
///
/// An explicit per-book configuration object: every builder is independently
/// configured, so multiple books with different settings can coexist in one
/// process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookConfig {
    /// The symbol the book is subscribed to.
    pub symbol: Symbol,
    /// Whether unpriced market-order levels are maintained (skipped otherwise).
    pub process_market_orders: bool,
    /// Whether the book records changes for outbound delta generation.
    pub generate_deltas: bool,
}

impl BookConfig {
    /// Creates a new [`BookConfig`] instance with default settings.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            process_market_orders: false,
            generate_deltas: false,
        }
    }
}

/// The one-step-deferred level buffer.
///
/// `Buffered` holds a level which has been received but not yet applied; a
/// following entry event for the same envelope claims it (resetting to
/// `None`), otherwise the next level event or end-of-book applies it.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PendingLevel {
    /// No level is awaiting application.
    #[default]
    None,
    /// A level awaiting application or claim by a following entry event.
    Buffered(LevelEvent),
}

/// Builds and maintains a [`Book`] from a stream of atomic feed events.
///
/// Exactly one builder owns each book for writing; see the crate-level
/// documentation for the locking discipline around shared reads.
#[derive(Clone, Debug)]
pub struct AtomicBookBuilder {
    book: Book,
    pending: PendingLevel,
    process_market_orders: bool,
    awaiting_recap: bool,
    last_seq: u64,
    last_gap: Option<SeqGap>,
}

impl AtomicBookBuilder {
    /// Creates a new [`AtomicBookBuilder`] instance from `config`.
    #[must_use]
    pub fn new(config: BookConfig) -> Self {
        let mut book = Book::new(config.symbol);
        book.set_generate_deltas(config.generate_deltas);
        Self {
            book,
            pending: PendingLevel::None,
            process_market_orders: config.process_market_orders,
            awaiting_recap: false,
            last_seq: 0,
            last_gap: None,
        }
    }

    /// Returns a reference to the maintained book.
    #[must_use]
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Returns a mutable reference to the maintained book.
    ///
    /// Used by publishing layers for `populate_recap`/`populate_delta`; the
    /// caller must hold the book's write lock for the duration.
    #[must_use]
    pub fn book_mut(&mut self) -> &mut Book {
        &mut self.book
    }

    /// Returns the pending-level state (primarily for tests and diagnostics).
    #[must_use]
    pub fn pending(&self) -> &PendingLevel {
        &self.pending
    }

    /// Takes the most recently surfaced sequence gap, if any.
    ///
    /// The book is left as-is when a gap is detected; requesting a fresh recap
    /// from the feed layer is the consumer's responsibility.
    pub fn take_gap(&mut self) -> Option<SeqGap> {
        self.last_gap.take()
    }

    /// Applies a single feed event to the book.
    ///
    /// Malformed events are logged and skipped; no event aborts processing of
    /// the rest of the envelope or the session.
    pub fn apply(&mut self, event: &BookEvent) {
        match event {
            BookEvent::BeginBook { is_recap, seq_num } => self.on_begin_book(*is_recap, *seq_num),
            BookEvent::Level(level) => self.on_level(level),
            BookEvent::Entry(entry) => self.on_entry(entry),
            BookEvent::EndBook => self.on_end_book(),
            BookEvent::Clear => self.on_clear(),
            BookEvent::Gap(gap) => self.on_gap(*gap),
            BookEvent::Quality(quality) => self.on_quality(*quality),
        }
    }

    /// Applies a full envelope of feed events in order.
    pub fn apply_all(&mut self, events: &[BookEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    /// Handles the start of a book-update envelope.
    ///
    /// A recap envelope performs a full resync: the book is cleared and the
    /// data quality and consistency flags are restored.
    fn on_begin_book(&mut self, is_recap: bool, seq_num: u64) {
        if seq_num != 0 && self.last_seq != 0 && seq_num > self.last_seq + 1 {
            let gap = SeqGap::new(self.last_seq + 1, seq_num - 1);
            log::warn!("Sequence gap detected for {}: {gap}", self.book.symbol);
            self.last_gap = Some(gap);
            self.book.is_consistent = false;
        }
        if seq_num != 0 {
            self.last_seq = seq_num;
        }

        if is_recap {
            self.book.clear();
            self.book.is_consistent = true;
            self.awaiting_recap = false;
        }
    }

    /// Handles a level event by applying any previously buffered level and
    /// buffering this one (deferred by exactly one step).
    fn on_level(&mut self, event: &LevelEvent) {
        if let PendingLevel::Buffered(buffered) = std::mem::take(&mut self.pending) {
            self.apply_level(&buffered);
        }
        self.pending = PendingLevel::Buffered(*event);
    }

    /// Handles an entry event by applying it directly and claiming any
    /// buffered level, whose header fields must not be trusted in entry mode.
    fn on_entry(&mut self, event: &EntryEvent) {
        self.apply_entry(event);
        self.pending = PendingLevel::None;
    }

    /// Handles the end of a book-update envelope, flushing a still-buffered
    /// level (the last level in the envelope had no trailing entries).
    fn on_end_book(&mut self) {
        if let PendingLevel::Buffered(buffered) = std::mem::take(&mut self.pending) {
            self.apply_level(&buffered);
        }
    }

    /// Handles an explicit clear instruction from the feed.
    fn on_clear(&mut self) {
        log::debug!("Clear received for {}", self.book.symbol);
        self.book.clear();
        self.pending = PendingLevel::None;
    }

    /// Surfaces a feed-reported sequence gap without attempting local repair.
    fn on_gap(&mut self, gap: SeqGap) {
        log::warn!("Book gap for {} ({}-{})", self.book.symbol, gap.begin, gap.end);
        self.last_gap = Some(gap);
        self.book.is_consistent = false;
    }

    /// Handles a data-quality transition from the feed.
    ///
    /// Degraded quality halts mutation while the book retains its
    /// last-known-good state. Once quality returns to `Ok` a recap (not a
    /// delta) is still required to resynchronize, so deltas remain dropped
    /// until the next recap envelope.
    fn on_quality(&mut self, quality: DataQuality) {
        log::info!("Quality for {} now {quality}", self.book.symbol);
        self.book.quality = quality;
        if quality != DataQuality::Ok {
            self.awaiting_recap = true;
        }
    }

    /// Returns whether events may currently mutate the book.
    fn book_updatable(&self) -> bool {
        self.book.quality == DataQuality::Ok && !self.awaiting_recap
    }

    /// Applies a buffered level to the book per its action code.
    fn apply_level(&mut self, event: &LevelEvent) {
        if !self.book_updatable() {
            return;
        }
        if event.order_type == OrderType::Market && !self.process_market_orders {
            log::debug!("Skipping market-order level for {}", self.book.symbol);
            return;
        }

        match event.action {
            BookAction::Add => {
                if let Err(BookConflict::LevelExists { .. }) =
                    self.book.add_level(Self::level_from(event))
                {
                    // Already in the book; apply as a content change instead
                    if let Err(e) = self.book.update_level(Self::level_from(event)) {
                        log::error!("Add-level fallback failed for {}: {e}", self.book.symbol);
                    }
                }
            }
            BookAction::Update => {
                if let Err(BookConflict::LevelNotFound { .. }) =
                    self.book.update_level(Self::level_from(event))
                {
                    // Not yet in the book; recover with an implicit add
                    if let Err(e) = self.book.add_level(Self::level_from(event)) {
                        log::error!("Update-level fallback failed for {}: {e}", self.book.symbol);
                    }
                }
            }
            BookAction::Delete => {
                self.book.delete_level(&Self::level_from(event));
            }
            BookAction::Unknown => {
                log::warn!(
                    "Unknown level action for {}: {event}, event skipped",
                    self.book.symbol,
                );
            }
        }
    }

    /// Applies an entry event to the book per its action code.
    fn apply_entry(&mut self, event: &EntryEvent) {
        if !self.book_updatable() {
            return;
        }
        if event.order_type == OrderType::Market && !self.process_market_orders {
            log::debug!("Skipping market-order entry for {}", self.book.symbol);
            return;
        }

        match event.action {
            BookAction::Update => {
                let result = self.book.update_entry(
                    event.id,
                    event.size,
                    event.price,
                    event.side,
                    event.order_type,
                    event.time,
                );
                if result.is_err() {
                    // Update for an entry whose level does not exist yet is
                    // treated as an implicit add
                    log::debug!(
                        "Update for unknown level at {} ({}), adding entry {}",
                        event.price,
                        event.side,
                        event.id,
                    );
                    self.add_entry_from(event);
                }
            }
            BookAction::Add => self.add_entry_from(event),
            BookAction::Delete => {
                self.book.delete_entry(
                    &event.id,
                    event.price,
                    event.side,
                    event.order_type,
                    event.time,
                );
            }
            BookAction::Unknown => {
                log::warn!(
                    "Unknown entry action for {}: {event}, event skipped",
                    self.book.symbol,
                );
            }
        }
    }

    /// Builds a book-ready level from a level event.
    ///
    /// Inside the book the only action which makes sense for a resting level
    /// is `Add`, so the event's action code is not carried onto the level.
    fn level_from(event: &LevelEvent) -> PriceLevel {
        let mut level = PriceLevel::from_event(event);
        level.action = BookAction::Add;
        level
    }

    fn add_entry_from(&mut self, event: &EntryEvent) {
        self.book.add_entry(
            BookEntry::from_event(event),
            event.price,
            event.side,
            event.order_type,
            event.time,
        );
    }
}
