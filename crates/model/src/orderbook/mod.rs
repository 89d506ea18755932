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

//! The order book reconciliation engine.
//!
//! Three cooperating layers maintain a coherent, queryable book from a stream
//! of partial, possibly action-ambiguous feed updates:
//!
//! - [`Book`] (with its ladders, levels, and entries): the price-level store,
//!   ordered best-to-worst per side, with one optional unpriced market-order
//!   level per side.
//! - [`AtomicBookBuilder`]: the update reconciler, applying level and entry
//!   events with one-step-deferred level application, add⇄update fallback
//!   recovery, gap surfacing, and data-quality gating.
//! - The publisher ([`BookMsg`], `populate_recap`/`populate_delta`): walks the
//!   store and serializes either a full snapshot or only the levels/entries
//!   mutated since the last call.
//!
//! # Concurrency
//!
//! Every type here is a plain value type with no interior locking. The
//! supported deployment is exactly one writer thread per book (the thread
//! dispatching feed events for that symbol) and any number of reader threads,
//! mediated by a [`SharedBook`]: writers take the write lock for each event or
//! envelope, readers take the read lock for each consistent multi-field view.
//! No operation blocks on I/O and every operation runs to completion.

pub mod book;
pub mod builder;
pub mod display;
pub mod entry;
pub mod ladder;
pub mod level;
pub mod publisher;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::{enums::BookSide, identifiers::Symbol, types::Price};

// Re-exports
pub use book::Book;
pub use builder::{AtomicBookBuilder, BookConfig, PendingLevel};
pub use entry::BookEntry;
pub use ladder::BookPrice;
pub use level::PriceLevel;
pub use publisher::{BookMsg, BookMsgType, EntryUpdate, LevelUpdate};

/// A shared handle to a [`Book`] for the one-writer/N-reader deployment.
///
/// Writers must hold the write lock for every mutating sequence (one event or
/// one full envelope, and `populate_recap`/`populate_delta` calls); readers
/// must hold the read lock for every consistent multi-field view. Lock hold
/// time for a delta is O(dirty-set size), not O(book size).
pub type SharedBook = Arc<RwLock<Book>>;

/// An expected, recoverable structural conflict from a store operation.
///
/// These are normal branches on the hot per-event path, resolved locally by
/// the caller's add⇄update fallback; they are never propagated further.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BookConflict {
    /// A level already exists at the price and side.
    #[error("level already exists at {price} ({side})")]
    LevelExists {
        /// The side of the conflicting level.
        side: BookSide,
        /// The price of the conflicting level.
        price: Price,
    },
    /// No level exists at the price and side.
    #[error("no level at {price} ({side})")]
    LevelNotFound {
        /// The side searched.
        side: BookSide,
        /// The price searched.
        price: Price,
    },
}

/// A structural violation found when verifying book state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BookIntegrityError {
    /// The books are keyed by different symbols.
    #[error("symbol mismatch: {0} vs {1}")]
    SymbolMismatch(Symbol, Symbol),
    /// One side holds a different number of levels.
    #[error("{side} level count mismatch: {lhs} vs {rhs}")]
    LevelCountMismatch {
        /// The side with the mismatch.
        side: BookSide,
        /// The left-hand book's level count.
        lhs: usize,
        /// The right-hand book's level count.
        rhs: usize,
    },
    /// A pair of levels at the same position differ.
    #[error("{side} levels not equal: {detail}")]
    LevelMismatch {
        /// The side with the mismatch.
        side: BookSide,
        /// A description of the first difference found.
        detail: String,
    },
    /// The market-order levels differ.
    #[error("{side} market-order levels not equal: {detail}")]
    MarketOrdersMismatch {
        /// The side with the mismatch.
        side: BookSide,
        /// A description of the first difference found.
        detail: String,
    },
}
