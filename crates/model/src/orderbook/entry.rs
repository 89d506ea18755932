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

//! Represents a single resting order within a price level.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tidebook_core::UnixNanos;
use ustr::Ustr;

use crate::{enums::BookAction, events::EntryEvent, identifiers::EntryId, types::Quantity};

/// Represents a single resting order within a price level.
///
/// An entry always belongs to exactly one level at a time; moving an entry to
/// a different price requires delete-then-add through the owning book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    /// The entry ID, unique within the owning level.
    pub id: EntryId,
    /// The size of the entry.
    pub size: Quantity,
    /// The action which produced the entry (always `Add` once resting in a book).
    pub action: BookAction,
    /// The time of the last update to the entry.
    pub time: UnixNanos,
    /// An optional feed-specific reason code for the last update.
    pub reason: Option<Ustr>,
    /// An optional feed-wide unique ID (e.g., participant plus entry ID).
    pub unique_id: Option<Ustr>,
}

impl BookEntry {
    /// Creates a new [`BookEntry`] instance.
    #[must_use]
    pub fn new(
        id: EntryId,
        size: Quantity,
        action: BookAction,
        time: UnixNanos,
        reason: Option<Ustr>,
    ) -> Self {
        Self {
            id,
            size,
            action,
            time,
            reason,
            unique_id: None,
        }
    }

    /// Returns the entry with the feed-wide unique ID set.
    #[must_use]
    pub fn with_unique_id(mut self, unique_id: Ustr) -> Self {
        self.unique_id = Some(unique_id);
        self
    }

    /// Creates a new [`BookEntry`] instance from an entry event.
    ///
    /// The action is forced to `Add`: once resting in a book the only action
    /// which makes sense for an entry is `Add`.
    #[must_use]
    pub fn from_event(event: &EntryEvent) -> Self {
        Self {
            id: event.id,
            size: event.size,
            action: BookAction::Add,
            time: event.time,
            reason: event.reason,
            unique_id: None,
        }
    }

    /// Updates the entry size and time in place.
    pub fn set_details(&mut self, size: Quantity, time: UnixNanos) {
        self.size = size;
        self.time = time;
    }
}

impl Display for BookEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({},size={},time={})",
            stringify!(BookEntry),
            self.id,
            self.size,
            self.time.as_u64(),
        )
    }
}
