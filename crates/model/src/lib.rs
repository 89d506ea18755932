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

//! The market-data domain model for TideBook.
//!
//! The centerpiece of this crate is the order book reconciliation engine in
//! the [`orderbook`] module: a feed-consuming layer delivers typed
//! [`events::BookEvent`] streams per symbol, the
//! [`orderbook::AtomicBookBuilder`] applies them one at a time to a queryable
//! [`orderbook::Book`], and a publishing layer serializes recap or delta
//! [`orderbook::BookMsg`]s outward.
//!
//! The crate has no wire protocol or transport of its own; it is a library
//! invoked by external feed and publishing layers.
//!
//! # Feature flags
//!
//! - `stubs`: exposes the test stub/fixture modules for use by downstream
//!   crates' test suites.

pub mod enums;
pub mod events;
pub mod identifiers;
pub mod orderbook;
pub mod types;
