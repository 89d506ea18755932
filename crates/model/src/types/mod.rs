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

//! Value types for the market-data domain model.
//!
//! This module provides the immutable value types [`Price`] and [`Quantity`],
//! which use fixed-point arithmetic internally for deterministic calculations
//! while providing a natural numeric interface.
//!
//! # Precision
//!
//! Each value type stores a precision field indicating the number of decimal
//! places used for display. The maximum precision is defined by
//! [`fixed::FIXED_PRECISION`]. Equality and ordering are determined by the raw
//! fixed-point value alone, so precision never affects comparisons.
//!
//! # Constraints
//!
//! - [`Quantity`]: Non-negative values only; aggregate maintenance uses the
//!   saturating helpers rather than panicking arithmetic.
//! - [`Price`]: Signed values allowed (can represent negative prices for
//!   options and spreads).

pub mod fixed;
pub mod price;
pub mod quantity;

// Re-exports
pub use price::{PRICE_MAX, PRICE_MIN, Price, PriceRaw};
pub use quantity::{QUANTITY_MAX, Quantity, QuantityRaw};
