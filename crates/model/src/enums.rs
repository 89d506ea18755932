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

//! Enumerations for the market-data domain model.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, FromRepr};

/// The side of a book level or entry in the market.
#[repr(u8)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookSide {
    /// The bid (buy) side of the book.
    Bid = 1,
    /// The ask (sell) side of the book.
    Ask = 2,
}

impl BookSide {
    /// Returns the opposite side of the book.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Self::Bid => Self::Ask,
            Self::Ask => Self::Bid,
        }
    }
}

/// The action code carried by a level or entry update.
#[repr(u8)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookAction {
    /// An unrecognized action code; logged and ignored by the reconciler.
    Unknown = 0,
    /// Create the level or entry.
    Add = 1,
    /// Mutate the existing level or entry in place.
    Update = 2,
    /// Remove the level or entry.
    Delete = 3,
}

/// The order type of a price level.
#[repr(u8)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// A priced level, ordered within its side of the book.
    Limit = 1,
    /// An unpriced level, held outside the price ordering (one per side).
    Market = 2,
}

/// The health of the data feeding a book.
///
/// Any state other than `Ok` gates all mutation of the book: events are still
/// accepted from the feed but are not applied until a recap resynchronizes.
#[repr(u8)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQuality {
    /// No quality signal has been received for the feed yet.
    Unknown = 0,
    /// The feed is healthy and the book state can be trusted.
    Ok = 1,
    /// The feed may have missed updates; the book state is questionable.
    Suspect = 2,
    /// The feed is known stale; the book retains its last-known-good state.
    Stale = 3,
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(BookSide::Bid, "BID")]
    #[case(BookSide::Ask, "ASK")]
    fn test_book_side_display(#[case] side: BookSide, #[case] expected: &str) {
        assert_eq!(side.to_string(), expected);
        assert_eq!(BookSide::from_str(expected).unwrap(), side);
    }

    #[rstest]
    fn test_book_side_opposite() {
        assert_eq!(BookSide::Bid.opposite(), BookSide::Ask);
        assert_eq!(BookSide::Ask.opposite(), BookSide::Bid);
    }

    #[rstest]
    #[case(BookAction::Add, 1)]
    #[case(BookAction::Update, 2)]
    #[case(BookAction::Delete, 3)]
    #[case(BookAction::Unknown, 0)]
    fn test_book_action_from_repr(#[case] action: BookAction, #[case] repr: u8) {
        assert_eq!(BookAction::from_repr(repr).unwrap(), action);
    }

    #[rstest]
    fn test_book_action_from_str_case_insensitive() {
        assert_eq!(BookAction::from_str("add").unwrap(), BookAction::Add);
        assert_eq!(BookAction::from_str("DELETE").unwrap(), BookAction::Delete);
        assert!(BookAction::from_str("bogus").is_err());
    }

    #[rstest]
    #[case(OrderType::Limit, "LIMIT")]
    #[case(OrderType::Market, "MARKET")]
    fn test_order_type_display(#[case] order_type: OrderType, #[case] expected: &str) {
        assert_eq!(order_type.to_string(), expected);
    }

    #[rstest]
    fn test_data_quality_serde_round_trip() {
        let quality = DataQuality::Stale;
        let json = serde_json::to_string(&quality).unwrap();
        assert_eq!(json, "\"STALE\"");
        let parsed: DataQuality = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, quality);
    }
}
