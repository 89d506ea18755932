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

//! Represents a valid feed symbol for a subscribed instrument.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};
use tidebook_core::correctness::{FAILED, check_valid_string};
use ustr::Ustr;

/// Represents a valid feed symbol for a subscribed instrument.
///
/// Each [`Book`](crate::orderbook::Book) is keyed by exactly one symbol; the
/// format of the value is determined by the upstream feed and is treated as
/// opaque here.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(Ustr);

impl Symbol {
    /// Creates a new [`Symbol`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is an invalid string (e.g., is empty or contains
    /// non-ASCII characters).
    pub fn new_checked<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
        let value = value.as_ref();
        check_valid_string(value, stringify!(value))?;
        Ok(Self(Ustr::from(value)))
    }

    /// Creates a new [`Symbol`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `value` is an invalid string.
    pub fn new<T: AsRef<str>>(value: T) -> Self {
        Self::new_checked(value).expect(FAILED)
    }

    /// Returns the inner identifier value.
    #[must_use]
    pub fn inner(&self) -> Ustr {
        self.0
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}('{}')", stringify!(Symbol), self.0)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_new_valid() {
        let symbol = Symbol::new("MSFT.NASDAQ");
        assert_eq!(symbol.as_str(), "MSFT.NASDAQ");
        assert_eq!(symbol.to_string(), "MSFT.NASDAQ");
        assert_eq!(format!("{symbol:?}"), "Symbol('MSFT.NASDAQ')");
    }

    #[rstest]
    #[case("")]
    #[case(" ")]
    fn test_new_checked_invalid(#[case] value: &str) {
        assert!(Symbol::new_checked(value).is_err());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let symbol = Symbol::from("AAPL.XNGS");
        let json = serde_json::to_string(&symbol).unwrap();
        assert_eq!(json, "\"AAPL.XNGS\"");
        let parsed: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, symbol);
    }
}
