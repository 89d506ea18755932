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

//! Represents a price in a market.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tidebook_core::correctness::{FAILED, check_in_range_inclusive_f64};

use super::fixed::{FIXED_PRECISION, check_fixed_precision, f64_to_fixed_i64, fixed_i64_to_f64};

/// The raw i64 backing for [`Price`] values.
pub type PriceRaw = i64;

/// The maximum valid price value that can be represented.
pub const PRICE_MAX: f64 = 9_223_372_036.0;

/// The minimum valid price value that can be represented.
pub const PRICE_MIN: f64 = -9_223_372_036.0;

/// Represents a price in a market.
///
/// The number of decimal places may vary. For certain asset classes, prices may
/// have negative values. For example, prices for options instruments can be
/// negative under certain conditions.
///
/// Handles up to [`FIXED_PRECISION`] decimals of precision.
///
/// Equality and ordering are determined by the raw fixed-point value alone, so
/// two prices with the same numeric value but different display precisions
/// compare equal.
#[repr(C)]
#[derive(Clone, Copy, Default, Eq)]
pub struct Price {
    /// The raw fixed-point price value.
    pub raw: PriceRaw,
    /// The number of decimal places for display.
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `value` is NaN, infinite, or outside [`PRICE_MIN`, `PRICE_MAX`].
    /// - `precision` exceeds [`FIXED_PRECISION`].
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_in_range_inclusive_f64(value, PRICE_MIN, PRICE_MAX, "value")?;
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_i64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Price`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Price::new_checked`]).
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Price`] instance from a raw fixed-point value.
    ///
    /// # Panics
    ///
    /// Panics if `precision` exceeds [`FIXED_PRECISION`].
    #[must_use]
    pub fn from_raw(raw: PriceRaw, precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw, precision }
    }

    /// Creates a new [`Price`] instance with a value of zero with the given precision.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw: 0, precision }
    }

    /// Creates a new [`Price`] instance with the maximum representable value.
    #[must_use]
    pub fn max(precision: u8) -> Self {
        Self::new(PRICE_MAX, precision)
    }

    /// Creates a new [`Price`] instance with the minimum representable value.
    #[must_use]
    pub fn min(precision: u8) -> Self {
        Self::new(PRICE_MIN, precision)
    }

    /// Returns true if the price value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns true if the price value is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the price value as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let float_from_input = value
            .parse::<f64>()
            .map_err(|e| format!("error parsing `input` string '{value}' as f64: {e}"))?;

        let precision = precision_from_str(value);
        Self::new_checked(float_from_input, precision).map_err(|e| e.to_string())
    }
}

impl From<&str> for Price {
    /// # Panics
    ///
    /// Panics if `value` is not a valid price string.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Price))
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(serde::de::Error::custom)
    }
}

/// Returns the decimal precision inferred from a numeric string.
pub(crate) fn precision_from_str(s: &str) -> u8 {
    match s.split('.').nth(1) {
        Some(decimals) => (decimals.len() as u8).min(FIXED_PRECISION),
        None => 0,
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
    fn test_new() {
        let price = Price::new(100.50, 2);
        assert_eq!(price.raw, 100_500_000_000);
        assert_eq!(price.precision, 2);
        assert_eq!(price.as_f64(), 100.50);
    }

    #[rstest]
    fn test_new_checked_invalid_value() {
        assert!(Price::new_checked(f64::NAN, 2).is_err());
        assert!(Price::new_checked(PRICE_MAX * 2.0, 2).is_err());
    }

    #[rstest]
    fn test_new_checked_invalid_precision() {
        assert!(Price::new_checked(1.0, FIXED_PRECISION + 1).is_err());
    }

    #[rstest]
    fn test_negative_price() {
        let price = Price::new(-1.25, 2);
        assert!(!price.is_positive());
        assert_eq!(price.as_f64(), -1.25);
    }

    #[rstest]
    #[case("100", 0)]
    #[case("100.0", 1)]
    #[case("100.5", 1)]
    #[case("100.50", 2)]
    #[case("0.000000001", 9)]
    fn test_precision_from_str(#[case] input: &str, #[case] expected: u8) {
        assert_eq!(precision_from_str(input), expected);
    }

    #[rstest]
    fn test_from_str_valid() {
        let price = Price::from("100.25");
        assert_eq!(price.precision, 2);
        assert_eq!(price.as_f64(), 100.25);
    }

    #[rstest]
    fn test_from_str_invalid() {
        assert!(Price::from_str("not-a-price").is_err());
    }

    #[rstest]
    fn test_equality_ignores_precision() {
        assert_eq!(Price::new(1.0, 1), Price::new(1.0, 4));
        assert_ne!(Price::new(1.1, 1), Price::new(1.0, 1));
    }

    #[rstest]
    fn test_ordering() {
        assert!(Price::from("1.0") < Price::from("1.1"));
        assert!(Price::from("-1.0") < Price::from("1.0"));
        assert!(Price::max(2) > Price::min(2));
    }

    #[rstest]
    fn test_display() {
        assert_eq!(Price::new(100.5, 2).to_string(), "100.50");
        assert_eq!(format!("{:?}", Price::new(100.5, 2)), "Price(100.50)");
    }

    #[rstest]
    fn test_serde_round_trip() {
        let price = Price::from("123.456");
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"123.456\"");
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
