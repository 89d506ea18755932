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

//! Represents a quantity with a non-negative value.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tidebook_core::correctness::{FAILED, check_in_range_inclusive_f64};

use super::{
    fixed::{check_fixed_precision, f64_to_fixed_u64, fixed_u64_to_f64},
    price::precision_from_str,
};

/// The raw u64 backing for [`Quantity`] values.
pub type QuantityRaw = u64;

/// The maximum valid quantity value that can be represented.
pub const QUANTITY_MAX: f64 = 18_446_744_073.0;

/// Represents a quantity with a non-negative value.
///
/// Capable of storing either a whole number (no decimal places) of 'contracts'
/// or 'shares' (instruments denominated in whole units) or a decimal value
/// containing decimal places for instruments denominated in fractional units.
///
/// Handles up to [`FIXED_PRECISION`](super::fixed::FIXED_PRECISION) decimals of precision.
#[repr(C)]
#[derive(Clone, Copy, Default, Eq)]
pub struct Quantity {
    /// The raw fixed-point quantity value.
    pub raw: QuantityRaw,
    /// The number of decimal places for display.
    pub precision: u8,
}

impl Quantity {
    /// Creates a new [`Quantity`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `value` is negative, NaN, infinite, or exceeds [`QUANTITY_MAX`].
    /// - `precision` exceeds the maximum fixed precision.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_in_range_inclusive_f64(value, 0.0, QUANTITY_MAX, "value")?;
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_u64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Quantity`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Quantity::new_checked`]).
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Quantity`] instance from a raw fixed-point value.
    ///
    /// # Panics
    ///
    /// Panics if `precision` exceeds the maximum fixed precision.
    #[must_use]
    pub fn from_raw(raw: QuantityRaw, precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw, precision }
    }

    /// Creates a new [`Quantity`] instance with a value of zero with the given precision.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw: 0, precision }
    }

    /// Returns true if the quantity value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns true if the quantity value is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the quantity value as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_u64_to_f64(self.raw)
    }

    /// Returns the sum of this quantity and `other`, saturating at the raw bounds.
    ///
    /// The result carries the maximum precision of the two operands.
    #[must_use]
    pub fn saturating_add(&self, other: Self) -> Self {
        Self {
            raw: self.raw.saturating_add(other.raw),
            precision: self.precision.max(other.precision),
        }
    }

    /// Returns this quantity minus `other`, saturating at zero.
    ///
    /// The result carries the maximum precision of the two operands.
    #[must_use]
    pub fn saturating_sub(&self, other: Self) -> Self {
        Self {
            raw: self.raw.saturating_sub(other.raw),
            precision: self.precision.max(other.precision),
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self::new(value as f64, 0)
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let float_from_input = value
            .parse::<f64>()
            .map_err(|e| format!("error parsing `input` string '{value}' as f64: {e}"))?;

        let precision = precision_from_str(value);
        Self::new_checked(float_from_input, precision).map_err(|e| e.to_string())
    }
}

impl From<&str> for Quantity {
    /// # Panics
    ///
    /// Panics if `value` is not a valid quantity string.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Quantity))
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(serde::de::Error::custom)
    }
}
