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

//! Functions for handling fixed-point arithmetic.
//!
//! This module provides constants and functions that enforce a fixed-point precision strategy,
//! ensuring consistent precision and scaling across the [`Price`] and [`Quantity`] value types.
//!
//! Raw values **must** be a valid multiple of the scale factor for the given precision. Valid
//! raw values come from accessing the `.raw` field of an existing value or from the conversion
//! functions in this module.
//!
//! [`Price`]: crate::types::Price
//! [`Quantity`]: crate::types::Quantity

/// The maximum fixed-point precision.
pub const FIXED_PRECISION: u8 = 9;

/// The scalar value corresponding to the maximum precision (10^9).
pub const FIXED_SCALAR: f64 = 1_000_000_000.0;

/// Checks if a given `precision` value is within the valid fixed-point range.
///
/// # Errors
///
/// Returns an error if `precision` exceeds [`FIXED_PRECISION`].
pub fn check_fixed_precision(precision: u8) -> anyhow::Result<()> {
    if precision > FIXED_PRECISION {
        anyhow::bail!(
            "`precision` exceeded maximum `FIXED_PRECISION` ({FIXED_PRECISION}), was {precision}"
        )
    }
    Ok(())
}

/// Converts an `f64` value to a raw fixed-point `i64`, with a specified precision.
///
/// # Panics
///
/// Panics if `precision` exceeds [`FIXED_PRECISION`].
#[must_use]
pub fn f64_to_fixed_i64(value: f64, precision: u8) -> i64 {
    assert!(
        precision <= FIXED_PRECISION,
        "precision exceeded maximum fixed precision (9)"
    );
    let pow1 = 10_i64.pow(u32::from(precision));
    let pow2 = 10_i64.pow(u32::from(FIXED_PRECISION - precision));
    let rounded = (value * pow1 as f64).round() as i64;
    rounded * pow2
}

/// Converts an `f64` value to a raw fixed-point `u64`, with a specified precision.
///
/// # Panics
///
/// Panics if `precision` exceeds [`FIXED_PRECISION`].
#[must_use]
pub fn f64_to_fixed_u64(value: f64, precision: u8) -> u64 {
    assert!(
        precision <= FIXED_PRECISION,
        "precision exceeded maximum fixed precision (9)"
    );
    let pow1 = 10_u64.pow(u32::from(precision));
    let pow2 = 10_u64.pow(u32::from(FIXED_PRECISION - precision));
    let rounded = (value * pow1 as f64).round() as u64;
    rounded * pow2
}

/// Converts a raw fixed-point `i64` value back to an `f64` value.
#[must_use]
pub fn fixed_i64_to_f64(value: i64) -> f64 {
    value as f64 / FIXED_SCALAR
}

/// Converts a raw fixed-point `u64` value back to an `f64` value.
#[must_use]
pub fn fixed_u64_to_f64(value: u64) -> f64 {
    value as f64 / FIXED_SCALAR
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0)]
    #[case(FIXED_PRECISION)]
    fn test_check_fixed_precision_valid(#[case] precision: u8) {
        assert!(check_fixed_precision(precision).is_ok());
    }

    #[rstest]
    fn test_check_fixed_precision_invalid() {
        assert!(check_fixed_precision(FIXED_PRECISION + 1).is_err());
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, 1.0)]
    #[case(1, 1.1)]
    #[case(9, 0.000_000_001)]
    #[case(0, -1.0)]
    #[case(9, -0.000_000_001)]
    fn test_f64_to_fixed_i64_round_trip(#[case] precision: u8, #[case] value: f64) {
        let fixed = f64_to_fixed_i64(value, precision);
        assert_eq!(fixed_i64_to_f64(fixed), value);
    }

    #[rstest]
    #[case(0, 123_456.0, 123_456_000_000_000)]
    #[case(2, 123.45, 123_450_000_000)]
    #[case(2, 123.456, 123_460_000_000)] // <-- rounds to given precision
    fn test_f64_to_fixed_i64(#[case] precision: u8, #[case] value: f64, #[case] expected: i64) {
        assert_eq!(f64_to_fixed_i64(value, precision), expected);
    }

    #[rstest]
    #[case(0, 5.0, 5_000_000_000)]
    #[case(1, 5.5, 5_500_000_000)]
    #[case(9, 5.000_000_001, 5_000_000_001)]
    fn test_f64_to_fixed_u64(#[case] precision: u8, #[case] value: f64, #[case] expected: u64) {
        assert_eq!(f64_to_fixed_u64(value, precision), expected);
    }

    #[rstest]
    #[should_panic(expected = "precision exceeded maximum fixed precision (9)")]
    fn test_f64_to_fixed_i64_with_invalid_precision() {
        let _ = f64_to_fixed_i64(1.0, FIXED_PRECISION + 1);
    }
}
