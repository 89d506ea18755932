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

//! Functions for condition checks similar to the *design by contract* philosophy.
//!
//! The `check_*` functions return `anyhow::Result` so that validation failures
//! can be propagated from checked constructors; the panicking constructor
//! variants `expect` on the result using the [`FAILED`] message.

use anyhow::{anyhow, bail};

/// Standard message prefix for condition check failures.
pub const FAILED: &str = "Condition failed";

/// Checks the `predicate` is true.
///
/// # Errors
///
/// Returns an error with `fail_msg` if the predicate is false.
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if !predicate {
        return Err(anyhow!("{fail_msg}"));
    }
    Ok(())
}

/// Checks the string `s` has semantic meaning and contains only ASCII characters.
///
/// # Errors
///
/// Returns an error if:
/// - `s` is empty or whitespace-only.
/// - `s` contains a non-ASCII character.
pub fn check_valid_string(s: &str, param: &str) -> anyhow::Result<()> {
    if s.trim().is_empty() {
        bail!("invalid string for '{param}', was empty");
    }
    if !s.is_ascii() {
        bail!("invalid string for '{param}' contained a non-ASCII char, was '{s}'");
    }
    Ok(())
}

/// Checks the `f64` value is non-negative and a real number (not NaN or infinite).
///
/// # Errors
///
/// Returns an error if `value` is negative, NaN, or infinite.
pub fn check_non_negative_f64(value: f64, param: &str) -> anyhow::Result<()> {
    if value.is_nan() || value.is_infinite() {
        bail!("invalid f64 for '{param}', was {value}");
    }
    if value < 0.0 {
        bail!("invalid f64 for '{param}' negative, was {value}");
    }
    Ok(())
}

/// Checks the `f64` value is within the inclusive range [`l`, `r`] and a real number.
///
/// # Errors
///
/// Returns an error if `value` is NaN, infinite, or out of range.
pub fn check_in_range_inclusive_f64(value: f64, l: f64, r: f64, param: &str) -> anyhow::Result<()> {
    if value.is_nan() || value.is_infinite() {
        bail!("invalid f64 for '{param}', was {value}");
    }
    if value < l || value > r {
        bail!("invalid f64 for '{param}' not in range [{l}, {r}], was {value}");
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_check_predicate_true() {
        assert!(check_predicate_true(true, "the predicate was false").is_ok());
        assert!(check_predicate_true(false, "the predicate was false").is_err());
    }

    #[rstest]
    #[case(" a")]
    #[case("a ")]
    #[case("abc")]
    #[case("123")]
    fn test_check_valid_string_with_valid_value(#[case] s: &str) {
        assert!(check_valid_string(s, "value").is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("  ")]
    #[case("🦀")]
    fn test_check_valid_string_with_invalid_value(#[case] s: &str) {
        assert!(check_valid_string(s, "value").is_err());
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(1.0, true)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn test_check_non_negative_f64(#[case] value: f64, #[case] expected: bool) {
        assert_eq!(check_non_negative_f64(value, "value").is_ok(), expected);
    }

    #[rstest]
    #[case(0.0, 0.0, 1.0, true)]
    #[case(1.0, 0.0, 1.0, true)]
    #[case(-0.1, 0.0, 1.0, false)]
    #[case(1.1, 0.0, 1.0, false)]
    #[case(f64::NAN, 0.0, 1.0, false)]
    fn test_check_in_range_inclusive_f64(
        #[case] value: f64,
        #[case] l: f64,
        #[case] r: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(
            check_in_range_inclusive_f64(value, l, r, "value").is_ok(),
            expected
        );
    }
}
