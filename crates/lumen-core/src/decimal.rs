//! Precision-tagged FHIR decimal values.
//!
//! Search literals like `100`, `100.00`, and `0.12345678900000000000` are all
//! distinct: the number of digits after the decimal point decides both the
//! emitted form and the width of the implicit match neighborhood. The value
//! is therefore held as an exact rational ([`BigRational`]) next to the
//! source precision, never as a binary float.

use crate::error::{CoreError, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An arbitrary-precision decimal as written in a search literal.
///
/// `precision` is the count of digits after the decimal point in the source
/// text (0 for integers). The denoted neighborhood is the half-open interval
/// `[value - 5*10^-(precision+1), value + 5*10^-(precision+1))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FhirDecimal {
    value: BigRational,
    precision: usize,
}

impl FhirDecimal {
    /// The exact rational value.
    pub fn value(&self) -> &BigRational {
        &self.value
    }

    /// Digits after the decimal point in the source literal.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Inclusive lower bound of the implicit neighborhood.
    pub fn range_low_incl(&self) -> BigRational {
        self.value.clone() - self.half_width()
    }

    /// Exclusive upper bound of the implicit neighborhood.
    pub fn range_high_excl(&self) -> BigRational {
        self.value.clone() + self.half_width()
    }

    // Half of one unit in the last written place: 1 / (2 * 10^precision).
    fn half_width(&self) -> BigRational {
        BigRational::new(BigInt::one(), BigInt::from(2) * pow10(self.precision))
    }
}

fn pow10(exp: usize) -> BigInt {
    num_traits::pow(BigInt::from(10), exp)
}

impl FromStr for FhirDecimal {
    type Err = CoreError;

    /// Accepts an optional sign, integer digits, and an optional fraction.
    /// Scientific notation is not part of the FHIR search grammar.
    fn from_str(s: &str) -> Result<Self> {
        let unsigned = s
            .strip_prefix('-')
            .or_else(|| s.strip_prefix('+'))
            .unwrap_or(s);
        let negative = s.starts_with('-');

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (unsigned, None),
        };
        let frac = frac_part.unwrap_or("");
        let all_digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || frac_part.is_some_and(|f| !all_digits(f)) {
            return Err(CoreError::invalid_decimal(s));
        }

        let precision = frac.len();
        let mut unscaled: BigInt = format!("{int_part}{frac}")
            .parse()
            .map_err(|_| CoreError::invalid_decimal(s))?;
        if negative {
            unscaled = -unscaled;
        }
        Ok(FhirDecimal {
            value: BigRational::new(unscaled, pow10(precision)),
            precision,
        })
    }
}

impl fmt::Display for FhirDecimal {
    /// Reproduces the source literal's shape: integers stay bare, fractions
    /// are emitted with exactly `precision` digits, trailing zeros included.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // value * 10^precision is integral by construction.
        let scaled = self.value.clone() * BigRational::from_integer(pow10(self.precision));
        let unscaled = scaled.to_integer();
        if unscaled.is_negative() {
            f.write_str("-")?;
        }
        let digits = unscaled.magnitude().to_string();
        if self.precision == 0 {
            f.write_str(&digits)
        } else if digits.len() > self.precision {
            let (int_digits, frac_digits) = digits.split_at(digits.len() - self.precision);
            write!(f, "{int_digits}.{frac_digits}")
        } else {
            write!(f, "0.{digits:0>width$}", width = self.precision)
        }
    }
}

impl Serialize for FhirDecimal {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FhirDecimal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FhirDecimal::from_str(&s).map_err(serde::de::Error::custom)
    }
}
