//! The validated code container.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A complete Slash/A program: a flat sequence of signed 64-bit integers.
///
/// Each element is either an instruction id (negative) or a literal loaded
/// into the accumulator (non-negative). A program is immutable once built;
/// all mutable state of a run lives in a [`Machine`](crate::Machine).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    code: Vec<i64>,
}

impl Program {
    /// Wraps a code sequence without further checks; `i64` already rules
    /// out every value the encoding cannot express.
    pub fn new(code: Vec<i64>) -> Self {
        Self { code }
    }

    /// Builds a program from loosely typed numeric values, as they arrive
    /// from hosts that only deal in doubles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonIntegralCode`] if a value has a fractional part
    /// or is not finite, and [`Error::CodeOutOfRange`] if it lies outside
    /// the signed 64-bit range.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let mut code = Vec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() || value.fract() != 0.0 {
                return Err(Error::NonIntegralCode { index, value });
            }
            // Integral values in [-2^63, 2^63) convert exactly.
            if value < i64::MIN as f64 || value >= i64::MAX as f64 {
                return Err(Error::CodeOutOfRange { index, value });
            }
            code.push(value as i64);
        }
        Ok(Self { code })
    }

    /// Number of code values.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// True for the empty program, which runs and produces nothing.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// The code value at `position`, if any.
    pub fn get(&self, position: usize) -> Option<i64> {
        self.code.get(position).copied()
    }

    /// The full code sequence.
    pub fn code(&self) -> &[i64] {
        &self.code
    }
}

impl From<Vec<i64>> for Program {
    fn from(code: Vec<i64>) -> Self {
        Self::new(code)
    }
}

impl FromIterator<i64> for Program {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_accepts_integral_doubles() {
        let program = Program::from_values(&[4.0, -1.0, 0.0, -16.0]).unwrap();
        assert_eq!(program.code(), &[4, -1, 0, -16]);
    }

    #[test]
    fn test_from_values_rejects_fractional() {
        let err = Program::from_values(&[4.0, 4.3]).unwrap_err();
        assert_eq!(
            err,
            Error::NonIntegralCode {
                index: 1,
                value: 4.3
            }
        );
    }

    #[test]
    fn test_from_values_rejects_nan_and_infinity() {
        assert!(matches!(
            Program::from_values(&[f64::NAN]),
            Err(Error::NonIntegralCode { index: 0, .. })
        ));
        assert!(matches!(
            Program::from_values(&[f64::INFINITY]),
            Err(Error::NonIntegralCode { index: 0, .. })
        ));
    }

    #[test]
    fn test_from_values_rejects_out_of_range() {
        assert!(matches!(
            Program::from_values(&[1.0e19]),
            Err(Error::CodeOutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            Program::from_values(&[-1.0e19]),
            Err(Error::CodeOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_get_is_positional() {
        let program: Program = vec![7, -28].into();
        assert_eq!(program.get(0), Some(7));
        assert_eq!(program.get(1), Some(-28));
        assert_eq!(program.get(2), None);
    }
}
