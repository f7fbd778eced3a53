//! Invoice amount validation

use super::ValidationError;

/// Invoice amount: finite and strictly positive.
///
/// Matches the `CHECK (amt > 0)` constraint on `invoices.amt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::OutOfRange {
                field: "amt",
                reason: "must be a finite number",
            });
        }

        if value <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "amt",
                reason: "must be greater than zero",
            });
        }

        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}
