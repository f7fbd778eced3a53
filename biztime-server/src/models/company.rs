//! Company identifier and name validation
//!
//! Codes appear in every company URL, so they are restricted to a
//! URL-safe alphabet: ASCII alphanumerics, hyphens and underscores.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for company codes
const MAX_CODE_LEN: usize = 64;

/// Maximum length for company names
const MAX_NAME_LEN: usize = 255;

/// Starts with alphanumeric, then alphanumerics/hyphens/underscores
static CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("invalid company code regex")
});

/// Validated company code (primary key, URL-safe)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompanyCode(String);

impl CompanyCode {
    /// Create a new company code, validating its format.
    ///
    /// # Example
    /// ```
    /// use biztime_server::models::CompanyCode;
    ///
    /// assert!(CompanyCode::new("apple").is_ok());
    /// assert!(CompanyCode::new("testCode2").is_ok());
    /// assert!(CompanyCode::new("has space").is_err());
    /// assert!(CompanyCode::new("_leading").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "company code" });
        }

        if s.len() > MAX_CODE_LEN {
            return Err(ValidationError::TooLong {
                field: "company code",
                max: MAX_CODE_LEN,
            });
        }

        if !CODE_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "company code",
                reason: "must be alphanumeric with hyphens/underscores, starting with alphanumeric",
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CompanyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated company display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyName(String);

impl CompanyName {
    /// Rejects blank or oversized names. The name is stored as given.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "company name" });
        }

        if s.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "company name",
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
