//! Brazilian postal codes (CEP).

use crate::error::AddressError;

const POSTAL_CODE_DIGITS: usize = 8;

/// Strips every non-digit character, so `"01.001-000"` becomes `"01001000"`.
#[must_use]
pub fn sanitize_postal_code(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// A sanitized 8-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Sanitizes `raw` and checks that exactly eight digits remain.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidPostalCode`] when the digit count is wrong.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let digits = sanitize_postal_code(raw);
        if digits.len() != POSTAL_CODE_DIGITS {
            return Err(AddressError::InvalidPostalCode(raw.to_string()));
        }
        Ok(Self(digits))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
