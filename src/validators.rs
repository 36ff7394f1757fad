//! Form field validators.
//!
//! The national ID (cédula) check is the Ecuadorian modulus-10 scheme: a
//! two-digit province code, a type digit, six serial digits, and a check
//! digit derived from the first nine. All functions are pure and never
//! panic; bad input maps to a structured negative result.

use std::sync::LazyLock;

use regex::Regex;

pub const NATIONAL_ID_LEN: usize = 10;
const COEFFICIENTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];
const MAX_PROVINCE: u32 = 24;
const MAX_NATURAL_PERSON_TYPE: u32 = 5;

// =============================================================================
// NATIONAL ID
// =============================================================================

/// Why a national ID was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum IdRejection {
    #[error("the national ID must have exactly 10 digits")]
    BadLength,
    #[error("the national ID must contain only digits")]
    BadCharset,
    #[error("the first two digits must be a valid province code (01-24)")]
    BadProvince,
    #[error("the third digit must be less than 6 (natural person)")]
    BadTypeDigit,
    #[error("invalid national ID: check digit does not match")]
    ChecksumMismatch,
}

impl IdRejection {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::BadLength => "bad-length",
            Self::BadCharset => "bad-charset",
            Self::BadProvince => "bad-province",
            Self::BadTypeDigit => "bad-type-digit",
            Self::ChecksumMismatch => "checksum-mismatch",
        }
    }
}

/// Outcome of [`validate_national_id`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdValidation {
    pub valid: bool,
    /// Set exactly when `valid` is false.
    pub reason: Option<IdRejection>,
}

impl IdValidation {
    const VALID: Self = Self { valid: true, reason: None };

    fn rejected(reason: IdRejection) -> Self {
        Self { valid: false, reason: Some(reason) }
    }

    /// Human-readable outcome for form feedback.
    #[must_use]
    pub fn message(&self) -> String {
        self.reason.map_or_else(|| "valid national ID".to_owned(), |r| r.to_string())
    }
}

/// Validate an Ecuadorian national ID. Input is taken as-is: whitespace and
/// separators are rejected, not stripped.
#[must_use]
pub fn validate_national_id(id: &str) -> IdValidation {
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return IdValidation::rejected(IdRejection::BadCharset);
    }
    if id.len() != NATIONAL_ID_LEN {
        return IdValidation::rejected(IdRejection::BadLength);
    }

    let digits: Vec<u32> = id.bytes().map(|b| u32::from(b - b'0')).collect();

    let province = digits[0] * 10 + digits[1];
    if !(1..=MAX_PROVINCE).contains(&province) {
        return IdValidation::rejected(IdRejection::BadProvince);
    }
    if digits[2] > MAX_NATURAL_PERSON_TYPE {
        return IdValidation::rejected(IdRejection::BadTypeDigit);
    }

    if check_digit(&digits[..9]) == digits[9] {
        IdValidation::VALID
    } else {
        IdValidation::rejected(IdRejection::ChecksumMismatch)
    }
}

/// Modulus-10 check digit over the first nine digits.
fn check_digit(first_nine: &[u32]) -> u32 {
    let sum: u32 = first_nine
        .iter()
        .zip(COEFFICIENTS)
        .map(|(d, c)| {
            let product = d * c;
            if product > 9 { product - 9 } else { product }
        })
        .sum();
    match sum % 10 {
        0 => 0,
        residue => 10 - residue,
    }
}

/// Render an ID for display as `NNNNNNN-NNN`, dropping non-digits. Inputs
/// of seven digits or fewer come back as bare digits.
#[must_use]
pub fn format_national_id(id: &str) -> String {
    let digits: String = id.chars().filter(char::is_ascii_digit).take(NATIONAL_ID_LEN).collect();
    if digits.len() <= 7 {
        return digits;
    }
    format!("{}-{}", &digits[..7], &digits[7..])
}

// =============================================================================
// CONTACT FIELDS
// =============================================================================

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

#[must_use]
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Phone is optional: empty passes. Otherwise exactly 10 digits once
/// spaces, dashes, and other separators are removed.
#[must_use]
pub fn validate_phone(phone: &str) -> bool {
    if phone.is_empty() {
        return true;
    }
    phone.chars().filter(char::is_ascii_digit).count() == 10
}

#[cfg(test)]
#[path = "validators_test.rs"]
mod tests;
