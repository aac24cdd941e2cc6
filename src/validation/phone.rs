use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// Characters a phone field may contain: ASCII digits, whitespace,
// parentheses, hyphen, plus sign, period. Digits are restricted to [0-9] so
// the allow-list agrees with the digit extraction below.
static ALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\s()\-+.]+$").unwrap());

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Invalid input. Wrong number of digits.")]
    EmptyOrWrongLength,
    #[error("Invalid input. The phone number contains illegal characters.")]
    IllegalCharacters,
}

/// Validates a free-form phone string and renders it in the canonical
/// `8-DDD-DDD-DD-DD` form.
///
/// The character allow-list is checked against the original input, before
/// any stripping, so `"123abc456"` fails on characters rather than length.
/// Accepted digit counts are 10, or 11 with a leading 7 or 8 (the lead
/// digit is dropped and replaced by the literal `8` prefix).
pub fn normalize(input: &str) -> Result<String, PhoneError> {
    if input.is_empty() {
        return Err(PhoneError::EmptyOrWrongLength);
    }
    if !ALLOWED_CHARS.is_match(input) {
        return Err(PhoneError::IllegalCharacters);
    }

    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        11 => {
            if digits.starts_with('7') || digits.starts_with('8') {
                Ok(format_digits(&digits[1..]))
            } else {
                // A wrong leading digit is reported with the digit-count
                // message. TODO: give this case its own variant once the
                // user-facing copy can change with it.
                Err(PhoneError::EmptyOrWrongLength)
            }
        }
        10 => Ok(format_digits(&digits)),
        _ => Err(PhoneError::EmptyOrWrongLength),
    }
}

// Regroups exactly 10 digits as 3-3-2-2 behind the `8-` prefix.
fn format_digits(d: &str) -> String {
    format!("8-{}-{}-{}-{}", &d[0..3], &d[3..6], &d[6..8], &d[8..10])
}
