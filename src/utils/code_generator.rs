//! Base62 short code generation, encoding and validation.
//!
//! The alphabet is `0-9A-Za-z` in that order, so index 0 is `'0'` and
//! index 61 is `'z'`.
//!
//! Random codes are not meant to be unguessable, only unlikely to collide,
//! and the randomness source is always supplied by the caller.

use crate::domain::entities::MAX_SHORT_CODE_LENGTH;
use crate::error::AppError;
use rand::Rng;
use serde_json::json;
use thiserror::Error;

/// The Base62 alphabet.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated codes when none is requested.
pub const DEFAULT_CODE_LENGTH: usize = 7;

const BASE: u64 = 62;

/// Codes that would shadow a fixed route.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Errors from [`decode_to_id`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("Invalid character '{character}' in code")]
    InvalidCode { character: char },

    #[error("Code cannot be empty")]
    Empty,

    #[error("Code value does not fit in 64 bits")]
    Overflow,
}

/// Generates a random code of `length` characters.
///
/// Every character is drawn independently and uniformly from [`ALPHABET`].
///
/// # Examples
///
/// ```ignore
/// let mut rng = StdRng::seed_from_u64(7);
/// let code = generate_code(&mut rng, DEFAULT_CODE_LENGTH);
/// assert_eq!(code.len(), 7);
/// ```
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Encodes a number as Base62, most significant digit first.
///
/// `0` encodes to `"0"`; no other value has leading zeros.
pub fn encode_from_id(mut id: u64) -> String {
    if id == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::with_capacity(11);
    while id > 0 {
        digits.push(ALPHABET[(id % BASE) as usize]);
        id /= BASE;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Decodes a Base62 code back into the number it encodes.
///
/// # Errors
///
/// - [`CodeError::InvalidCode`] if a character is outside [`ALPHABET`]
/// - [`CodeError::Empty`] for an empty code
/// - [`CodeError::Overflow`] if the value exceeds `u64::MAX`
pub fn decode_to_id(code: &str) -> Result<u64, CodeError> {
    if code.is_empty() {
        return Err(CodeError::Empty);
    }

    code.chars().try_fold(0u64, |acc, c| {
        let digit = alphabet_index(c).ok_or(CodeError::InvalidCode { character: c })?;
        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(CodeError::Overflow)
    })
}

fn alphabet_index(c: char) -> Option<u64> {
    let value = match c {
        '0'..='9' => c as u64 - '0' as u64,
        'A'..='Z' => c as u64 - 'A' as u64 + 10,
        'a'..='z' => c as u64 - 'a' as u64 + 36,
        _ => return None,
    };
    Some(value)
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 1-10 characters
/// - Allowed characters: Base62 letters and digits, `-` and `_`
/// - Cannot be a reserved route word
///
/// Existence is not checked here; a taken code is reported by the store
/// when the record is persisted.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.chars().count() > MAX_SHORT_CODE_LENGTH {
        return Err(AppError::bad_request(
            format!("Custom code must be 1-{MAX_SHORT_CODE_LENGTH} characters"),
            json!({ "provided_length": code.chars().count() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
