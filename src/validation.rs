use std::collections::BTreeSet;

use crate::errors::ValidationError;
use crate::types::{MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_PICK, Numbers};

/// Parses free text such as `4, 15 23,33 40,56` into a pick.
///
/// Tokens are separated by commas and/or whitespace. Exactly six distinct
/// numbers in 1..=60 are required; duplicates are rejected, never merged.
pub fn validate(raw: &str) -> Result<Numbers, ValidationError> {
    let tokens: Vec<&str> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(ValidationError::Empty);
    }

    let mut parsed = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let n = token
            .parse::<i64>()
            .map_err(|_| ValidationError::NotANumber(token.to_string()))?;
        parsed.push(n);
    }

    if parsed.len() != NUMBERS_PER_PICK {
        return Err(ValidationError::WrongCount(parsed.len()));
    }

    let mut seen = BTreeSet::new();
    for n in parsed {
        if n < i64::from(MIN_NUMBER) || n > i64::from(MAX_NUMBER) {
            return Err(ValidationError::OutOfRange(n));
        }
        let n = n as u8;
        if !seen.insert(n) {
            return Err(ValidationError::Duplicate(n));
        }
    }

    let mut numbers = [0u8; NUMBERS_PER_PICK];
    for (slot, n) in numbers.iter_mut().zip(seen) {
        *slot = n;
    }
    Ok(Numbers::from_sorted(numbers))
}

/// Parses a contest number typed by the user.
pub fn parse_contest_id(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::InvalidContest(trimmed.to_string())),
    }
}
