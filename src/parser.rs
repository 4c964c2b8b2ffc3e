//! Comparison token parsing.
//!
//! Accepted grammar, after trimming surrounding whitespace:
//!
//! ```text
//! value   := sign? ( digits ( "/" digits | "." digits? )? | "." digits )
//! sign    := "+" | "-"
//! ```
//!
//! Anything else (exponents, expressions, `inf`, inner whitespace) is rejected.

use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_SCALE_VALUE: f64 = 1.0;

/// Non-zero magnitudes outside this band are rejected so reciprocals and column sums stay finite.
pub const SCALE_RANGE: RangeInclusive<f64> = 1e-100..=1e100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("empty input")]
    Empty,
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("missing digits")]
    MissingDigits,
    #[error("zero denominator")]
    ZeroDenominator,
    #[error("value out of range")]
    OutOfRange,
}

/// Parses a scale value without applying the fallback policy.
pub fn parse_scale_value(token: &str) -> Result<f64, TokenError> {
    let text = token.trim();
    if text.is_empty() {
        return Err(TokenError::Empty);
    }

    let mut cursor = Cursor::new(text);
    let negative = match cursor.peek() {
        Some('-') => {
            cursor.bump();
            true
        }
        Some('+') => {
            cursor.bump();
            false
        }
        _ => false,
    };

    let int_start = cursor.offset;
    let int_digits = cursor.digits();
    let magnitude = match cursor.peek() {
        None => {
            if int_digits.is_empty() {
                return Err(TokenError::MissingDigits);
            }
            to_float(int_digits)?
        }
        Some('/') => {
            if int_digits.is_empty() {
                return Err(TokenError::MissingDigits);
            }
            cursor.bump();
            let denominator = cursor.digits();
            if denominator.is_empty() {
                return Err(TokenError::MissingDigits);
            }
            cursor.expect_end()?;
            let denominator = to_float(denominator)?;
            if denominator == 0.0 {
                return Err(TokenError::ZeroDenominator);
            }
            to_float(int_digits)? / denominator
        }
        Some('.') => {
            cursor.bump();
            let fraction = cursor.digits();
            if int_digits.is_empty() && fraction.is_empty() {
                return Err(TokenError::MissingDigits);
            }
            cursor.expect_end()?;
            to_float(&text[int_start..cursor.offset])?
        }
        Some(found) => {
            return Err(TokenError::UnexpectedChar {
                found,
                offset: cursor.offset,
            })
        }
    };

    if magnitude != 0.0 && !SCALE_RANGE.contains(&magnitude) {
        return Err(TokenError::OutOfRange);
    }

    Ok(if negative { -magnitude } else { magnitude })
}

fn to_float(digits: &str) -> Result<f64, TokenError> {
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(TokenError::OutOfRange)
}

struct Cursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor { text, offset: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.offset += c.len_utf8();
        }
    }

    fn digits(&mut self) -> &'a str {
        let start = self.offset;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        &self.text[start..self.offset]
    }

    fn expect_end(&self) -> Result<(), TokenError> {
        match self.peek() {
            None => Ok(()),
            Some(found) => Err(TokenError::UnexpectedChar {
                found,
                offset: self.offset,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    Criteria,
    Alternatives { criterion: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairLocation {
    pub scope: Scope,
    pub row: usize,
    pub col: usize,
}

impl PairLocation {
    pub fn new(scope: Scope, row: usize, col: usize) -> Self {
        PairLocation { scope, row, col }
    }
}

impl fmt::Display for PairLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Scope::Criteria => write!(f, "criteria ({}, {})", self.row, self.col),
            Scope::Alternatives { criterion } => write!(
                f,
                "alternatives ({}, {}) under criterion {}",
                self.row, self.col, criterion
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningReason {
    Malformed(String),
    NonPositive(f64),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputWarning {
    pub location: PairLocation,
    pub token: String,
    pub reason: WarningReason,
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            WarningReason::Malformed(detail) => write!(
                f,
                "Invalid input {:?} for {} ({}); using 1 as the default value",
                self.token, self.location, detail
            ),
            WarningReason::NonPositive(_) => write!(
                f,
                "Value {:?} for {} must be positive; using 1 as the default value",
                self.token, self.location
            ),
        }
    }
}

pub fn parse_comparison(token: &str, location: PairLocation) -> (f64, Option<InputWarning>) {
    let reason = match parse_scale_value(token) {
        Ok(value) if value > 0.0 => return (value, None),
        Ok(value) => WarningReason::NonPositive(value),
        Err(e) => WarningReason::Malformed(e.to_string()),
    };

    let warning = InputWarning {
        location,
        token: token.to_string(),
        reason,
    };
    warn!("{}", warning);

    (DEFAULT_SCALE_VALUE, Some(warning))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn loc() -> PairLocation {
        PairLocation::new(Scope::Criteria, 0, 1)
    }

    #[test]
    fn test_parse_integers_and_decimals() {
        assert_eq!(parse_scale_value("3").unwrap(), 3.0);
        assert_eq!(parse_scale_value("2.5").unwrap(), 2.5);
        assert_eq!(parse_scale_value(".5").unwrap(), 0.5);
        assert_eq!(parse_scale_value("4.").unwrap(), 4.0);
        assert_eq!(parse_scale_value("  7 ").unwrap(), 7.0);
        assert_eq!(parse_scale_value("+9").unwrap(), 9.0);
        assert_eq!(parse_scale_value("-2").unwrap(), -2.0);
    }

    #[test]
    fn test_parse_fractions() {
        assert_relative_eq!(parse_scale_value("1/3").unwrap(), 1.0 / 3.0);
        assert_relative_eq!(parse_scale_value("-3/4").unwrap(), -0.75);
        assert_eq!(
            parse_scale_value("1/0"),
            Err(TokenError::ZeroDenominator)
        );
    }

    #[test]
    fn test_parse_rejects_unintended_syntax() {
        assert_eq!(parse_scale_value(""), Err(TokenError::Empty));
        assert_eq!(parse_scale_value("   "), Err(TokenError::Empty));
        assert_eq!(parse_scale_value("."), Err(TokenError::MissingDigits));
        assert_eq!(parse_scale_value("-"), Err(TokenError::MissingDigits));
        assert_eq!(parse_scale_value("/3"), Err(TokenError::MissingDigits));
        assert_eq!(parse_scale_value("3/"), Err(TokenError::MissingDigits));
        assert!(parse_scale_value("abc").is_err());
        assert!(parse_scale_value("1e3").is_err());
        assert!(parse_scale_value("inf").is_err());
        assert!(parse_scale_value("1.5/2").is_err());
        assert!(parse_scale_value("1 / 3").is_err());
        assert!(parse_scale_value("2+1").is_err());
        assert!(parse_scale_value("--2").is_err());
    }

    #[test]
    fn test_parse_out_of_range() {
        let huge = "9".repeat(400);
        assert_eq!(parse_scale_value(&huge), Err(TokenError::OutOfRange));

        let near_max = format!("1{}", "0".repeat(308));
        assert_eq!(parse_scale_value(&near_max), Err(TokenError::OutOfRange));

        let subnormal = format!("0.{}1", "0".repeat(309));
        assert_eq!(parse_scale_value(&subnormal), Err(TokenError::OutOfRange));

        let tiny_fraction = format!("1/1{}", "0".repeat(200));
        assert_eq!(parse_scale_value(&tiny_fraction), Err(TokenError::OutOfRange));

        assert_eq!(parse_scale_value("0.0"), Ok(0.0));
        assert!(parse_scale_value(&format!("1{}", "0".repeat(100))).is_ok());
    }

    #[test]
    fn test_extreme_tokens_fall_back_to_default() {
        for token in [format!("0.{}1", "0".repeat(309)), format!("1{}", "0".repeat(308))] {
            let (value, warning) = parse_comparison(&token, loc());
            assert_eq!(value, 1.0);
            assert!(matches!(
                warning.unwrap().reason,
                WarningReason::Malformed(_)
            ));
        }
    }

    #[test]
    fn test_parse_comparison_fallback() {
        for token in ["", "abc", "-2", "0", "0/4", "1/0"] {
            let (value, warning) = parse_comparison(token, loc());
            assert_eq!(value, 1.0, "token {:?}", token);
            let warning = warning.expect("warning expected");
            assert_eq!(warning.token, token);
            assert_eq!(warning.location, loc());
        }
    }

    #[test]
    fn test_parse_comparison_valid() {
        let (value, warning) = parse_comparison("1/3", loc());
        assert_relative_eq!(value, 0.333_333_333_333, epsilon = 1e-9);
        assert!(warning.is_none());

        let (value, warning) = parse_comparison("3", loc());
        assert_eq!(value, 3.0);
        assert!(warning.is_none());
    }

    #[test]
    fn test_warning_reason_and_message() {
        let (_, warning) = parse_comparison("-2", loc());
        let warning = warning.unwrap();
        assert_eq!(warning.reason, WarningReason::NonPositive(-2.0));
        assert!(warning.to_string().contains("must be positive"));

        let location = PairLocation::new(Scope::Alternatives { criterion: 2 }, 0, 2);
        let (_, warning) = parse_comparison("abc", location);
        let message = warning.unwrap().to_string();
        assert!(message.starts_with("Invalid input \"abc\""));
        assert!(message.contains("under criterion 2"));
    }
}
