//! Quantity token parsing
//!
//! A token is a magnitude immediately followed by a unit symbol, e.g. `"10km"`.
//! The pipeline is: split at the first letter, parse the magnitude, validate
//! the unit, convert, format.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::units::Unit;

lazy_static! {
    /// Non-negative decimal: optional digits, optional single dot, at least one trailing digit
    static ref DECIMAL: Regex = Regex::new(r"^\d*\.?\d+$").expect("valid decimal pattern");
}

/// Why a token could not be converted.
///
/// The display strings are part of the public output and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("invalid number")]
    InvalidNumber,

    #[error("invalid unit")]
    InvalidUnit,

    #[error("invalid number and unit")]
    InvalidNumberAndUnit,
}

impl ConvertError {
    fn combine(number: Option<ConvertError>, unit: Option<ConvertError>) -> Option<ConvertError> {
        match (number, unit) {
            (Some(_), Some(_)) => Some(ConvertError::InvalidNumberAndUnit),
            (Some(e), None) | (None, Some(e)) => Some(e),
            (None, None) => None,
        }
    }
}

/// A parsed magnitude: the literal as typed plus its evaluated value
#[derive(Debug, Clone, PartialEq)]
pub struct Magnitude {
    /// Literal text, e.g. `"1/2"`; `"1"` when the token had no numeric prefix
    pub literal: String,
    pub value: f64,
}

/// A validated unit, keeping the case it was typed in
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUnit {
    pub symbol: String,
    pub unit: Unit,
}

/// Byte index of the first ASCII letter in the token, if any
pub fn first_letter_index(token: &str) -> Option<usize> {
    token.find(|c: char| c.is_ascii_alphabetic())
}

/// Parse the numeric prefix of a token
///
/// Examples:
/// - `"gal"` -> 1
/// - `"3.5L"` -> 3.5
/// - `"1/2gal"` -> 0.5 (literal `"1/2"`)
/// - `"3/4/4gal"` -> invalid number
pub fn parse_number(token: &str) -> Result<Magnitude, ConvertError> {
    let prefix = match first_letter_index(token) {
        Some(0) => {
            return Ok(Magnitude {
                literal: "1".to_string(),
                value: 1.0,
            })
        }
        Some(idx) => &token[..idx],
        None => token,
    };

    let value = match prefix.split_once('/') {
        Some((numerator, denominator)) => {
            if denominator.contains('/') {
                return Err(ConvertError::InvalidNumber);
            }
            let numerator = parse_decimal(numerator)?;
            let denominator = parse_decimal(denominator)?;
            if denominator == 0.0 {
                return Err(ConvertError::InvalidNumber);
            }
            let value = numerator / denominator;
            if !value.is_finite() {
                return Err(ConvertError::InvalidNumber);
            }
            value
        }
        None => parse_decimal(prefix)?,
    };

    Ok(Magnitude {
        literal: prefix.to_string(),
        value,
    })
}

fn parse_decimal(s: &str) -> Result<f64, ConvertError> {
    if !DECIMAL.is_match(s) {
        return Err(ConvertError::InvalidNumber);
    }
    match s.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConvertError::InvalidNumber),
    }
}

/// Parse the unit suffix of a token
///
/// The suffix runs from the first letter to the end and must be one of the
/// six symbols spelled all lower-case or all upper-case.
pub fn parse_unit(token: &str) -> Result<ParsedUnit, ConvertError> {
    let idx = first_letter_index(token).ok_or(ConvertError::InvalidUnit)?;
    let symbol = &token[idx..];
    let unit = Unit::from_exact_symbol(symbol).ok_or(ConvertError::InvalidUnit)?;

    Ok(ParsedUnit {
        symbol: symbol.to_string(),
        unit,
    })
}

/// Full result of running a token through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub init_num: Result<Magnitude, ConvertError>,
    pub init_unit: Result<ParsedUnit, ConvertError>,
    pub return_num: Result<f64, ConvertError>,
    pub return_unit: Result<Unit, ConvertError>,
}

impl Conversion {
    /// The combined error kind, if either input stage failed
    pub fn error(&self) -> Option<ConvertError> {
        ConvertError::combine(
            self.init_num.as_ref().err().copied(),
            self.init_unit.as_ref().err().copied(),
        )
    }

    /// Converted value rounded to five decimals, exactly as the sentence shows it
    pub fn rounded_return_num(&self) -> Option<f64> {
        self.return_num
            .as_ref()
            .ok()
            .and_then(|n| fixed5(*n).parse().ok())
    }

    /// The human-readable sentence for this conversion
    pub fn result_string(&self) -> String {
        format_result(
            &self.init_num.as_ref().map(|m| m.value).map_err(|e| *e),
            &self.init_unit.as_ref().map(|u| u.symbol.as_str()).map_err(|e| *e),
            &self.return_num,
            &self.return_unit,
        )
    }
}

/// Run a token through parse, convert and pair
///
/// When either input stage fails no arithmetic is done: both return fields
/// carry the combined error.
pub fn convert_token(token: &str) -> Conversion {
    let mut init_num = parse_number(token);
    let init_unit = parse_unit(token);

    // A magnitude whose conversion overflows is as unusable as a malformed one
    if let (Ok(magnitude), Ok(parsed)) = (&init_num, &init_unit) {
        if !parsed.unit.convert(magnitude.value).is_finite() {
            init_num = Err(ConvertError::InvalidNumber);
        }
    }

    let (return_num, return_unit) = match (&init_num, &init_unit) {
        (Ok(magnitude), Ok(parsed)) => (
            Ok(parsed.unit.convert(magnitude.value)),
            Ok(parsed.unit.paired()),
        ),
        _ => {
            let err = ConvertError::combine(
                init_num.as_ref().err().copied(),
                init_unit.as_ref().err().copied(),
            )
            .unwrap_or(ConvertError::InvalidNumberAndUnit);
            (Err(err), Err(err))
        }
    };

    Conversion {
        init_num,
        init_unit,
        return_num,
        return_unit,
    }
}

/// Format `"{initNum} {initUnit} converts to {returnNum} {returnUnit}"`
///
/// A numeric `return_num` is rendered with exactly five decimals. Any field
/// holding an error is rendered as the error text.
pub fn format_result<U: std::fmt::Display, R: std::fmt::Display>(
    init_num: &Result<f64, ConvertError>,
    init_unit: &Result<U, ConvertError>,
    return_num: &Result<f64, ConvertError>,
    return_unit: &Result<R, ConvertError>,
) -> String {
    let return_num = match return_num {
        Ok(n) => fixed5(*n),
        Err(e) => e.to_string(),
    };

    format!(
        "{} {} converts to {} {}",
        display(init_num),
        display(init_unit),
        return_num,
        display(return_unit)
    )
}

/// Five decimal places, rounded from the exact binary value
fn fixed5(n: f64) -> String {
    format!("{:.5}", n)
}

fn display<T: std::fmt::Display>(value: &Result<T, ConvertError>) -> String {
    match value {
        Ok(v) => v.to_string(),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_letter_index() {
        assert_eq!(first_letter_index("3.5L"), Some(3));
        assert_eq!(first_letter_index("gal"), Some(0));
        assert_eq!(first_letter_index("1/2gal"), Some(3));
        assert_eq!(first_letter_index("42"), None);
    }

    #[test]
    fn test_parse_number_whole_and_decimal() {
        assert_eq!(parse_number("10km").unwrap().value, 10.0);
        assert_eq!(parse_number("3.5L").unwrap().value, 3.5);
        assert_eq!(parse_number(".5mi").unwrap().value, 0.5);
    }

    #[test]
    fn test_parse_number_defaults_to_one() {
        let magnitude = parse_number("gal").unwrap();
        assert_eq!(magnitude.value, 1.0);
        assert_eq!(magnitude.literal, "1");
    }

    #[test]
    fn test_parse_number_fraction() {
        let magnitude = parse_number("1/2gal").unwrap();
        assert_eq!(magnitude.literal, "1/2");
        assert_eq!(magnitude.value, 0.5);

        let magnitude = parse_number("2.5/5kg").unwrap();
        assert_eq!(magnitude.value, 0.5);
    }

    #[test]
    fn test_parse_number_double_fraction() {
        assert_eq!(parse_number("3/4/4gal"), Err(ConvertError::InvalidNumber));
    }

    #[test]
    fn test_parse_number_malformed_decimal_in_fraction() {
        assert_eq!(parse_number("3.1/2.2.2gal"), Err(ConvertError::InvalidNumber));
        assert_eq!(parse_number("3./2gal"), Err(ConvertError::InvalidNumber));
    }

    #[test]
    fn test_parse_number_rejects_junk_prefix() {
        assert_eq!(parse_number("3..5L"), Err(ConvertError::InvalidNumber));
        assert_eq!(parse_number("-2kg"), Err(ConvertError::InvalidNumber));
        assert_eq!(parse_number("/2gal"), Err(ConvertError::InvalidNumber));
        assert_eq!(parse_number("1/0gal"), Err(ConvertError::InvalidNumber));
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        let huge = format!("{}gal", "9".repeat(400));
        assert_eq!(parse_number(&huge), Err(ConvertError::InvalidNumber));

        let tiny = format!("0.{}1", "0".repeat(320));
        let quotient = format!("1{}/{}kg", "0".repeat(300), tiny);
        assert_eq!(parse_number(&quotient), Err(ConvertError::InvalidNumber));
    }

    #[test]
    fn test_conversion_overflow_is_invalid_number() {
        let conversion = convert_token(&format!("1{}mi", "0".repeat(308)));
        assert_eq!(conversion.error(), Some(ConvertError::InvalidNumber));
        assert_eq!(conversion.return_num, Err(ConvertError::InvalidNumber));
    }

    #[test]
    fn test_parse_number_without_unit() {
        assert_eq!(parse_number("42").unwrap().value, 42.0);
    }

    #[test]
    fn test_parse_unit_valid() {
        let parsed = parse_unit("3.5L").unwrap();
        assert_eq!(parsed.symbol, "L");
        assert_eq!(parsed.unit, Unit::L);

        assert_eq!(parse_unit("gal").unwrap().symbol, "gal");
        assert_eq!(parse_unit("10KM").unwrap().unit, Unit::Km);
    }

    #[test]
    fn test_parse_unit_invalid() {
        assert_eq!(parse_unit("3zzz"), Err(ConvertError::InvalidUnit));
        assert_eq!(parse_unit("42"), Err(ConvertError::InvalidUnit));
        assert_eq!(parse_unit("1Gal"), Err(ConvertError::InvalidUnit));
        assert_eq!(parse_unit("5galx"), Err(ConvertError::InvalidUnit));
    }

    #[test]
    fn test_convert_token_gallons() {
        let conversion = convert_token("4gal");
        assert_eq!(conversion.error(), None);
        assert_eq!(conversion.return_unit, Ok(Unit::L));
        assert_eq!(conversion.rounded_return_num(), Some(15.14164));
        assert_eq!(conversion.result_string(), "4 gal converts to 15.14164 l");
    }

    #[test]
    fn test_convert_token_bare_unit() {
        let conversion = convert_token("L");
        assert_eq!(conversion.result_string(), "1 L converts to 0.26417 gal");
    }

    #[test]
    fn test_convert_token_fraction() {
        let conversion = convert_token("1/2mi");
        assert_eq!(conversion.result_string(), "0.5 mi converts to 0.80467 km");
    }

    #[test]
    fn test_convert_token_invalid_unit() {
        let conversion = convert_token("3zzz");
        assert_eq!(conversion.error(), Some(ConvertError::InvalidUnit));
        assert_eq!(conversion.return_num, Err(ConvertError::InvalidUnit));
        assert_eq!(
            conversion.result_string(),
            "3 invalid unit converts to invalid unit invalid unit"
        );
    }

    #[test]
    fn test_convert_token_invalid_number_and_unit() {
        let conversion = convert_token("3/7.2/4kilomegagram");
        assert_eq!(conversion.error(), Some(ConvertError::InvalidNumberAndUnit));
        assert!(conversion.result_string().starts_with("invalid number invalid unit"));
    }

    #[test]
    fn test_format_result_renders_errors_verbatim() {
        let s = format_result::<&str, Unit>(
            &Ok(3.0),
            &Ok("kg"),
            &Err(ConvertError::InvalidNumber),
            &Ok(Unit::Lbs),
        );
        assert_eq!(s, "3 kg converts to invalid number lbs");
    }
}
