//! Metric/imperial conversion module
//!
//! Parses compact quantity tokens such as `"3.5L"` or `"1/2gal"` and converts
//! them to their paired unit.

pub mod quantity;
pub mod units;

pub use quantity::{
    convert_token, first_letter_index, format_result, parse_number, parse_unit, ConvertError,
    Conversion, Magnitude, ParsedUnit,
};
pub use units::{convert, get_return_unit, spell_out_unit, Unit};
