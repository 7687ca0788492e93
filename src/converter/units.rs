//! Unit symbols and conversion constants
//!
//! The six supported units come in three metric/imperial pairs. Every table
//! here is a `match` over [`Unit`], so there is no mutable global state.

use serde::Serialize;

use super::quantity::ConvertError;

// ============================================================================
// Conversion Constants
// ============================================================================

/// Liters per US gallon
pub const LITERS_PER_GALLON: f64 = 3.78541;
/// Kilograms per pound
pub const KILOGRAMS_PER_POUND: f64 = 0.453592;
/// Kilometers per mile
pub const KILOMETERS_PER_MILE: f64 = 1.60934;

/// A supported unit, keyed by its canonical lower-case symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Gal,
    L,
    Mi,
    Km,
    Lbs,
    Kg,
}

impl Unit {
    pub const ALL: [Unit; 6] = [Unit::Gal, Unit::L, Unit::Mi, Unit::Km, Unit::Lbs, Unit::Kg];

    /// Canonical lower-case symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Gal => "gal",
            Unit::L => "l",
            Unit::Mi => "mi",
            Unit::Km => "km",
            Unit::Lbs => "lbs",
            Unit::Kg => "kg",
        }
    }

    /// Case-insensitive lookup, used by every table after validation
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gal" => Some(Unit::Gal),
            "l" => Some(Unit::L),
            "mi" => Some(Unit::Mi),
            "km" => Some(Unit::Km),
            "lbs" => Some(Unit::Lbs),
            "kg" => Some(Unit::Kg),
            _ => None,
        }
    }

    /// Strict lookup used to validate input: only the all-lower or
    /// all-upper spelling is accepted, so `"Gal"` is rejected.
    pub fn from_exact_symbol(s: &str) -> Option<Self> {
        match s {
            "gal" | "GAL" => Some(Unit::Gal),
            "l" | "L" => Some(Unit::L),
            "mi" | "MI" => Some(Unit::Mi),
            "km" | "KM" => Some(Unit::Km),
            "lbs" | "LBS" => Some(Unit::Lbs),
            "kg" | "KG" => Some(Unit::Kg),
            _ => None,
        }
    }

    /// The unit this one converts to
    pub fn paired(&self) -> Unit {
        match self {
            Unit::Gal => Unit::L,
            Unit::L => Unit::Gal,
            Unit::Mi => Unit::Km,
            Unit::Km => Unit::Mi,
            Unit::Lbs => Unit::Kg,
            Unit::Kg => Unit::Lbs,
        }
    }

    /// Full English name
    pub fn spelled_out(&self) -> &'static str {
        match self {
            Unit::Gal => "gallons",
            Unit::L => "liters",
            Unit::Mi => "miles",
            Unit::Km => "kilometers",
            Unit::Lbs => "pounds",
            Unit::Kg => "kilograms",
        }
    }

    /// Convert a magnitude in this unit to the paired unit
    pub fn convert(&self, value: f64) -> f64 {
        match self {
            Unit::Gal => value * LITERS_PER_GALLON,
            Unit::L => value / LITERS_PER_GALLON,
            Unit::Lbs => value * KILOGRAMS_PER_POUND,
            Unit::Kg => value / KILOGRAMS_PER_POUND,
            Unit::Mi => value * KILOMETERS_PER_MILE,
            Unit::Km => value / KILOMETERS_PER_MILE,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Lookups by symbol
// ============================================================================

/// Get the paired unit for a symbol (case-insensitive)
pub fn get_return_unit(unit: &str) -> Option<Unit> {
    Unit::from_symbol(unit).map(|u| u.paired())
}

/// Get the spelled-out name for a symbol (case-insensitive)
pub fn spell_out_unit(unit: &str) -> Option<&'static str> {
    Unit::from_symbol(unit).map(|u| u.spelled_out())
}

/// Convert a magnitude given in `unit` (case-insensitive) to its paired unit
pub fn convert(value: f64, unit: &str) -> Result<f64, ConvertError> {
    Unit::from_symbol(unit)
        .map(|u| u.convert(value))
        .ok_or(ConvertError::InvalidUnit)
}
