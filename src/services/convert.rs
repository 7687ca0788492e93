//! Converter service
//!
//! Wraps the quantity pipeline in the JSON shape served by `/api/convert`.

use serde::Serialize;

use crate::converter::{convert_token, ConvertError};

/// Successful conversion response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub init_num: f64,
    pub init_unit: String,
    pub return_num: f64,
    pub return_unit: String,
    pub string: String,
}

/// Convert an input token, failing with the combined error kind
pub fn convert_input(input: &str) -> Result<ConvertResponse, ConvertError> {
    let conversion = convert_token(input);
    if let Some(err) = conversion.error() {
        tracing::debug!("Rejected conversion input '{}': {}", input, err);
        return Err(err);
    }

    let string = conversion.result_string();
    let rounded = conversion.rounded_return_num();
    match (
        conversion.init_num,
        conversion.init_unit,
        rounded,
        conversion.return_unit,
    ) {
        (Ok(init_num), Ok(init_unit), Some(return_num), Ok(return_unit)) => Ok(ConvertResponse {
            init_num: init_num.value,
            init_unit: init_unit.symbol,
            return_num,
            return_unit: return_unit.symbol().to_string(),
            string,
        }),
        _ => Err(ConvertError::InvalidNumberAndUnit),
    }
}
