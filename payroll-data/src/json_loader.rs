//! JSON payload loader.
//!
//! A payload is a single JSON array whose items are employee objects, in
//! whichever field-name convention the producer uses:
//!
//! ```json
//! [
//!   { "name": "Ana Costa", "cpf": "789.123.456-00", "grossSalary": 2500,
//!     "socialSecurityDiscount": 275, "dependents": 0 }
//! ]
//! ```
//!
//! Items are returned untranslated; the field mapping is applied later by
//! [`payroll_core::ImportAdapter`].

use payroll_core::import::json_type;
use serde_json::Value;

use crate::error::LoadError;

/// Parse a JSON document and return its array items in order.
///
/// # Errors
///
/// * [`LoadError::Json`] if the text is not valid JSON.
/// * [`LoadError::NotAnArray`] if the top-level value is not an array.
pub fn parse_payload(input: &str) -> Result<Vec<Value>, LoadError> {
    match serde_json::from_str(input)? {
        Value::Array(items) => Ok(items),
        other => Err(LoadError::NotAnArray {
            found: json_type(&other),
        }),
    }
}
