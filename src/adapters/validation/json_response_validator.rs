//! JSON Schema Validator - Implementation of ResponseValidator.
//!
//! Validates oracle payloads by hand against the embedded JSON Schema
//! definitions. The schemas themselves are also handed to the model as the
//! expected answer shape, so both sides read the same document.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::domain::oracle::OracleContract;
use crate::ports::{ResponseValidationError, ResponseValidator};

/// Validator for the three oracle contracts.
///
/// Stateless; `Send + Sync` and cheap to share.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonResponseValidator;

impl JsonResponseValidator {
    pub fn new() -> Self {
        Self
    }

    fn load_raw_schema(contract: OracleContract) -> Value {
        let schema_str = match contract {
            OracleContract::Extraction => include_str!("schemas/extraction.json"),
            OracleContract::Verification => include_str!("schemas/verification.json"),
            OracleContract::Search => include_str!("schemas/search.json"),
        };

        serde_json::from_str(schema_str)
            .unwrap_or_else(|e| panic!("Failed to parse schema for {}: {}", contract, e))
    }

    // =========================================================================
    // Contract-specific validators
    // =========================================================================

    fn validate_extraction(&self, payload: &Value) -> Result<(), ResponseValidationError> {
        let obj = require_object(payload, "root")?;
        let mut errors = Vec::new();

        check(&mut errors, require_object_field(obj, "partialUpdate"));
        check(&mut errors, require_string_field(obj, "followUpPrompt"));

        finish(errors)
    }

    fn validate_verification(&self, payload: &Value) -> Result<(), ResponseValidationError> {
        let obj = require_object(payload, "root")?;
        let mut errors = Vec::new();

        check(&mut errors, require_bool_field(obj, "isValid"));
        for field in ["detectedKind", "summary", "rejectionReason"] {
            check(&mut errors, optional_of_type(obj, field, "string", Value::is_string));
        }

        finish(errors)
    }

    fn validate_search(&self, payload: &Value) -> Result<(), ResponseValidationError> {
        let obj = require_object(payload, "root")?;
        let mut errors = Vec::new();

        check(&mut errors, require_string_field(obj, "narrative"));
        check(&mut errors, require_string_array(obj, "candidateIds"));
        check(&mut errors, optional_of_type(obj, "inferredFilters", "object", Value::is_object));

        finish(errors)
    }
}

/// Static storage for raw schemas (for `schema_for`).
static RAW_SCHEMAS: Lazy<HashMap<OracleContract, Value>> = Lazy::new(|| {
    OracleContract::all()
        .iter()
        .map(|c| (*c, JsonResponseValidator::load_raw_schema(*c)))
        .collect()
});

impl ResponseValidator for JsonResponseValidator {
    fn validate(
        &self,
        contract: OracleContract,
        payload: &Value,
    ) -> Result<(), ResponseValidationError> {
        match contract {
            OracleContract::Extraction => self.validate_extraction(payload),
            OracleContract::Verification => self.validate_verification(payload),
            OracleContract::Search => self.validate_search(payload),
        }
    }

    fn schema_for(&self, contract: OracleContract) -> &Value {
        RAW_SCHEMAS
            .get(&contract)
            .expect("Schema must exist for all oracle contracts")
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn check(errors: &mut Vec<ResponseValidationError>, result: Result<(), ResponseValidationError>) {
    if let Err(e) = result {
        errors.push(e);
    }
}

fn finish(errors: Vec<ResponseValidationError>) -> Result<(), ResponseValidationError> {
    match ResponseValidationError::collect(errors) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn require_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, ResponseValidationError> {
    value
        .as_object()
        .ok_or_else(|| invalid_type(path, "object", value))
}

fn require_field<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, ResponseValidationError> {
    obj.get(field)
        .ok_or_else(|| ResponseValidationError::MissingRequired {
            field: field.to_string(),
        })
}

fn require_string_field(obj: &Map<String, Value>, field: &str) -> Result<(), ResponseValidationError> {
    let val = require_field(obj, field)?;
    if !val.is_string() {
        return Err(invalid_type(field, "string", val));
    }
    Ok(())
}

fn require_bool_field(obj: &Map<String, Value>, field: &str) -> Result<(), ResponseValidationError> {
    let val = require_field(obj, field)?;
    if !val.is_boolean() {
        return Err(invalid_type(field, "boolean", val));
    }
    Ok(())
}

fn require_object_field(obj: &Map<String, Value>, field: &str) -> Result<(), ResponseValidationError> {
    let val = require_field(obj, field)?;
    require_object(val, field).map(|_| ())
}

fn require_string_array(obj: &Map<String, Value>, field: &str) -> Result<(), ResponseValidationError> {
    let val = require_field(obj, field)?;
    let items = val
        .as_array()
        .ok_or_else(|| invalid_type(field, "array", val))?;
    for (i, item) in items.iter().enumerate() {
        if !item.is_string() {
            return Err(invalid_type(&format!("{}[{}]", field, i), "string", item));
        }
    }
    Ok(())
}

/// Absent and `null` are both fine; anything else must pass `is_expected`.
fn optional_of_type(
    obj: &Map<String, Value>,
    field: &str,
    expected: &str,
    is_expected: fn(&Value) -> bool,
) -> Result<(), ResponseValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(val) if is_expected(val) => Ok(()),
        Some(val) => Err(invalid_type(field, expected, val)),
    }
}

fn invalid_type(field: &str, expected: &str, actual: &Value) -> ResponseValidationError {
    ResponseValidationError::InvalidType {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: type_name(actual).to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
