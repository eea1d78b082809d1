//! Validation Adapters - Schema validation implementations.
//!
//! Contains adapters for validating oracle answers against JSON Schemas.

mod json_response_validator;

pub use json_response_validator::JsonResponseValidator;
