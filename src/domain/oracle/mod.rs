//! Oracle domain module.
//!
//! Result shapes of the three oracle contracts and the extraction of JSON
//! payloads from raw model text.

mod extractor;
mod results;

pub use extractor::{
    ExtractionError, PayloadExtractor, ResponseSanitizer, SanitizationError, MAX_FIELD_LENGTH,
    MAX_RESPONSE_LENGTH,
};
pub use results::{ExtractionResult, OracleContract, SearchResult};
