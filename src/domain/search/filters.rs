//! Shape of the filters a search conversation accumulates.

use once_cell::sync::Lazy;

use crate::domain::draft::{DraftSchema, FieldKind};
use crate::domain::foundation::ValidationError;

static SEARCH_FILTERS: Lazy<DraftSchema> =
    Lazy::new(|| build_schema().expect("search filter schema must be well formed"));

/// Schema used to merge `inferredFilters` across search turns.
pub fn search_filter_schema() -> &'static DraftSchema {
    &SEARCH_FILTERS
}

fn build_schema() -> Result<DraftSchema, ValidationError> {
    DraftSchema::new()
        .with_field("destination.city", FieldKind::Text, "city")?
        .with_field("destination.country", FieldKind::Text, "country")?
        .with_field("dates.checkIn", FieldKind::Text, "check-in date")?
        .with_field("dates.checkOut", FieldKind::Text, "check-out date")?
        .with_field("guests.adults", FieldKind::Integer, "number of adults")?
        .with_field("guests.children", FieldKind::Integer, "number of children")?
        .with_field("budget.minNightly", FieldKind::Number, "minimum nightly price")?
        .with_field("budget.maxNightly", FieldKind::Number, "maximum nightly price")?
        .with_field("preferences.propertyType", FieldKind::Text, "property type")?
        .with_field("preferences.amenities", FieldKind::TextList, "amenities")?
        .with_field("preferences.petsAllowed", FieldKind::Boolean, "pets")
}
