//! Property listing definition used by host intake.

use once_cell::sync::Lazy;

use super::{DraftSchema, EntityDefinition, FieldKind, RequiredFieldSpec};
use crate::domain::foundation::{EntityKind, ValidationError};

/// Required listing fields, in the order the host is asked for them.
pub const LISTING_REQUIRED_FIELDS: [&str; 5] = [
    "basics.title",
    "location.city",
    "capacity.maxGuests",
    "basics.description",
    "pricing.basePrice",
];

const LISTING_CONFIRMATION: &str =
    "Your listing has everything it needs. Review the details and publish when you're ready.";

static LISTING: Lazy<EntityDefinition> =
    Lazy::new(|| build_listing().expect("listing definition must be well formed"));

/// The listing definition shared by every intake session.
pub fn listing_definition() -> &'static EntityDefinition {
    &LISTING
}

fn build_listing() -> Result<EntityDefinition, ValidationError> {
    let schema = DraftSchema::new()
        .with_field("basics.title", FieldKind::Text, "title")?
        .with_field("basics.description", FieldKind::Text, "description")?
        .with_field("basics.propertyType", FieldKind::Text, "property type")?
        .with_field("location.address", FieldKind::Text, "street address")?
        .with_field("location.city", FieldKind::Text, "city")?
        .with_field("location.state", FieldKind::Text, "state or region")?
        .with_field("location.country", FieldKind::Text, "country")?
        .with_field("capacity.maxGuests", FieldKind::Integer, "maximum number of guests")?
        .with_field("capacity.bedrooms", FieldKind::Integer, "number of bedrooms")?
        .with_field("capacity.beds", FieldKind::Integer, "number of beds")?
        .with_field("capacity.bathrooms", FieldKind::Number, "number of bathrooms")?
        .with_field("pricing.basePrice", FieldKind::Number, "nightly base price")?
        .with_field("pricing.cleaningFee", FieldKind::Number, "cleaning fee")?
        .with_field("pricing.currency", FieldKind::Text, "currency")?
        .with_field("features.amenities", FieldKind::TextList, "amenities")?
        .with_field("features.petsAllowed", FieldKind::Boolean, "pet policy")?;

    EntityDefinition::new(
        EntityKind::new("listing")?,
        schema,
        RequiredFieldSpec::parse(LISTING_REQUIRED_FIELDS)?,
        LISTING_CONFIRMATION,
    )
}
