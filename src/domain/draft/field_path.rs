//! Dotted field paths into a draft (`basics.title`, `capacity.maxGuests`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Path from the draft root to one leaf, one segment per namespace level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path. Every segment must be non-empty and free of whitespace.
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        if path.trim().is_empty() {
            return Err(ValidationError::empty_field("field_path"));
        }
        Self::from_segments(path.split('.'))
    }

    /// Builds a path from already split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(ValidationError::empty_field("field_path"));
        }
        for segment in &segments {
            if segment.is_empty() {
                return Err(ValidationError::invalid_format("field_path", "empty segment"));
            }
            if segment.contains('.') || segment.chars().any(char::is_whitespace) {
                return Err(ValidationError::invalid_format(
                    "field_path",
                    format!("invalid segment '{}'", segment),
                ));
            }
        }
        Ok(Self { segments })
    }

    /// Returns the path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the top-level namespace of this path.
    pub fn namespace(&self) -> &str {
        &self.segments[0]
    }

    /// Returns the final segment.
    pub fn leaf_name(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_level_path() {
        let path = FieldPath::parse("capacity.maxGuests").unwrap();
        assert_eq!(path.segments(), ["capacity", "maxGuests"]);
        assert_eq!(path.namespace(), "capacity");
        assert_eq!(path.leaf_name(), "maxGuests");
        assert_eq!(path.to_string(), "capacity.maxGuests");
    }

    #[test]
    fn rejects_empty_and_malformed_paths() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("basics.").is_err());
        assert!(FieldPath::parse(".title").is_err());
        assert!(FieldPath::parse("basics.my title").is_err());
    }

    #[test]
    fn from_segments_rejects_embedded_dots() {
        assert!(FieldPath::from_segments(["basics", "a.b"]).is_err());
    }

    #[test]
    fn serializes_as_dotted_string() {
        let path: FieldPath = "pricing.basePrice".parse().unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"pricing.basePrice\"");
        let back: FieldPath = serde_json::from_str("\"pricing.basePrice\"").unwrap();
        assert_eq!(back, path);
    }
}
