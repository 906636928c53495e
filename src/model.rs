use serde::{Deserialize, Serialize};

/// Fixed number of image slots in the flat row layout.
pub const IMAGE_SLOTS: usize = 5;
/// Fixed number of bibliographic reference slots.
pub const REFERENCE_SLOTS: usize = 10;
/// Fixed number of tag slots.
pub const TAG_SLOTS: usize = 15;

pub const TITLE_MAX: usize = 75;
pub const DESCRIPTION_MAX: usize = 3000;
pub const REFERENCE_MAX: usize = 75;
pub const LOCATION_MAX: usize = 75;
pub const TAG_MAX: usize = 20;
/// Upper bound for each physical dimension, inclusive.
pub const DIMENSION_MAX: f64 = 99_999.99;

/// Physical dimensions of a piece. Each field is the validated decimal text
/// the user entered; absent dimensions are `None`, never zero or `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeTriple {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl SizeTriple {
    pub fn is_empty(&self) -> bool {
        self.length.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// Canonical decoded representation of one artifact's catalog entry.
///
/// The slot counts (`IMAGE_SLOTS`, `REFERENCE_SLOTS`, `TAG_SLOTS`) are a
/// storage-layer artifact of the flat row layout, not a domain constraint;
/// sequences here hold only the elements that are actually present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub title: String,
    pub description: String,
    /// Image references, first slot first. Encoding keeps the first five.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Bibliographic references, first slot first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "SizeTriple::is_empty")]
    pub size: SizeTriple,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ArtifactRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        ArtifactRecord {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}
