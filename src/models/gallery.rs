//! Gallery model
//!
//! A gallery entry groups several uploaded images under one title and one
//! category. Categories are a closed set; the portfolio page and the admin
//! filter both match on them exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::resource::FilePart;

/// Gallery entry as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "types", default)]
    pub category: GalleryCategory,
    /// Image filenames, in display order
    #[serde(rename = "imageUrl", default)]
    pub image_url: Vec<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Gallery category
///
/// Decoding is case-insensitive; values outside the set read as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum GalleryCategory {
    #[default]
    Venue,
    Decoration,
    Photography,
    Catering,
    Reception,
    Other,
}

impl GalleryCategory {
    pub const ALL: [GalleryCategory; 6] = [
        GalleryCategory::Venue,
        GalleryCategory::Decoration,
        GalleryCategory::Photography,
        GalleryCategory::Catering,
        GalleryCategory::Reception,
        GalleryCategory::Other,
    ];

    /// Wire value, as sent in the `types` field
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryCategory::Venue => "venue",
            GalleryCategory::Decoration => "decoration",
            GalleryCategory::Photography => "photography",
            GalleryCategory::Catering => "catering",
            GalleryCategory::Reception => "reception",
            GalleryCategory::Other => "other",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            GalleryCategory::Venue => "Venue",
            GalleryCategory::Decoration => "Decoration",
            GalleryCategory::Photography => "Photography",
            GalleryCategory::Catering => "Catering",
            GalleryCategory::Reception => "Reception",
            GalleryCategory::Other => "Other",
        }
    }
}

impl fmt::Display for GalleryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown gallery category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for GalleryCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl From<String> for GalleryCategory {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(GalleryCategory::Other)
    }
}

/// Admin form state for a gallery entry
#[derive(Debug, Clone, Default)]
pub struct GalleryForm {
    pub title: String,
    pub description: String,
    pub category: GalleryCategory,
    pub images: Vec<FilePart>,
}

impl GalleryForm {
    pub fn from_entry(entry: &GalleryEntry) -> Self {
        Self {
            title: entry.title.clone(),
            description: entry.description.clone(),
            category: entry.category,
            images: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Venue".parse::<GalleryCategory>(), Ok(GalleryCategory::Venue));
        assert_eq!(" catering ".parse::<GalleryCategory>(), Ok(GalleryCategory::Catering));
        assert!("ballroom".parse::<GalleryCategory>().is_err());
    }

    #[test]
    fn test_category_decoding_is_lenient() {
        let decode = |v: &str| serde_json::from_value::<GalleryCategory>(serde_json::json!(v)).unwrap();
        assert_eq!(decode("Venue"), GalleryCategory::Venue);
        assert_eq!(decode("CATERING"), GalleryCategory::Catering);
        assert_eq!(decode("ballroom"), GalleryCategory::Other);
        assert_eq!(serde_json::to_value(GalleryCategory::Venue).unwrap(), "venue");
    }

    #[test]
    fn test_entry_decodes_wire_names() {
        let json = serde_json::json!({
            "_id": "g1",
            "title": "Garden Ceremony",
            "description": "Outdoor vows",
            "types": "venue",
            "imageUrl": ["a.jpg", "b.jpg"],
            "createdAt": "2024-05-01T10:00:00.000Z"
        });
        let entry: GalleryEntry = serde_json::from_value(json).unwrap();

        assert_eq!(entry.category, GalleryCategory::Venue);
        assert_eq!(entry.image_url.len(), 2);
        assert!(entry.created_at.is_some());
        assert!(entry.updated_at.is_none());
    }

    #[test]
    fn test_edit_form_never_prefills_files() {
        let entry = GalleryEntry {
            id: "g1".into(),
            title: "Hall".into(),
            description: "".into(),
            category: GalleryCategory::Reception,
            image_url: vec!["x.jpg".into()],
            created_at: None,
            updated_at: None,
        };
        let form = GalleryForm::from_entry(&entry);
        assert_eq!(form.category, GalleryCategory::Reception);
        assert!(form.images.is_empty());
    }
}
