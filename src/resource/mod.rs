//! Generic admin resources
//!
//! Blogs, gallery entries, testimonials and contact messages share one
//! list/search/create/update/delete workflow. Each kind implements
//! [`Resource`] to describe its endpoint, form fields, validation and payload;
//! [`ResourcePanel`] runs the workflow for any of them.

mod backend;
mod blog;
mod contact;
mod filter;
mod form;
mod gallery;
mod panel;
mod payload;
mod scope;
mod testimonial;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{HttpResourceBackend, ResourceBackend};
pub use contact::validate_contact;
pub use filter::Filter;
pub use form::{require, FieldKind, FieldSpec, FormError, FormInput};
pub use gallery::CATEGORY_OPTIONS;
pub use panel::{FormModal, PanelError, ResourcePanel};
pub use payload::{FilePart, MultipartBuilder, Part, PartValue, Payload};
pub use scope::{Aborted, ScopeHandle, ViewScope};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// The four resource kinds managed from the admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Blog,
    Gallery,
    Testimonial,
    Contact,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Blog,
        ResourceKind::Gallery,
        ResourceKind::Testimonial,
        ResourceKind::Contact,
    ];

    /// Backend collection path
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceKind::Blog => "blogs",
            ResourceKind::Gallery => "images",
            ResourceKind::Testimonial => "testimonials",
            ResourceKind::Contact => "contacts",
        }
    }

    /// Admin page path
    pub fn admin_path(&self) -> &'static str {
        match self {
            ResourceKind::Blog => "/admin/blogs",
            ResourceKind::Gallery => "/admin/gallery",
            ResourceKind::Testimonial => "/admin/testimonials",
            ResourceKind::Contact => "/admin/contacts",
        }
    }

    /// Singular label
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Blog => "Blog",
            ResourceKind::Gallery => "Image Gallery",
            ResourceKind::Testimonial => "Testimonial",
            ResourceKind::Contact => "Contact",
        }
    }

    /// Plural label
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Blog => "Blogs",
            ResourceKind::Gallery => "Gallery Images",
            ResourceKind::Testimonial => "Testimonials",
            ResourceKind::Contact => "Contacts",
        }
    }

    /// Contact messages are created by visitors, not from the admin
    pub fn supports_create(&self) -> bool {
        !matches!(self, ResourceKind::Contact)
    }

    /// Contact messages have no update endpoint
    pub fn supports_update(&self) -> bool {
        !matches!(self, ResourceKind::Contact)
    }

    /// Whether the admin list offers free-text search
    pub fn has_search(&self) -> bool {
        matches!(self, ResourceKind::Blog | ResourceKind::Contact)
    }

    /// Whether the admin list offers a category filter
    pub fn has_category(&self) -> bool {
        matches!(self, ResourceKind::Gallery)
    }
}

/// A record type managed through the generic admin workflow
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Editable state of the create/edit form
    type Form: Clone + Default + Send + Sync + 'static;

    const KIND: ResourceKind;

    /// Column headers of the admin list
    const COLUMNS: &'static [&'static str];

    /// Fields of the admin form
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> &str;

    /// Text fields matched by the search box
    fn search_text(&self) -> Vec<&str>;

    /// Category matched exactly by the category filter
    fn category(&self) -> Option<&str> {
        None
    }

    /// One cell per entry of `COLUMNS`
    fn cells(&self) -> Vec<String>;

    /// Filename of a representative image
    fn thumbnail(&self) -> Option<&str> {
        None
    }

    /// Label/value pairs of the detail view
    fn details(&self) -> Vec<(&'static str, String)> {
        Self::COLUMNS.iter().copied().zip(self.cells()).collect()
    }

    /// Form pre-filled from an existing record; file fields stay empty
    fn edit_form(&self) -> Self::Form;

    /// Current text values of a form, keyed by field name
    fn form_values(form: &Self::Form) -> Vec<(&'static str, String)>;

    /// Read a form back from submitted input
    fn read_form(input: &FormInput) -> Self::Form;

    fn validate(form: &Self::Form) -> Result<(), FormError>;

    fn payload(form: &Self::Form) -> Payload;
}

/// Date as shown in lists, e.g. "May 1, 2024"
pub fn display_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Shorten long text for table cells
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_endpoints() {
        assert_eq!(ResourceKind::Gallery.endpoint(), "images");
        assert_eq!(ResourceKind::Contact.admin_path(), "/admin/contacts");
        assert!(!ResourceKind::Contact.supports_update());
        assert!(ResourceKind::Testimonial.supports_update());
    }

    #[test]
    fn test_display_date() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(display_date(Some(ts)), "May 1, 2024");
        assert_eq!(display_date(None), "");
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("a long description here", 6), "a long...");
    }
}
