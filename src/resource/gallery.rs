use super::{display_date, require, FieldKind, FieldSpec, FormError, FormInput, Payload, Resource, ResourceKind};
use crate::models::{GalleryCategory, GalleryEntry, GalleryForm};

/// Select options of the category field, value then label
pub const CATEGORY_OPTIONS: &[(&str, &str)] = &[
    ("venue", "Venue"),
    ("decoration", "Decoration"),
    ("photography", "Photography"),
    ("catering", "Catering"),
    ("reception", "Reception"),
    ("other", "Other"),
];

impl Resource for GalleryEntry {
    type Form = GalleryForm;

    const KIND: ResourceKind = ResourceKind::Gallery;

    const COLUMNS: &'static [&'static str] = &["Title", "Category", "Images", "Created"];

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "Title", FieldKind::Text, true),
        FieldSpec::new("description", "Description", FieldKind::TextArea, true),
        FieldSpec::new("types", "Category", FieldKind::Select(CATEGORY_OPTIONS), true),
        FieldSpec::new("imageUrl", "Images", FieldKind::Files, false),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.description]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.category.label().to_string(),
            self.image_url.len().to_string(),
            display_date(self.created_at),
        ]
    }

    fn thumbnail(&self) -> Option<&str> {
        self.image_url.first().map(String::as_str)
    }

    fn edit_form(&self) -> GalleryForm {
        GalleryForm::from_entry(self)
    }

    fn form_values(form: &GalleryForm) -> Vec<(&'static str, String)> {
        vec![
            ("title", form.title.clone()),
            ("description", form.description.clone()),
            ("types", form.category.as_str().to_string()),
        ]
    }

    fn read_form(input: &FormInput) -> GalleryForm {
        let category = input.text("types");
        GalleryForm {
            title: input.text("title"),
            description: input.text("description"),
            category: category.parse().unwrap_or_else(|_| {
                tracing::debug!(category = %category, "Unknown category, using default");
                GalleryCategory::default()
            }),
            images: input.files("imageUrl"),
        }
    }

    fn validate(form: &GalleryForm) -> Result<(), FormError> {
        require(&form.title, "Title")?;
        require(&form.description, "Description")
    }

    fn payload(form: &GalleryForm) -> Payload {
        Payload::multipart()
            .text("title", form.title.trim())
            .text("description", form.description.trim())
            .text("types", form.category.as_str())
            .files("imageUrl", &form.images)
            .build()
    }
}
