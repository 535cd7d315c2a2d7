use super::{display_date, excerpt, require, FieldKind, FieldSpec, FormError, FormInput, Payload, Resource, ResourceKind};
use crate::models::{BlogForm, BlogPost};

impl Resource for BlogPost {
    type Form = BlogForm;

    const KIND: ResourceKind = ResourceKind::Blog;

    const COLUMNS: &'static [&'static str] = &["Title", "Description", "Created"];

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "Title", FieldKind::Text, true),
        FieldSpec::new("description", "Description", FieldKind::TextArea, true),
        FieldSpec::new("content", "Content", FieldKind::TextArea, true),
        FieldSpec::new("image", "Cover Image", FieldKind::File, false),
        FieldSpec::new("detailed_page_image", "Detail Page Images", FieldKind::Files, false),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.description]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            excerpt(&self.description, 80),
            display_date(self.created_at),
        ]
    }

    fn thumbnail(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Title", self.title.clone()),
            ("Description", self.description.clone()),
            ("Content", self.content.clone()),
            ("Created", display_date(self.created_at)),
        ]
    }

    fn edit_form(&self) -> BlogForm {
        BlogForm::from_post(self)
    }

    fn form_values(form: &BlogForm) -> Vec<(&'static str, String)> {
        vec![
            ("title", form.title.clone()),
            ("description", form.description.clone()),
            ("content", form.content.clone()),
        ]
    }

    fn read_form(input: &FormInput) -> BlogForm {
        BlogForm {
            title: input.text("title"),
            description: input.text("description"),
            content: input.text("content"),
            image: input.file("image"),
            detailed_page_image: input.files("detailed_page_image"),
        }
    }

    fn validate(form: &BlogForm) -> Result<(), FormError> {
        require(&form.title, "Title")?;
        require(&form.description, "Description")?;
        require(&form.content, "Content")
    }

    fn payload(form: &BlogForm) -> Payload {
        Payload::multipart()
            .text("title", form.title.trim())
            .text("description", form.description.trim())
            .text("content", &form.content)
            .file("image", form.image.as_ref())
            .files("detailed_page_image", &form.detailed_page_image)
            .build()
    }
}
