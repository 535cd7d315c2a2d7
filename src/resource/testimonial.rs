use super::{display_date, excerpt, require, FieldKind, FieldSpec, FormError, FormInput, Payload, Resource, ResourceKind};
use crate::models::{Testimonial, TestimonialForm};

impl Resource for Testimonial {
    type Form = TestimonialForm;

    const KIND: ResourceKind = ResourceKind::Testimonial;

    const COLUMNS: &'static [&'static str] = &["Name", "Message", "Created"];

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text, true),
        FieldSpec::new("message", "Message", FieldKind::TextArea, true),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.message]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            excerpt(&self.message, 100),
            display_date(self.created_at),
        ]
    }

    fn edit_form(&self) -> TestimonialForm {
        TestimonialForm {
            name: self.name.clone(),
            message: self.message.clone(),
        }
    }

    fn form_values(form: &TestimonialForm) -> Vec<(&'static str, String)> {
        vec![("name", form.name.clone()), ("message", form.message.clone())]
    }

    fn read_form(input: &FormInput) -> TestimonialForm {
        TestimonialForm {
            name: input.text("name"),
            message: input.text("message"),
        }
    }

    fn validate(form: &TestimonialForm) -> Result<(), FormError> {
        require(&form.name, "Name")?;
        require(&form.message, "Message")
    }

    fn payload(form: &TestimonialForm) -> Payload {
        Payload::Json(serde_json::json!({
            "name": form.name.trim(),
            "message": form.message.trim(),
        }))
    }
}
