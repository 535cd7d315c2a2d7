use once_cell::sync::Lazy;
use regex::Regex;

use super::{display_date, FieldKind, FieldSpec, FormError, FormInput, Payload, Resource, ResourceKind};
use crate::models::{ContactForm, ContactMessage};

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Check a contact form: every field filled, then the email shape
pub fn validate_contact(form: &ContactForm) -> Result<(), FormError> {
    let fields = [&form.name, &form.email, &form.phone_number, &form.message];
    if fields.iter().any(|value| value.trim().is_empty()) {
        return Err(FormError::Incomplete);
    }
    let well_formed = EMAIL_RE
        .as_ref()
        .map_or(true, |re| re.is_match(form.email.trim()));
    if !well_formed {
        return Err(FormError::Invalid {
            field: "email",
            reason: "Please enter a valid email address.".to_string(),
        });
    }
    Ok(())
}

impl Resource for ContactMessage {
    type Form = ContactForm;

    const KIND: ResourceKind = ResourceKind::Contact;

    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Phone", "Received"];

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldKind::Text, true),
        FieldSpec::new("email", "Email", FieldKind::Email, true),
        FieldSpec::new("phoneNumber", "Phone Number", FieldKind::Text, true),
        FieldSpec::new("message", "Message", FieldKind::TextArea, true),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.message]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.phone_number.clone(),
            display_date(self.created_at),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Email", self.email.clone()),
            ("Phone", self.phone_number.clone()),
            ("Message", self.message.clone()),
            ("Received", display_date(self.created_at)),
        ]
    }

    fn edit_form(&self) -> ContactForm {
        ContactForm {
            name: self.name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            message: self.message.clone(),
        }
    }

    fn form_values(form: &ContactForm) -> Vec<(&'static str, String)> {
        vec![
            ("name", form.name.clone()),
            ("email", form.email.clone()),
            ("phoneNumber", form.phone_number.clone()),
            ("message", form.message.clone()),
        ]
    }

    fn read_form(input: &FormInput) -> ContactForm {
        ContactForm {
            name: input.text("name"),
            email: input.text("email"),
            phone_number: input.text("phoneNumber"),
            message: input.text("message"),
        }
    }

    fn validate(form: &ContactForm) -> Result<(), FormError> {
        validate_contact(form)
    }

    fn payload(form: &ContactForm) -> Payload {
        Payload::Json(serde_json::json!({
            "name": form.name.trim(),
            "email": form.email.trim(),
            "phoneNumber": form.phone_number.trim(),
            "message": form.message.trim(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone_number: "555-0100".into(),
            message: "June wedding".into(),
        }
    }

    #[test]
    fn test_valid_contact() {
        assert!(validate_contact(&form()).is_ok());
    }

    #[test]
    fn test_missing_field_is_incomplete() {
        let mut form = form();
        form.phone_number = " ".into();
        let err = validate_contact(&form).unwrap_err();
        assert_eq!(err, FormError::Incomplete);
        assert_eq!(err.to_string(), "Please fill in all fields.");
    }

    #[test]
    fn test_bad_email_shape() {
        for email in ["ana", "ana@example", "ana @example.com", "@example.com"] {
            let mut form = form();
            form.email = email.into();
            assert!(
                matches!(validate_contact(&form), Err(FormError::Invalid { field: "email", .. })),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_payload_uses_wire_names() {
        let payload = ContactMessage::payload(&form());
        assert_eq!(payload.text("phoneNumber"), Some("555-0100"));
    }

    #[test]
    fn test_details_include_message() {
        let message = ContactMessage {
            id: "c1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone_number: "555".into(),
            message: "Hello".into(),
            created_at: None,
        };
        let labels: Vec<_> = message.details().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Name", "Email", "Phone", "Message", "Received"]);
    }
}
