//! Form field descriptions and submitted form input

use serde::Serialize;
use std::collections::HashMap;

use super::FilePart;

/// How a form field is rendered and read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    TextArea,
    Select(&'static [(&'static str, &'static str)]),
    File,
    Files,
}

/// Description of one form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self { name, label, kind, required }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, FieldKind::File | FieldKind::Files)
    }
}

/// Validation failure of a submitted form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Please fill in all fields.")]
    Incomplete,

    #[error("{reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Raw values of a submitted form, text and files kept apart
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    text: HashMap<String, String>,
    files: HashMap<String, Vec<FilePart>>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field names may carry a `[]` suffix for repeated inputs
    fn key(name: &str) -> String {
        name.trim_end_matches("[]").to_string()
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.text.insert(Self::key(name), value.into());
    }

    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_text(name, value);
        self
    }

    /// Record a file; empty parts from untouched inputs are dropped
    pub fn push_file(&mut self, name: &str, file: FilePart) {
        if file.is_empty() {
            return;
        }
        self.files.entry(Self::key(name)).or_default().push(file);
    }

    pub fn with_file(mut self, name: &str, file: FilePart) -> Self {
        self.push_file(name, file);
        self
    }

    /// Text value of a field, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.text.get(name).cloned().unwrap_or_default()
    }

    pub fn file(&self, name: &str) -> Option<FilePart> {
        self.files.get(name).and_then(|files| files.first().cloned())
    }

    pub fn files(&self, name: &str) -> Vec<FilePart> {
        self.files.get(name).cloned().unwrap_or_default()
    }
}

/// Fail with `Required` when a trimmed value is empty
pub fn require(value: &str, label: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Required(label))
    } else {
        Ok(())
    }
}
