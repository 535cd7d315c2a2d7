//! Request payloads for resource mutations
//!
//! Kinds with uploads send multipart bodies, the rest send JSON. A file field
//! is only ever added when a file was actually chosen, so an edit without new
//! files leaves the backend's stored references alone.

/// Body of a create or update call
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Multipart(Vec<Part>),
}

/// One named multipart part
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub value: PartValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    File(FilePart),
}

/// An uploaded file held in memory until it is forwarded
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Browsers submit untouched file inputs as a nameless, empty part
    pub fn is_empty(&self) -> bool {
        self.file_name.trim().is_empty() && self.bytes.is_empty()
    }
}

impl Payload {
    /// Start a multipart payload
    pub fn multipart() -> MultipartBuilder {
        MultipartBuilder::default()
    }

    /// Whether a field with this name is present at all
    pub fn has_field(&self, name: &str) -> bool {
        match self {
            Payload::Json(value) => value.get(name).is_some(),
            Payload::Multipart(parts) => parts.iter().any(|p| p.name == name),
        }
    }

    /// First text value of a field
    pub fn text(&self, name: &str) -> Option<&str> {
        match self {
            Payload::Json(value) => value.get(name).and_then(|v| v.as_str()),
            Payload::Multipart(parts) => parts.iter().find_map(|p| match &p.value {
                PartValue::Text(text) if p.name == name => Some(text.as_str()),
                _ => None,
            }),
        }
    }

    /// All files sent under a field, in order
    pub fn files(&self, name: &str) -> Vec<&FilePart> {
        match self {
            Payload::Json(_) => Vec::new(),
            Payload::Multipart(parts) => parts
                .iter()
                .filter_map(|p| match &p.value {
                    PartValue::File(file) if p.name == name => Some(file),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Builder for multipart payloads
#[derive(Debug, Default)]
pub struct MultipartBuilder {
    parts: Vec<Part>,
}

impl MultipartBuilder {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    /// Add a single file if one was chosen
    pub fn file(mut self, name: &str, file: Option<&FilePart>) -> Self {
        if let Some(file) = file.filter(|f| !f.is_empty()) {
            self.parts.push(Part {
                name: name.to_string(),
                value: PartValue::File(file.clone()),
            });
        }
        self
    }

    /// Add every chosen file under the same field name
    pub fn files(mut self, name: &str, files: &[FilePart]) -> Self {
        for file in files {
            self = self.file(name, Some(file));
        }
        self
    }

    pub fn build(self) -> Payload {
        Payload::Multipart(self.parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(name: &str) -> FilePart {
        FilePart::new(name, "image/jpeg", vec![0xFF, 0xD8])
    }

    #[test]
    fn test_absent_file_adds_no_field() {
        let payload = Payload::multipart()
            .text("title", "Spring")
            .file("image", None)
            .files("detailed_page_image", &[])
            .build();

        assert!(payload.has_field("title"));
        assert!(!payload.has_field("image"));
        assert!(!payload.has_field("detailed_page_image"));
    }

    #[test]
    fn test_empty_browser_part_is_skipped() {
        let empty = FilePart::new("", "application/octet-stream", Vec::new());
        let payload = Payload::multipart().file("image", Some(&empty)).build();
        assert!(!payload.has_field("image"));
    }

    #[test]
    fn test_repeated_file_field_keeps_order() {
        let payload = Payload::multipart()
            .files("imageUrl", &[jpeg("a.jpg"), jpeg("b.jpg")])
            .build();

        let names: Vec<_> = payload.files("imageUrl").iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_json_accessors() {
        let payload = Payload::Json(serde_json::json!({"name": "Ana", "message": "Lovely"}));
        assert_eq!(payload.text("name"), Some("Ana"));
        assert!(payload.files("name").is_empty());
        assert!(!payload.has_field("email"));
    }
}
