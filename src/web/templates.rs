//! Page templates
//!
//! Templates are embedded in the binary and rendered with Tera. Autoescaping
//! is on for every `.html` template.

use rust_embed::RustEmbed;
use tera::{Context, Tera};

#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct TemplateAssets;

/// Template loading or rendering failure
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template '{0}' is not valid UTF-8")]
    Encoding(String),

    #[error("Template error: {0}")]
    Tera(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        // Tera keeps the useful part of the message in the source chain
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        TemplateError::Tera(message)
    }
}

/// Compiled templates
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile every embedded template
    pub fn load() -> Result<Self, TemplateError> {
        let mut sources = Vec::new();
        for name in TemplateAssets::iter() {
            let Some(file) = TemplateAssets::get(&name) else {
                continue;
            };
            let content = String::from_utf8(file.data.into_owned())
                .map_err(|_| TemplateError::Encoding(name.to_string()))?;
            sources.push((name.to_string(), content));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources)?;
        tracing::debug!(count = tera.get_template_names().count(), "Templates loaded");
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, TemplateError> {
        Ok(self.tera.render(name, context)?)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}
