//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::FilePart;

/// Blog post as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    /// Primary image filename, relative to the uploads URL
    #[serde(default)]
    pub image: Option<String>,
    /// Images shown on the detail page, in order
    #[serde(default)]
    pub detailed_page_image: Vec<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Admin form state for creating or editing a blog post
///
/// File fields start empty, including when editing: an edit that picks no new
/// file sends no file field and the backend keeps what it has.
#[derive(Debug, Clone, Default)]
pub struct BlogForm {
    pub title: String,
    pub description: String,
    pub content: String,
    pub image: Option<FilePart>,
    pub detailed_page_image: Vec<FilePart>,
}

impl BlogForm {
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone(),
            content: post.content.clone(),
            image: None,
            detailed_page_image: Vec::new(),
        }
    }
}
