//! Testimonial model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client testimonial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub message: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Testimonial form, sent to the backend as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialForm {
    pub name: String,
    pub message: String,
}
