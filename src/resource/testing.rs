//! In-memory backend for panel and handler tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Payload, Resource, ResourceBackend};
use crate::client::ClientError;
use crate::models::{BlogPost, ContactMessage, GalleryCategory, GalleryEntry, Testimonial};

/// Builds a stored record from a mutation payload
///
/// `existing` is the stored record on update. File fields absent from the
/// payload keep the existing references.
pub trait FromPayload: Sized {
    fn from_payload(id: &str, existing: Option<&Self>, payload: &Payload) -> Self;
}

#[derive(Default)]
struct MemoryState<R> {
    items: Vec<R>,
    calls: Vec<String>,
    next_id: u64,
    fail_list: Option<ClientError>,
    fail_mutation: Option<ClientError>,
}

/// Backend that keeps records in a vector and records every call
pub struct MemoryBackend<R> {
    state: Mutex<MemoryState<R>>,
}

impl<R: Resource + FromPayload> MemoryBackend<R> {
    pub fn with_items(items: Vec<R>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MemoryState {
                items,
                calls: Vec::new(),
                next_id: 1,
                fail_list: None,
                fail_mutation: None,
            }),
        })
    }

    /// Calls seen so far, e.g. `["list", "update:t1", "list"]`
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn items(&self) -> Vec<R> {
        self.state.lock().unwrap().items.clone()
    }

    pub fn fail_next_list(&self, error: ClientError) {
        self.state.lock().unwrap().fail_list = Some(error);
    }

    pub fn fail_next_mutation(&self, error: ClientError) {
        self.state.lock().unwrap().fail_mutation = Some(error);
    }
}

#[async_trait]
impl<R: Resource + FromPayload> ResourceBackend<R> for MemoryBackend<R> {
    async fn list(&self) -> Result<Vec<R>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list".to_string());
        match state.fail_list.take() {
            Some(e) => Err(e),
            None => Ok(state.items.clone()),
        }
    }

    async fn get(&self, id: &str) -> Result<R, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("get:{}", id));
        state
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }

    async fn create(&self, payload: Payload) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("create".to_string());
        if let Some(e) = state.fail_mutation.take() {
            return Err(e);
        }
        let id = format!("new-{}", state.next_id);
        state.next_id += 1;
        let item = R::from_payload(&id, None, &payload);
        state.items.push(item);
        Ok(())
    }

    async fn update(&self, id: &str, payload: Payload) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update:{}", id));
        if let Some(e) = state.fail_mutation.take() {
            return Err(e);
        }
        let slot = state
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;
        let updated = R::from_payload(id, Some(&*slot), &payload);
        *slot = updated;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete:{}", id));
        if let Some(e) = state.fail_mutation.take() {
            return Err(e);
        }
        let before = state.items.len();
        state.items.retain(|item| item.id() != id);
        if state.items.len() == before {
            return Err(ClientError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn text(payload: &Payload, name: &str) -> String {
    payload.text(name).unwrap_or_default().to_string()
}

fn file_names(payload: &Payload, name: &str) -> Vec<String> {
    payload
        .files(name)
        .iter()
        .map(|f| f.file_name.clone())
        .collect()
}

impl FromPayload for BlogPost {
    fn from_payload(id: &str, existing: Option<&Self>, payload: &Payload) -> Self {
        let image = file_names(payload, "image").into_iter().next();
        let detail = file_names(payload, "detailed_page_image");
        BlogPost {
            id: id.to_string(),
            title: text(payload, "title"),
            description: text(payload, "description"),
            content: text(payload, "content"),
            image: image.or_else(|| existing.and_then(|e| e.image.clone())),
            detailed_page_image: if payload.has_field("detailed_page_image") {
                detail
            } else {
                existing.map(|e| e.detailed_page_image.clone()).unwrap_or_default()
            },
            created_at: existing.and_then(|e| e.created_at),
            updated_at: None,
        }
    }
}

impl FromPayload for GalleryEntry {
    fn from_payload(id: &str, existing: Option<&Self>, payload: &Payload) -> Self {
        GalleryEntry {
            id: id.to_string(),
            title: text(payload, "title"),
            description: text(payload, "description"),
            category: text(payload, "types").parse().unwrap_or(GalleryCategory::Other),
            image_url: if payload.has_field("imageUrl") {
                file_names(payload, "imageUrl")
            } else {
                existing.map(|e| e.image_url.clone()).unwrap_or_default()
            },
            created_at: existing.and_then(|e| e.created_at),
            updated_at: None,
        }
    }
}

impl FromPayload for Testimonial {
    fn from_payload(id: &str, existing: Option<&Self>, payload: &Payload) -> Self {
        Testimonial {
            id: id.to_string(),
            name: text(payload, "name"),
            message: text(payload, "message"),
            created_at: existing.and_then(|e| e.created_at),
            updated_at: None,
        }
    }
}

impl FromPayload for ContactMessage {
    fn from_payload(id: &str, _existing: Option<&Self>, payload: &Payload) -> Self {
        ContactMessage {
            id: id.to_string(),
            name: text(payload, "name"),
            email: text(payload, "email"),
            phone_number: text(payload, "phoneNumber"),
            message: text(payload, "message"),
            created_at: None,
        }
    }
}

pub fn testimonial(id: &str, name: &str, message: &str) -> Testimonial {
    Testimonial {
        id: id.into(),
        name: name.into(),
        message: message.into(),
        created_at: None,
        updated_at: None,
    }
}

pub fn contact(id: &str) -> ContactMessage {
    ContactMessage {
        id: id.into(),
        name: format!("Guest {}", id),
        email: format!("{}@example.com", id),
        phone_number: "555-0100".into(),
        message: "We would love a quote".into(),
        created_at: None,
    }
}

pub fn blog(id: &str, title: &str, description: &str) -> BlogPost {
    BlogPost {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        content: String::new(),
        image: None,
        detailed_page_image: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}
