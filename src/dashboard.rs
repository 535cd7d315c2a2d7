//! Dashboard summary
//!
//! Counts of each collection, fetched concurrently. A collection that fails
//! to load counts as zero; the summary is only built once all four fetches
//! have finished.

use serde::Serialize;

use crate::models::{BlogPost, ContactMessage, GalleryEntry, Testimonial};
use crate::resource::{Resource, ResourceBackend, ResourceKind};

/// Item counts per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub blogs: usize,
    pub gallery: usize,
    pub testimonials: usize,
    pub contacts: usize,
}

/// One summary card
#[derive(Debug, Clone, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub count: usize,
    pub path: &'static str,
}

async fn count<R: Resource>(backend: &dyn ResourceBackend<R>) -> usize {
    match backend.list().await {
        Ok(items) => items.len(),
        Err(e) => {
            tracing::warn!(kind = R::KIND.label(), error = %e, "Dashboard count failed");
            0
        }
    }
}

impl DashboardStats {
    /// Fetch all four collections at once
    pub async fn collect(
        blogs: &dyn ResourceBackend<BlogPost>,
        gallery: &dyn ResourceBackend<GalleryEntry>,
        testimonials: &dyn ResourceBackend<Testimonial>,
        contacts: &dyn ResourceBackend<ContactMessage>,
    ) -> Self {
        let (blogs, gallery, testimonials, contacts) = futures::join!(
            count(blogs),
            count(gallery),
            count(testimonials),
            count(contacts),
        );
        Self {
            blogs,
            gallery,
            testimonials,
            contacts,
        }
    }

    pub fn total(&self) -> usize {
        self.blogs + self.gallery + self.testimonials + self.contacts
    }

    pub fn cards(&self) -> Vec<StatCard> {
        ResourceKind::ALL
            .iter()
            .map(|kind| StatCard {
                label: kind.plural(),
                count: match kind {
                    ResourceKind::Blog => self.blogs,
                    ResourceKind::Gallery => self.gallery,
                    ResourceKind::Testimonial => self.testimonials,
                    ResourceKind::Contact => self.contacts,
                },
                path: kind.admin_path(),
            })
            .collect()
    }
}
