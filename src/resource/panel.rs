//! Resource panel
//!
//! State machine behind every admin list page. It owns the fetched list, the
//! active filter, the create/edit form and a pending delete confirmation.
//!
//! Mutations are never applied locally: after a successful create, update or
//! delete the panel re-fetches the list, and the re-fetch only starts once the
//! mutation's response has arrived.

use std::sync::Arc;

use super::{Aborted, Filter, FormError, Resource, ResourceBackend, ViewScope};
use crate::client::ClientError;

/// The open create/edit form
#[derive(Debug, Clone)]
pub struct FormModal<F> {
    /// Id of the record being edited; `None` when creating
    pub editing: Option<String>,
    pub form: F,
    /// Last submit failure, shown above the form
    pub error: Option<String>,
}

/// Error types for panel operations
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("No form is open")]
    NoForm,

    #[error("No delete is waiting for confirmation")]
    NothingToConfirm,

    #[error("{0} cannot be changed from the admin")]
    Unsupported(&'static str),

    #[error(transparent)]
    Aborted(#[from] Aborted),
}

/// List/search/create/update/delete workflow for one resource kind
pub struct ResourcePanel<R: Resource> {
    backend: Arc<dyn ResourceBackend<R>>,
    items: Option<Vec<R>>,
    loading: bool,
    filter: Filter,
    modal: Option<FormModal<R::Form>>,
    pending_delete: Option<String>,
    selected: Option<String>,
    scope: ViewScope,
}

impl<R: Resource> ResourcePanel<R> {
    pub fn new(backend: Arc<dyn ResourceBackend<R>>) -> Self {
        Self {
            backend,
            items: None,
            loading: false,
            filter: Filter::new(),
            modal: None,
            pending_delete: None,
            selected: None,
            scope: ViewScope::new(),
        }
    }

    /// Fetched items; `None` until a fetch has succeeded
    pub fn items(&self) -> Option<&[R]> {
        self.items.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn set_search(&mut self, term: &str) {
        self.filter.set_search(term);
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.filter.set_category(category);
    }

    /// Items passing the current filter
    pub fn visible(&self) -> Vec<&R> {
        match &self.items {
            Some(items) => self.filter.apply(items),
            None => Vec::new(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.items.as_ref()?.iter().find(|item| item.id() == id)
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Fetch the list
    ///
    /// On failure the previous list is kept and the error is only logged.
    /// Returns whether the list was replaced.
    pub async fn refresh(&mut self) -> bool {
        let backend = Arc::clone(&self.backend);
        self.loading = true;
        let result = self.scope.run(async move { backend.list().await }).await;
        self.loading = false;

        match result {
            Ok(Ok(items)) => {
                if let Some(selected) = &self.selected {
                    if !items.iter().any(|item| item.id() == selected.as_str()) {
                        self.selected = None;
                    }
                }
                self.items = Some(items);
                true
            }
            Ok(Err(e)) => {
                tracing::warn!(kind = R::KIND.label(), error = %e, "Failed to fetch list");
                false
            }
            Err(Aborted) => {
                tracing::debug!(kind = R::KIND.label(), "List fetch aborted");
                false
            }
        }
    }

    /// Open an empty form for a new record
    pub fn open_create(&mut self) -> Result<(), PanelError> {
        if !R::KIND.supports_create() {
            return Err(PanelError::Unsupported(R::KIND.plural()));
        }
        self.modal = Some(FormModal {
            editing: None,
            form: R::Form::default(),
            error: None,
        });
        Ok(())
    }

    /// Open the form pre-filled from a fetched record
    pub fn open_edit(&mut self, id: &str) -> Result<(), PanelError> {
        if !R::KIND.supports_update() {
            return Err(PanelError::Unsupported(R::KIND.plural()));
        }
        let form = self
            .find(id)
            .map(|item| item.edit_form())
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", R::KIND.label(), id)))?;
        self.modal = Some(FormModal {
            editing: Some(id.to_string()),
            form,
            error: None,
        });
        Ok(())
    }

    /// Open the edit form for `id` with already-collected values
    pub fn edit_with(&mut self, id: &str, form: R::Form) -> Result<(), PanelError> {
        if !R::KIND.supports_update() {
            return Err(PanelError::Unsupported(R::KIND.plural()));
        }
        self.modal = Some(FormModal {
            editing: Some(id.to_string()),
            form,
            error: None,
        });
        Ok(())
    }

    pub fn modal(&self) -> Option<&FormModal<R::Form>> {
        self.modal.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut R::Form> {
        self.modal.as_mut().map(|m| &mut m.form)
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Validate and send the open form
    ///
    /// Success closes and clears the form, then re-fetches. Failure keeps the
    /// form open with the error recorded on it.
    pub async fn submit(&mut self) -> Result<(), PanelError> {
        let modal = self.modal.as_mut().ok_or(PanelError::NoForm)?;
        if let Err(e) = R::validate(&modal.form) {
            modal.error = Some(e.to_string());
            return Err(e.into());
        }
        let payload = R::payload(&modal.form);
        let editing = modal.editing.clone();

        let backend = Arc::clone(&self.backend);
        self.loading = true;
        let result = self
            .scope
            .run(async move {
                match editing {
                    Some(id) => backend.update(&id, payload).await,
                    None => backend.create(payload).await,
                }
            })
            .await;
        self.loading = false;

        match result {
            Ok(Ok(())) => {
                tracing::info!(kind = R::KIND.label(), "Saved");
                self.modal = None;
                self.refresh().await;
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::warn!(kind = R::KIND.label(), error = %e, "Failed to save");
                if let Some(modal) = self.modal.as_mut() {
                    modal.error = Some(e.user_message());
                }
                Err(e.into())
            }
            Err(aborted) => Err(aborted.into()),
        }
    }

    /// Ask for confirmation before deleting `id`; nothing is sent yet
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Drop the pending delete without any network call
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the record awaiting confirmation, then re-fetch
    pub async fn confirm_delete(&mut self) -> Result<(), PanelError> {
        let id = self.pending_delete.take().ok_or(PanelError::NothingToConfirm)?;

        let backend = Arc::clone(&self.backend);
        let target = id.clone();
        let result = self
            .scope
            .run(async move { backend.delete(&target).await })
            .await;

        match result {
            Ok(Ok(())) => {
                tracing::info!(kind = R::KIND.label(), id = %id, "Deleted");
                if self.selected.as_deref() == Some(id.as_str()) {
                    self.selected = None;
                }
                self.refresh().await;
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::warn!(kind = R::KIND.label(), id = %id, error = %e, "Failed to delete");
                Err(e.into())
            }
            Err(aborted) => Err(aborted.into()),
        }
    }

    /// Select a fetched record for the detail view
    pub fn select(&mut self, id: &str) -> Option<&R> {
        if self.find(id).is_some() {
            self.selected = Some(id.to_string());
        }
        self.selected()
    }

    pub fn selected(&self) -> Option<&R> {
        self.find(self.selected.as_deref()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BlogPost, ContactMessage, GalleryCategory, GalleryEntry, GalleryForm, Testimonial,
        TestimonialForm,
    };
    use crate::resource::testing::{contact, testimonial, FromPayload, MemoryBackend};
    use crate::resource::FilePart;

    fn panel<R: Resource + FromPayload>(backend: &Arc<MemoryBackend<R>>) -> ResourcePanel<R> {
        ResourcePanel::new(backend.clone() as Arc<dyn ResourceBackend<R>>)
    }

    #[tokio::test]
    async fn test_refresh_loads_items() {
        let backend = MemoryBackend::with_items(vec![testimonial("1", "Ana", "Lovely")]);
        let mut panel = panel(&backend);

        assert!(panel.items().is_none());
        assert!(panel.refresh().await);
        assert_eq!(panel.items().unwrap().len(), 1);
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_state() {
        let backend = MemoryBackend::with_items(vec![testimonial("1", "Ana", "Lovely")]);
        let mut panel = panel(&backend);
        panel.refresh().await;

        backend.fail_next_list(ClientError::Network("connection refused".into()));
        assert!(!panel.refresh().await);
        assert_eq!(panel.items().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_first_refresh_leaves_list_unset() {
        let backend = MemoryBackend::<Testimonial>::with_items(vec![]);
        backend.fail_next_list(ClientError::Network("down".into()));
        let mut panel = panel(&backend);

        assert!(!panel.refresh().await);
        assert!(panel.items().is_none());
        assert!(panel.visible().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_refetch_contains_new_item() {
        let backend = MemoryBackend::<Testimonial>::with_items(vec![]);
        let mut panel = panel(&backend);
        panel.refresh().await;

        panel.open_create().unwrap();
        *panel.form_mut().unwrap() = TestimonialForm {
            name: "Maya".into(),
            message: "Perfect day".into(),
        };
        panel.submit().await.unwrap();

        assert!(panel.modal().is_none());
        let items = panel.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Maya");
        assert_eq!(backend.calls(), vec!["list", "create", "list"]);
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let backend = MemoryBackend::<Testimonial>::with_items(vec![]);
        let mut panel = panel(&backend);

        panel.open_create().unwrap();
        let err = panel.submit().await.unwrap_err();

        assert!(matches!(err, PanelError::Invalid(FormError::Required("Name"))));
        assert_eq!(panel.modal().unwrap().error.as_deref(), Some("Name is required"));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form_open() {
        let backend = MemoryBackend::<Testimonial>::with_items(vec![]);
        backend.fail_next_mutation(ClientError::Backend {
            status: 500,
            message: Some("Database unavailable".into()),
        });
        let mut panel = panel(&backend);

        panel.open_create().unwrap();
        *panel.form_mut().unwrap() = TestimonialForm {
            name: "Maya".into(),
            message: "Perfect day".into(),
        };
        assert!(panel.submit().await.is_err());

        let modal = panel.modal().unwrap();
        assert_eq!(modal.form.name, "Maya");
        assert_eq!(modal.error.as_deref(), Some("Database unavailable"));
        assert_eq!(backend.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_edit_prefills_text_and_updates_by_id() {
        let backend = MemoryBackend::with_items(vec![testimonial("t1", "Ana", "Lovely")]);
        let mut panel = panel(&backend);
        panel.refresh().await;

        panel.open_edit("t1").unwrap();
        assert_eq!(panel.modal().unwrap().form.name, "Ana");
        panel.form_mut().unwrap().message = "Truly lovely".into();
        panel.submit().await.unwrap();

        assert_eq!(panel.find("t1").unwrap().message, "Truly lovely");
        assert_eq!(backend.calls(), vec!["list", "update:t1", "list"]);
    }

    #[tokio::test]
    async fn test_edit_without_new_files_keeps_stored_images() {
        let backend = MemoryBackend::with_items(vec![GalleryEntry {
            id: "g1".into(),
            title: "Hall".into(),
            description: "Candlelit reception".into(),
            category: GalleryCategory::Reception,
            image_url: vec!["old-1.jpg".into(), "old-2.jpg".into()],
            created_at: None,
            updated_at: None,
        }]);
        let mut panel = panel(&backend);
        panel.refresh().await;

        panel.open_edit("g1").unwrap();
        panel.form_mut().unwrap().title = "Grand Hall".into();
        panel.submit().await.unwrap();

        let entry = panel.find("g1").unwrap();
        assert_eq!(entry.title, "Grand Hall");
        assert_eq!(entry.image_url, vec!["old-1.jpg", "old-2.jpg"]);
    }

    #[tokio::test]
    async fn test_gallery_create_with_two_images() {
        let backend = MemoryBackend::<GalleryEntry>::with_items(vec![]);
        let mut panel = panel(&backend);

        panel.open_create().unwrap();
        *panel.form_mut().unwrap() = GalleryForm {
            title: "Garden Ceremony".into(),
            description: "Vows under the oaks".into(),
            category: GalleryCategory::Venue,
            images: vec![
                FilePart::new("one.jpg", "image/jpeg", vec![1, 2, 3]),
                FilePart::new("two.jpg", "image/jpeg", vec![4, 5, 6]),
            ],
        };
        panel.submit().await.unwrap();

        let items = panel.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Garden Ceremony");
        assert_eq!(items[0].category, GalleryCategory::Venue);
        assert_eq!(items[0].image_url.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let backend = MemoryBackend::with_items(vec![contact("c1"), contact("c2")]);
        let mut panel = panel(&backend);
        panel.refresh().await;
        let before = backend.calls().len();

        panel.request_delete("c1");
        assert_eq!(panel.pending_delete(), Some("c1"));
        assert_eq!(backend.calls().len(), before);

        panel.confirm_delete().await.unwrap();
        assert!(panel.find("c1").is_none());
        assert_eq!(panel.items().unwrap().len(), 1);
        assert_eq!(&backend.calls()[before..], &["delete:c1", "list"]);
    }

    #[tokio::test]
    async fn test_cancelled_delete_issues_no_calls() {
        let backend = MemoryBackend::with_items(vec![contact("c1")]);
        let mut panel = panel(&backend);

        panel.request_delete("c1");
        panel.cancel_delete();

        assert!(backend.calls().is_empty());
        assert!(matches!(
            panel.confirm_delete().await,
            Err(PanelError::NothingToConfirm)
        ));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_selected_contact_clears_selection() {
        let backend = MemoryBackend::with_items(vec![contact("c1"), contact("c2")]);
        let mut panel = panel(&backend);
        panel.refresh().await;

        assert!(panel.select("c1").is_some());
        panel.request_delete("c1");
        panel.confirm_delete().await.unwrap();
        assert!(panel.selected().is_none());
    }

    #[tokio::test]
    async fn test_contacts_cannot_be_created_or_edited() {
        let backend = MemoryBackend::<ContactMessage>::with_items(vec![contact("c1")]);
        let mut panel = panel(&backend);
        panel.refresh().await;

        assert!(matches!(panel.open_create(), Err(PanelError::Unsupported(_))));
        assert!(matches!(panel.open_edit("c1"), Err(PanelError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_search_over_fetched_list() {
        let backend = MemoryBackend::<BlogPost>::with_items(vec![
            crate::resource::testing::blog("b1", "Spring Weddings", "Pastels and peonies"),
            crate::resource::testing::blog("b2", "Winter Venues", "Cosy halls"),
        ]);
        let mut panel = panel(&backend);
        panel.refresh().await;

        panel.set_search("PEONIES");
        let visible: Vec<_> = panel.visible().iter().map(|b| b.id.clone()).collect();
        assert_eq!(visible, vec!["b1"]);
        assert_eq!(backend.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_closed_scope_aborts_refresh() {
        let backend = MemoryBackend::<Testimonial>::with_items(vec![]);
        let mut panel = panel(&backend);
        panel.scope().close();

        assert!(!panel.refresh().await);
        assert!(panel.items().is_none());
    }
}
