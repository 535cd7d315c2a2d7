//! Client-side list filtering
//!
//! Search is a case-insensitive substring match over a record's text fields;
//! the category filter is an exact match. Both run over the whole fetched
//! list on every change.

use super::Resource;

/// Active search term and category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    search: String,
    category: Option<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.set_search(term);
        self
    }

    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.set_category(category);
        self
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    /// `None`, an empty value and `all` clear the category filter
    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty() && c != "all");
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.category.is_some()
    }

    pub fn matches<R: Resource>(&self, item: &R) -> bool {
        if let Some(category) = &self.category {
            if item.category() != Some(category.as_str()) {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        item.search_text()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<'a, R: Resource>(&self, items: &'a [R]) -> Vec<&'a R> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}
