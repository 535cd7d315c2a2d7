//! Sidebar and header navigation

use serde::Serialize;

use super::{has_segment_prefix, ADMIN_ROOT};

/// Admin sidebar sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminSection {
    Dashboard,
    Blogs,
    Gallery,
    Testimonials,
    Contacts,
}

impl AdminSection {
    pub const ALL: [AdminSection; 5] = [
        AdminSection::Dashboard,
        AdminSection::Blogs,
        AdminSection::Gallery,
        AdminSection::Testimonials,
        AdminSection::Contacts,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            AdminSection::Dashboard => ADMIN_ROOT,
            AdminSection::Blogs => "/admin/blogs",
            AdminSection::Gallery => "/admin/gallery",
            AdminSection::Testimonials => "/admin/testimonials",
            AdminSection::Contacts => "/admin/contacts",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminSection::Dashboard => "Dashboard",
            AdminSection::Blogs => "Blogs",
            AdminSection::Gallery => "Image Gallery",
            AdminSection::Testimonials => "Testimonials",
            AdminSection::Contacts => "Contacts",
        }
    }

    /// Dashboard matches its path exactly; the others match their subtree
    pub fn is_active(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        match self {
            AdminSection::Dashboard => path == ADMIN_ROOT,
            _ => has_segment_prefix(path, self.path()),
        }
    }

    /// Section owning an admin path
    pub fn from_path(path: &str) -> Option<AdminSection> {
        Self::ALL.into_iter().find(|section| section.is_active(path))
    }
}

/// One navigation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

/// Admin sidebar for the current path
pub fn admin_nav(current: &str) -> Vec<NavItem> {
    AdminSection::ALL
        .iter()
        .map(|section| NavItem {
            label: section.label(),
            path: section.path(),
            active: section.is_active(current),
        })
        .collect()
}

const PUBLIC_LINKS: [(&str, &str); 5] = [
    ("Home", "/"),
    ("Portfolio", "/portfolio"),
    ("About", "/about"),
    ("Blog", "/blog"),
    ("Contact", "/contact"),
];

/// Public header links for the current path
pub fn public_nav(current: &str) -> Vec<NavItem> {
    let trimmed = current.trim_end_matches('/');
    PUBLIC_LINKS
        .iter()
        .map(|&(label, path)| NavItem {
            label,
            path,
            active: if path == "/" {
                trimmed.is_empty()
            } else {
                has_segment_prefix(trimmed, path)
            },
        })
        .collect()
}
