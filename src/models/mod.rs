//! Data models
//!
//! Records exchanged verbatim with the content backend. Field names follow the
//! backend's wire format (`_id`, `createdAt`, `phoneNumber`, ...) through serde
//! renames so the Rust side keeps snake_case.

mod admin;
mod blog;
mod contact;
mod gallery;
mod testimonial;

pub use admin::{AdminIdentity, LoginData, LoginRequest};
pub use blog::{BlogForm, BlogPost};
pub use contact::{ContactForm, ContactMessage};
pub use gallery::{GalleryCategory, GalleryEntry, GalleryForm, UnknownCategory};
pub use testimonial::{Testimonial, TestimonialForm};
