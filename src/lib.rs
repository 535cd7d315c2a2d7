//! Wedsite - marketing site and content admin for a wedding-planning business
//!
//! Public pages and an auth-gated admin panel, both rendered server-side in
//! front of an external REST backend that owns all content.

pub mod cache;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod markdown;
pub mod models;
pub mod resource;
pub mod routing;
pub mod session;
pub mod web;
