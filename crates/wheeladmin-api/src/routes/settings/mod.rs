//! Settings routes - Read-only view of the running configuration
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::api_settings;
pub use page::page_settings;
