//! User routes - User list, KYC status, document review, CSV export
//!
//! Structure:
//! - api.rs: HTMX fragments and export
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{export_users_csv, htmx_user_documents, htmx_user_kyc_update, htmx_users_list};
pub use page::page_users;
