//! Wheelchair routes - Catalogue list and create/edit/delete dialogs
//!
//! Structure:
//! - api.rs: HTMX fragments and mutations
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_wheelchair_create_form, htmx_wheelchair_delete, htmx_wheelchair_delete_confirm,
    htmx_wheelchair_edit_form, htmx_wheelchair_store, htmx_wheelchair_update, htmx_wheelchairs_list,
};
pub use page::page_wheelchairs;
