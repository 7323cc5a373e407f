//! Catalog routes - Wheelchair categories and service cities
//!
//! Structure:
//! - categories.rs: Category list and create/edit/delete dialogs
//! - cities.rs: City list, add form and status toggle
//! - page.rs: Combined page rendering

pub mod categories;
pub mod cities;
pub mod page;

pub use categories::{
    htmx_categories_list, htmx_category_create_form, htmx_category_delete, htmx_category_delete_confirm,
    htmx_category_edit_form, htmx_category_store, htmx_category_update,
};
pub use cities::{htmx_cities_list, htmx_city_store, htmx_city_toggle};
pub use page::page_catalog;
