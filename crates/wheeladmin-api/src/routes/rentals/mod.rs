//! Rental routes - Order list with date filter, transaction details, CSV export
//!
//! Structure:
//! - api.rs: HTMX fragments and export
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{export_rentals_csv, htmx_rental_transactions, htmx_rentals_list};
pub use page::page_rentals;
