//! Transaction routes - Payment list, anomaly check, CSV export
//!
//! Structure:
//! - api.rs: HTMX fragments, anomaly endpoints and export
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_anomaly, export_transactions_csv, htmx_analysis_dialog, htmx_analysis_run, htmx_transactions_list,
};
pub use page::page_transactions;
