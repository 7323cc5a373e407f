//! Dashboard routes - Summary cards, rental status breakdown, monthly orders
//!
//! Structure:
//! - api.rs: JSON API and HTMX fragments
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{api_dashboard, htmx_dashboard_cards, htmx_monthly_orders};
pub use page::page_dashboard;
