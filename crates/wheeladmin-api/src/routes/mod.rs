//! Route modules for the console server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints and HTMX fragments
//! - page.rs: Full page rendering

pub mod catalog;
pub mod dashboard;
pub mod rentals;
pub mod settings;
pub mod transactions;
pub mod users;
pub mod wheelchairs;

use std::collections::HashMap;

/// Search term and 1-based page from a list query string
pub fn list_params(params: &HashMap<String, String>) -> (String, usize) {
    let query = params.get("q").map(|q| q.trim().to_string()).unwrap_or_default();
    let page = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    (query, page)
}

/// CSV download response
pub fn csv_download(filename: &str, body: String) -> axum::response::Response {
    use axum::http::header;
    use axum::response::IntoResponse;

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
