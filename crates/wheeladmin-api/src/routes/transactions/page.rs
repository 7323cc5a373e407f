//! Transactions page rendering

use crate::AppState;
use crate::widgets;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

/// Transactions page
pub async fn page_transactions(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Transaction Management</h2>
            <a href='/transactions/export.csv' class='px-4 py-2 border rounded-lg hover:bg-gray-50 flex items-center gap-2'>Export to Excel</a>
        </div>
        <div class='mb-4'>{}</div>
        <div id='transactions-content' hx-get='/transactions/list' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        widgets::search_box(
            "/transactions/list",
            "#transactions-content",
            "Search transactions (ID, gateway, status)...",
            "this"
        )
    );

    Html(crate::page_response(
        &headers,
        &state.config,
        "Transaction Management",
        "/transactions",
        &inner_content,
    ))
}
