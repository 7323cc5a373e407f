//! Wheelchairs page rendering

use crate::AppState;
use crate::widgets;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

/// Wheelchairs page
pub async fn page_wheelchairs(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Wheelchair Management</h2>
            <button hx-get='/wheelchairs/new' hx-target='#modal' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>+ Add Wheelchair</button>
        </div>
        <div class='mb-4'>{}</div>
        <div id='wheelchairs-content' hx-get='/wheelchairs/list' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        widgets::search_box(
            "/wheelchairs/list",
            "#wheelchairs-content",
            "Search wheelchairs by name or category...",
            "this"
        )
    );

    Html(crate::page_response(
        &headers,
        &state.config,
        "Wheelchair Management",
        "/wheelchairs",
        &inner_content,
    ))
}
