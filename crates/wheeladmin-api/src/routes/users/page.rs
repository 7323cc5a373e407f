//! Users page rendering

use crate::AppState;
use crate::widgets;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

/// Users page - search box and table loaded on demand
pub async fn page_users(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>User Management</h2>
            <a href='/users/export.csv' class='px-4 py-2 border rounded-lg hover:bg-gray-50 flex items-center gap-2'>Export to Excel</a>
        </div>
        <div class='mb-4'>{}</div>
        <div id='users-content' hx-get='/users/list' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        widgets::search_box("/users/list", "#users-content", "Search users...", "this")
    );

    Html(crate::page_response(&headers, &state.config, "User Management", "/users", &inner_content))
}
