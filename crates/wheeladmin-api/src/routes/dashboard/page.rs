//! Dashboard page rendering

use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

/// Dashboard page. Cards and chart load as separate fragments.
pub async fn page_dashboard(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let inner_content = r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard Overview</h2></div>
        <div id='dashboard-cards' hx-get='/dashboard/cards' hx-trigger='load'>
            <div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>
                <div class='h-24 bg-gray-100 rounded-lg animate-pulse'></div>
                <div class='h-24 bg-gray-100 rounded-lg animate-pulse'></div>
                <div class='h-24 bg-gray-100 rounded-lg animate-pulse'></div>
                <div class='h-24 bg-gray-100 rounded-lg animate-pulse'></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mt-6'>
            <h3 class='text-lg font-semibold mb-4'>Monthly Rental Orders</h3>
            <div id='dashboard-monthly' hx-get='/dashboard/monthly' hx-trigger='load'>
                <p class='text-gray-500 text-center'>Loading...</p>
            </div>
        </div>"#;

    Html(crate::page_response(&headers, &state.config, "Dashboard", "/dashboard", inner_content))
}
