//! Rentals page rendering

use crate::AppState;
use crate::widgets;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

/// Rentals page. The filter form doubles as the export form so the CSV
/// follows whatever is on screen.
pub async fn page_rentals(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let inner_content = format!(
        r#"<form id='rental-filters' action='/rentals/export.csv' method='get'>
            <div class='flex items-center justify-between mb-4'>
                <h2 class='text-2xl font-bold'>Rental Management</h2>
                <button type='submit' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Export to Excel</button>
            </div>
            <div class='flex flex-wrap items-center gap-2 mb-4'>
                {}
                <input type='date' name='start' data-filter class='px-3 py-2 border rounded-lg' title='Start date'>
                <input type='date' name='end' data-filter class='px-3 py-2 border rounded-lg' title='End date'>
                <button type='button' hx-get='/rentals/list' hx-target='#rentals-content' hx-include='#rental-filters' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Filter</button>
                <button type='button' hx-get='/rentals/list' hx-target='#rentals-content' onclick='this.form.reset()' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Clear</button>
            </div>
        </form>
        <div id='rentals-content' hx-get='/rentals/list' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        widgets::search_box(
            "/rentals/list",
            "#rentals-content",
            "Search rentals by ID or wheelchair...",
            "#rental-filters"
        )
    );

    Html(crate::page_response(
        &headers,
        &state.config,
        "Rental Management",
        "/rentals",
        &inner_content,
    ))
}
