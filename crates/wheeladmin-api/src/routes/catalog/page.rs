//! Categories & cities page rendering

use crate::AppState;
use crate::widgets;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;

/// Categories and cities side by side, each with its own list fragment
pub async fn page_catalog(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let inner_content = format!(
        r#"<h2 class='text-2xl font-bold mb-6'>Category &amp; City Management</h2>
        <section class='mb-10'>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>Categories</h3>
                <div class='flex items-center gap-2'>
                    {}
                    <button hx-get='/categories/new' hx-target='#modal' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>+ Add Category</button>
                </div>
            </div>
            <div id='categories-content' hx-get='/categories/list' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
                <p class='text-gray-500 text-center'>Loading...</p>
            </div>
        </section>
        <section>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>Service Cities</h3>
                <div class='flex items-center gap-2'>
                    {}
                    <form hx-post='/cities' hx-target='#cities-content' hx-on::after-request='if(event.detail.successful) this.reset()' class='flex items-center gap-2'>
                        <input type='text' name='name' placeholder='City name' required class='px-3 py-2 border rounded-lg'>
                        <button type='submit' hx-disabled-elt='this' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>+ Add City</button>
                    </form>
                </div>
            </div>
            <div id='cities-content' hx-get='/cities/list' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
                <p class='text-gray-500 text-center'>Loading...</p>
            </div>
        </section>"#,
        widgets::search_box("/categories/list", "#categories-content", "Search categories...", "this"),
        widgets::search_box("/cities/list", "#cities-content", "Search cities...", "this")
    );

    Html(crate::page_response(
        &headers,
        &state.config,
        "Categories & Cities",
        "/categories-cities",
        &inner_content,
    ))
}
