//! HTML fragments shared by the resource screens

use axum::response::{Html, IntoResponse, Response};
use wheeladmin_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use wheeladmin_core::{CoreError, Page};
use wheeladmin_utils::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Out-of-band toast, swapped into the `#toast` slot
pub fn toast(kind: ToastKind, title: &str, message: &str) -> String {
    let (border, text) = match kind {
        ToastKind::Success => ("border-green-200 bg-green-50", "text-green-800"),
        ToastKind::Error => ("border-red-200 bg-red-50", "text-red-800"),
    };
    format!(
        r#"<div id='toast' hx-swap-oob='true' class='fixed bottom-4 right-4 z-50'>
    <div class='border rounded-lg shadow-lg p-4 w-80 {}' role='alert'>
        <div class='flex items-start justify-between gap-2'>
            <div><p class='font-medium {}'>{}</p><p class='text-sm text-gray-600 mt-1'>{}</p></div>
            <button onclick="this.closest('[role=alert]').remove()" class='text-gray-400 hover:text-gray-600'>✕</button>
        </div>
    </div>
</div>"#,
        border,
        text,
        escape_html(title),
        escape_html(message)
    )
}

/// Out-of-band swap that empties the modal slot
pub fn close_modal() -> String {
    "<div id='modal' hx-swap-oob='true'></div>".to_string()
}

/// Modal shell around `body`
pub fn modal(title: &str, description: &str, body: &str) -> String {
    let description = if description.is_empty() {
        String::new()
    } else {
        format!("<p class='text-sm text-gray-500 mt-1'>{}</p>", escape_html(description))
    };
    format!(
        r#"<div class='fixed inset-0 bg-black bg-opacity-50 z-40 flex items-center justify-center' onclick='if(event.target === this) document.getElementById("modal").innerHTML = ""'>
    <div class='bg-white rounded-xl shadow-2xl w-full max-w-2xl max-h-[90vh] overflow-hidden'>
        <div class='flex items-start justify-between px-6 py-4 border-b'>
            <div><h2 class='text-xl font-bold text-indigo-600'>{}</h2>{}</div>
            <button onclick='document.getElementById("modal").innerHTML = ""' class='text-gray-500 hover:text-gray-700 p-2'>
                <svg class='w-6 h-6' fill='none' stroke='currentColor' viewBox='0 0 24 24'>
                    <path stroke-linecap='round' stroke-linejoin='round' stroke-width='2' d='M6 18L18 6M6 6l12 12'/>
                </svg>
            </button>
        </div>
        <div class='p-6 overflow-y-auto max-h-[calc(90vh-100px)]'>{}</div>
    </div>
</div>"#,
        escape_html(title),
        description,
        body
    )
}

/// Confirmation dialog for a destructive request
pub fn confirm_delete(what: &str, delete_url: &str, target: &str) -> String {
    modal(
        "Are you sure?",
        &format!("This will permanently delete {}. This action cannot be undone.", what),
        &format!(
            r#"<div class='flex justify-end gap-2'>
    <button onclick='document.getElementById("modal").innerHTML = ""' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Cancel</button>
    <button hx-delete='{}' hx-target='{}' hx-disabled-elt='this' class='px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700'>Delete</button>
</div>"#,
            delete_url, target
        ),
    )
}

/// Coloured status pill
pub fn badge(label: &str, tone: &str) -> String {
    let class = match tone {
        "green" => "bg-green-100 text-green-800",
        "red" => "bg-red-100 text-red-800",
        "yellow" => "bg-yellow-100 text-yellow-800",
        "blue" => "bg-blue-100 text-blue-800",
        _ => "bg-gray-100 text-gray-800",
    };
    format!(
        "<span class='inline-flex px-2 py-0.5 rounded-full text-xs font-medium {}'>{}</span>",
        class,
        escape_html(label)
    )
}

/// Tone for the status strings the backend uses on orders and payments
pub fn status_tone(status: &str) -> &'static str {
    match status.to_ascii_lowercase().as_str() {
        "success" | "completed" | "active" | "accepted" | "available" => "green",
        "failed" | "cancelled" | "rejected" | "inactive" => "red",
        "pending" | "maintenance" | "in process" => "yellow",
        "ongoing" | "uploaded" => "blue",
        _ => "gray",
    }
}

/// Search box that reloads a list fragment
pub fn search_box(list_url: &str, target: &str, placeholder: &str, include: &str) -> String {
    format!(
        r#"<input type='search' name='q' placeholder='{}'
    hx-get='{}' hx-target='{}' hx-trigger='keyup changed delay:300ms, search' hx-include='{}'
    class='px-4 py-2 border rounded-lg w-64'>"#,
        escape_html(placeholder),
        list_url,
        target,
        include
    )
}

/// "Page x of y" with Previous/Next buttons
pub fn pagination<T>(page: &Page<T>, list_url: &str, query: &str, target: &str) -> String {
    let total_pages = page.total_pages.max(1);
    let q = urlencoding::encode(query);
    format!(
        r#"<div class='flex items-center justify-end gap-2 py-4'>
    <span class='text-sm text-gray-500'>Page {} of {}</span>
    <button {} hx-get='{}?page={}&q={}' hx-target='{}' hx-include='[data-filter]' class='px-3 py-1 text-sm border rounded hover:bg-gray-100 disabled:opacity-50'>‹ Previous</button>
    <button {} hx-get='{}?page={}&q={}' hx-target='{}' hx-include='[data-filter]' class='px-3 py-1 text-sm border rounded hover:bg-gray-100 disabled:opacity-50'>Next ›</button>
</div>"#,
        page.page.min(total_pages),
        total_pages,
        if page.has_previous() { "" } else { "disabled" },
        list_url,
        page.page.saturating_sub(1).max(1),
        q,
        target,
        if page.has_next() { "" } else { "disabled" },
        list_url,
        page.page.saturating_add(1),
        q,
        target
    )
}

/// Single full-width table row for empty or failed lists
pub fn empty_row(colspan: usize, message: &str) -> String {
    format!(
        "<tr><td colspan='{}' class='text-center py-12 text-gray-500'>{}</td></tr>",
        colspan,
        escape_html(message)
    )
}

/// Table shell with a header row
pub fn table(headers: &[&str], rows: &str) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th class='px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase'>{}</th>", h))
        .collect();
    format!(
        "<div class='overflow-x-auto border rounded-lg'><table class='min-w-full divide-y divide-gray-200'><thead class='bg-gray-50'><tr>{}</tr></thead><tbody class='divide-y divide-gray-100 bg-white'>{}</tbody></table></div>",
        head, rows
    )
}

/// Re-render a form inside the modal instead of the request's target
pub fn retarget_modal(html: String) -> Response {
    (
        [("HX-Retarget", "#modal"), ("HX-Reswap", "innerHTML")],
        Html(html),
    )
        .into_response()
}

/// Leave the target untouched and only raise a toast
pub fn toast_only(kind: ToastKind, title: &str, message: &str) -> Response {
    ([("HX-Reswap", "none")], Html(toast(kind, title, message))).into_response()
}

/// Log a failed backend call and render the empty table with an error toast
pub fn backend_failure(error: &CoreError, operation: &str, headers: &[&str], what: &str) -> String {
    DefaultErrorLogger.log_error(error, &ErrorContext::new(operation));
    format!(
        "{}{}",
        table(headers, &empty_row(headers.len(), &format!("Could not load {}.", what))),
        toast(ToastKind::Error, "Error", &error.user_message())
    )
}
