//! Category endpoints - HTMX fragments and mutations

use crate::form::{field, optional_field, parse_form};
use crate::routes::list_params;
use crate::widgets::{self, ToastKind};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use std::collections::HashMap;
use wheeladmin_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use wheeladmin_core::models::{Category, CategoryDraft};
use wheeladmin_core::Listing;
use wheeladmin_utils::escape_html;

const HEADERS: [&str; 4] = ["Icon", "Name", "Description", "Actions"];
const TARGET: &str = "#categories-content";

/// Render one page of categories
pub fn render_categories_table(categories: Vec<Category>, query: &str, page: usize, per_page: usize) -> String {
    let page = Listing::new(categories).search(query).paginate(page, per_page);

    let mut rows = String::new();
    for category in &page.items {
        let id = urlencoding::encode(&category.id);
        rows.push_str(&format!(
            r#"<tr class='hover:bg-gray-50'>
    <td class='px-4 py-3 text-gray-500 text-sm'>{}</td>
    <td class='px-4 py-3 font-medium'>{}</td>
    <td class='px-4 py-3 text-gray-500'>{}</td>
    <td class='px-4 py-3'>
        <button hx-get='/categories/{}/edit' hx-target='#modal' class='text-sm text-indigo-600 hover:underline mr-3'>Edit</button>
        <button hx-get='/categories/{}/delete' hx-target='#modal' class='text-sm text-red-600 hover:underline'>Delete</button>
    </td>
</tr>"#,
            escape_html(category.icon.as_deref().unwrap_or("-")),
            escape_html(&category.name),
            escape_html(&category.description),
            id,
            id
        ));
    }
    if page.is_empty() {
        rows = widgets::empty_row(HEADERS.len(), "No categories found.");
    }

    format!(
        "{}{}",
        widgets::table(&HEADERS, &rows),
        widgets::pagination(&page, "/categories/list", query, TARGET)
    )
}

/// Create (`id` = None) or edit dialog
pub fn render_category_form(draft: &CategoryDraft, id: Option<&str>, error: Option<&str>) -> String {
    let (title, submit, verb) = match id {
        None => ("Add Category", "Add", "hx-post='/categories'".to_string()),
        Some(id) => ("Edit Category", "Save", format!("hx-put='/categories/{}'", urlencoding::encode(id))),
    };
    let error = error
        .map(|e| {
            format!(
                "<div class='bg-red-50 border border-red-200 rounded-lg p-3 text-sm text-red-700'>{}</div>",
                escape_html(e)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<form {} hx-target='{}' class='space-y-4'>
    {}
    <div>
        <label class='block text-sm font-medium text-gray-700 mb-1'>Category Name</label>
        <input type='text' name='name' value='{}' required class='w-full px-3 py-2 border rounded-lg'>
    </div>
    <div>
        <label class='block text-sm font-medium text-gray-700 mb-1'>Description</label>
        <textarea name='description' rows='2' class='w-full px-3 py-2 border rounded-lg'>{}</textarea>
    </div>
    <div>
        <label class='block text-sm font-medium text-gray-700 mb-1'>Icon Name</label>
        <input type='text' name='icon' value='{}' placeholder='e.g., Zap, Armchair' class='w-full px-3 py-2 border rounded-lg'>
    </div>
    <div class='flex justify-end gap-2 pt-2'>
        <button type='button' onclick='document.getElementById("modal").innerHTML = ""' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Cancel</button>
        <button type='submit' hx-disabled-elt='this' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>{}</button>
    </div>
</form>"#,
        verb,
        TARGET,
        error,
        escape_html(&draft.name),
        escape_html(&draft.description),
        escape_html(draft.icon.as_deref().unwrap_or("")),
        submit
    );
    widgets::modal(title, "", &body)
}

fn draft_from_form(body: &str) -> CategoryDraft {
    let params = parse_form(body);
    CategoryDraft {
        name: field(&params, "name"),
        description: field(&params, "description"),
        icon: optional_field(&params, "icon"),
    }
}

async fn after_mutation(state: &AppState, title: &str, message: &str) -> Response {
    let table = match state.backend.categories().await {
        Ok(categories) => render_categories_table(categories, "", 1, state.per_page()),
        Err(e) => widgets::backend_failure(&e, "list_categories", &HEADERS, "categories"),
    };
    Html(format!(
        "{}{}{}",
        table,
        widgets::close_modal(),
        widgets::toast(ToastKind::Success, title, message)
    ))
    .into_response()
}

/// HTMX: Categories list
pub async fn htmx_categories_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let (query, page) = list_params(&params);
    match state.backend.categories().await {
        Ok(categories) => Html(render_categories_table(categories, &query, page, state.per_page())),
        Err(e) => Html(widgets::backend_failure(&e, "list_categories", &HEADERS, "categories")),
    }
}

/// HTMX: Empty create dialog
pub async fn htmx_category_create_form() -> Html<String> {
    Html(render_category_form(&CategoryDraft::default(), None, None))
}

/// HTMX: Edit dialog
pub async fn htmx_category_edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, crate::ApiError> {
    let category = state.backend.category(&id).await?;
    let draft = CategoryDraft {
        name: category.name,
        description: category.description,
        icon: category.icon,
    };
    Ok(Html(render_category_form(&draft, Some(id.as_str()), None)))
}

/// HTMX: Create a category
pub async fn htmx_category_store(State(state): State<AppState>, body: String) -> Response {
    let draft = draft_from_form(&body);
    if draft.name.is_empty() {
        return widgets::retarget_modal(render_category_form(&draft, None, Some("Category name is required.")));
    }

    match state.backend.create_category(&draft).await {
        Ok(()) => {
            log::info!("Created category {}", draft.name);
            after_mutation(&state, "Category added", &format!("{} was added.", draft.name)).await
        }
        Err(e) => {
            DefaultErrorLogger.log_error(&e, &ErrorContext::new("create_category"));
            widgets::toast_only(ToastKind::Error, "Failed to add category", &e.user_message())
        }
    }
}

/// HTMX: Update a category
pub async fn htmx_category_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Response {
    let draft = draft_from_form(&body);
    if draft.name.is_empty() {
        return widgets::retarget_modal(render_category_form(&draft, Some(id.as_str()), Some("Category name is required.")));
    }

    match state.backend.update_category(&id, &draft).await {
        Ok(()) => {
            log::info!("Updated category {}", id);
            after_mutation(&state, "Category updated", &format!("{} was saved.", draft.name)).await
        }
        Err(e) => {
            DefaultErrorLogger.log_error(&e, &ErrorContext::new("update_category").with_record(id.as_str()));
            widgets::toast_only(ToastKind::Error, "Failed to update category", &e.user_message())
        }
    }
}

/// HTMX: Delete confirmation
pub async fn htmx_category_delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, crate::ApiError> {
    let category = state.backend.category(&id).await?;
    Ok(Html(widgets::confirm_delete(
        &format!("the category \"{}\"", category.name),
        &format!("/categories/{}", urlencoding::encode(&id)),
        TARGET,
    )))
}

/// HTMX: Delete a category
pub async fn htmx_category_delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.backend.delete_category(&id).await {
        Ok(()) => {
            log::info!("Deleted category {}", id);
            after_mutation(&state, "Category deleted", "The category was removed.").await
        }
        Err(e) => {
            DefaultErrorLogger.log_error(&e, &ErrorContext::new("delete_category").with_record(id.as_str()));
            widgets::toast_only(ToastKind::Error, "Failed to delete category", &e.user_message())
        }
    }
}
