//! Wheelchair endpoints - HTMX fragments and mutations
//!
//! Endpoints:
//! - htmx_wheelchairs_list: Wheelchair table (HTML fragment)
//! - htmx_wheelchair_create_form / htmx_wheelchair_edit_form: Form dialog
//! - htmx_wheelchair_store / htmx_wheelchair_update: Submit the form
//! - htmx_wheelchair_delete_confirm / htmx_wheelchair_delete: Delete with confirmation

use crate::form::{checked, field, optional_field, parse_form};
use crate::routes::list_params;
use crate::widgets::{self, ToastKind};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use std::collections::HashMap;
use wheeladmin_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use wheeladmin_core::models::{Category, Wheelchair, WheelchairDraft};
use wheeladmin_core::{CoreError, Listing};
use wheeladmin_utils::escape_html;

const HEADERS: [&str; 6] = ["Image", "Name", "Category", "Status", "Rating", "Actions"];
const TARGET: &str = "#wheelchairs-content";

/// Where the form submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<'a> {
    Create,
    Edit(&'a str),
}

/// Render one page of wheelchairs
pub fn render_wheelchairs_table(wheelchairs: Vec<Wheelchair>, query: &str, page: usize, per_page: usize) -> String {
    let page = Listing::new(wheelchairs).search(query).paginate(page, per_page);

    let mut rows = String::new();
    for w in &page.items {
        let image = match w.thumbnail() {
            Some(url) => format!(
                "<img src='{}' alt='{}' class='w-12 h-12 rounded-lg object-cover'>",
                escape_html(url),
                escape_html(&w.name)
            ),
            None => "<div class='w-12 h-12 rounded-lg bg-gray-100'></div>".to_string(),
        };
        let tone = if w.is_globally_available { "green" } else { "yellow" };
        let id = urlencoding::encode(&w.id);
        rows.push_str(&format!(
            r#"<tr class='hover:bg-gray-50'>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3 font-medium'>{}</td>
    <td class='px-4 py-3 text-gray-500'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3 text-gray-500'>★ {}</td>
    <td class='px-4 py-3'>
        <button hx-get='/wheelchairs/{}/edit' hx-target='#modal' class='text-sm text-indigo-600 hover:underline mr-3'>Edit</button>
        <button hx-get='/wheelchairs/{}/delete' hx-target='#modal' class='text-sm text-red-600 hover:underline'>Delete</button>
    </td>
</tr>"#,
            image,
            escape_html(&w.name),
            escape_html(w.category_name()),
            widgets::badge(w.availability_label(), tone),
            w.rating_label(),
            id,
            id
        ));
    }
    if page.is_empty() {
        rows = widgets::empty_row(HEADERS.len(), "No wheelchairs found.");
    }

    format!(
        "{}{}",
        widgets::table(&HEADERS, &rows),
        widgets::pagination(&page, "/wheelchairs/list", query, TARGET)
    )
}

fn text_input(name: &str, label: &str, value: &str, required: bool) -> String {
    format!(
        r#"<div>
    <label class='block text-sm font-medium text-gray-700 mb-1'>{}</label>
    <input type='text' name='{}' value='{}' {} class='w-full px-3 py-2 border rounded-lg'>
</div>"#,
        label,
        name,
        escape_html(value),
        if required { "required" } else { "" }
    )
}

/// Create or edit dialog. `missing` lists fields that failed validation.
pub fn render_wheelchair_form(
    draft: &WheelchairDraft,
    categories: &[Category],
    mode: FormMode<'_>,
    missing: &[&str],
) -> String {
    let mut options = String::from("<option value=''>Select a category</option>");
    for category in categories {
        let selected = if category.id == draft.category_id { " selected" } else { "" };
        options.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            escape_html(&category.id),
            selected,
            escape_html(&category.name)
        ));
    }

    let errors = if missing.is_empty() {
        String::new()
    } else {
        format!(
            "<div class='bg-red-50 border border-red-200 rounded-lg p-3 text-sm text-red-700'>Please fill in: {}</div>",
            missing.join(", ")
        )
    };

    let (title, submit, verb) = match mode {
        FormMode::Create => ("Add Wheelchair", "Add Wheelchair".to_string(), "hx-post='/wheelchairs'".to_string()),
        FormMode::Edit(id) => (
            "Edit Wheelchair",
            "Save Changes".to_string(),
            format!("hx-put='/wheelchairs/{}'", urlencoding::encode(id)),
        ),
    };

    let body = format!(
        r#"<form {} hx-target='{}' class='space-y-4'>
    {}
    {}
    <div>
        <label class='block text-sm font-medium text-gray-700 mb-1'>Category</label>
        <select name='category_id' required class='w-full px-3 py-2 border rounded-lg bg-white'>{}</select>
    </div>
    <div>
        <label class='block text-sm font-medium text-gray-700 mb-1'>Description</label>
        <textarea name='description' rows='3' required class='w-full px-3 py-2 border rounded-lg'>{}</textarea>
    </div>
    <div>
        <label class='block text-sm font-medium text-gray-700 mb-1'>Information</label>
        <textarea name='information' rows='3' class='w-full px-3 py-2 border rounded-lg'>{}</textarea>
    </div>
    <div class='grid grid-cols-2 gap-4'>{}{}</div>
    <label class='flex items-center gap-2 text-sm'>
        <input type='checkbox' name='is_globally_available' {}> Available for rent
    </label>
    <div class='flex justify-end gap-2 pt-2'>
        <button type='button' onclick='document.getElementById("modal").innerHTML = ""' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Cancel</button>
        <button type='submit' hx-disabled-elt='this' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>{}</button>
    </div>
</form>"#,
        verb,
        TARGET,
        errors,
        text_input("name", "Name", &draft.name, true),
        options,
        escape_html(&draft.description),
        escape_html(&draft.information),
        text_input("model", "Model", draft.model.as_deref().unwrap_or(""), false),
        text_input("manufacturer", "Manufacturer", draft.manufacturer.as_deref().unwrap_or(""), false),
        if draft.is_globally_available { "checked" } else { "" },
        submit
    );

    widgets::modal(title, "", &body)
}

fn draft_from_form(body: &str) -> WheelchairDraft {
    let params = parse_form(body);
    WheelchairDraft {
        name: field(&params, "name"),
        category_id: field(&params, "category_id"),
        description: field(&params, "description"),
        information: field(&params, "information"),
        is_globally_available: checked(&params, "is_globally_available"),
        model: optional_field(&params, "model"),
        manufacturer: optional_field(&params, "manufacturer"),
    }
}

/// Categories for the form's select; an unreachable list leaves it empty
async fn form_categories(state: &AppState) -> Vec<Category> {
    match state.backend.categories().await {
        Ok(categories) => categories,
        Err(e) => {
            DefaultErrorLogger.log_error(&e, &ErrorContext::new("list_categories"));
            Vec::new()
        }
    }
}

/// Fresh first page after a mutation, plus the toast and a closed modal
async fn after_mutation(state: &AppState, title: &str, message: &str) -> Response {
    let table = match state.backend.wheelchairs().await {
        Ok(wheelchairs) => render_wheelchairs_table(wheelchairs, "", 1, state.per_page()),
        Err(e) => widgets::backend_failure(&e, "list_wheelchairs", &HEADERS, "wheelchairs"),
    };
    Html(format!(
        "{}{}{}",
        table,
        widgets::close_modal(),
        widgets::toast(ToastKind::Success, title, message)
    ))
    .into_response()
}

fn mutation_failed(error: &CoreError, operation: &str, id: Option<&str>, title: &str) -> Response {
    let mut context = ErrorContext::new(operation);
    if let Some(id) = id {
        context = context.with_record(id);
    }
    DefaultErrorLogger.log_error(error, &context);
    widgets::toast_only(ToastKind::Error, title, &error.user_message())
}

/// HTMX: Wheelchairs list
pub async fn htmx_wheelchairs_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let (query, page) = list_params(&params);
    match state.backend.wheelchairs().await {
        Ok(wheelchairs) => Html(render_wheelchairs_table(wheelchairs, &query, page, state.per_page())),
        Err(e) => Html(widgets::backend_failure(&e, "list_wheelchairs", &HEADERS, "wheelchairs")),
    }
}

/// HTMX: Empty create dialog
pub async fn htmx_wheelchair_create_form(State(state): State<AppState>) -> Html<String> {
    let categories = form_categories(&state).await;
    let draft = WheelchairDraft {
        is_globally_available: true,
        ..WheelchairDraft::default()
    };
    Html(render_wheelchair_form(&draft, &categories, FormMode::Create, &[]))
}

/// HTMX: Edit dialog prefilled from the record
pub async fn htmx_wheelchair_edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, crate::ApiError> {
    let wheelchair = state.backend.wheelchair(&id).await?;
    let categories = form_categories(&state).await;
    Ok(Html(render_wheelchair_form(
        &WheelchairDraft::from_wheelchair(&wheelchair),
        &categories,
        FormMode::Edit(&id),
        &[],
    )))
}

/// HTMX: Create a wheelchair
pub async fn htmx_wheelchair_store(State(state): State<AppState>, body: String) -> Response {
    let draft = draft_from_form(&body);
    let missing = draft.missing_fields();
    if !missing.is_empty() {
        let categories = form_categories(&state).await;
        return widgets::retarget_modal(render_wheelchair_form(&draft, &categories, FormMode::Create, &missing));
    }

    match state.backend.create_wheelchair(&draft).await {
        Ok(()) => {
            log::info!("Created wheelchair {}", draft.name);
            after_mutation(&state, "Wheelchair added", &format!("{} was added.", draft.name)).await
        }
        Err(e) => mutation_failed(&e, "create_wheelchair", None, "Failed to add wheelchair"),
    }
}

/// HTMX: Update a wheelchair
pub async fn htmx_wheelchair_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Response {
    let draft = draft_from_form(&body);
    let missing = draft.missing_fields();
    if !missing.is_empty() {
        let categories = form_categories(&state).await;
        return widgets::retarget_modal(render_wheelchair_form(&draft, &categories, FormMode::Edit(&id), &missing));
    }

    match state.backend.update_wheelchair(&id, &draft).await {
        Ok(()) => {
            log::info!("Updated wheelchair {}", id);
            after_mutation(&state, "Wheelchair updated", &format!("{} was saved.", draft.name)).await
        }
        Err(e) => mutation_failed(&e, "update_wheelchair", Some(id.as_str()), "Failed to update wheelchair"),
    }
}

/// HTMX: Delete confirmation
pub async fn htmx_wheelchair_delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, crate::ApiError> {
    let wheelchair = state.backend.wheelchair(&id).await?;
    Ok(Html(widgets::confirm_delete(
        &format!("the wheelchair \"{}\"", wheelchair.name),
        &format!("/wheelchairs/{}", urlencoding::encode(&id)),
        TARGET,
    )))
}

/// HTMX: Delete a wheelchair
pub async fn htmx_wheelchair_delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.backend.delete_wheelchair(&id).await {
        Ok(()) => {
            log::info!("Deleted wheelchair {}", id);
            after_mutation(&state, "Wheelchair deleted", "The wheelchair was removed.").await
        }
        Err(e) => mutation_failed(&e, "delete_wheelchair", Some(id.as_str()), "Failed to delete wheelchair"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            icon: None,
        }
    }

    #[test]
    fn test_draft_from_form() {
        let draft = draft_from_form("name=Falcon+X&category_id=3&description=Light&model=&is_globally_available=on");
        assert_eq!(draft.name, "Falcon X");
        assert_eq!(draft.category_id, "3");
        assert!(draft.is_globally_available);
        assert_eq!(draft.model, None);
        assert!(draft.missing_fields().is_empty());
    }

    #[test]
    fn test_form_selects_category_and_lists_missing() {
        let draft = WheelchairDraft {
            category_id: "2".to_string(),
            ..WheelchairDraft::default()
        };
        let html = render_wheelchair_form(
            &draft,
            &[category("1", "Manual"), category("2", "Electric")],
            FormMode::Edit("9"),
            &["name", "description"],
        );
        assert!(html.contains("hx-put='/wheelchairs/9'"));
        assert!(html.contains("<option value='2' selected>Electric</option>"));
        assert!(html.contains("Please fill in: name, description"));
    }

    #[test]
    fn test_create_form_posts() {
        let html = render_wheelchair_form(&WheelchairDraft::default(), &[], FormMode::Create, &[]);
        assert!(html.contains("hx-post='/wheelchairs'"));
        assert!(!html.contains("Please fill in"));
    }

    #[test]
    fn test_empty_table() {
        let html = render_wheelchairs_table(Vec::new(), "", 1, 10);
        assert!(html.contains("No wheelchairs found."));
        assert!(html.contains("Page 1 of 1"));
    }
}
