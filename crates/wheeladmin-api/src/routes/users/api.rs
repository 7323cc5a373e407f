//! Users endpoints - HTMX fragments and CSV export
//!
//! Endpoints:
//! - htmx_users_list: User table (HTML fragment)
//! - htmx_user_kyc_update: Set KYC status, re-render table
//! - htmx_user_documents: KYC document dialog
//! - export_users_csv: CSV download

use crate::form::{field, parse_form};
use crate::routes::{csv_download, list_params};
use crate::widgets::{self, ToastKind};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Response};
use std::collections::HashMap;
use wheeladmin_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use wheeladmin_core::export::{users_csv, USERS_FILENAME};
use wheeladmin_core::models::{KycStatus, User};
use wheeladmin_core::Listing;
use wheeladmin_utils::escape_html;

const HEADERS: [&str; 7] = ["Name", "Email", "Status", "KYC Status", "Registered", "Documents", "Actions"];

fn kyc_badge(status: &KycStatus) -> String {
    match status {
        KycStatus::Accepted => widgets::badge("Verified", "green"),
        KycStatus::Pending => widgets::badge("Pending", "yellow"),
        KycStatus::Rejected => widgets::badge("Rejected", "red"),
        KycStatus::Uploaded => widgets::badge("Uploaded", "blue"),
        KycStatus::InProcess => widgets::badge("In Process", "yellow"),
        KycStatus::Other(raw) => widgets::badge(raw, "gray"),
    }
}

fn kyc_menu(user: &User, query: &str, page: usize) -> String {
    let mut options = String::new();
    if let KycStatus::Other(raw) = &user.kyc_status {
        options.push_str(&format!("<option value='' selected disabled>{}</option>", escape_html(raw)));
    }
    for choice in KycStatus::CHOICES.iter() {
        let selected = if *choice == user.kyc_status { " selected" } else { "" };
        options.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            choice.as_str(),
            selected,
            choice.as_str()
        ));
    }
    format!(
        r#"<form hx-post='/users/{}/kyc' hx-target='#users-content' hx-trigger='change'>
    <input type='hidden' name='q' value='{}'><input type='hidden' name='page' value='{}'>
    <select name='kyc_status' class='px-2 py-1 text-sm border rounded-lg bg-white'>{}</select>
</form>"#,
        urlencoding::encode(&user.id),
        escape_html(query),
        page,
        options
    )
}

/// Render one page of users
pub fn render_users_table(users: Vec<User>, query: &str, page: usize, per_page: usize) -> String {
    let page = Listing::new(users).search(query).paginate(page, per_page);

    let mut rows = String::new();
    for user in &page.items {
        let name = user.full_name();
        let documents = if user.kyc_document_url.is_some() {
            format!(
                "<button hx-get='/users/{}/documents' hx-target='#modal' class='text-sm text-indigo-600 hover:underline'>View</button>",
                urlencoding::encode(&user.id)
            )
        } else {
            "<span class='text-sm text-gray-400'>N/A</span>".to_string()
        };
        rows.push_str(&format!(
            r#"<tr class='hover:bg-gray-50'>
    <td class='px-4 py-3'><div class='flex items-center gap-3'><span class='w-8 h-8 rounded-full bg-indigo-100 text-indigo-700 flex items-center justify-center text-xs font-bold'>{}</span><span class='font-medium'>{}</span></div></td>
    <td class='px-4 py-3 text-gray-500'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3 text-gray-500'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3'>{}</td>
</tr>"#,
            escape_html(&user.initials()),
            escape_html(&name),
            escape_html(&user.email),
            widgets::badge(user.status_label(), if user.is_active() { "green" } else { "red" }),
            kyc_badge(&user.kyc_status),
            user.registration_date(),
            documents,
            kyc_menu(user, query, page.page)
        ));
    }
    if page.is_empty() {
        rows = widgets::empty_row(HEADERS.len(), "No users found.");
    }

    format!(
        "{}{}",
        widgets::table(&HEADERS, &rows),
        widgets::pagination(&page, "/users/list", query, "#users-content")
    )
}

/// HTMX: Users list
pub async fn htmx_users_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let (query, page) = list_params(&params);
    match state.backend.users().await {
        Ok(users) => Html(render_users_table(users, &query, page, state.per_page())),
        Err(e) => Html(widgets::backend_failure(&e, "list_users", &HEADERS, "users")),
    }
}

/// HTMX: Change a user's KYC status, then re-render the current page
pub async fn htmx_user_kyc_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Html<String> {
    let params = parse_form(&body);
    let (query, page) = list_params(&params);
    let status = KycStatus::from(field(&params, "kyc_status"));

    let notice = if let KycStatus::Other(raw) = &status {
        log::warn!("Rejected KYC status {:?} for user {}", raw, id);
        widgets::toast(
            ToastKind::Error,
            "Failed to update KYC status",
            "Choose one of the listed KYC statuses.",
        )
    } else {
        match state.backend.update_kyc(&id, &status).await {
            Ok(()) => {
                log::info!("KYC status of user {} set to {}", id, status);
                widgets::toast(ToastKind::Success, "KYC updated", &format!("Status set to {}.", status))
            }
            Err(e) => {
                DefaultErrorLogger.log_error(&e, &ErrorContext::new("update_kyc").with_record(id.as_str()));
                widgets::toast(ToastKind::Error, "Failed to update KYC status", &e.user_message())
            }
        }
    };

    let table = match state.backend.users().await {
        Ok(users) => render_users_table(users, &query, page, state.per_page()),
        Err(e) => widgets::backend_failure(&e, "list_users", &HEADERS, "users"),
    };
    Html(format!("{}{}", table, notice))
}

/// HTMX: KYC document dialog
pub async fn htmx_user_documents(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let user = match state.backend.user(&id).await {
        Ok(user) => user,
        Err(e) => {
            return Html(widgets::modal(
                "Documents",
                "",
                &format!("<p class='text-center text-red-600'>{}</p>", escape_html(&e.user_message())),
            ))
        }
    };

    let body = match user.kyc_document_url.as_deref() {
        Some(url) => format!(
            r#"<table class='min-w-full text-sm'>
    <thead><tr><th class='text-left py-2'>Type</th><th class='text-right py-2'>Document</th></tr></thead>
    <tbody><tr>
        <td class='py-2'>{}</td>
        <td class='py-2 text-right'><a href='{}' target='_blank' rel='noopener' class='text-indigo-600 hover:underline'>View / Download</a></td>
    </tr></tbody>
</table>"#,
            escape_html(user.kyc_document_type.as_deref().unwrap_or("KYC Document")),
            escape_html(url)
        ),
        None => "<p class='text-center text-gray-500'>No documents available for this user.</p>".to_string(),
    };

    Html(widgets::modal(
        &format!("Documents for {}", user.full_name()),
        "Review the KYC documents submitted by the user.",
        &body,
    ))
}

/// CSV export of every user
pub async fn export_users_csv(State(state): State<AppState>) -> Result<Response, crate::ApiError> {
    let users = state.backend.users().await.map_err(|e| {
        let error = crate::ApiError::from(e);
        error.log("export_users");
        error
    })?;
    log::info!("Exporting {} users", users.len());
    Ok(csv_download(USERS_FILENAME, users_csv(&users)))
}
