//! Transaction endpoints - HTMX fragments, anomaly check and CSV export
//!
//! Endpoints:
//! - htmx_transactions_list: Transaction table (HTML fragment)
//! - htmx_analysis_dialog: Fresh anomaly dialog for one transaction
//! - htmx_analysis_run: Run the check and render the verdict
//! - api_anomaly: JSON anomaly check
//! - export_transactions_csv: CSV download

use crate::routes::{csv_download, list_params};
use crate::widgets;
use crate::{ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Json, Response};
use std::collections::HashMap;
use wheeladmin_core::anomaly::{AnalysisSession, AnalysisState, FAILURE_MESSAGE, FAILURE_TITLE};
use wheeladmin_core::export::{transactions_csv, TRANSACTIONS_FILENAME};
use wheeladmin_core::models::Transaction;
use wheeladmin_core::{AnomalyInput, CoreError, Listing};
use wheeladmin_utils::{escape_html, format_amount};

const HEADERS: [&str; 5] = ["Transaction ID", "Amount", "Payment Method", "Status", "Actions"];
const TARGET: &str = "#transactions-content";

fn payment_status_badge(status: &str) -> String {
    match status {
        "Success" => widgets::badge("Success", "green"),
        "Pending" => widgets::badge("Pending", "yellow"),
        "Failed" => widgets::badge("Failed", "red"),
        other => widgets::badge(other, "gray"),
    }
}

/// Render one page of transactions
pub fn render_transactions_table(transactions: Vec<Transaction>, query: &str, page: usize, per_page: usize) -> String {
    let page = Listing::new(transactions).search(query).paginate(page, per_page);

    let mut rows = String::new();
    for txn in &page.items {
        rows.push_str(&format!(
            r#"<tr class='hover:bg-gray-50'>
    <td class='px-4 py-3 font-mono text-sm'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3 text-gray-500'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3 text-right'>
        <button hx-get='/transactions/{}/analyze' hx-target='#modal' class='px-3 py-1 text-sm border rounded-lg hover:bg-gray-50'>Detect Anomaly</button>
    </td>
</tr>"#,
            escape_html(&txn.transaction_id),
            escape_html(&format_amount(&txn.amount)),
            escape_html(&txn.payment_gateway),
            payment_status_badge(&txn.transaction_status),
            urlencoding::encode(&txn.id)
        ));
    }
    if page.is_empty() {
        rows = widgets::empty_row(HEADERS.len(), "No transactions found.");
    }

    format!(
        "{}{}",
        widgets::table(&HEADERS, &rows),
        widgets::pagination(&page, "/transactions/list", query, TARGET)
    )
}

/// A fresh anomaly dialog. The result slot starts empty and is cleared
/// again before every request; `hx-sync` drops clicks while one is pending.
pub fn render_analysis_dialog(txn: &Transaction) -> String {
    let body = format!(
        r#"<div class='space-y-4'>
    <div>
        <h4 class='font-semibold text-sm mb-1'>Transaction Details:</h4>
        <p class='text-xs text-gray-500'>ID: {}</p>
        <p class='text-xs text-gray-500'>Payment Gateway: {}</p>
        <p class='text-xs text-gray-500'>Amount: {}</p>
    </div>
    <button hx-post='/transactions/{}/analyze' hx-target='#analysis-result'
        hx-disabled-elt='this' hx-sync='this:drop' hx-indicator='#analysis-spinner'
        hx-on::before-request="document.getElementById('analysis-result').innerHTML = ''"
        class='w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700 disabled:opacity-60'>
        Detect Anomaly
    </button>
    <p id='analysis-spinner' class='htmx-indicator text-sm text-gray-500 text-center'>Analyzing...</p>
    <div id='analysis-result'></div>
    <div class='flex justify-end'>
        <button type='button' onclick='document.getElementById("modal").innerHTML = ""' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Close</button>
    </div>
</div>"#,
        escape_html(&txn.transaction_id),
        escape_html(&txn.payment_gateway),
        escape_html(&format_amount(&txn.amount)),
        urlencoding::encode(&txn.id)
    );
    widgets::modal("Transaction Anomaly Detection", "", &body)
}

fn failure_notice(message: &str) -> String {
    format!(
        r#"<div role='alert' class='border border-red-300 bg-red-50 rounded-lg p-4'>
    <div class='flex items-start justify-between gap-2'>
        <div><p class='font-medium text-red-800'>{}</p><p class='text-sm text-red-700 mt-1'>{}</p></div>
        <button onclick="this.closest('[role=alert]').remove()" class='text-red-400 hover:text-red-600'>✕</button>
    </div>
</div>"#,
        FAILURE_TITLE,
        escape_html(message)
    )
}

/// Verdict or failure notice for the dialog's result slot
pub fn render_analysis_state(state: &AnalysisState) -> String {
    match state {
        AnalysisState::Shown(output) => {
            let (title, class) = if output.is_anomalous {
                ("Anomaly Detected!", "border-red-300 bg-red-50 text-red-800")
            } else {
                ("Transaction Appears Normal", "border-green-500 bg-green-50 text-green-800")
            };
            format!(
                r#"<div role='alert' class='border rounded-lg p-4 {}'>
    <p class='font-medium'>{}</p>
    <div class='text-xs mt-2 space-y-1'>
        <p><strong>Risk Score:</strong> {}/100</p>
        <p><strong>Explanation:</strong> {}</p>
    </div>
</div>"#,
                class,
                title,
                output.risk_score,
                escape_html(&output.explanation)
            )
        }
        AnalysisState::Failed(message) => failure_notice(message),
        AnalysisState::Idle | AnalysisState::Loading => String::new(),
    }
}

/// Transactions plus the one `id` names
async fn find_transaction(state: &AppState, id: &str) -> Result<(Transaction, Vec<Transaction>), ApiError> {
    let all = state.backend.transactions().await?;
    let txn = all
        .iter()
        .find(|t| t.matches_id(id))
        .cloned()
        .ok_or_else(|| CoreError::not_found("Transaction", id))?;
    Ok((txn, all))
}

/// HTMX: Transactions list
pub async fn htmx_transactions_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let (query, page) = list_params(&params);
    match state.backend.transactions().await {
        Ok(transactions) => Html(render_transactions_table(transactions, &query, page, state.per_page())),
        Err(e) => Html(widgets::backend_failure(&e, "list_transactions", &HEADERS, "transactions")),
    }
}

/// HTMX: Open the anomaly dialog
pub async fn htmx_analysis_dialog(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, ApiError> {
    let (txn, _) = find_transaction(&state, &id).await.map_err(|e| {
        e.log("open_analysis");
        e
    })?;
    Ok(Html(render_analysis_dialog(&txn)))
}

/// HTMX: Run the anomaly check for one transaction
pub async fn htmx_analysis_run(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, ApiError> {
    let (txn, all) = find_transaction(&state, &id).await.map_err(|e| {
        e.log("analyze_transaction");
        e
    })?;
    let input = AnomalyInput::from_transaction(&txn, &all);

    let mut session = AnalysisSession::open(txn.transaction_id.clone());
    let html = match session.run(&state.detector, &input).await {
        Ok(outcome) => render_analysis_state(outcome),
        Err(e) => {
            log::warn!("{}", e);
            failure_notice(FAILURE_MESSAGE)
        }
    };
    Ok(Html(html))
}

/// JSON: Anomaly check for caller-supplied input
pub async fn api_anomaly(State(state): State<AppState>, Json(input): Json<AnomalyInput>) -> Response {
    match state.detector.detect(&input).await {
        Ok(output) => Json(output).into_response(),
        Err(e) => {
            let error = ApiError::from(e);
            error.log("api_anomaly");
            (error.status(), Json(error.to_json())).into_response()
        }
    }
}

/// CSV export of every transaction
pub async fn export_transactions_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let transactions = state.backend.transactions().await.map_err(|e| {
        let error = ApiError::from(e);
        error.log("export_transactions");
        error
    })?;
    log::info!("Exporting {} transactions", transactions.len());
    Ok(csv_download(TRANSACTIONS_FILENAME, transactions_csv(&transactions)))
}
