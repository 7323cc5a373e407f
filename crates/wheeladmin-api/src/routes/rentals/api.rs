//! Rental endpoints - HTMX fragments and CSV export
//!
//! Endpoints:
//! - htmx_rentals_list: Rental table filtered by start date and search term
//! - htmx_rental_transactions: Transaction details dialog
//! - export_rentals_csv: CSV download of the filtered rentals

use crate::routes::{csv_download, list_params};
use crate::widgets;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Response};
use std::collections::HashMap;
use wheeladmin_core::export::{rentals_csv, RENTALS_FILENAME};
use wheeladmin_core::models::{display_date, parse_date, DateRange, Rental};
use wheeladmin_core::{CoreResult, Listing};
use wheeladmin_utils::{escape_html, format_amount};

const TARGET: &str = "#rentals-content";

fn headers(currency: &str) -> [String; 7] {
    [
        "Rental ID".to_string(),
        "Wheelchair".to_string(),
        "Start Date".to_string(),
        "End Date".to_string(),
        format!("Total Amount({})", currency),
        "Status".to_string(),
        "Transaction".to_string(),
    ]
}

/// Start/end bounds from the filter inputs. Blank or malformed dates are unbounded.
pub fn date_range(params: &HashMap<String, String>) -> DateRange {
    let bound = |name: &str| params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()).and_then(parse_date);
    DateRange::new(bound("start"), bound("end"))
}

/// Rentals inside the date window whose id or wheelchair matches `query`
pub fn filter_rentals(rentals: Vec<Rental>, range: &DateRange, query: &str) -> Listing<Rental> {
    Listing::new(rentals).retain(|r| range.admits(r)).search(query)
}

fn order_status_badge(status: &str) -> String {
    match status {
        "Ongoing" => widgets::badge("Ongoing", "blue"),
        "Completed" => widgets::badge("Completed", "green"),
        "Cancelled" => widgets::badge("Cancelled", "red"),
        other => widgets::badge(other, "gray"),
    }
}

/// Render one page of filtered rentals
pub fn render_rentals_table(
    rentals: Vec<Rental>,
    range: &DateRange,
    query: &str,
    page: usize,
    per_page: usize,
    currency: &str,
) -> String {
    let page = filter_rentals(rentals, range, query).paginate(page, per_page);
    let headers = headers(currency);
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();

    let mut rows = String::new();
    for rental in &page.items {
        rows.push_str(&format!(
            r#"<tr class='hover:bg-gray-50'>
    <td class='px-4 py-3 font-mono text-sm'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3 text-gray-500'>{}</td>
    <td class='px-4 py-3 text-gray-500'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3'><button hx-get='/rentals/{}/transactions' hx-target='#modal' class='text-sm text-blue-600 hover:underline'>Details</button></td>
</tr>"#,
            escape_html(&rental.id),
            escape_html(rental.wheelchair_name()),
            display_date(rental.rent_start_date.as_deref()),
            display_date(rental.rent_end_date.as_deref()),
            escape_html(&format_amount(&rental.total_amount)),
            order_status_badge(&rental.order_status),
            urlencoding::encode(&rental.id)
        ));
    }
    if page.is_empty() {
        rows = widgets::empty_row(headers.len(), "No rentals found.");
    }

    format!(
        "{}{}",
        widgets::table(&headers, &rows),
        widgets::pagination(&page, "/rentals/list", query, TARGET)
    )
}

/// Body of the transaction details dialog
pub fn render_transactions_dialog(rental: &Rental) -> String {
    let transactions = rental.unique_transactions();
    let body = if transactions.is_empty() {
        "<div class='text-gray-500 text-sm'>No transactions found for this order.</div>".to_string()
    } else {
        let mut cards = String::new();
        for txn in transactions {
            let mut lines = format!(
                "<div><strong>Transaction ID:</strong> {}</div><div><strong>Gateway:</strong> {}</div><div><strong>Status:</strong> {}</div>",
                escape_html(&txn.transaction_id),
                escape_html(&txn.payment_gateway),
                escape_html(&txn.transaction_status)
            );
            if !txn.amount.is_empty() {
                lines.push_str(&format!("<div><strong>Amount:</strong> {}</div>", escape_html(&txn.amount)));
            }
            if let Some(currency) = txn.currency.as_deref() {
                lines.push_str(&format!("<div><strong>Currency:</strong> {}</div>", escape_html(currency)));
            }
            cards.push_str(&format!("<div class='text-sm border rounded-md p-3'>{}</div>", lines));
        }
        format!("<div class='max-h-60 overflow-y-auto space-y-4 pr-2'>{}</div>", cards)
    };

    widgets::modal(
        "Transaction Details",
        &format!("Payment information for rental #{}", rental.id),
        &body,
    )
}

async fn load_filtered(state: &AppState, params: &HashMap<String, String>) -> CoreResult<(Vec<Rental>, DateRange)> {
    let range = date_range(params);
    let rentals = state.backend.rentals(&range).await?;
    Ok((rentals, range))
}

/// HTMX: Rentals list
pub async fn htmx_rentals_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let (query, page) = list_params(&params);
    let currency = &state.config.branding.currency;
    match load_filtered(&state, &params).await {
        Ok((rentals, range)) => Html(render_rentals_table(
            rentals,
            &range,
            &query,
            page,
            state.per_page(),
            currency,
        )),
        Err(e) => {
            let headers = headers(currency);
            let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
            Html(widgets::backend_failure(&e, "list_rentals", &headers, "rentals"))
        }
    }
}

/// HTMX: Transaction details for one rental
pub async fn htmx_rental_transactions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, crate::ApiError> {
    let rental = state.backend.rental(&id).await?;
    Ok(Html(render_transactions_dialog(&rental)))
}

/// CSV export of the rentals matching the current filters
pub async fn export_rentals_csv(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, crate::ApiError> {
    let (query, _) = list_params(&params);
    let (rentals, range) = load_filtered(&state, &params).await.map_err(|e| {
        let error = crate::ApiError::from(e);
        error.log("export_rentals");
        error
    })?;
    let rentals = filter_rentals(rentals, &range, &query).into_items();
    log::info!("Exporting {} rentals", rentals.len());
    Ok(csv_download(RENTALS_FILENAME, rentals_csv(&rentals)))
}
