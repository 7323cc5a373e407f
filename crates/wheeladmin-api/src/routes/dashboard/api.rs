//! Dashboard endpoints - JSON API and HTMX fragments

use crate::widgets;
use crate::{ApiError, AppState};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Json, Response};
use wheeladmin_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use wheeladmin_core::models::{DashboardSummary, MonthlyOrderCount};
use wheeladmin_utils::{escape_html, format_number};

/// Share of `part` in `total` as a whole percentage
fn percent(part: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        (part * 100 + total / 2) / total
    }
}

fn card(title: &str, value: u64, tone: &str) -> String {
    format!(
        "<div class='bg-{tone}-50 p-4 rounded-lg border border-{tone}-200'><p class='text-sm text-{tone}-600'>{}</p><p class='text-2xl font-bold text-{tone}-700'>{}</p></div>",
        title,
        format_number(value),
        tone = tone
    )
}

fn breakdown(title: &str, entries: &[(String, u64)]) -> String {
    let total: u64 = entries.iter().map(|(_, count)| count).sum();
    let rows: String = if entries.is_empty() {
        "<p class='text-sm text-gray-500'>No data.</p>".to_string()
    } else {
        entries
            .iter()
            .map(|(status, count)| {
                let pct = percent(*count, total);
                format!(
                    r#"<div>
    <div class='flex justify-between text-sm mb-1'><span>{}</span><span class='text-gray-500'>{} ({}%)</span></div>
    <div class='h-2 bg-gray-100 rounded-full'><div class='h-2 rounded-full bg-indigo-500' style='width: {}%'></div></div>
</div>"#,
                    widgets::badge(status, widgets::status_tone(status)),
                    format_number(*count),
                    pct,
                    pct
                )
            })
            .collect()
    };
    format!(
        "<div class='bg-white rounded-xl shadow-sm p-6'><h3 class='text-lg font-semibold mb-4'>{}</h3><div class='space-y-3'>{}</div></div>",
        title, rows
    )
}

/// Summary cards plus rental and payment status breakdowns
pub fn render_summary(summary: &DashboardSummary) -> String {
    let rentals: Vec<(String, u64)> = summary
        .rent_orders_by_status
        .iter()
        .map(|s| (s.order_status.clone(), s.count))
        .collect();
    let payments: Vec<(String, u64)> = summary
        .transactions_by_status
        .iter()
        .map(|s| (s.transaction_status.clone(), s.count))
        .collect();

    format!(
        r#"<div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>{}{}{}{}</div>
<p class='text-sm text-gray-500 mb-6'>{} active users · {} ongoing rentals</p>
<div class='grid grid-cols-1 lg:grid-cols-2 gap-6'>{}{}</div>"#,
        card("Total Users", summary.total_users, "blue"),
        card("Total Wheelchairs", summary.total_wheelchairs, "green"),
        card("Total Rentals", summary.total_orders, "yellow"),
        card("Service Cities", summary.total_cities, "red"),
        format_number(summary.active_users),
        format_number(summary.orders_with_status("Ongoing")),
        breakdown("Rental Status", &rentals),
        breakdown("Payment Status", &payments)
    )
}

/// Bar per month, scaled to the busiest month
pub fn render_monthly_orders(months: &[MonthlyOrderCount]) -> String {
    if months.is_empty() {
        return "<p class='text-gray-500 text-center'>No rental orders yet.</p>".to_string();
    }
    let peak = months.iter().map(|m| m.order_count).max().unwrap_or(0).max(1);
    let bars: String = months
        .iter()
        .map(|m| {
            let height = percent(m.order_count, peak);
            format!(
                r#"<div class='flex-1 flex flex-col items-center justify-end h-full' title='{} orders'>
    <span class='text-xs text-gray-600 mb-1'>{}</span>
    <div class='w-full max-w-[2.5rem] bg-indigo-500 rounded-t' style='height: {}%'></div>
    <span class='text-xs text-gray-500 mt-2'>{}</span>
</div>"#,
                m.order_count,
                format_number(m.order_count),
                height,
                escape_html(&m.month_label())
            )
        })
        .collect();
    format!("<div class='flex items-end gap-2 h-64'>{}</div>", bars)
}

fn load_failed(error: &wheeladmin_core::CoreError, operation: &str, what: &str) -> String {
    DefaultErrorLogger.log_error(error, &ErrorContext::new(operation));
    format!(
        "<p class='text-center text-red-600'>Could not load {}.</p>{}",
        what,
        widgets::toast(widgets::ToastKind::Error, "Error", &error.user_message())
    )
}

/// HTMX: Summary cards
pub async fn htmx_dashboard_cards(State(state): State<AppState>) -> Html<String> {
    match state.backend.dashboard_summary().await {
        Ok(summary) => Html(render_summary(&summary)),
        Err(e) => Html(load_failed(&e, "dashboard_summary", "the dashboard summary")),
    }
}

/// HTMX: Monthly rental orders chart
pub async fn htmx_monthly_orders(State(state): State<AppState>) -> Html<String> {
    match state.backend.monthly_orders().await {
        Ok(months) => Html(render_monthly_orders(&months)),
        Err(e) => Html(load_failed(&e, "monthly_orders", "monthly orders")),
    }
}

/// JSON: Summary and monthly orders together
pub async fn api_dashboard(State(state): State<AppState>) -> Response {
    let result = async {
        let summary = state.backend.dashboard_summary().await?;
        let monthly = state.backend.monthly_orders().await?;
        Ok::<_, ApiError>((summary, monthly))
    }
    .await;

    match result {
        Ok((summary, monthly)) => Json(serde_json::json!({
            "summary": summary,
            "monthlyOrders": monthly,
        }))
        .into_response(),
        Err(e) => {
            e.log("api_dashboard");
            (e.status(), Json(e.to_json())).into_response()
        }
    }
}
