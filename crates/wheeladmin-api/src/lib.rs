//! HTTP console server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::dashboard: Summary cards and monthly orders
//! - routes::users: User list, KYC status, CSV export
//! - routes::wheelchairs: Fleet list and create/edit/delete forms
//! - routes::rentals: Rental orders, date filter, transaction details
//! - routes::transactions: Payments and the anomaly dialog
//! - routes::catalog: Categories and cities
//! - routes::settings: Configuration display

pub mod error;
pub mod form;
pub mod routes;
pub mod widgets;

#[cfg(test)]
mod tests;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::validate_request::ValidateRequestHeaderLayer;
use wheeladmin_config::Config;
use wheeladmin_core::{BackendRef, DetectorRef};
use wheeladmin_utils::escape_html;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: BackendRef,
    pub detector: DetectorRef,
}

impl AppState {
    pub fn new(config: Config, backend: BackendRef, detector: DetectorRef) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            detector,
        }
    }

    pub fn per_page(&self) -> usize {
        self.config.pagination.records_per_page
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::catalog::{
        htmx_categories_list, htmx_category_create_form, htmx_category_delete, htmx_category_delete_confirm,
        htmx_category_edit_form, htmx_category_store, htmx_category_update, htmx_cities_list, htmx_city_store,
        htmx_city_toggle, page_catalog,
    };
    use routes::dashboard::{api_dashboard, htmx_dashboard_cards, htmx_monthly_orders, page_dashboard};
    use routes::rentals::{export_rentals_csv, htmx_rental_transactions, htmx_rentals_list, page_rentals};
    use routes::settings::{api_settings, page_settings};
    use routes::transactions::{
        api_anomaly, export_transactions_csv, htmx_analysis_dialog, htmx_analysis_run, htmx_transactions_list,
        page_transactions,
    };
    use routes::users::{export_users_csv, htmx_user_documents, htmx_user_kyc_update, htmx_users_list, page_users};
    use routes::wheelchairs::{
        htmx_wheelchair_create_form, htmx_wheelchair_delete, htmx_wheelchair_delete_confirm,
        htmx_wheelchair_edit_form, htmx_wheelchair_store, htmx_wheelchair_update, htmx_wheelchairs_list,
        page_wheelchairs,
    };

    let router = Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/settings", get(api_settings))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/anomaly", post(api_anomaly))
        // HTMX page routes
        .route("/", get(page_dashboard))
        .route("/dashboard", get(page_dashboard))
        .route("/users", get(page_users))
        .route("/wheelchairs", get(page_wheelchairs).post(htmx_wheelchair_store))
        .route("/rentals", get(page_rentals))
        .route("/transactions", get(page_transactions))
        .route("/categories-cities", get(page_catalog))
        .route("/settings", get(page_settings))
        // Dashboard fragments
        .route("/dashboard/cards", get(htmx_dashboard_cards))
        .route("/dashboard/monthly", get(htmx_monthly_orders))
        // Users
        .route("/users/list", get(htmx_users_list))
        .route("/users/export.csv", get(export_users_csv))
        .route("/users/:id/kyc", post(htmx_user_kyc_update))
        .route("/users/:id/documents", get(htmx_user_documents))
        // Wheelchairs
        .route("/wheelchairs/list", get(htmx_wheelchairs_list))
        .route("/wheelchairs/new", get(htmx_wheelchair_create_form))
        .route(
            "/wheelchairs/:id",
            axum::routing::put(htmx_wheelchair_update).delete(htmx_wheelchair_delete),
        )
        .route("/wheelchairs/:id/edit", get(htmx_wheelchair_edit_form))
        .route("/wheelchairs/:id/delete", get(htmx_wheelchair_delete_confirm))
        // Rentals
        .route("/rentals/list", get(htmx_rentals_list))
        .route("/rentals/export.csv", get(export_rentals_csv))
        .route("/rentals/:id/transactions", get(htmx_rental_transactions))
        // Transactions
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/export.csv", get(export_transactions_csv))
        .route(
            "/transactions/:id/analyze",
            get(htmx_analysis_dialog).post(htmx_analysis_run),
        )
        // Categories & cities
        .route("/categories", post(htmx_category_store))
        .route("/categories/list", get(htmx_categories_list))
        .route("/categories/new", get(htmx_category_create_form))
        .route(
            "/categories/:id",
            axum::routing::put(htmx_category_update).delete(htmx_category_delete),
        )
        .route("/categories/:id/edit", get(htmx_category_edit_form))
        .route("/categories/:id/delete", get(htmx_category_delete_confirm))
        .route("/cities", post(htmx_city_store))
        .route("/cities/list", get(htmx_cities_list))
        .route("/cities/:id/toggle", post(htmx_city_toggle));

    let auth = state.config.server.auth.clone();
    let router = router
        .with_state(state)
        .layer(ServiceBuilder::new().layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)));

    match auth {
        Some(auth) => router.layer(ValidateRequestHeaderLayer::basic(&auth.username, &auth.password)),
        None => router,
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(app_name: &str, title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - {}</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        escape_html(app_name),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(app_name: &str, current_path: &str) -> String {
    let links = [
        ("/dashboard", "Dashboard", "📊"),
        ("/rentals", "Rental Management", "🛒"),
        ("/transactions", "Transaction Management", "💳"),
        ("/wheelchairs", "Wheelchair Management", "♿"),
        ("/users", "User Management", "👥"),
        ("/categories-cities", "Cities", "📍"),
        ("/settings", "Settings", "⚙️"),
    ];

    let mut nav = format!(
        "<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>{}</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>",
        escape_html(app_name)
    );

    for (path, label, icon) in &links {
        let is_active = current_path.starts_with(path) || (current_path == "/" && *path == "/dashboard");
        let active_class = if is_active {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Full page, or just the content area for HTMX navigation. Both carry the
/// modal and toast slots the fragments swap into.
pub fn page_response(
    headers: &axum::http::HeaderMap,
    config: &Config,
    title: &str,
    current_path: &str,
    inner_content: &str,
) -> String {
    let slots = "<div id='modal'></div><div id='toast' class='fixed bottom-4 right-4 z-50'></div>";
    if is_htmx_request(headers) {
        format!(
            r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>{}"#,
            inner_content, slots
        )
    } else {
        base_html(
            &config.branding.app_name,
            title,
            &format!(
                r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>{}"#,
                nav_sidebar(&config.branding.app_name, current_path),
                inner_content,
                slots
            ),
        )
    }
}

/// Start the HTTP server
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting console on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /dashboard (Summary)");
    log::info!("  - /users, /wheelchairs, /rentals, /transactions (Resources)");
    log::info!("  - /categories-cities (Catalog)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
