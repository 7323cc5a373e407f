//! Settings page rendering

use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use wheeladmin_config::Config;
use wheeladmin_utils::escape_html;

fn row(label: &str, value: &str) -> String {
    format!(
        "<div class='flex justify-between py-2 border-b'><span class='text-gray-600'>{}</span><span class='font-medium font-mono text-sm'>{}</span></div>",
        label,
        escape_html(value)
    )
}

fn section(title: &str, rows: &[String]) -> String {
    format!(
        "<div class='bg-white rounded-xl shadow-sm p-6'><h3 class='text-lg font-semibold mb-4'>{}</h3><div>{}</div></div>",
        title,
        rows.concat()
    )
}

/// Settings sections for `config`
pub fn render_settings(config: &Config) -> String {
    let auth = match &config.server.auth {
        Some(auth) => format!("enabled ({})", auth.username),
        None => "disabled".to_string(),
    };
    let key = if config.model.api_key().is_some() { "set" } else { "not set" };
    let temperature = config
        .model
        .temperature
        .map(|t| t.to_string())
        .unwrap_or_else(|| "model default".to_string());

    format!(
        "<div class='grid grid-cols-1 lg:grid-cols-2 gap-6'>{}{}{}{}</div>",
        section(
            "General Settings",
            &[
                row("Site Name", &config.branding.app_name),
                row("Default Currency", &config.branding.currency),
                row("Items Per Page (Tables)", &config.pagination.records_per_page.to_string()),
                row("Log Level", &config.logging.level),
            ]
        ),
        section(
            "Server",
            &[
                row("Listen Address", &format!("{}:{}", config.server.host, config.server.port)),
                row("Basic Auth", &auth),
            ]
        ),
        section(
            "Backend",
            &[
                row("Base URL", &config.backend.base_url),
                row("Timeout", &format!("{}s", config.backend.timeout_secs)),
            ]
        ),
        section(
            "Anomaly Detection",
            &[
                row("Model", &config.model.name),
                row("Endpoint", &config.model.endpoint),
                row("API Key", &format!("{} ({})", key, config.model.api_key_env)),
                row("Temperature", &temperature),
            ]
        )
    )
}

/// Settings page
pub async fn page_settings(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let inner_content = format!(
        "<div class='mb-6'><h2 class='text-2xl font-bold'>System Settings</h2><p class='text-sm text-gray-500 mt-1'>Edit the configuration file and restart to change these values.</p></div>{}",
        render_settings(&state.config)
    );

    Html(crate::page_response(&headers, &state.config, "Settings", "/settings", &inner_content))
}
