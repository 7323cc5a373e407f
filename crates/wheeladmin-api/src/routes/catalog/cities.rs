//! City endpoints - list, add and enable/disable

use crate::form::{field, parse_form};
use crate::routes::list_params;
use crate::widgets::{self, ToastKind};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use std::collections::HashMap;
use wheeladmin_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use wheeladmin_core::models::{City, CityDraft, CityStatus};
use wheeladmin_core::Listing;
use wheeladmin_utils::escape_html;

const HEADERS: [&str; 3] = ["Name", "Status", "Actions"];
const TARGET: &str = "#cities-content";

/// Render one page of cities
pub fn render_cities_table(cities: Vec<City>, query: &str, page: usize, per_page: usize) -> String {
    let page = Listing::new(cities).search(query).paginate(page, per_page);

    let mut rows = String::new();
    for city in &page.items {
        let (badge, action, action_class) = match city.status {
            CityStatus::Active => (widgets::badge("Active", "green"), "Disable", "text-red-600"),
            CityStatus::Inactive => (widgets::badge("Inactive", "red"), "Enable", "text-green-600"),
        };
        rows.push_str(&format!(
            r#"<tr class='hover:bg-gray-50'>
    <td class='px-4 py-3 font-medium'>{}</td>
    <td class='px-4 py-3'>{}</td>
    <td class='px-4 py-3'>
        <button hx-post='/cities/{}/toggle' hx-target='{}' hx-disabled-elt='this' class='text-sm {} hover:underline'>{}</button>
    </td>
</tr>"#,
            escape_html(&city.name),
            badge,
            urlencoding::encode(&city.id),
            TARGET,
            action_class,
            action
        ));
    }
    if page.is_empty() {
        rows = widgets::empty_row(HEADERS.len(), "No cities found.");
    }

    format!(
        "{}{}",
        widgets::table(&HEADERS, &rows),
        widgets::pagination(&page, "/cities/list", query, TARGET)
    )
}

async fn refreshed(state: &AppState, notice: String) -> Html<String> {
    let table = match state.backend.cities().await {
        Ok(cities) => render_cities_table(cities, "", 1, state.per_page()),
        Err(e) => widgets::backend_failure(&e, "list_cities", &HEADERS, "cities"),
    };
    Html(format!("{}{}", table, notice))
}

/// HTMX: Cities list
pub async fn htmx_cities_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let (query, page) = list_params(&params);
    match state.backend.cities().await {
        Ok(cities) => Html(render_cities_table(cities, &query, page, state.per_page())),
        Err(e) => Html(widgets::backend_failure(&e, "list_cities", &HEADERS, "cities")),
    }
}

/// HTMX: Add a city
pub async fn htmx_city_store(State(state): State<AppState>, body: String) -> Response {
    let params = parse_form(&body);
    let draft = CityDraft {
        name: field(&params, "name"),
    };
    if draft.name.is_empty() {
        return widgets::toast_only(ToastKind::Error, "Failed to add city", "City name is required.");
    }

    match state.backend.create_city(&draft).await {
        Ok(()) => {
            log::info!("Created city {}", draft.name);
            let notice = widgets::toast(ToastKind::Success, "City added", &format!("{} was added.", draft.name));
            refreshed(&state, notice).await.into_response()
        }
        Err(e) => {
            DefaultErrorLogger.log_error(&e, &ErrorContext::new("create_city"));
            widgets::toast_only(ToastKind::Error, "Failed to add city", &e.user_message())
        }
    }
}

/// HTMX: Flip a city between Active and Inactive
pub async fn htmx_city_toggle(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let outcome = match state.backend.city(&id).await {
        Ok(city) => {
            let status = city.status.toggled();
            state
                .backend
                .set_city_status(&id, status)
                .await
                .map(|()| (city.name, status))
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok((name, status)) => {
            log::info!("City {} set to {}", id, status.as_str());
            let notice = widgets::toast(
                ToastKind::Success,
                "City updated",
                &format!("{} is now {}.", name, status.as_str()),
            );
            refreshed(&state, notice).await.into_response()
        }
        Err(e) => {
            DefaultErrorLogger.log_error(&e, &ErrorContext::new("toggle_city").with_record(id.as_str()));
            widgets::toast_only(ToastKind::Error, "Failed to update city", &e.user_message())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: &str, name: &str, status: CityStatus) -> City {
        City {
            id: id.to_string(),
            name: name.to_string(),
            status,
        }
    }

    #[test]
    fn test_toggle_labels_follow_status() {
        let html = render_cities_table(
            vec![city("1", "Pune", CityStatus::Active), city("2", "Delhi", CityStatus::Inactive)],
            "",
            1,
            10,
        );
        assert!(html.contains("hx-post='/cities/1/toggle'"));
        assert!(html.contains(">Disable</button>"));
        assert!(html.contains(">Enable</button>"));
    }

    #[test]
    fn test_empty_search() {
        let html = render_cities_table(vec![city("1", "Pune", CityStatus::Active)], "mumbai", 1, 10);
        assert!(html.contains("No cities found."));
    }
}
