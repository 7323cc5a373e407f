//! REST client for the rental platform backend
//!
//! The console owns no data. Every list and mutation goes through
//! [`AdminBackend`], which handlers hold as a [`BackendRef`].

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wheeladmin_config::{BackendConfig, EndpointsConfig};

use crate::error::{CoreError, CoreResult};
use crate::models::{
    Category, CategoryDraft, City, CityDraft, CityStatus, DashboardSummary, DateRange, KycStatus,
    MonthlyOrderCount, Rental, Transaction, User, Wheelchair, WheelchairDraft,
};

/// Operations the console performs against the backend
#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn users(&self) -> CoreResult<Vec<User>>;
    async fn update_kyc(&self, user_id: &str, status: &KycStatus) -> CoreResult<()>;

    async fn transactions(&self) -> CoreResult<Vec<Transaction>>;

    /// Rentals, narrowed server-side by start date when a bound is given
    async fn rentals(&self, range: &DateRange) -> CoreResult<Vec<Rental>>;

    async fn wheelchairs(&self) -> CoreResult<Vec<Wheelchair>>;
    async fn create_wheelchair(&self, draft: &WheelchairDraft) -> CoreResult<()>;
    async fn update_wheelchair(&self, id: &str, draft: &WheelchairDraft) -> CoreResult<()>;
    async fn delete_wheelchair(&self, id: &str) -> CoreResult<()>;

    async fn categories(&self) -> CoreResult<Vec<Category>>;
    async fn create_category(&self, draft: &CategoryDraft) -> CoreResult<()>;
    async fn update_category(&self, id: &str, draft: &CategoryDraft) -> CoreResult<()>;
    async fn delete_category(&self, id: &str) -> CoreResult<()>;

    async fn cities(&self) -> CoreResult<Vec<City>>;
    async fn create_city(&self, draft: &CityDraft) -> CoreResult<()>;
    async fn set_city_status(&self, id: &str, status: CityStatus) -> CoreResult<()>;

    async fn dashboard_summary(&self) -> CoreResult<DashboardSummary>;
    async fn monthly_orders(&self) -> CoreResult<Vec<MonthlyOrderCount>>;

    // The backend has no single-record reads, so lookups scan the lists.

    async fn user(&self, id: &str) -> CoreResult<User> {
        self.users()
            .await?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| CoreError::not_found("User", id))
    }

    async fn transaction(&self, id: &str) -> CoreResult<Transaction> {
        self.transactions()
            .await?
            .into_iter()
            .find(|t| t.matches_id(id))
            .ok_or_else(|| CoreError::not_found("Transaction", id))
    }

    async fn rental(&self, id: &str) -> CoreResult<Rental> {
        self.rentals(&DateRange::default())
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CoreError::not_found("Rental", id))
    }

    async fn wheelchair(&self, id: &str) -> CoreResult<Wheelchair> {
        self.wheelchairs()
            .await?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| CoreError::not_found("Wheelchair", id))
    }

    async fn category(&self, id: &str) -> CoreResult<Category> {
        self.categories()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::not_found("Category", id))
    }

    async fn city(&self, id: &str) -> CoreResult<City> {
        self.cities()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::not_found("City", id))
    }
}

/// Backend reference type
pub type BackendRef = Arc<dyn AdminBackend>;

/// Unwrap the backend's response envelope.
///
/// `{"success": false, "message": ...}` is a rejection, `{"data": ...}` is
/// unwrapped, and anything else (a bare array, a bare object) is the payload.
pub fn unwrap_envelope(body: Value) -> CoreResult<Value> {
    match body {
        Value::Object(mut map) => {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request was not successful")
                    .to_string();
                return Err(CoreError::BackendRejected { message });
            }
            match map.remove("data") {
                Some(data) => Ok(data),
                None => Ok(Value::Object(map)),
            }
        }
        other => Ok(other),
    }
}

/// [`AdminBackend`] over HTTP with reqwest
#[derive(Clone)]
pub struct RestBackend {
    client: reqwest::Client,
    base_url: String,
    endpoints: EndpointsConfig,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::BackendUnreachable {
                message: format!("Failed to create backend client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> CoreResult<Value> {
        let response = request.send().await.map_err(|e| {
            log::warn!("Backend request for {} failed: {}", what, e);
            CoreError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            log::warn!("Backend returned {} for {}: {}", status, what, message);
            return Err(CoreError::BackendStatus {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| CoreError::InvalidResponse {
            message: format!("{}: {}", what, e),
        })?;
        unwrap_envelope(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)], what: &str) -> CoreResult<T> {
        log::debug!("GET {} ({})", path, what);
        let request = self.client.get(self.url(path)).query(query);
        let data = self.send(request, what).await?;
        serde_json::from_value(data).map_err(|e| CoreError::InvalidResponse {
            message: format!("{}: {}", what, e),
        })
    }

    async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        what: &str,
    ) -> CoreResult<()> {
        log::info!("{} {} ({})", method, path, what);
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, what).await.map(|_| ())
    }
}

#[async_trait]
impl AdminBackend for RestBackend {
    async fn users(&self) -> CoreResult<Vec<User>> {
        self.fetch(&self.endpoints.users, &[], "users").await
    }

    async fn update_kyc(&self, user_id: &str, status: &KycStatus) -> CoreResult<()> {
        let path = EndpointsConfig::with_id(&self.endpoints.update_kyc, user_id);
        let body = json!({ "kyc_status": status.as_str() });
        self.mutate(Method::PUT, &path, Some(&body), "update KYC status").await
    }

    async fn transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.fetch(&self.endpoints.transactions, &[], "transactions").await
    }

    async fn rentals(&self, range: &DateRange) -> CoreResult<Vec<Rental>> {
        let mut query = Vec::new();
        if let Some(start) = range.start {
            query.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = range.end {
            query.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        self.fetch(&self.endpoints.rentals, &query, "rentals").await
    }

    async fn wheelchairs(&self) -> CoreResult<Vec<Wheelchair>> {
        self.fetch(&self.endpoints.wheelchairs, &[], "wheelchairs").await
    }

    async fn create_wheelchair(&self, draft: &WheelchairDraft) -> CoreResult<()> {
        self.mutate(Method::POST, &self.endpoints.create_wheelchair, Some(draft), "create wheelchair")
            .await
    }

    async fn update_wheelchair(&self, id: &str, draft: &WheelchairDraft) -> CoreResult<()> {
        let path = EndpointsConfig::with_id(&self.endpoints.update_wheelchair, id);
        self.mutate(Method::PUT, &path, Some(draft), "update wheelchair").await
    }

    async fn delete_wheelchair(&self, id: &str) -> CoreResult<()> {
        let path = EndpointsConfig::with_id(&self.endpoints.delete_wheelchair, id);
        self.mutate::<Value>(Method::DELETE, &path, None, "delete wheelchair").await
    }

    async fn categories(&self) -> CoreResult<Vec<Category>> {
        self.fetch(&self.endpoints.categories, &[], "categories").await
    }

    async fn create_category(&self, draft: &CategoryDraft) -> CoreResult<()> {
        self.mutate(Method::POST, &self.endpoints.create_category, Some(draft), "create category")
            .await
    }

    async fn update_category(&self, id: &str, draft: &CategoryDraft) -> CoreResult<()> {
        let path = EndpointsConfig::with_id(&self.endpoints.update_category, id);
        self.mutate(Method::PUT, &path, Some(draft), "update category").await
    }

    async fn delete_category(&self, id: &str) -> CoreResult<()> {
        let path = EndpointsConfig::with_id(&self.endpoints.delete_category, id);
        self.mutate::<Value>(Method::DELETE, &path, None, "delete category").await
    }

    async fn cities(&self) -> CoreResult<Vec<City>> {
        self.fetch(&self.endpoints.cities, &[], "cities").await
    }

    async fn create_city(&self, draft: &CityDraft) -> CoreResult<()> {
        self.mutate(Method::POST, &self.endpoints.create_city, Some(draft), "create city")
            .await
    }

    async fn set_city_status(&self, id: &str, status: CityStatus) -> CoreResult<()> {
        let path = EndpointsConfig::with_id(&self.endpoints.update_city_status, id);
        let body = json!({ "status": status.as_str() });
        self.mutate(Method::PATCH, &path, Some(&body), "update city status").await
    }

    async fn dashboard_summary(&self) -> CoreResult<DashboardSummary> {
        self.fetch(&self.endpoints.dashboard_summary, &[], "dashboard summary").await
    }

    async fn monthly_orders(&self) -> CoreResult<Vec<MonthlyOrderCount>> {
        self.fetch(&self.endpoints.monthly_orders, &[], "monthly orders").await
    }
}

// ==================== Tests ====================
