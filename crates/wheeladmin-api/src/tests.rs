//! Router tests against an in-memory backend and a scripted model

use crate::{create_router, AppState};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use wheeladmin_config::{AuthConfig, Config};
use wheeladmin_core::anomaly::GenerativeModel;
use wheeladmin_core::models::{
    Category, CategoryDraft, City, CityDraft, CityStatus, DashboardSummary, DateRange, KycStatus,
    MonthlyOrderCount, Rental, Transaction, User, Wheelchair, WheelchairDraft,
};
use wheeladmin_core::{AdminBackend, AnomalyDetector, AnomalyError, CoreError, CoreResult};

#[derive(Default)]
struct FakeBackend {
    unreachable: bool,
    calls: Mutex<Vec<String>>,
    last_range: Mutex<Option<DateRange>>,
}

impl FakeBackend {
    fn record(&self, call: impl Into<String>) -> CoreResult<()> {
        self.calls.lock().unwrap().push(call.into());
        if self.unreachable {
            return Err(CoreError::BackendUnreachable {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

#[async_trait]
impl AdminBackend for FakeBackend {
    async fn users(&self) -> CoreResult<Vec<User>> {
        self.record("users")?;
        Ok(decode(json!([
            {"id": 1, "first_name": "Ana", "last_name": "Silva", "email": "ana@example.com",
             "account_status": "REGISTERED", "kyc_status": "ACCEPTED", "createdAt": "2024-01-05T10:00:00Z"},
            {"id": 2, "first_name": "Ravi", "last_name": "Kumar", "email": "ravi@example.com",
             "account_status": "BLOCKED", "kyc_status": "PENDING"}
        ])))
    }

    async fn update_kyc(&self, user_id: &str, status: &KycStatus) -> CoreResult<()> {
        self.record(format!("update_kyc {} {}", user_id, status))
    }

    async fn transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.record("transactions")?;
        Ok(decode(json!([
            {"id": 11, "transaction_id": "pay_A", "amount": "12.5", "payment_gateway": "Razorpay", "transaction_status": "Success"},
            {"id": 12, "transaction_id": "pay_B", "amount": "900", "payment_gateway": "Razorpay", "transaction_status": "Failed"}
        ])))
    }

    async fn rentals(&self, range: &DateRange) -> CoreResult<Vec<Rental>> {
        self.record("rentals")?;
        *self.last_range.lock().unwrap() = Some(*range);
        Ok(decode(json!([
            {"id": 1, "user_id": 1, "wheelchair": {"name": "Falcon X"}, "rent_start_date": "2024-03-01",
             "rent_end_date": "2024-03-04", "total_amount": "120", "order_status": "Completed"},
            {"id": 2, "user_id": 2, "wheelchair": {"name": "Eagle"}, "rent_start_date": "2024-04-15",
             "total_amount": "80", "order_status": "Ongoing"}
        ])))
    }

    async fn wheelchairs(&self) -> CoreResult<Vec<Wheelchair>> {
        self.record("wheelchairs")?;
        Ok(decode(json!([
            {"id": 5, "name": "Falcon X", "category_id": 1, "description": "Light", "information": "",
             "is_globally_available": true, "average_rating": "4.5", "total_reviews": 2,
             "category": {"id": 1, "name": "Manual"}, "images": []}
        ])))
    }

    async fn create_wheelchair(&self, draft: &WheelchairDraft) -> CoreResult<()> {
        self.record(format!("create_wheelchair {}", draft.name))
    }

    async fn update_wheelchair(&self, id: &str, _draft: &WheelchairDraft) -> CoreResult<()> {
        self.record(format!("update_wheelchair {}", id))
    }

    async fn delete_wheelchair(&self, id: &str) -> CoreResult<()> {
        self.record(format!("delete_wheelchair {}", id))
    }

    async fn categories(&self) -> CoreResult<Vec<Category>> {
        self.record("categories")?;
        Ok(decode(json!([{"id": 1, "name": "Manual", "description": ""}])))
    }

    async fn create_category(&self, draft: &CategoryDraft) -> CoreResult<()> {
        self.record(format!("create_category {}", draft.name))
    }

    async fn update_category(&self, id: &str, _draft: &CategoryDraft) -> CoreResult<()> {
        self.record(format!("update_category {}", id))
    }

    async fn delete_category(&self, id: &str) -> CoreResult<()> {
        self.record(format!("delete_category {}", id))
    }

    async fn cities(&self) -> CoreResult<Vec<City>> {
        self.record("cities")?;
        Ok(decode(json!([{"id": 1, "name": "Pune", "status": "Active"}])))
    }

    async fn create_city(&self, draft: &CityDraft) -> CoreResult<()> {
        self.record(format!("create_city {}", draft.name))
    }

    async fn set_city_status(&self, id: &str, status: CityStatus) -> CoreResult<()> {
        self.record(format!("set_city_status {} {}", id, status.as_str()))
    }

    async fn dashboard_summary(&self) -> CoreResult<DashboardSummary> {
        self.record("dashboard_summary")?;
        Ok(DashboardSummary {
            total_users: 2,
            ..DashboardSummary::default()
        })
    }

    async fn monthly_orders(&self) -> CoreResult<Vec<MonthlyOrderCount>> {
        self.record("monthly_orders")?;
        Ok(Vec::new())
    }
}

struct ScriptedModel {
    reply: Result<String, ()>,
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate_json(&self, _prompt: &str, _schema: &Value) -> Result<String, AnomalyError> {
        self.reply
            .clone()
            .map_err(|()| AnomalyError::Request("model offline".to_string()))
    }
}

const ANOMALOUS: &str = r#"{"isAnomalous": true, "explanation": "Amount far above the gateway average", "riskScore": 87}"#;

fn app_with(config: Config, backend: Arc<FakeBackend>, reply: Result<String, ()>) -> axum::Router {
    let detector = Arc::new(AnomalyDetector::new(Arc::new(ScriptedModel { reply })));
    create_router(AppState::new(config, backend, detector))
}

fn app(backend: Arc<FakeBackend>) -> axum::Router {
    app_with(Config::default(), backend, Ok(ANOMALOUS.to_string()))
}

async fn send(router: axum::Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = send(app(Arc::default()), get("/api/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_full_page_and_htmx_partial() {
    let full = body_text(send(app(Arc::default()), get("/users")).await).await;
    assert!(full.starts_with("<!DOCTYPE html>"));
    assert!(full.contains("User Management"));

    let partial = Request::builder()
        .uri("/users")
        .header("hx-request", "true")
        .body(Body::empty())
        .unwrap();
    let partial = body_text(send(app(Arc::default()), partial).await).await;
    assert!(!partial.contains("<!DOCTYPE html>"));
    assert!(partial.contains("<div id='modal'></div>"));
}

#[tokio::test]
async fn test_user_search() {
    let html = body_text(send(app(Arc::default()), get("/users/list?q=ana%20silva")).await).await;
    assert!(html.contains("ana@example.com"));
    assert!(!html.contains("ravi@example.com"));
}

#[tokio::test]
async fn test_backend_failure_renders_toast() {
    let backend = Arc::new(FakeBackend {
        unreachable: true,
        ..FakeBackend::default()
    });
    let response = send(app(backend), get("/wheelchairs/list")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Could not load wheelchairs."));
    assert!(html.contains("hx-swap-oob='true'"));
}

#[tokio::test]
async fn test_kyc_update_calls_backend() {
    let backend = Arc::new(FakeBackend::default());
    let response = send(app(backend.clone()), form("POST", "/users/2/kyc", "kyc_status=IN+PROCESS&q=&page=1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("KYC updated"));
    assert!(backend.calls().contains(&"update_kyc 2 IN PROCESS".to_string()));
}

#[tokio::test]
async fn test_kyc_update_rejects_unlisted_status() {
    let backend = Arc::new(FakeBackend::default());
    for body in ["kyc_status=&q=&page=1", "kyc_status=VIDEO_CALL&q=&page=1"] {
        let response = send(app(backend.clone()), form("POST", "/users/2/kyc", body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Choose one of the listed KYC statuses."));
    }
    assert!(!backend.calls().iter().any(|call| call.starts_with("update_kyc")));
}

#[tokio::test]
async fn test_huge_page_number_on_every_list() {
    for list in ["users", "wheelchairs", "rentals", "transactions", "categories", "cities"] {
        let uri = format!("/{}/list?page={}", list, usize::MAX);
        let response = send(app(Arc::default()), get(&uri)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert!(body_text(response).await.contains("Next ›"));
    }
}

#[tokio::test]
async fn test_users_export() {
    let response = send(app(Arc::default()), get("/users/export.csv")).await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"users.csv\""
    );
    let csv = body_text(response).await;
    assert!(csv.starts_with("ID,Name,Email,Status,KYC_Status,Registration_Date"));
}

#[tokio::test]
async fn test_rentals_export_honours_filters() {
    let backend = Arc::new(FakeBackend::default());
    let response = send(
        app(backend.clone()),
        get("/rentals/export.csv?start=2024-03-01&end=2024-03-31&q="),
    )
    .await;
    let csv = body_text(response).await;
    assert!(csv.contains("Falcon X"));
    assert!(!csv.contains("Eagle"));

    let range = backend.last_range.lock().unwrap().unwrap();
    assert!(range.start.is_some() && range.end.is_some());
}

#[tokio::test]
async fn test_wheelchair_validation_stays_in_modal() {
    let backend = Arc::new(FakeBackend::default());
    let response = send(app(backend.clone()), form("POST", "/wheelchairs", "name=&category_id=1&description=")).await;
    assert_eq!(response.headers()["HX-Retarget"], "#modal");
    let html = body_text(response).await;
    assert!(html.contains("Please fill in: name, description"));
    assert!(!backend.calls().iter().any(|c| c.starts_with("create_wheelchair")));
}

#[tokio::test]
async fn test_wheelchair_create_closes_modal() {
    let backend = Arc::new(FakeBackend::default());
    let response = send(
        app(backend.clone()),
        form("POST", "/wheelchairs", "name=Eagle&category_id=1&description=Sturdy"),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains("<div id='modal' hx-swap-oob='true'></div>"));
    assert!(html.contains("Wheelchair added"));
    assert!(backend.calls().contains(&"create_wheelchair Eagle".to_string()));
}

#[tokio::test]
async fn test_mutation_failure_only_toasts() {
    let backend = Arc::new(FakeBackend {
        unreachable: true,
        ..FakeBackend::default()
    });
    let request = Request::builder()
        .method("DELETE")
        .uri("/categories/1")
        .body(Body::empty())
        .unwrap();
    let response = send(app(backend), request).await;
    assert_eq!(response.headers()["HX-Reswap"], "none");
    assert!(body_text(response).await.contains("Failed to delete category"));
}

#[tokio::test]
async fn test_city_toggle_flips_status() {
    let backend = Arc::new(FakeBackend::default());
    let response = send(app(backend.clone()), form("POST", "/cities/1/toggle", "")).await;
    assert!(body_text(response).await.contains("Pune is now Inactive."));
    assert!(backend.calls().contains(&"set_city_status 1 Inactive".to_string()));
}

#[tokio::test]
async fn test_analysis_dialog_is_fresh() {
    let html = body_text(send(app(Arc::default()), get("/transactions/11/analyze")).await).await;
    assert!(html.contains("<div id='analysis-result'></div>"));
    assert!(!html.contains("Risk Score"));
}

#[tokio::test]
async fn test_analysis_run_shows_verdict() {
    let response = send(app(Arc::default()), form("POST", "/transactions/pay_B/analyze", "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Anomaly Detected!"));
    assert!(html.contains("87/100"));
}

#[tokio::test]
async fn test_analysis_failure_notice() {
    let router = app_with(Config::default(), Arc::default(), Ok("{\"isAnomalous\": \"yes\"}".to_string()));
    let html = body_text(send(router, form("POST", "/transactions/11/analyze", "")).await).await;
    assert!(html.contains("Anomaly Detection Failed"));
    assert!(html.contains("Could not analyze the transaction. Please try again."));
    assert!(!html.contains("Risk Score"));
}

#[tokio::test]
async fn test_analysis_unknown_transaction() {
    let response = send(app(Arc::default()), form("POST", "/transactions/nope/analyze", "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_anomaly() {
    let input = json!({
        "transactionData": "User: X, Wheelchair: Y, Amount: 12.50",
        "transactionVolume": 12.5,
        "userLocation": "London, UK",
        "historicalTransactionData": "3 rentals in the past year"
    });
    let request = |body: &Value| {
        Request::builder()
            .method("POST")
            .uri("/api/anomaly")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = send(app(Arc::default()), request(&input)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let output: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(output["isAnomalous"], true);
    assert_eq!(output["riskScore"], 87.0);

    let offline = app_with(Config::default(), Arc::default(), Err(()));
    let response = send(offline, request(&input)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(error["error"]["message"], "Could not analyze the transaction. Please try again.");
}

#[tokio::test]
async fn test_basic_auth() {
    let mut config = Config::default();
    config.server.auth = Some(AuthConfig {
        username: "admin".to_string(),
        password: "secret".to_string(),
    });

    let router = app_with(config.clone(), Arc::default(), Ok(ANOMALOUS.to_string()));
    let response = send(router, get("/api/health")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let router = app_with(config, Arc::default(), Ok(ANOMALOUS.to_string()));
    let request = Request::builder()
        .uri("/api/health")
        // admin:secret
        .header(header::AUTHORIZATION, "Basic YWRtaW46c2VjcmV0")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(router, request).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_settings_json_hides_password() {
    let mut config = Config::default();
    config.server.auth = Some(AuthConfig {
        username: "admin".to_string(),
        password: "secret".to_string(),
    });
    let router = app_with(config, Arc::default(), Ok(ANOMALOUS.to_string()));
    let request = Request::builder()
        .uri("/api/settings")
        .header(header::AUTHORIZATION, "Basic YWRtaW46c2VjcmV0")
        .body(Body::empty())
        .unwrap();
    let body = body_text(send(router, request).await).await;
    assert!(!body.contains("secret"));
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["server"]["auth"]["username"], "admin");
    assert!(value["model"]["api_key_set"].is_boolean());
}
