//! Resource records as the rental backend returns them
//!
//! The backend owns these shapes. Only fields the console shows are decoded,
//! and optional fields fall back to serde defaults.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ==================== Field helpers ====================

/// Accept a JSON string or number and keep it as text. Ids and decimal
/// amounts come back either way depending on the endpoint.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn count_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Parse the date part of a backend timestamp (`YYYY-MM-DD...`)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Render a backend timestamp as `DD-MM-YYYY`, or `-` when absent
pub fn display_date(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() => match parse_date(raw) {
            Some(date) => date.format("%d-%m-%Y").to_string(),
            None => raw.to_string(),
        },
        _ => "-".to_string(),
    }
}

// ==================== Users ====================

/// KYC verification status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KycStatus {
    Pending,
    Uploaded,
    InProcess,
    Accepted,
    Rejected,
    Other(String),
}

impl KycStatus {
    /// Statuses an operator can pick from the KYC menu
    pub const CHOICES: [KycStatus; 5] = [
        KycStatus::Pending,
        KycStatus::Uploaded,
        KycStatus::InProcess,
        KycStatus::Accepted,
        KycStatus::Rejected,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            KycStatus::Pending => "PENDING",
            KycStatus::Uploaded => "UPLOADED",
            KycStatus::InProcess => "IN PROCESS",
            KycStatus::Accepted => "ACCEPTED",
            KycStatus::Rejected => "REJECTED",
            KycStatus::Other(raw) => raw,
        }
    }

    /// Label used in CSV exports
    pub fn export_label(&self) -> &'static str {
        match self {
            KycStatus::Accepted => "Verified",
            KycStatus::Rejected => "Rejected",
            _ => "Pending",
        }
    }
}

impl Default for KycStatus {
    fn default() -> Self {
        KycStatus::Pending
    }
}

impl From<String> for KycStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PENDING" => KycStatus::Pending,
            "UPLOADED" => KycStatus::Uploaded,
            "IN PROCESS" | "IN_PROCESS" => KycStatus::InProcess,
            "ACCEPTED" => KycStatus::Accepted,
            "REJECTED" => KycStatus::Rejected,
            _ => KycStatus::Other(raw),
        }
    }
}

impl From<KycStatus> for String {
    fn from(status: KycStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub account_status: String,
    #[serde(default)]
    pub kyc_status: KycStatus,
    #[serde(default)]
    pub kyc_document_url: Option<String>,
    #[serde(default)]
    pub kyc_document_type: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// `REGISTERED` accounts are active, everything else is not
    pub fn is_active(&self) -> bool {
        self.account_status == "REGISTERED"
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active() {
            "Active"
        } else {
            "Inactive"
        }
    }

    /// Registration date as `YYYY-MM-DD`
    pub fn registration_date(&self) -> String {
        self.created_at
            .as_deref()
            .and_then(parse_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn initials(&self) -> String {
        self.full_name().chars().take(2).collect::<String>().to_uppercase()
    }
}

// ==================== Wheelchairs ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wheelchair {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub category_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub information: String,
    #[serde(default)]
    pub is_globally_available: bool,
    #[serde(default, deserialize_with = "string_or_number")]
    pub average_rating: String,
    #[serde(default, deserialize_with = "count_from_any")]
    pub total_reviews: u64,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl Wheelchair {
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("N/A")
    }

    pub fn availability_label(&self) -> &'static str {
        if self.is_globally_available {
            "Available"
        } else {
            "Maintenance"
        }
    }

    /// Rating as `4.5 (12)`
    pub fn rating_label(&self) -> String {
        let rating = self.average_rating.trim().parse::<f64>().unwrap_or(0.0);
        format!("{:.1} ({})", rating, self.total_reviews)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

/// Fields an operator edits on the wheelchair form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WheelchairDraft {
    pub name: String,
    pub category_id: String,
    pub description: String,
    #[serde(default)]
    pub information: String,
    #[serde(default)]
    pub is_globally_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl WheelchairDraft {
    /// Prefill the form from an existing record
    pub fn from_wheelchair(w: &Wheelchair) -> Self {
        Self {
            name: w.name.clone(),
            category_id: w.category_id.clone(),
            description: w.description.clone(),
            information: w.information.clone(),
            is_globally_available: w.is_globally_available,
            model: w.model.clone(),
            manufacturer: w.manufacturer.clone(),
        }
    }

    /// Name, category and description are required
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.category_id.trim().is_empty() {
            missing.push("category");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        missing
    }
}

// ==================== Categories & cities ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityStatus {
    Active,
    Inactive,
}

impl Default for CityStatus {
    fn default() -> Self {
        CityStatus::Active
    }
}

impl CityStatus {
    pub fn toggled(self) -> Self {
        match self {
            CityStatus::Active => CityStatus::Inactive,
            CityStatus::Inactive => CityStatus::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CityStatus::Active => "Active",
            CityStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: CityStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CityDraft {
    pub name: String,
}

// ==================== Rentals & transactions ====================

/// Payment record attached to a rental or listed on its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(default)]
    pub payment_gateway: String,
    #[serde(default)]
    pub transaction_status: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_location: Option<String>,
    #[serde(default)]
    pub historical_summary: Option<String>,
}

impl Transaction {
    /// Parsed amount, zero when the backend sends something unparsable
    pub fn amount_value(&self) -> f64 {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Matches either the record id or the gateway transaction id
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || self.transaction_id == id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentalWheelchair {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default)]
    pub wheelchair: Option<RentalWheelchair>,
    #[serde(default)]
    pub rent_start_date: Option<String>,
    #[serde(default)]
    pub rent_end_date: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub total_amount: String,
    #[serde(default)]
    pub order_status: String,
    #[serde(default)]
    pub rent_transactions: Vec<Transaction>,
}

impl Rental {
    pub fn wheelchair_name(&self) -> &str {
        self.wheelchair
            .as_ref()
            .map(|w| w.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("-")
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.rent_start_date.as_deref().and_then(parse_date)
    }

    /// Transactions keyed by `transaction_id`. A repeated id keeps its first
    /// position and the last record seen for it.
    pub fn unique_transactions(&self) -> Vec<&Transaction> {
        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &Transaction> = HashMap::new();
        for txn in &self.rent_transactions {
            let key = txn.transaction_id.as_str();
            if latest.insert(key, txn).is_none() {
                order.push(key);
            }
        }
        order.into_iter().filter_map(|key| latest.get(key).copied()).collect()
    }
}

/// Inclusive date window applied to rental start dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Undated rentals only pass an unbounded range
    pub fn admits(&self, rental: &Rental) -> bool {
        match rental.start_date() {
            Some(date) => self.contains(&date),
            None => self.is_unbounded(),
        }
    }
}

// ==================== Dashboard ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalStatusCount {
    pub order_status: String,
    #[serde(deserialize_with = "count_from_any")]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStatusCount {
    pub transaction_status: String,
    #[serde(deserialize_with = "count_from_any")]
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "count_from_any")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "count_from_any")]
    pub active_users: u64,
    #[serde(default, deserialize_with = "count_from_any")]
    pub total_cities: u64,
    #[serde(default, deserialize_with = "count_from_any")]
    pub total_wheelchairs: u64,
    #[serde(default, deserialize_with = "count_from_any")]
    pub total_orders: u64,
    #[serde(default)]
    pub rent_orders_by_status: Vec<RentalStatusCount>,
    #[serde(default)]
    pub transactions_by_status: Vec<TransactionStatusCount>,
}

impl DashboardSummary {
    pub fn orders_with_status(&self, status: &str) -> u64 {
        self.rent_orders_by_status
            .iter()
            .filter(|s| s.order_status.eq_ignore_ascii_case(status))
            .map(|s| s.count)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyOrderCount {
    pub month: String,
    #[serde(deserialize_with = "count_from_any")]
    pub order_count: u64,
}

impl MonthlyOrderCount {
    /// `2025-06` becomes `Jun 25`
    pub fn month_label(&self) -> String {
        NaiveDate::parse_from_str(&format!("{}-01", self.month), "%Y-%m-%d")
            .map(|d| d.format("%b %y").to_string())
            .unwrap_or_else(|_| self.month.clone())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_decoding_and_labels() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "first_name": "Asha",
            "last_name": "Rao",
            "email": "asha@example.com",
            "account_status": "REGISTERED",
            "kyc_status": "IN PROCESS",
            "createdAt": "2024-03-05T10:15:00.000Z"
        }))
        .unwrap();

        assert_eq!(user.id, "7");
        assert_eq!(user.full_name(), "Asha Rao");
        assert_eq!(user.status_label(), "Active");
        assert_eq!(user.kyc_status, KycStatus::InProcess);
        assert_eq!(user.registration_date(), "2024-03-05");
        assert_eq!(user.initials(), "AS");
    }

    #[test]
    fn test_unknown_kyc_status_is_kept() {
        let status = KycStatus::from("ON HOLD".to_string());
        assert_eq!(status, KycStatus::Other("ON HOLD".to_string()));
        assert_eq!(status.as_str(), "ON HOLD");
        assert_eq!(status.export_label(), "Pending");
        assert_eq!(KycStatus::Accepted.export_label(), "Verified");
    }

    #[test]
    fn test_wheelchair_labels() {
        let chair: Wheelchair = serde_json::from_value(json!({
            "id": 3,
            "name": "Falcon",
            "category_id": 2,
            "is_globally_available": false,
            "average_rating": "4.26",
            "total_reviews": 8,
            "category": { "id": 2, "name": "Electric" }
        }))
        .unwrap();

        assert_eq!(chair.category_id, "2");
        assert_eq!(chair.category_name(), "Electric");
        assert_eq!(chair.availability_label(), "Maintenance");
        assert_eq!(chair.rating_label(), "4.3 (8)");
    }

    #[test]
    fn test_wheelchair_draft_required_fields() {
        let draft = WheelchairDraft {
            name: "Falcon".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.missing_fields(), vec!["category", "description"]);
    }

    #[test]
    fn test_city_status_toggle() {
        assert_eq!(CityStatus::Active.toggled(), CityStatus::Inactive);
        assert_eq!(CityStatus::Inactive.toggled(), CityStatus::Active);
        let city: City = serde_json::from_value(json!({ "id": 1, "name": "Pune" })).unwrap();
        assert_eq!(city.status, CityStatus::Active);
    }

    #[test]
    fn test_rental_unique_transactions() {
        let rental: Rental = serde_json::from_value(json!({
            "id": 11,
            "rent_transactions": [
                { "id": 1, "transaction_id": "T1", "transaction_status": "Pending" },
                { "id": 2, "transaction_id": "T2", "transaction_status": "Success" },
                { "id": 3, "transaction_id": "T1", "transaction_status": "Success" }
            ]
        }))
        .unwrap();

        let unique = rental.unique_transactions();
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].transaction_id, "T1");
        assert_eq!(unique[0].transaction_status, "Success");
        assert_eq!(unique[1].transaction_id, "T2");
        assert_eq!(rental.wheelchair_name(), "-");
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1);
        let end = NaiveDate::from_ymd_opt(2024, 1, 31);
        let range = DateRange::new(start, end);

        let mut rental: Rental = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert!(!range.admits(&rental));
        assert!(DateRange::default().admits(&rental));

        rental.rent_start_date = Some("2024-01-31T18:00:00Z".to_string());
        assert!(range.admits(&rental));
        rental.rent_start_date = Some("2024-02-01".to_string());
        assert!(!range.admits(&rental));
    }

    #[test]
    fn test_transaction_amount_value() {
        let txn: Transaction = serde_json::from_value(json!({ "id": "a", "amount": 12.5 })).unwrap();
        assert_eq!(txn.amount, "12.5");
        assert_eq!(txn.amount_value(), 12.5);

        let bad: Transaction = serde_json::from_value(json!({ "id": "b", "amount": "n/a" })).unwrap();
        assert_eq!(bad.amount_value(), 0.0);
    }

    #[test]
    fn test_dashboard_summary_counts() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "totalUsers": 10,
            "activeUsers": "4",
            "rentOrdersByStatus": [
                { "order_status": "Ongoing", "count": "3" },
                { "order_status": "Completed", "count": 5 }
            ]
        }))
        .unwrap();

        assert_eq!(summary.active_users, 4);
        assert_eq!(summary.orders_with_status("ongoing"), 3);
        assert_eq!(summary.orders_with_status("Cancelled"), 0);
    }

    #[test]
    fn test_month_label() {
        let month = MonthlyOrderCount {
            month: "2025-06".to_string(),
            order_count: 4,
        };
        assert_eq!(month.month_label(), "Jun 25");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(Some("2024-01-05T00:00:00Z")), "05-01-2024");
        assert_eq!(display_date(None), "-");
    }
}
