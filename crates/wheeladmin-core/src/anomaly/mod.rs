//! Transaction anomaly detection
//!
//! A single model call turns an [`AnomalyInput`] into an [`AnomalyOutput`].
//! The model is asked for JSON matching [`prompt::output_schema`]; the reply
//! is checked against that schema before it is decoded. Every failure along
//! the way is an [`AnomalyError`] and callers treat them all alike.

pub mod model;
pub mod prompt;
pub mod session;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::models::Transaction;

pub use model::{GeminiModel, GenerativeModel, ModelRef};
pub use session::{AnalysisSession, AnalysisState, SessionError};

/// Message shown whenever an analysis fails, whatever the cause
pub const FAILURE_TITLE: &str = "Anomaly Detection Failed";
pub const FAILURE_MESSAGE: &str = "Could not analyze the transaction. Please try again.";

/// What the model is told about one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyInput {
    /// Description of the transaction
    pub transaction_data: String,
    /// Amount involved
    pub transaction_volume: f64,
    /// Where the user is
    pub user_location: String,
    /// Summary of the user's or gateway's past transactions
    pub historical_transaction_data: String,
}

impl AnomalyInput {
    /// Build the analysis input for `txn`, using `all` for the history
    /// summary when the backend did not supply one.
    pub fn from_transaction(txn: &Transaction, all: &[Transaction]) -> Self {
        let mut transaction_data = format!(
            "Transaction: {}, Gateway: {}, Status: {}, Amount: {:.2}",
            txn.transaction_id,
            txn.payment_gateway,
            txn.transaction_status,
            txn.amount_value()
        );
        if let Some(name) = txn.user_name.as_deref().filter(|n| !n.trim().is_empty()) {
            transaction_data = format!("User: {}, {}", name, transaction_data);
        }

        let user_location = txn
            .user_location
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let historical_transaction_data = txn
            .historical_summary
            .clone()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| gateway_history(txn, all));

        Self {
            transaction_data,
            transaction_volume: txn.amount_value(),
            user_location,
            historical_transaction_data,
        }
    }
}

/// Summarise the other transactions that went through the same gateway
fn gateway_history(txn: &Transaction, all: &[Transaction]) -> String {
    let others: Vec<&Transaction> = all
        .iter()
        .filter(|t| t.payment_gateway == txn.payment_gateway && !t.matches_id(&txn.id))
        .collect();

    if others.is_empty() {
        return format!("No other transactions through {}.", txn.payment_gateway);
    }

    let total: f64 = others.iter().map(|t| t.amount_value()).sum();
    let mut statuses: BTreeMap<&str, usize> = BTreeMap::new();
    for t in &others {
        *statuses.entry(t.transaction_status.as_str()).or_default() += 1;
    }
    let breakdown = statuses
        .iter()
        .map(|(status, n)| format!("{} {}", status, n))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} other transactions through {}, total {:.2}, average {:.2}; statuses: {}",
        others.len(),
        txn.payment_gateway,
        total,
        total / others.len() as f64,
        breakdown
    )
}

/// The model's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyOutput {
    pub is_anomalous: bool,
    pub explanation: String,
    /// Intended range 0-100, not enforced
    pub risk_score: f64,
}

#[derive(Error, Debug)]
pub enum AnomalyError {
    #[error("model API key is not configured")]
    MissingApiKey,

    #[error("model request failed: {0}")]
    Request(String),

    #[error("model returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("model returned no content")]
    EmptyResponse,

    #[error("model reply does not match the output schema: {0}")]
    Schema(String),
}

impl AnomalyError {
    /// Text for the operator. All failures read the same.
    pub fn user_message(&self) -> &'static str {
        FAILURE_MESSAGE
    }
}

/// Check `value` against a schema written with the model's type names
/// (`OBJECT`, `STRING`, `NUMBER`, `INTEGER`, `BOOLEAN`, `ARRAY`).
pub fn check_schema(value: &Value, schema: &Value, at: &str) -> Result<(), String> {
    let expected = schema
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_ascii_uppercase();

    let type_ok = match expected.as_str() {
        "OBJECT" => value.is_object(),
        "STRING" => value.is_string(),
        "NUMBER" => value.is_number(),
        "INTEGER" => value.is_i64() || value.is_u64(),
        "BOOLEAN" => value.is_boolean(),
        "ARRAY" => value.is_array(),
        _ => true,
    };
    if !type_ok {
        return Err(format!("{} should be {}", at, expected.to_lowercase()));
    }

    if let (Some(object), Some(properties)) = (value.as_object(), schema.get("properties")) {
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for key in required.iter().filter_map(Value::as_str) {
                if !object.contains_key(key) {
                    return Err(format!("{}.{} is missing", at, key));
                }
            }
        }
        if let Some(properties) = properties.as_object() {
            for (key, property) in properties {
                if let Some(field) = object.get(key) {
                    check_schema(field, property, &format!("{}.{}", at, key))?;
                }
            }
        }
    }

    if let (Some(items), Some(item_schema)) = (value.as_array(), schema.get("items")) {
        for (i, item) in items.iter().enumerate() {
            check_schema(item, item_schema, &format!("{}[{}]", at, i))?;
        }
    }

    Ok(())
}

/// Parse a model reply and check it against the output schema
pub fn validate_output(reply: &str) -> Result<AnomalyOutput, AnomalyError> {
    let text = strip_code_fence(reply);
    if text.is_empty() {
        return Err(AnomalyError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(text).map_err(|e| AnomalyError::Schema(e.to_string()))?;
    check_schema(&value, &prompt::output_schema(), "output").map_err(AnomalyError::Schema)?;
    serde_json::from_value(value).map_err(|e| AnomalyError::Schema(e.to_string()))
}

/// Models sometimes wrap JSON in a markdown fence even when asked not to
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

/// Runs the anomaly check against a generative model
pub struct AnomalyDetector {
    model: ModelRef,
}

impl AnomalyDetector {
    pub fn new(model: ModelRef) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// One model call. No retry, no caching.
    pub async fn detect(&self, input: &AnomalyInput) -> Result<AnomalyOutput, AnomalyError> {
        let prompt = prompt::render(input);
        let schema = prompt::output_schema();

        log::debug!("Requesting anomaly analysis from {}", self.model.name());
        let reply = self.model.generate_json(&prompt, &schema).await.map_err(|e| {
            log::warn!("Anomaly model call failed: {}", e);
            e
        })?;

        let output = validate_output(&reply).map_err(|e| {
            log::warn!("Anomaly model reply rejected: {}", e);
            e
        })?;

        log::info!(
            "Anomaly analysis finished: anomalous={} risk_score={}",
            output.is_anomalous,
            output.risk_score
        );
        Ok(output)
    }
}

/// Shared detector handle
pub type DetectorRef = Arc<AnomalyDetector>;

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate_json(&self, prompt: &str, _schema: &Value) -> Result<String, AnomalyError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(AnomalyError::Status {
                    status: *status,
                    message: "rejected".to_string(),
                }),
            }
        }
    }

    fn sample_input() -> AnomalyInput {
        AnomalyInput {
            transaction_data: "User: X, Wheelchair: Y, Amount: 12.50".to_string(),
            transaction_volume: 12.5,
            user_location: "London, UK".to_string(),
            historical_transaction_data: "2 prior rentals".to_string(),
        }
    }

    fn txn(value: Value) -> Transaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_input_wire_names() {
        let value = serde_json::to_value(sample_input()).unwrap();
        assert_eq!(value["transactionVolume"], json!(12.5));
        assert!(value.get("historicalTransactionData").is_some());
        assert!(value.get("userLocation").is_some());
    }

    #[test]
    fn test_validate_conforming_reply() {
        let output =
            validate_output(r#"{"isAnomalous": true, "explanation": "Large amount", "riskScore": 87}"#).unwrap();
        assert!(output.is_anomalous);
        assert_eq!(output.risk_score, 87.0);
    }

    #[test]
    fn test_validate_fenced_reply() {
        let reply = "```json\n{\"isAnomalous\": false, \"explanation\": \"ok\", \"riskScore\": 3.5}\n```";
        assert_eq!(validate_output(reply).unwrap().risk_score, 3.5);
    }

    #[test]
    fn test_validate_rejects_missing_field() {
        let err = validate_output(r#"{"isAnomalous": true, "explanation": "x"}"#).unwrap_err();
        assert!(matches!(err, AnomalyError::Schema(ref m) if m.contains("riskScore")));
    }

    #[test]
    fn test_validate_rejects_wrong_types() {
        let err = validate_output(r#"{"isAnomalous": "yes", "explanation": "x", "riskScore": 10}"#).unwrap_err();
        assert!(matches!(err, AnomalyError::Schema(ref m) if m.contains("isAnomalous")));

        let err = validate_output(r#"{"isAnomalous": true, "explanation": "x", "riskScore": "high"}"#).unwrap_err();
        assert!(matches!(err, AnomalyError::Schema(_)));
    }

    #[test]
    fn test_validate_rejects_non_json_and_empty() {
        assert!(matches!(validate_output("definitely not json"), Err(AnomalyError::Schema(_))));
        assert!(matches!(validate_output("   "), Err(AnomalyError::EmptyResponse)));
    }

    #[test]
    fn test_from_transaction_with_backend_context() {
        let record = txn(json!({
            "id": 1,
            "transaction_id": "pay_1",
            "amount": "12.5",
            "payment_gateway": "Razorpay",
            "transaction_status": "Success",
            "user_name": "Asha Rao",
            "user_location": "Pune, IN",
            "historical_summary": "First rental"
        }));

        let input = AnomalyInput::from_transaction(&record, &[]);
        assert_eq!(
            input.transaction_data,
            "User: Asha Rao, Transaction: pay_1, Gateway: Razorpay, Status: Success, Amount: 12.50"
        );
        assert_eq!(input.transaction_volume, 12.5);
        assert_eq!(input.user_location, "Pune, IN");
        assert_eq!(input.historical_transaction_data, "First rental");
    }

    #[test]
    fn test_from_transaction_computes_history() {
        let all = vec![
            txn(json!({ "id": 1, "transaction_id": "a", "amount": "100", "payment_gateway": "Stripe", "transaction_status": "Success" })),
            txn(json!({ "id": 2, "transaction_id": "b", "amount": "10", "payment_gateway": "Stripe", "transaction_status": "Success" })),
            txn(json!({ "id": 3, "transaction_id": "c", "amount": "30", "payment_gateway": "Stripe", "transaction_status": "Failed" })),
            txn(json!({ "id": 4, "transaction_id": "d", "amount": "999", "payment_gateway": "Razorpay", "transaction_status": "Success" })),
        ];

        let input = AnomalyInput::from_transaction(&all[0], &all);
        assert_eq!(input.user_location, "Unknown");
        assert_eq!(
            input.historical_transaction_data,
            "2 other transactions through Stripe, total 40.00, average 20.00; statuses: Failed 1, Success 1"
        );

        let lone = AnomalyInput::from_transaction(&all[3], &all);
        assert_eq!(lone.historical_transaction_data, "No other transactions through Razorpay.");
    }

    #[tokio::test]
    async fn test_detect_success() {
        let model = Arc::new(ScriptedModel::replying(
            r#"{"isAnomalous": false, "explanation": "Typical rental", "riskScore": 12}"#,
        ));
        let detector = AnomalyDetector::new(model.clone());

        let output = detector.detect(&sample_input()).await.unwrap();
        assert!(!output.is_anomalous);
        assert_eq!(output.explanation, "Typical rental");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("User Location: London, UK"));
    }

    #[tokio::test]
    async fn test_detect_model_error() {
        let detector = AnomalyDetector::new(Arc::new(ScriptedModel::failing(429)));
        let err = detector.detect(&sample_input()).await.unwrap_err();
        assert!(matches!(err, AnomalyError::Status { status: 429, .. }));
        assert_eq!(err.user_message(), FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_detect_nonconforming_reply() {
        let detector = AnomalyDetector::new(Arc::new(ScriptedModel::replying(r#"{"verdict": "fraud"}"#)));
        assert!(matches!(
            detector.detect(&sample_input()).await,
            Err(AnomalyError::Schema(_))
        ));
    }
}
