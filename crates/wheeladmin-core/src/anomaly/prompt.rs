//! Prompt template and reply schema for the anomaly check

use serde_json::{json, Value};

use super::AnomalyInput;

const TEMPLATE: &str = "You are an expert in fraud detection. Analyze the following transaction data and determine if it is anomalous.

Transaction Data: {transactionData}
Transaction Volume: {transactionVolume}
User Location: {userLocation}
Historical Transaction Data: {historicalTransactionData}

Based on this information, determine if the transaction is anomalous, provide an explanation, and assign a risk score (0-100). You must set the isAnomalous output field appropriately.";

/// Interpolate the input fields into the analyst prompt
pub fn render(input: &AnomalyInput) -> String {
    TEMPLATE
        .replace("{transactionData}", &input.transaction_data)
        .replace("{transactionVolume}", &input.transaction_volume.to_string())
        .replace("{userLocation}", &input.user_location)
        .replace("{historicalTransactionData}", &input.historical_transaction_data)
}

/// Declared shape of the model reply, sent as the response schema and used
/// to check the reply before decoding.
pub fn output_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isAnomalous": {
                "type": "BOOLEAN",
                "description": "Whether the transaction is anomalous or not."
            },
            "explanation": {
                "type": "STRING",
                "description": "Explanation of why the transaction is considered anomalous or not."
            },
            "riskScore": {
                "type": "NUMBER",
                "description": "A risk score between 0 and 100 indicating the likelihood of fraud."
            }
        },
        "required": ["isAnomalous", "explanation", "riskScore"]
    })
}
