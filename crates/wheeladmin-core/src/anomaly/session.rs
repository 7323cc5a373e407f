//! Lifecycle of one open analysis dialog

use thiserror::Error;

use super::{AnomalyDetector, AnomalyError, AnomalyInput, AnomalyOutput};

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Idle,
    Loading,
    Shown(AnomalyOutput),
    Failed(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("an analysis is already running for transaction {0}")]
    AlreadyRunning(String),
}

/// One dialog, bound to one transaction. Opening the dialog for another
/// transaction means a new session, so results never carry over.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    transaction_id: String,
    state: AnalysisState,
}

impl AnalysisSession {
    pub fn open(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            state: AnalysisState::Idle,
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn result(&self) -> Option<&AnomalyOutput> {
        match &self.state {
            AnalysisState::Shown(output) => Some(output),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == AnalysisState::Loading
    }

    /// Drop any previous outcome and start a request
    pub fn begin(&mut self) -> Result<(), SessionError> {
        if self.is_loading() {
            return Err(SessionError::AlreadyRunning(self.transaction_id.clone()));
        }
        self.state = AnalysisState::Loading;
        Ok(())
    }

    /// Record the outcome of the running request. Ignored when the dialog was
    /// closed in the meantime.
    pub fn finish(&mut self, outcome: Result<AnomalyOutput, AnomalyError>) {
        if !self.is_loading() {
            log::debug!(
                "Discarding analysis outcome for closed dialog {}",
                self.transaction_id
            );
            return;
        }
        self.state = match outcome {
            Ok(output) => AnalysisState::Shown(output),
            Err(e) => AnalysisState::Failed(e.user_message().to_string()),
        };
    }

    pub fn close(&mut self) {
        self.state = AnalysisState::Idle;
    }

    /// `begin`, one detector call, `finish`
    pub async fn run(&mut self, detector: &AnomalyDetector, input: &AnomalyInput) -> Result<&AnalysisState, SessionError> {
        self.begin()?;
        let outcome = detector.detect(input).await;
        self.finish(outcome);
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::{GenerativeModel, FAILURE_MESSAGE};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    fn verdict(score: f64) -> AnomalyOutput {
        AnomalyOutput {
            is_anomalous: score > 50.0,
            explanation: format!("score {}", score),
            risk_score: score,
        }
    }

    #[test]
    fn test_begin_clears_previous_result() {
        let mut session = AnalysisSession::open("pay_1");
        session.begin().unwrap();
        session.finish(Ok(verdict(80.0)));
        assert_eq!(session.result(), Some(&verdict(80.0)));

        session.begin().unwrap();
        assert!(session.result().is_none());
        assert!(session.is_loading());
    }

    #[test]
    fn test_second_begin_while_loading_is_rejected() {
        let mut session = AnalysisSession::open("pay_1");
        session.begin().unwrap();
        assert_eq!(
            session.begin(),
            Err(SessionError::AlreadyRunning("pay_1".to_string()))
        );
    }

    #[test]
    fn test_failure_never_shows_a_result() {
        let mut session = AnalysisSession::open("pay_1");
        session.begin().unwrap();
        session.finish(Err(AnomalyError::EmptyResponse));
        assert!(session.result().is_none());
        assert_eq!(session.state(), &AnalysisState::Failed(FAILURE_MESSAGE.to_string()));
    }

    #[test]
    fn test_close_discards_in_flight_outcome() {
        let mut session = AnalysisSession::open("pay_1");
        session.begin().unwrap();
        session.close();
        session.finish(Ok(verdict(10.0)));
        assert_eq!(session.state(), &AnalysisState::Idle);
    }

    #[test]
    fn test_new_transaction_starts_clean() {
        let mut first = AnalysisSession::open("pay_1");
        first.begin().unwrap();
        first.finish(Ok(verdict(95.0)));

        let second = AnalysisSession::open("pay_2");
        assert_eq!(second.transaction_id(), "pay_2");
        assert_eq!(second.state(), &AnalysisState::Idle);
        assert!(second.result().is_none());
    }

    struct FixedModel(&'static str);

    #[async_trait]
    impl GenerativeModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate_json(&self, _prompt: &str, _schema: &Value) -> Result<String, AnomalyError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_run_shows_verdict() {
        let detector = AnomalyDetector::new(Arc::new(FixedModel(
            r#"{"isAnomalous": true, "explanation": "odd hour", "riskScore": 70}"#,
        )));
        let input = AnomalyInput {
            transaction_data: "Transaction: pay_1".to_string(),
            transaction_volume: 12.5,
            user_location: "London, UK".to_string(),
            historical_transaction_data: "none".to_string(),
        };

        let mut session = AnalysisSession::open("pay_1");
        let state = session.run(&detector, &input).await.unwrap().clone();
        match state {
            AnalysisState::Shown(output) => assert_eq!(output.risk_score, 70.0),
            other => panic!("unexpected state: {:?}", other),
        }
    }
}
