//! Mock classifier for testing.
//!
//! Supports scripted outcome queues and input recording, so engine and
//! service tests can exercise every combiner branch without a trained model.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::classifier::RiskClassifier;
use crate::encoder::FEATURE_COUNT;
use crate::error::{EngineError, EngineResult};

/// One scripted classifier response.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    /// Return this probability distribution.
    Proba(Vec<f64>),
    /// Fail with a model error carrying this message.
    Fail(String),
}

/// Mock classifier with scripted outcomes and input recording.
pub struct MockClassifier {
    /// Outcomes consumed first, in FIFO order.
    scripted: Mutex<VecDeque<MockOutcome>>,
    /// Returned once the script is exhausted.
    default: MockOutcome,
    labels: Option<Vec<String>>,
    /// Every feature row passed to `predict_proba`.
    inputs: Mutex<Vec<Vec<f64>>>,
}

impl MockClassifier {
    /// Mock that returns `proba` on every call.
    pub fn always(proba: Vec<f64>) -> Self {
        Self::with_default(MockOutcome::Proba(proba))
    }

    /// Mock that fails on every call.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_default(MockOutcome::Fail(message.into()))
    }

    fn with_default(default: MockOutcome) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default,
            labels: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Expose native class labels.
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Queue an outcome after any already scripted.
    pub fn queue(&self, outcome: MockOutcome) {
        self.scripted.lock().unwrap().push_back(outcome);
    }

    /// Make the very next call fail.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.scripted
            .lock()
            .unwrap()
            .push_front(MockOutcome::Fail(message.into()));
    }

    /// Number of `predict_proba` calls so far.
    pub fn calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }

    /// Copies of every feature row received.
    pub fn inputs(&self) -> Vec<Vec<f64>> {
        self.inputs.lock().unwrap().clone()
    }
}

impl RiskClassifier for MockClassifier {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict_proba(&self, features: &[f64]) -> EngineResult<Vec<f64>> {
        self.inputs.lock().unwrap().push(features.to_vec());
        let outcome = self
            .scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        match outcome {
            MockOutcome::Proba(proba) => Ok(proba),
            MockOutcome::Fail(message) => Err(EngineError::Model(message)),
        }
    }

    fn class_labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_then_default() {
        let mock = MockClassifier::always(vec![1.0, 0.0]);
        mock.queue(MockOutcome::Proba(vec![0.0, 1.0]));

        assert_eq!(mock.predict(&[0.0; 6]).unwrap(), 1);
        assert_eq!(mock.predict(&[0.0; 6]).unwrap(), 0);
        assert_eq!(mock.calls(), 2);
    }

    #[test]
    fn fail_next_jumps_the_queue() {
        let mock = MockClassifier::always(vec![1.0]);
        mock.queue(MockOutcome::Proba(vec![0.5, 0.5]));
        mock.fail_next("boom");

        assert!(matches!(mock.predict_proba(&[1.0]), Err(EngineError::Model(m)) if m == "boom"));
        assert_eq!(mock.predict_proba(&[2.0]).unwrap(), vec![0.5, 0.5]);
        assert_eq!(mock.inputs(), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn failing_mock_always_errors() {
        let mock = MockClassifier::failing("no model");
        assert!(mock.predict_proba(&[0.0; 6]).is_err());
        assert!(mock.predict_proba(&[0.0; 6]).is_err());
    }
}
