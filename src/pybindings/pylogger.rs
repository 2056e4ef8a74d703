use pyo3::prelude::*;
use serde_json::Value;

use crate::logging::TrialLogger;

/// Audit sink backed by any Python object with a `log(trial_id, key, value)` method
///
/// Values are passed as JSON text. Exceptions raised by the Python side are
/// reported through `tracing` and otherwise ignored.
pub struct PyTrialLogger {
    target: PyObject,
}

impl PyTrialLogger {
    pub fn new(target: PyObject) -> Self {
        Self { target }
    }
}

impl TrialLogger for PyTrialLogger {
    fn log(&self, trial_id: u64, key: &str, value: &Value) {
        Python::with_gil(|py| {
            if let Err(e) = self
                .target
                .call_method1(py, "log", (trial_id, key, value.to_string()))
            {
                tracing::warn!(error = %e, key, "python trial logger raised");
            }
        });
    }
}
