//! Pluggable inference backend.
//!
//! The runtime only needs an output and an optional cost estimate; whether
//! the output is semantically right is outside what the proof attests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceOutput {
    pub output: Value,
    /// Engine-reported complexity, if it has one
    pub compute_units: Option<u64>,
}

#[async_trait]
pub trait InferenceEngine: Send + Sync {
    async fn execute(&self, task: &str, context: &Value) -> Result<InferenceOutput>;
}

/// Stand-in engine that echoes the task back with a fixed confidence.
#[derive(Debug, Clone)]
pub struct EchoEngine {
    reported_units: Option<u64>,
}

impl EchoEngine {
    pub fn new(reported_units: Option<u64>) -> Self {
        Self { reported_units }
    }
}

impl Default for EchoEngine {
    fn default() -> Self {
        Self::new(Some(100))
    }
}

#[async_trait]
impl InferenceEngine for EchoEngine {
    async fn execute(&self, task: &str, _context: &Value) -> Result<InferenceOutput> {
        Ok(InferenceOutput {
            output: json!({
                "response": format!("Processed: {task}"),
                "confidence": 0.95,
            }),
            compute_units: self.reported_units,
        })
    }
}

/// `elapsed / unit + reported`, with the default when nothing is reported.
pub fn estimate_compute(
    elapsed_ms: u64,
    compute_time_unit_ms: u64,
    reported_units: Option<u64>,
    default_complexity_units: u64,
) -> u64 {
    let time_units = elapsed_ms.checked_div(compute_time_unit_ms).unwrap_or(0);
    time_units.saturating_add(reported_units.unwrap_or(default_complexity_units))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_combines_time_and_complexity() {
        assert_eq!(estimate_compute(0, 100, Some(7), 100), 7);
        assert_eq!(estimate_compute(250, 100, Some(7), 100), 9);
        assert_eq!(estimate_compute(99, 100, None, 100), 100);
        assert_eq!(estimate_compute(1_000, 0, None, 3), 3);
        assert_eq!(estimate_compute(u64::MAX, 1, Some(1), 0), u64::MAX);
    }

    #[tokio::test]
    async fn echo_engine_reports_configured_units() {
        let engine = EchoEngine::new(Some(7));
        let out = engine.execute("summarize", &Value::Null).await.unwrap();
        assert_eq!(out.compute_units, Some(7));
        assert_eq!(out.output["response"], "Processed: summarize");
    }
}
