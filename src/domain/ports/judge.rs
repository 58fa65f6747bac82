//! Port trait for the AI judgment service.
//!
//! The single narrow seam through which any check requiring natural
//! language understanding (accuracy judgment, bias detection, PII
//! detection, narrative summaries) leaves the system. Adapters treat it
//! as a black box returning a bool/score/text and nothing else; no
//! retry logic lives in the adapters. Substituting a stub judge keeps
//! the suites pure and testable.

use async_trait::async_trait;

use crate::domain::ports::errors::JudgeError;

#[async_trait]
pub trait Judge: Send + Sync {
    /// Free-text generation (narrative summaries, remediation text)
    async fn generate_text(&self, prompt: &str) -> Result<String, JudgeError>;

    /// Yes/no judgment over a context
    async fn generate_bool(&self, context: &str, question: &str) -> Result<bool, JudgeError>;

    /// Numeric judgment over a context, semantics defined by the caller
    async fn generate_score(&self, context: &str, question: &str) -> Result<f64, JudgeError>;
}

/// Deterministic in-process judge for tests and `--offline` runs.
#[derive(Debug, Clone)]
pub struct StaticJudge {
    pub text: String,
    pub verdict: bool,
    pub score: f64,
}

impl Default for StaticJudge {
    fn default() -> Self {
        Self {
            text: "All suites within expected thresholds.".to_string(),
            verdict: true,
            score: 0.9,
        }
    }
}

#[async_trait]
impl Judge for StaticJudge {
    async fn generate_text(&self, _prompt: &str) -> Result<String, JudgeError> {
        Ok(self.text.clone())
    }

    async fn generate_bool(&self, _context: &str, _question: &str) -> Result<bool, JudgeError> {
        Ok(self.verdict)
    }

    async fn generate_score(&self, _context: &str, _question: &str) -> Result<f64, JudgeError> {
        Ok(self.score)
    }
}
