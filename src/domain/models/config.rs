//! Configuration tree.
//!
//! Loaded by `infrastructure::config::ConfigLoader` via figment
//! (defaults -> .vigil/config.yaml -> .vigil/local.yaml -> VIGIL_* env).
//! Suite policy constants are deliberately suite-local: their
//! divergence is per-domain tuning, not accidental drift.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub judge: JudgeConfig,
    pub orchestrator: OrchestratorConfig,
    pub retention: RetentionConfig,
    pub suites: SuitePolicies,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            judge: JudgeConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            retention: RetentionConfig::default(),
            suites: SuitePolicies::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: ".vigil/vigil.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error
    pub level: String,
    /// One of: json, pretty
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Whether log lines should be emitted as JSON objects.
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Base URL of the AI judgment service
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Bounded retry for transient judge failures
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Use the in-process static judge instead of the HTTP service
    pub offline: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8600".to_string(),
            api_key_env: "VIGIL_JUDGE_API_KEY".to_string(),
            timeout_secs: 30,
            max_retries: 1,
            initial_backoff_ms: 500,
            max_backoff_ms: 5_000,
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Worker bound when suites run in parallel
    pub max_concurrent_suites: usize,
    /// Per-suite wall clock budget; a timed-out suite becomes one ERROR result
    pub suite_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_suites: 4,
            suite_timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub test_results_days: i64,
    pub resolved_alerts_days: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            test_results_days: 90,
            resolved_alerts_days: 30,
        }
    }
}

/// Per-suite policy constants. Kept suite-local on purpose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuitePolicies {
    pub semantic: SemanticPolicy,
    pub predictive: PredictivePolicy,
    pub multimodal: MultimodalPolicy,
    pub realtime: RealtimePolicy,
    pub personalization: PersonalizationPolicy,
    pub fairness: FairnessPolicy,
    pub security: SecurityPolicy,
    pub integration: IntegrationPolicy,
    pub performance: PerformancePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticPolicy {
    pub sample_limit: usize,
    /// Accuracy at or above this passes
    pub pass_threshold: f64,
    /// Accuracy at or above this (but below pass) warns
    pub warn_threshold: f64,
}

impl Default for SemanticPolicy {
    fn default() -> Self {
        Self {
            sample_limit: 50,
            pass_threshold: 0.85,
            warn_threshold: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictivePolicy {
    pub sample_limit: usize,
    /// |stated confidence - judged rate| at or below this passes
    pub pass_calibration_error: f64,
    pub warn_calibration_error: f64,
}

impl Default for PredictivePolicy {
    fn default() -> Self {
        Self {
            sample_limit: 50,
            pass_calibration_error: 0.10,
            warn_calibration_error: 0.20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MultimodalPolicy {
    pub sample_limit: usize,
    pub pass_threshold: f64,
    pub warn_threshold: f64,
}

impl Default for MultimodalPolicy {
    fn default() -> Self {
        Self {
            sample_limit: 30,
            pass_threshold: 0.80,
            warn_threshold: 0.65,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimePolicy {
    pub min_sample: usize,
    pub p95_latency_threshold_ms: f64,
    /// Fraction of the window with no interactions that trips staleness
    pub staleness_warn_fraction: f64,
}

impl Default for RealtimePolicy {
    fn default() -> Self {
        Self {
            min_sample: 10,
            p95_latency_threshold_ms: 2_000.0,
            staleness_warn_fraction: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizationPolicy {
    pub min_segment_sample: usize,
    pub pass_relevance: f64,
    pub warn_relevance: f64,
}

impl Default for PersonalizationPolicy {
    fn default() -> Self {
        Self {
            min_segment_sample: 10,
            pass_relevance: 0.70,
            warn_relevance: 0.55,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessPolicy {
    /// Groups smaller than this are skipped, never asserted fair
    pub min_group_sample: usize,
    /// Parity delta above this is a warning-tier violation
    pub warn_threshold: f64,
    /// Parity delta above this is a failed-tier violation
    pub fail_threshold: f64,
}

impl Default for FairnessPolicy {
    fn default() -> Self {
        Self {
            min_group_sample: 25,
            warn_threshold: 0.10,
            fail_threshold: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityPolicy {
    pub sample_limit: usize,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self { sample_limit: 50 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationPolicy {
    /// Dangling-reference fraction at or below this passes
    pub pass_dangling_fraction: f64,
    pub warn_dangling_fraction: f64,
}

impl Default for IntegrationPolicy {
    fn default() -> Self {
        Self {
            pass_dangling_fraction: 0.0,
            warn_dangling_fraction: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformancePolicy {
    pub min_sample: usize,
}

impl Default for PerformancePolicy {
    fn default() -> Self {
        Self { min_sample: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_format_selects_json_output() {
        let mut logging = LoggingConfig::default();
        assert!(!logging.is_json());
        logging.format = "json".to_string();
        assert!(logging.is_json());
    }
}
