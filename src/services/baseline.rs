//! Baseline comparison.

use crate::domain::models::{BaselineEntry, BaselineVerdict, MetricDirection};

/// Classify a measurement against a baseline with a symmetric tolerance
/// band. Directionality is explicit per entry; the comparison never
/// assumes one direction universally.
pub fn classify(
    current: f64,
    baseline: f64,
    tolerance_pct: f64,
    direction: MetricDirection,
) -> BaselineVerdict {
    let lower = baseline * (1.0 - tolerance_pct);
    let upper = baseline * (1.0 + tolerance_pct);

    match direction {
        MetricDirection::HigherIsBetter => {
            if current < lower {
                BaselineVerdict::Degraded
            } else if current > upper {
                BaselineVerdict::Improved
            } else {
                BaselineVerdict::Stable
            }
        }
        MetricDirection::LowerIsBetter => {
            if current > upper {
                BaselineVerdict::Degraded
            } else if current < lower {
                BaselineVerdict::Improved
            } else {
                BaselineVerdict::Stable
            }
        }
    }
}

/// Classify against a registry entry.
pub fn classify_against(current: f64, entry: &BaselineEntry) -> BaselineVerdict {
    classify(
        current,
        entry.baseline_value,
        entry.tolerance_pct,
        entry.direction,
    )
}

/// How far past the tolerance band a degraded measurement sits, as a
/// multiple of the tolerance. Drives the HIGH-vs-MEDIUM performance
/// alert split (>2x tolerance escalates).
pub fn degradation_multiple(current: f64, entry: &BaselineEntry) -> f64 {
    if entry.baseline_value == 0.0 || entry.tolerance_pct == 0.0 {
        return 0.0;
    }
    let deviation = match entry.direction {
        MetricDirection::HigherIsBetter => (entry.baseline_value - current) / entry.baseline_value,
        MetricDirection::LowerIsBetter => (current - entry.baseline_value) / entry.baseline_value,
    };
    (deviation / entry.tolerance_pct).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_style_vectors() {
        // Higher is bad: 30% over a 10% band is degraded
        let dir = MetricDirection::LowerIsBetter;
        assert_eq!(classify(100.0, 100.0, 0.1, dir), BaselineVerdict::Stable);
        assert_eq!(classify(130.0, 100.0, 0.1, dir), BaselineVerdict::Degraded);
        assert_eq!(classify(95.0, 100.0, 0.1, dir), BaselineVerdict::Stable);
        assert_eq!(classify(80.0, 100.0, 0.1, dir), BaselineVerdict::Improved);
    }

    #[test]
    fn throughput_style_vectors() {
        let dir = MetricDirection::HigherIsBetter;
        assert_eq!(classify(100.0, 100.0, 0.1, dir), BaselineVerdict::Stable);
        assert_eq!(classify(85.0, 100.0, 0.1, dir), BaselineVerdict::Degraded);
        assert_eq!(classify(115.0, 100.0, 0.1, dir), BaselineVerdict::Improved);
    }

    #[test]
    fn degradation_multiple_scales_with_distance() {
        let entry = BaselineEntry::new(
            "perf",
            "avg_query_time_ms",
            100.0,
            0.1,
            MetricDirection::LowerIsBetter,
        );
        // 30% over baseline with 10% tolerance = 3x the band
        let multiple = degradation_multiple(130.0, &entry);
        assert!((multiple - 3.0).abs() < 1e-9);
        // Within band
        assert!(degradation_multiple(105.0, &entry) < 1.0);
    }
}
