// src/patterns/detector.rs — Cognitive pattern detection from score history
//
// Operates offline over a batch snapshot of persisted per-test scores
// grouped by cognitive domain. Purely derived: identical input yields
// identical output, with BTreeMap grouping and in-order summation keeping
// floats stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::infra::config::PatternsConfig;

/// One historical score for a test in some domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub test_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Strength,
    Weakness,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Weakness => "weakness",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticalMeasures {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub sample_size: usize,
}

/// A domain-level strength or weakness, backed by the tests that showed
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub cognitive_domain: String,
    pub pattern_type: PatternType,
    /// In [0, 1]; tighter score spread means higher confidence.
    pub confidence_score: f64,
    pub evidence_tests: Vec<String>,
    pub statistical_measures: StatisticalMeasures,
    /// Distance of the mean from the triggering threshold, in score
    /// points.
    pub severity: f64,
}

/// Aggregated view of one model's performance across domains.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CognitiveProfile {
    pub domain_means: BTreeMap<String, f64>,
    pub detected_patterns: Vec<DetectedPattern>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Expected domains with no samples at all.
    pub blind_spots: Vec<String>,
    pub sample_size: usize,
}

pub struct CognitivePatternDetector {
    config: PatternsConfig,
}

impl CognitivePatternDetector {
    pub fn new(config: PatternsConfig) -> Self {
        Self { config }
    }

    /// Build a profile from domain-grouped score history. Domains below
    /// the minimum sample size are skipped, not errored.
    pub fn analyze(&self, domain_scores: &BTreeMap<String, Vec<ScoreRecord>>) -> CognitiveProfile {
        let mut profile = CognitiveProfile::default();

        for (domain, records) in domain_scores {
            profile.sample_size += records.len();
            if records.is_empty() {
                continue;
            }

            let stats = compute_stats(records);
            profile.domain_means.insert(domain.clone(), stats.mean);

            if records.len() < self.config.min_samples {
                tracing::debug!(
                    domain,
                    samples = records.len(),
                    "insufficient samples for pattern detection"
                );
                continue;
            }

            let pattern_type = if stats.mean > self.config.strength_threshold {
                Some(PatternType::Strength)
            } else if stats.mean < self.config.weakness_threshold {
                Some(PatternType::Weakness)
            } else {
                None
            };

            let Some(pattern_type) = pattern_type else {
                continue;
            };

            let severity = match pattern_type {
                PatternType::Strength => stats.mean - self.config.strength_threshold,
                PatternType::Weakness => self.config.weakness_threshold - stats.mean,
            };

            let pattern = DetectedPattern {
                cognitive_domain: domain.clone(),
                pattern_type,
                confidence_score: self.confidence(stats.std),
                evidence_tests: records.iter().map(|r| r.test_id.clone()).collect(),
                statistical_measures: stats,
                severity,
            };

            match pattern_type {
                PatternType::Strength => profile.strengths.push(domain.clone()),
                PatternType::Weakness => profile.weaknesses.push(domain.clone()),
            }
            profile.detected_patterns.push(pattern);
        }

        profile.blind_spots = self
            .config
            .expected_domains
            .iter()
            .filter(|d| {
                domain_scores
                    .get(*d)
                    .map(|records| records.is_empty())
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        profile
    }

    /// Confidence from score spread: zero deviation gives the maximum
    /// 1.0, a spread at or past the scale floors at 0.1.
    fn confidence(&self, std: f64) -> f64 {
        let scale = self.config.confidence_std_scale.max(f64::MIN_POSITIVE);
        (1.0 - std / scale).clamp(0.1, 1.0)
    }
}

/// Mean, population standard deviation, and extrema, summed in input
/// order for determinism.
fn compute_stats(records: &[ScoreRecord]) -> StatisticalMeasures {
    let n = records.len() as f64;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for r in records {
        sum += r.score;
        min = min.min(r.score);
        max = max.max(r.score);
    }
    let mean = sum / n;

    let mut var_sum = 0.0;
    for r in records {
        let d = r.score - mean;
        var_sum += d * d;
    }
    let std = (var_sum / n).sqrt();

    StatisticalMeasures {
        mean,
        std,
        min,
        max,
        sample_size: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(scores: &[f64]) -> Vec<ScoreRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| ScoreRecord {
                test_id: format!("t-{i}"),
                score: *s,
            })
            .collect()
    }

    fn detector() -> CognitivePatternDetector {
        CognitivePatternDetector::new(PatternsConfig::default())
    }

    #[test]
    fn test_four_samples_emit_no_pattern() {
        let mut input = BTreeMap::new();
        input.insert("reasoning".to_string(), records(&[90.0, 92.0, 88.0, 91.0]));
        let profile = detector().analyze(&input);
        assert!(profile.detected_patterns.is_empty());
        // The mean still appears in the profile.
        assert!(profile.domain_means.contains_key("reasoning"));
    }

    #[test]
    fn test_five_identical_scores_give_max_confidence() {
        let mut input = BTreeMap::new();
        input.insert("reasoning".to_string(), records(&[85.0; 5]));
        let profile = detector().analyze(&input);
        assert_eq!(profile.detected_patterns.len(), 1);
        let p = &profile.detected_patterns[0];
        assert_eq!(p.pattern_type, PatternType::Strength);
        assert_eq!(p.statistical_measures.std, 0.0);
        assert_eq!(p.confidence_score, 1.0);
        assert_eq!(p.evidence_tests.len(), 5);
    }

    #[test]
    fn test_weakness_detected_below_low_water_mark() {
        let mut input = BTreeMap::new();
        input.insert(
            "creativity".to_string(),
            records(&[30.0, 42.0, 35.0, 28.0, 40.0]),
        );
        let profile = detector().analyze(&input);
        assert_eq!(profile.weaknesses, vec!["creativity"]);
        assert!(profile.strengths.is_empty());
        let p = &profile.detected_patterns[0];
        assert_eq!(p.pattern_type, PatternType::Weakness);
        assert!(p.severity > 0.0);
        assert!(p.confidence_score < 1.0);
    }

    #[test]
    fn test_middling_mean_produces_no_pattern() {
        let mut input = BTreeMap::new();
        input.insert(
            "language".to_string(),
            records(&[60.0, 62.0, 58.0, 65.0, 61.0]),
        );
        let profile = detector().analyze(&input);
        assert!(profile.detected_patterns.is_empty());
        assert!(profile.strengths.is_empty());
        assert!(profile.weaknesses.is_empty());
    }

    #[test]
    fn test_blind_spots_are_expected_domains_without_samples() {
        let mut input = BTreeMap::new();
        input.insert("reasoning".to_string(), records(&[80.0; 5]));
        input.insert("social".to_string(), Vec::new());
        let profile = detector().analyze(&input);
        assert!(profile.blind_spots.contains(&"social".to_string()));
        assert!(profile.blind_spots.contains(&"creativity".to_string()));
        assert!(!profile.blind_spots.contains(&"reasoning".to_string()));
    }

    #[test]
    fn test_deterministic_on_identical_input() {
        let mut input = BTreeMap::new();
        input.insert(
            "knowledge".to_string(),
            records(&[81.3, 79.9, 88.2, 77.5, 90.1, 85.0]),
        );
        let a = detector().analyze(&input);
        let b = detector().analyze(&input);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_high_spread_floors_confidence() {
        let custom = CognitivePatternDetector::new(PatternsConfig {
            confidence_std_scale: 10.0,
            ..Default::default()
        });
        let mut input = BTreeMap::new();
        input.insert(
            "integration".to_string(),
            records(&[10.0, 45.0, 20.0, 48.0, 15.0]),
        );
        let profile = custom.analyze(&input);
        assert_eq!(profile.detected_patterns.len(), 1);
        assert_eq!(profile.detected_patterns[0].confidence_score, 0.1);
    }
}
