// src/infra/config.rs — Configuration loading (TOML)
//
// Every heuristic threshold in the engine lives here with a documented
// default. The defaults are calibration artifacts tuned against past
// benchmark runs, not derived constants — override them in config.toml
// when recalibrating.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub loops: LoopConfig,

    #[serde(default)]
    pub saturation: SaturationConfig,

    #[serde(default)]
    pub patterns: PatternsConfig,
}

/// Score-aggregation thresholds and penalties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Responses below this word count are penalized proportionally.
    pub min_word_threshold: usize,
    /// Ceiling applied to responses classified as pure cognitive failure.
    pub failure_ceiling: f64,
    /// Score assigned to empty / whitespace-only responses.
    pub empty_response_score: f64,
    /// Scale of the efficiency penalty for loop-with-recovery responses
    /// (penalty = wasted_ratio * scale).
    pub efficiency_penalty_scale: f64,
    /// Lower and upper bounds of the loop-with-recovery score band.
    pub recovery_band_min: f64,
    pub recovery_band_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_word_threshold: 25,
            failure_ceiling: 10.0,
            empty_response_score: 5.0,
            efficiency_penalty_scale: 40.0,
            recovery_band_min: 20.0,
            recovery_band_max: 90.0,
        }
    }
}

/// Repetition-loop detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// A unit repeated this many times in a row is a loop.
    pub min_consecutive_repeats: usize,
    /// A unit repeated this many times anywhere is a loop.
    pub min_total_repeats: usize,
    /// Minimum word count of the final segment before recovery is considered.
    pub recovery_min_words: usize,
    /// Organization/completeness bar the final segment must clear for
    /// recovery.
    pub recovery_quality_bar: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            min_consecutive_repeats: 4,
            min_total_repeats: 10,
            recovery_min_words: 40,
            recovery_quality_bar: 70.0,
        }
    }
}

/// Context-window saturation simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaturationConfig {
    /// Trailing window size in tokens (characters in fallback mode).
    pub window_tokens: usize,
    /// Fraction of the window a repeated unit must occupy.
    pub saturation_threshold: f64,
    /// Candidate repeated-unit lengths, in tokens.
    pub min_unit_len: usize,
    pub max_unit_len: usize,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            window_tokens: 256,
            saturation_threshold: 0.5,
            min_unit_len: 3,
            max_unit_len: 12,
        }
    }
}

/// Cross-run cognitive pattern detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternsConfig {
    /// Minimum samples per domain before a pattern may be emitted.
    pub min_samples: usize,
    /// Mean score above which a domain is a strength.
    pub strength_threshold: f64,
    /// Mean score below which a domain is a weakness.
    pub weakness_threshold: f64,
    /// Std-deviation scale for confidence (confidence = 1 - std/scale).
    pub confidence_std_scale: f64,
    /// Domains expected to be covered; absent ones become blind spots.
    pub expected_domains: Vec<String>,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            strength_threshold: 75.0,
            weakness_threshold: 50.0,
            confidence_std_scale: 50.0,
            expected_domains: vec![
                "reasoning".into(),
                "creativity".into(),
                "language".into(),
                "social".into(),
                "integration".into(),
                "knowledge".into(),
            ],
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults if
    /// no config.toml exists.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        Ok(config)
    }
}
