// src/core/types.rs — Core domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reasoning style a test expects. Determines which weight profile the
/// aggregator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningType {
    ChainOfThought,
    MultiHop,
    Verification,
    Mathematical,
    Backward,
    Scaffolded,
    General,
}

impl ReasoningType {
    /// Parse a free-form label. Unknown labels fall back to General so a
    /// typo in a test file degrades predictably instead of silently
    /// selecting a different profile.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "chain_of_thought" | "cot" => Self::ChainOfThought,
            "multi_hop" | "multihop" => Self::MultiHop,
            "verification" => Self::Verification,
            "mathematical" | "math" => Self::Mathematical,
            "backward" | "backward_reasoning" => Self::Backward,
            "scaffolded" => Self::Scaffolded,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "chain_of_thought",
            Self::MultiHop => "multi_hop",
            Self::Verification => "verification",
            Self::Mathematical => "mathematical",
            Self::Backward => "backward",
            Self::Scaffolded => "scaffolded",
            Self::General => "general",
        }
    }
}

/// Test category, keyed to a domain lexicon. Closed set with an explicit
/// General fallback — free-form category strings resolve here exactly once
/// at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Medical,
    Legal,
    Financial,
    Scientific,
    Engineering,
    General,
}

impl Category {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "medical" | "medicine" | "clinical" => Self::Medical,
            "legal" | "law" => Self::Legal,
            "financial" | "finance" | "economics" => Self::Financial,
            "scientific" | "science" => Self::Scientific,
            "engineering" => Self::Engineering,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Legal => "legal",
            Self::Financial => "financial",
            Self::Scientific => "scientific",
            Self::Engineering => "engineering",
            Self::General => "general",
        }
    }
}

/// Per-response quality metrics. All named scores are in [0, 100];
/// `vocabulary_diversity` is a ratio in [0, 1].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub organization_quality: f64,
    pub technical_accuracy: f64,
    pub completeness: f64,
    pub thoroughness: f64,
    pub reliability: f64,
    pub scope_coverage: f64,
    pub domain_appropriateness: f64,
    pub overall_score: f64,
    pub word_count: usize,
    pub vocabulary_diversity: f64,
}

/// Multi-tier scores added in enhanced mode. All in [0, 1].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnhancedMetrics {
    pub exact_match_score: f64,
    pub partial_match_score: f64,
    pub semantic_similarity_score: f64,
    pub domain_synthesis_score: f64,
    pub cultural_depth_score: f64,
    pub tradition_accuracy_score: f64,
    pub cross_cultural_sensitivity: f64,
    pub conceptual_creativity_score: f64,
}

/// Kind of coherence failure found in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    RepetitiveLoop,
    IncompleteResponse,
}

/// A detected coherence failure. Present only when the response
/// degenerated; `loop_span` is the half-open character range covered by
/// the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceFailure {
    pub failure_type: FailureType,
    pub loop_span: (usize, usize),
    pub repeated_unit: String,
}

/// Quality analysis of the text after the last detected loop boundary
/// (the whole response when no loop was found).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSegmentAnalysis {
    pub recovery_detected: bool,
    pub segment_text: String,
    pub segment_quality: f64,
}

impl FinalSegmentAnalysis {
    pub fn none() -> Self {
        Self {
            recovery_detected: false,
            segment_text: String::new(),
            segment_quality: 0.0,
        }
    }
}

/// Three-way response classification. Derived, never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseClassification {
    CleanResponse,
    LoopWithRecovery,
    PureCognitiveFailure,
}

impl ResponseClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CleanResponse => "clean_response",
            Self::LoopWithRecovery => "loop_with_recovery",
            Self::PureCognitiveFailure => "pure_cognitive_failure",
        }
    }
}

impl std::fmt::Display for ResponseClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Information-theoretic and saturation diagnostics attached to a result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub char_entropy: f64,
    pub token_entropy: Option<f64>,
    pub entropy_quality_ratio: f64,
    pub repetition_saturation: f64,
    pub saturation_detected: bool,
    pub context_health_score: f64,
    pub coherence_failure: Option<CoherenceFailure>,
    pub final_segment: Option<FinalSegmentAnalysis>,
    /// Transparency breakdown for enhanced scoring. BTreeMap so
    /// serialization order is stable.
    pub scoring_breakdown: Option<BTreeMap<String, f64>>,
}

/// The unit returned to callers. Immutable once produced; deliberately
/// carries no timestamp so identical inputs serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub test_name: String,
    pub model: String,
    pub reasoning_type: ReasoningType,
    pub metrics: Metrics,
    pub enhanced_metrics: Option<EnhancedMetrics>,
    pub classification: ResponseClassification,
    /// Set on edge-case paths, e.g. "empty_response".
    pub detected_case: Option<String>,
    pub detailed_analysis: DetailedAnalysis,
    pub recommendations: Vec<String>,
}

/// Test definition as loaded from a suite file. Unknown keys are ignored;
/// every key except `id` is optional with defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestDefinition {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub reasoning_type: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
    #[serde(default)]
    pub expected_patterns: Vec<String>,
    pub scoring: Option<ScoringWeights>,
    #[serde(default)]
    pub metadata: TestMetadata,
    pub cultural_context: Option<CulturalContext>,
}

impl TestDefinition {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Tier weights from a test definition's `scoring` block. Each in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_exact_weight")]
    pub exact_match: f64,
    #[serde(default = "default_partial_weight")]
    pub partial_match: f64,
    #[serde(default = "default_semantic_weight")]
    pub semantic_similarity: f64,
}

fn default_exact_weight() -> f64 {
    1.0
}
fn default_partial_weight() -> f64 {
    0.6
}
fn default_semantic_weight() -> f64 {
    0.4
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_match: 1.0,
            partial_match: 0.6,
            semantic_similarity: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestMetadata {
    #[serde(default)]
    pub domains_integrated: Vec<String>,
    #[serde(default)]
    pub concepts_tested: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CulturalContext {
    #[serde(default)]
    pub traditions: Vec<String>,
}

/// Clamp a score into [0, 100].
pub fn clamp_score(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Clamp a ratio into [0, 1].
pub fn clamp_ratio(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
