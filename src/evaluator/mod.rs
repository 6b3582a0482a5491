// src/evaluator/mod.rs — Response evaluation engine
//
// Orchestrates metric extraction, loop classification, entropy and
// saturation diagnostics, and score aggregation into one immutable
// EvaluationResult. Evaluation is synchronous and stateless per call;
// the only shared data are the config, static lexicons, and the
// tokenizer registry, all read-only after construction.

pub mod classifier;
pub mod multi_tier;
pub mod profiles;
pub mod text_metrics;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::analysis::entropy::EntropyReport;
use crate::analysis::saturation::{ContextSaturationAnalyzer, SaturationReport};
use crate::analysis::tokenizer::{CharTokenizer, TokenAdapter, TokenizerRegistry};
use crate::core::types::*;
use crate::infra::config::Config;
use crate::infra::errors::RubricError;

pub use classifier::{analyze_final_segment, classify_response, detect_coherence_failure};
pub use text_metrics::TextMetricExtractor;

pub struct ResponseEvaluator {
    config: Config,
    registry: Arc<TokenizerRegistry>,
    extractor: TextMetricExtractor,
}

impl ResponseEvaluator {
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, Arc::new(TokenizerRegistry::new()))
    }

    /// Construct with an injected tokenizer registry so tests can
    /// substitute deterministic fakes.
    pub fn with_registry(config: Config, registry: Arc<TokenizerRegistry>) -> Self {
        Self {
            config,
            registry,
            extractor: TextMetricExtractor::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate a raw response. Never fails for string input: every edge
    /// case routes to a complete result.
    pub fn evaluate(
        &self,
        text: &str,
        model: &str,
        reasoning_type: ReasoningType,
        category: Category,
    ) -> EvaluationResult {
        self.evaluate_inner(text, model, reasoning_type, category, None)
    }

    /// Enhanced evaluation against a test definition. The definition must
    /// carry a non-empty `id`; tier weights must be finite and in [0, 1].
    pub fn evaluate_enhanced(
        &self,
        text: &str,
        model: &str,
        definition: &TestDefinition,
    ) -> Result<EvaluationResult, RubricError> {
        validate_definition(definition)?;

        let reasoning = definition
            .reasoning_type
            .as_deref()
            .map(ReasoningType::parse)
            .unwrap_or(ReasoningType::General);
        let category = definition
            .category
            .as_deref()
            .map(Category::parse)
            .unwrap_or(Category::General);

        Ok(self.evaluate_inner(text, model, reasoning, category, Some(definition)))
    }

    /// Shannon entropy of a response under the model's tokenization.
    /// Falls back to character entropy when no tokenizer resolves or
    /// `use_tokens` is false.
    pub fn compute_entropy(&self, text: &str, model: &str, use_tokens: bool) -> f64 {
        let adapter = self.registry.resolve(model);
        crate::analysis::entropy::compute_entropy(text, adapter.as_deref(), use_tokens)
    }

    /// Context-saturation diagnostics for a response under the model's
    /// tokenization (characters when no tokenizer resolves).
    pub fn detect_saturation(&self, text: &str, model: &str) -> SaturationReport {
        let tokens = match self.registry.resolve(model) {
            Some(a) => a.tokenize(text),
            None => CharTokenizer.tokenize(text),
        };
        let analyzer =
            ContextSaturationAnalyzer::new(self.config.saturation.clone(), self.config.loops.clone());
        analyzer.analyze(&tokens)
    }

    fn evaluate_inner(
        &self,
        text: &str,
        model: &str,
        reasoning_type: ReasoningType,
        category: Category,
        definition: Option<&TestDefinition>,
    ) -> EvaluationResult {
        let test_name = definition
            .map(|d| d.display_name().to_string())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return self.empty_result(test_name, model, reasoning_type);
        }

        let (mut metrics, stats) = self.extractor.extract(text, category);

        // Coherence and recovery.
        let failure = detect_coherence_failure(text, &self.config.loops);
        let final_segment =
            analyze_final_segment(text, failure.as_ref(), &self.config.loops, category);
        let classification = classify_response(failure.as_ref(), &final_segment);

        // Information-theoretic diagnostics; character fallback when no
        // tokenizer resolves for the model.
        let adapter = self.registry.resolve(model);
        let entropy = EntropyReport::compute(text, adapter.as_deref());
        let tokens = match &adapter {
            Some(a) => a.tokenize(text),
            None => CharTokenizer.tokenize(text),
        };
        let analyzer =
            ContextSaturationAnalyzer::new(self.config.saturation.clone(), self.config.loops.clone());
        let saturation = analyzer.analyze(&tokens);

        // Multi-tier enhancement.
        let mut breakdown: Option<BTreeMap<String, f64>> = None;
        let mut enhanced_metrics = None;

        let profile = profiles::profile_for(reasoning_type);
        let base_score = profile.combine(&metrics) * profiles::marker_bonus(reasoning_type, text);
        let mut score = clamp_score(base_score);

        if let Some(def) = definition {
            let weights = def.scoring.unwrap_or_default();
            let tiers = multi_tier::score_patterns(text, &def.expected_patterns, &weights);
            let synthesis = multi_tier::domain_synthesis(text, &def.metadata);
            let cultural = def
                .cultural_context
                .as_ref()
                .map(|c| multi_tier::cultural_scores(text, c))
                .unwrap_or_default();
            let creativity =
                multi_tier::conceptual_creativity(stats.vocabulary_diversity, stats.long_word_ratio);

            enhanced_metrics = Some(EnhancedMetrics {
                exact_match_score: tiers.exact,
                partial_match_score: tiers.partial,
                semantic_similarity_score: tiers.semantic,
                domain_synthesis_score: synthesis.unwrap_or(0.0),
                cultural_depth_score: cultural.depth,
                tradition_accuracy_score: cultural.tradition_accuracy,
                cross_cultural_sensitivity: cultural.sensitivity,
                conceptual_creativity_score: creativity,
            });

            // Blend the structural score with pattern evidence.
            let enhanced_component = tiers.blended * 100.0;
            score = clamp_score(0.6 * score + 0.4 * enhanced_component);

            let mut map = BTreeMap::new();
            map.insert("base_score".into(), clamp_score(base_score));
            map.insert("exact_match".into(), tiers.exact);
            map.insert("partial_match".into(), tiers.partial);
            map.insert("semantic_similarity".into(), tiers.semantic);
            map.insert("pattern_blend".into(), tiers.blended);
            map.insert("enhanced_score".into(), score);
            if let Some(s) = synthesis {
                map.insert("domain_synthesis".into(), s);
            }
            breakdown = Some(map);
        }

        // Classification-dependent score path.
        score = match classification {
            ResponseClassification::CleanResponse => {
                // Proportional penalty below the word threshold; never
                // zeroed outright unless literally empty.
                let threshold = self.config.scoring.min_word_threshold;
                if stats.word_count < threshold && threshold > 0 {
                    score * stats.word_count as f64 / threshold as f64
                } else {
                    score
                }
            }
            ResponseClassification::LoopWithRecovery => {
                self.recovery_score(text, &failure, &final_segment, reasoning_type, category)
            }
            ResponseClassification::PureCognitiveFailure => {
                // Policy: incidental lexical quality never rescues a
                // response that stayed incoherent.
                score.min(self.config.scoring.failure_ceiling)
            }
        };

        metrics.overall_score = clamp_score(score);

        let recommendations = build_recommendations(
            classification,
            &metrics,
            entropy.entropy_quality_ratio,
            saturation.saturation_detected,
            enhanced_metrics.as_ref(),
        );

        EvaluationResult {
            test_name,
            model: model.to_string(),
            reasoning_type,
            metrics,
            enhanced_metrics,
            classification,
            detected_case: None,
            detailed_analysis: DetailedAnalysis {
                char_entropy: entropy.char_entropy,
                token_entropy: entropy.token_entropy,
                entropy_quality_ratio: entropy.entropy_quality_ratio,
                repetition_saturation: saturation.repetition_saturation,
                saturation_detected: saturation.saturation_detected,
                context_health_score: saturation.context_health_score,
                coherence_failure: failure,
                final_segment: Some(final_segment),
                scoring_breakdown: breakdown,
            },
            recommendations,
        }
    }

    /// Score a loop-with-recovery response from the final segment alone,
    /// minus an efficiency penalty for the wasted prefix. Bounded to the
    /// configured recovery band.
    fn recovery_score(
        &self,
        text: &str,
        failure: &Option<CoherenceFailure>,
        final_segment: &FinalSegmentAnalysis,
        reasoning_type: ReasoningType,
        category: Category,
    ) -> f64 {
        let (segment_metrics, _) = self.extractor.extract(&final_segment.segment_text, category);
        let profile = profiles::profile_for(reasoning_type);
        let segment_score = profile.combine(&segment_metrics);

        let wasted_ratio = match failure {
            Some(f) => {
                let loop_len = f.loop_span.1.saturating_sub(f.loop_span.0);
                if text.is_empty() {
                    0.0
                } else {
                    (loop_len as f64 / text.len() as f64).clamp(0.0, 1.0)
                }
            }
            None => 0.0,
        };
        let penalty = wasted_ratio * self.config.scoring.efficiency_penalty_scale;

        (segment_score - penalty).clamp(
            self.config.scoring.recovery_band_min,
            self.config.scoring.recovery_band_max,
        )
    }

    fn empty_result(
        &self,
        test_name: String,
        model: &str,
        reasoning_type: ReasoningType,
    ) -> EvaluationResult {
        let metrics = Metrics {
            overall_score: self.config.scoring.empty_response_score,
            ..Default::default()
        };

        EvaluationResult {
            test_name,
            model: model.to_string(),
            reasoning_type,
            metrics,
            enhanced_metrics: None,
            classification: ResponseClassification::CleanResponse,
            detected_case: Some("empty_response".to_string()),
            detailed_analysis: DetailedAnalysis::default(),
            recommendations: vec!["Response was empty; no content to evaluate.".to_string()],
        }
    }
}

fn validate_definition(def: &TestDefinition) -> Result<(), RubricError> {
    if def.id.trim().is_empty() {
        return Err(RubricError::InvalidInput(
            "test definition is missing required field `id`".into(),
        ));
    }
    if let Some(w) = &def.scoring {
        for (name, value) in [
            ("exact_match", w.exact_match),
            ("partial_match", w.partial_match),
            ("semantic_similarity", w.semantic_similarity),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(RubricError::InvalidInput(format!(
                    "scoring weight `{name}` must be a finite value in [0, 1], got {value}"
                )));
            }
        }
    }
    Ok(())
}

fn build_recommendations(
    classification: ResponseClassification,
    metrics: &Metrics,
    entropy_quality_ratio: f64,
    saturation_detected: bool,
    enhanced: Option<&EnhancedMetrics>,
) -> Vec<String> {
    let mut recs = Vec::new();

    match classification {
        ResponseClassification::PureCognitiveFailure => {
            recs.push(
                "Response degenerated into a repetition loop with no recovery; \
                 consider a repetition penalty or lower sampling temperature."
                    .to_string(),
            );
        }
        ResponseClassification::LoopWithRecovery => {
            recs.push(
                "Response recovered after a repetition loop; a large portion of the \
                 output was wasted before coherent content resumed."
                    .to_string(),
            );
        }
        ResponseClassification::CleanResponse => {}
    }

    if saturation_detected && classification == ResponseClassification::CleanResponse {
        recs.push("Trailing context shows heavy repetition despite coherent structure.".into());
    }
    if entropy_quality_ratio > 0.0 && entropy_quality_ratio < 0.3 {
        recs.push("Symbol distribution is close to collapsed; output variety is very low.".into());
    }
    if metrics.word_count > 0 && metrics.thoroughness < 40.0 {
        recs.push("Response is thin; expand coverage of the question's scope.".into());
    }
    if let Some(e) = enhanced {
        if e.exact_match_score < 0.5 {
            recs.push("Fewer than half of the expected patterns appear verbatim.".into());
        }
    }

    recs
}
