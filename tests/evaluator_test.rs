// tests/evaluator_test.rs — Integration test: full evaluation scenarios

use pretty_assertions::assert_eq;

use rubric::core::types::{Category, ReasoningType, ResponseClassification, TestDefinition};
use rubric::evaluator::ResponseEvaluator;
use rubric::infra::config::Config;

fn evaluator() -> ResponseEvaluator {
    ResponseEvaluator::new(Config::default())
}

const STRUCTURED_RESPONSE: &str = "# Water Supply Assessment\n\n\
    The reservoir network currently holds eighty-two percent of seasonal capacity, \
    which is six points above the ten-year average. Inflows from the northern \
    catchment remain strong because snowpack melted later than usual this year.\n\n\
    Treatment throughput is the main constraint. Plant two is offline for filter \
    replacement until September, so plant one carries the full load at ninety \
    percent utilization. Any unplanned outage would force restrictions within \
    seventy-two hours.\n\n\
    Demand is tracking two percent below forecast, helped by cool weather and the \
    ongoing leak-repair program, which has recovered an estimated four megaliters \
    per day across the oldest pressure zones.\n\n\
    In conclusion, supply is healthy but resilience is thin until plant two \
    returns. The recommended actions are to defer non-essential flushing, \
    pre-stage the mobile treatment unit, and review the restriction triggers \
    with the operations committee next week.";

#[test]
fn scenario_pure_loop_never_recovers() {
    // 10 repetitions of one sentence and nothing else.
    let text = "The user might want a report or analysis. ".repeat(10);
    let result = evaluator().evaluate(&text, "qwen2.5-7b", ReasoningType::General, Category::General);

    assert_eq!(
        result.classification,
        ResponseClassification::PureCognitiveFailure
    );
    assert!(result.metrics.overall_score <= 10.0);
    let failure = result.detailed_analysis.coherence_failure.as_ref().unwrap();
    assert!(failure.repeated_unit.contains("report or analysis"));
    let segment = result.detailed_analysis.final_segment.as_ref().unwrap();
    assert!(!segment.recovery_detected);
}

#[test]
fn scenario_loop_then_recovery() {
    // 12 repetitions of a phrase followed by a long, well-organized
    // analytical passage.
    let mut text = "Let me think about what the question is asking here. ".repeat(12);
    text.push_str(STRUCTURED_RESPONSE);
    let result = evaluator().evaluate(&text, "llama-3-8b", ReasoningType::General, Category::General);

    assert_eq!(
        result.classification,
        ResponseClassification::LoopWithRecovery
    );
    let score = result.metrics.overall_score;
    assert!(score > 15.0 && score <= 90.0, "score {score}");

    let segment = result.detailed_analysis.final_segment.as_ref().unwrap();
    assert!(segment.recovery_detected);
    assert!(segment.segment_quality >= 70.0);
}

#[test]
fn scenario_clean_structured_response() {
    let result = evaluator().evaluate(
        STRUCTURED_RESPONSE,
        "mistral-7b",
        ReasoningType::General,
        Category::General,
    );

    assert_eq!(result.classification, ResponseClassification::CleanResponse);
    assert!(
        result.metrics.overall_score > 70.0,
        "score {}",
        result.metrics.overall_score
    );
    assert!(result.detailed_analysis.coherence_failure.is_none());
    assert!(!result.detailed_analysis.saturation_detected);
}

#[test]
fn empty_response_routes_through_edge_case() {
    for text in ["", "   ", "\n\t\n"] {
        let result = evaluator().evaluate(text, "qwen2.5", ReasoningType::General, Category::General);
        assert!(result.metrics.overall_score <= 10.0);
        assert_eq!(result.detected_case.as_deref(), Some("empty_response"));
    }
}

#[test]
fn scores_stay_in_range_across_inputs() {
    let inputs = [
        "One word",
        "A plain short answer without structure.",
        STRUCTURED_RESPONSE,
        "repeat repeat repeat repeat repeat repeat repeat repeat repeat repeat",
    ];
    for text in inputs {
        let result = evaluator().evaluate(text, "gpt-4o", ReasoningType::General, Category::General);
        let score = result.metrics.overall_score;
        assert!((0.0..=100.0).contains(&score), "{text}: {score}");
    }
}

#[test]
fn char_and_token_entropy_differ() {
    let result = evaluator().evaluate(
        STRUCTURED_RESPONSE,
        "qwen2.5",
        ReasoningType::General,
        Category::General,
    );
    let analysis = &result.detailed_analysis;
    let token_entropy = analysis.token_entropy.expect("qwen resolves a tokenizer");
    assert!(analysis.char_entropy > 0.0);
    assert!(token_entropy > 0.0);
    assert!((analysis.char_entropy - token_entropy).abs() > 1e-9);
}

#[test]
fn unknown_model_degrades_to_char_analysis() {
    let result = evaluator().evaluate(
        STRUCTURED_RESPONSE,
        "completely-unknown-model",
        ReasoningType::General,
        Category::General,
    );
    assert!(result.detailed_analysis.token_entropy.is_none());
    assert!(result.detailed_analysis.char_entropy > 0.0);
    // Still a complete result.
    assert_eq!(result.classification, ResponseClassification::CleanResponse);
}

#[test]
fn evaluation_is_idempotent() {
    let e = evaluator();
    let a = e.evaluate(STRUCTURED_RESPONSE, "qwen2.5", ReasoningType::ChainOfThought, Category::General);
    let b = e.evaluate(STRUCTURED_RESPONSE, "qwen2.5", ReasoningType::ChainOfThought, Category::General);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn enhanced_mode_blends_pattern_tiers() {
    let definition = TestDefinition {
        id: "hydro-1".into(),
        name: Some("Water supply reasoning".into()),
        reasoning_type: Some("multi_hop".into()),
        expected_patterns: vec![
            "reservoir".into(),
            "treatment".into(),
            "restriction triggers".into(),
        ],
        ..Default::default()
    };

    let result = evaluator()
        .evaluate_enhanced(STRUCTURED_RESPONSE, "qwen2.5", &definition)
        .unwrap();

    let enhanced = result.enhanced_metrics.as_ref().unwrap();
    assert_eq!(enhanced.exact_match_score, 1.0);
    assert_eq!(result.test_name, "Water supply reasoning");

    let breakdown = result.detailed_analysis.scoring_breakdown.as_ref().unwrap();
    assert!(breakdown.contains_key("exact_match"));
    assert!(breakdown.contains_key("enhanced_score"));
}

#[test]
fn enhanced_mode_rejects_missing_id() {
    let definition = TestDefinition {
        name: Some("unnamed".into()),
        ..Default::default()
    };
    let err = evaluator()
        .evaluate_enhanced("text", "qwen2.5", &definition)
        .unwrap_err();
    assert!(err.is_caller_error());
    assert!(err.to_string().contains("id"));
}
