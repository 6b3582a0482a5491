// tests/store_test.rs — Integration test: SQLite round-trip

use std::collections::BTreeMap;

use rusqlite::Connection;

use rubric::core::types::{Category, ReasoningType};
use rubric::evaluator::ResponseEvaluator;
use rubric::infra::config::{Config, PatternsConfig};
use rubric::memory::schema;
use rubric::memory::store::Store;
use rubric::patterns::detector::{CognitivePatternDetector, ScoreRecord};

/// Create an in-memory SQLite store with schema applied.
fn test_store() -> Store {
    let conn = Connection::open_in_memory().unwrap();
    schema::run_migrations(&conn).unwrap();
    Store::new(conn)
}

fn sample_result(text: &str) -> rubric::core::types::EvaluationResult {
    let evaluator = ResponseEvaluator::new(Config::default());
    evaluator.evaluate(text, "qwen2.5", ReasoningType::General, Category::General)
}

#[test]
fn test_insert_and_query_evaluation() {
    let store = test_store();
    let result = sample_result(
        "Demand rose nine percent this quarter. Supply kept pace because two new \
         lines came online. In conclusion the market stayed balanced.",
    );

    store
        .insert_evaluation("e-1", "t-1", Some("financial"), Some("reasoning"), &result)
        .unwrap();

    let rows = store.query_evaluations_by_model("qwen2.5").unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.test_id, "t-1");
    assert_eq!(row.category.as_deref(), Some("financial"));
    assert_eq!(row.cognitive_domain.as_deref(), Some("reasoning"));
    assert_eq!(row.classification, "clean_response");

    // Full result survives the JSON round-trip.
    let restored: rubric::core::types::EvaluationResult =
        serde_json::from_str(&row.result_json).unwrap();
    assert_eq!(restored, result);
}

#[test]
fn test_domain_scores_grouping() {
    let store = test_store();
    let result = sample_result("A short but complete answer about the topic at hand.");

    for i in 0..5 {
        store
            .insert_evaluation(
                &format!("e-r-{i}"),
                &format!("t-r-{i}"),
                None,
                Some("reasoning"),
                &result,
            )
            .unwrap();
    }
    for i in 0..2 {
        store
            .insert_evaluation(
                &format!("e-c-{i}"),
                &format!("t-c-{i}"),
                None,
                Some("creativity"),
                &result,
            )
            .unwrap();
    }
    // Rows without a domain are excluded from the snapshot.
    store
        .insert_evaluation("e-none", "t-none", None, None, &result)
        .unwrap();

    let grouped = store.domain_scores("qwen2.5").unwrap();
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped["reasoning"].len(), 5);
    assert_eq!(grouped["creativity"].len(), 2);
}

#[test]
fn test_store_to_detector_pipeline() {
    let store = test_store();
    let mut input: BTreeMap<String, Vec<ScoreRecord>> = BTreeMap::new();
    input.insert(
        "reasoning".to_string(),
        (0..5)
            .map(|i| ScoreRecord {
                test_id: format!("t-{i}"),
                score: 85.0,
            })
            .collect(),
    );

    let detector = CognitivePatternDetector::new(PatternsConfig::default());
    let profile = detector.analyze(&input);
    assert_eq!(profile.detected_patterns.len(), 1);

    for pattern in &profile.detected_patterns {
        store.insert_pattern("p-1", "qwen2.5", pattern).unwrap();
    }

    let rows = store.query_patterns_by_model("qwen2.5").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cognitive_domain, "reasoning");
    assert_eq!(rows[0].pattern_type, "strength");
    assert_eq!(rows[0].sample_size, 5);
    assert!((rows[0].confidence - 1.0).abs() < 1e-9);
}

#[test]
fn test_result_json_floats_restore_bit_identically() {
    let result = sample_result(
        "Demand rose nine percent this quarter. Supply kept pace because two new \
         lines came online. In conclusion the market stayed balanced.",
    );

    let json = serde_json::to_string(&result).unwrap();
    let restored: rubric::core::types::EvaluationResult = serde_json::from_str(&json).unwrap();

    assert_eq!(
        restored.detailed_analysis.entropy_quality_ratio.to_bits(),
        result.detailed_analysis.entropy_quality_ratio.to_bits(),
    );
    assert_eq!(
        restored.detailed_analysis.char_entropy.to_bits(),
        result.detailed_analysis.char_entropy.to_bits(),
    );
}

#[test]
fn test_on_disk_database_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("rubric.db");

    {
        let conn = Connection::open(&db_path).unwrap();
        schema::run_migrations(&conn).unwrap();
        let store = Store::new(conn);
        let result = sample_result("Persisted across connections for later analysis runs.");
        store
            .insert_evaluation("e-disk", "t-disk", None, Some("knowledge"), &result)
            .unwrap();
    }

    // Reopen and verify the row survived.
    let conn = Connection::open(&db_path).unwrap();
    schema::run_migrations(&conn).unwrap();
    let store = Store::new(conn);
    let rows = store.query_evaluations_by_model("qwen2.5").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "e-disk");
}

#[test]
fn test_query_other_model_is_empty() {
    let store = test_store();
    let result = sample_result("Some response text that is perfectly ordinary.");
    store
        .insert_evaluation("e-1", "t-1", None, None, &result)
        .unwrap();

    assert!(store.query_evaluations_by_model("other-model").unwrap().is_empty());
    assert!(store.domain_scores("other-model").unwrap().is_empty());
}
