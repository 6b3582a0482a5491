// src/cli/evaluate.rs — Evaluate a response and print or persist the result

use std::path::Path;

use uuid::Uuid;

use crate::core::types::{Category, EvaluationResult, ReasoningType, TestDefinition};
use crate::evaluator::ResponseEvaluator;
use crate::infra::config::Config;
use crate::memory::store::Store;

pub struct EvaluateArgs<'a> {
    pub text: &'a str,
    pub model: &'a str,
    pub reasoning: Option<&'a str>,
    pub category: Option<&'a str>,
    pub test_path: Option<&'a str>,
    pub json: bool,
    pub save: bool,
    pub domain: Option<&'a str>,
}

pub fn run_evaluate(
    args: &EvaluateArgs<'_>,
    config: &Config,
    store: Option<&Store>,
) -> anyhow::Result<()> {
    let evaluator = ResponseEvaluator::new(config.clone());

    let (result, test_id, category) = match args.test_path {
        Some(path) => {
            let definition = load_test_definition(Path::new(path))?;
            let result = evaluator.evaluate_enhanced(args.text, args.model, &definition)?;
            (result, definition.id.clone(), definition.category.clone())
        }
        None => {
            let reasoning = args
                .reasoning
                .map(ReasoningType::parse)
                .unwrap_or(ReasoningType::General);
            let category = args
                .category
                .map(Category::parse)
                .unwrap_or(Category::General);
            let result = evaluator.evaluate(args.text, args.model, reasoning, category);
            (result, "adhoc".to_string(), args.category.map(String::from))
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if args.save {
        match store {
            Some(store) => {
                let id = Uuid::new_v4().to_string();
                store.insert_evaluation(
                    &id,
                    &test_id,
                    category.as_deref(),
                    args.domain,
                    &result,
                )?;
                eprintln!("Saved evaluation {id}");
            }
            None => {
                tracing::warn!("--save requested but the database is unavailable");
            }
        }
    }

    Ok(())
}

fn load_test_definition(path: &Path) -> anyhow::Result<TestDefinition> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let definition: TestDefinition = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    Ok(definition)
}

fn print_summary(result: &EvaluationResult) {
    println!("Model:          {}", result.model);
    if !result.test_name.is_empty() {
        println!("Test:           {}", result.test_name);
    }
    println!("Classification: {}", result.classification);
    if let Some(case) = &result.detected_case {
        println!("Detected case:  {case}");
    }
    println!("Overall score:  {:.1}", result.metrics.overall_score);
    println!(
        "Words: {}  Diversity: {:.2}  Entropy ratio: {:.2}  Context health: {:.2}",
        result.metrics.word_count,
        result.metrics.vocabulary_diversity,
        result.detailed_analysis.entropy_quality_ratio,
        result.detailed_analysis.context_health_score,
    );

    if let Some(enhanced) = &result.enhanced_metrics {
        println!(
            "Tiers: exact {:.2}  partial {:.2}  semantic {:.2}",
            enhanced.exact_match_score,
            enhanced.partial_match_score,
            enhanced.semantic_similarity_score,
        );
    }

    if let Some(failure) = &result.detailed_analysis.coherence_failure {
        println!(
            "Failure: {:?} spanning bytes {}..{}",
            failure.failure_type, failure.loop_span.0, failure.loop_span.1
        );
    }

    for rec in &result.recommendations {
        println!("  - {rec}");
    }
}
