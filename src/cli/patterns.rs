// src/cli/patterns.rs — Cognitive profile from stored evaluations

use uuid::Uuid;

use crate::infra::config::Config;
use crate::memory::store::Store;
use crate::patterns::detector::CognitivePatternDetector;

pub fn run_patterns(
    model: &str,
    save: bool,
    json: bool,
    config: &Config,
    store: Option<&Store>,
) -> anyhow::Result<()> {
    let Some(store) = store else {
        anyhow::bail!("Database unavailable; nothing to analyze.");
    };

    let domain_scores = store.domain_scores(model)?;
    if domain_scores.is_empty() {
        println!("No stored evaluations with a cognitive domain for model '{model}'.");
        return Ok(());
    }

    let detector = CognitivePatternDetector::new(config.patterns.clone());
    let profile = detector.analyze(&domain_scores);

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("Cognitive profile for {model}");
        println!("Samples: {}", profile.sample_size);
        for (domain, mean) in &profile.domain_means {
            println!("  {domain:<14} mean {mean:.1}");
        }
        if !profile.strengths.is_empty() {
            println!("Strengths:  {}", profile.strengths.join(", "));
        }
        if !profile.weaknesses.is_empty() {
            println!("Weaknesses: {}", profile.weaknesses.join(", "));
        }
        if !profile.blind_spots.is_empty() {
            println!("Blind spots: {}", profile.blind_spots.join(", "));
        }
        for p in &profile.detected_patterns {
            println!(
                "  {} {} (confidence {:.2}, severity {:.1}, n={})",
                p.cognitive_domain,
                p.pattern_type.as_str(),
                p.confidence_score,
                p.severity,
                p.statistical_measures.sample_size,
            );
        }
    }

    if save {
        for pattern in &profile.detected_patterns {
            let id = Uuid::new_v4().to_string();
            store.insert_pattern(&id, model, pattern)?;
        }
        eprintln!("Saved {} pattern(s)", profile.detected_patterns.len());
    }

    Ok(())
}
