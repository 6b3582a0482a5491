// src/evaluator/text_metrics.rs — Structural and linguistic metric extraction

use crate::core::types::{clamp_ratio, clamp_score, Category, Metrics};

/// Raw statistics gathered in one pass over the text. Kept separate from
/// Metrics so scoring heuristics and counting stay independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub unique_words: usize,
    pub vocabulary_diversity: f64,
    pub avg_sentence_len: f64,
    pub hedging_markers: usize,
    pub certainty_markers: usize,
    pub structure_markers: usize,
    pub has_conclusion: bool,
    pub technical_term_density: f64,
    pub long_word_ratio: f64,
}

const HEDGING: &[&str] = &[
    "might", "maybe", "perhaps", "possibly", "could", "arguably", "unclear", "uncertain",
    "presumably", "likely",
];

const CERTAINTY: &[&str] = &[
    "definitely",
    "certainly",
    "clearly",
    "precisely",
    "specifically",
    "exactly",
    "demonstrably",
];

const CONCLUSION_MARKERS: &[&str] = &[
    "in conclusion",
    "in summary",
    "to summarize",
    "overall",
    "ultimately",
    "therefore",
    "in short",
];

fn domain_lexicon(category: Category) -> &'static [&'static str] {
    match category {
        Category::Medical => &[
            "diagnosis",
            "treatment",
            "symptom",
            "patient",
            "clinical",
            "dosage",
            "prognosis",
            "pathology",
            "etiology",
            "contraindication",
        ],
        Category::Legal => &[
            "statute",
            "liability",
            "precedent",
            "jurisdiction",
            "plaintiff",
            "defendant",
            "contract",
            "tort",
            "damages",
            "appeal",
        ],
        Category::Financial => &[
            "asset",
            "liquidity",
            "portfolio",
            "interest",
            "inflation",
            "equity",
            "dividend",
            "valuation",
            "yield",
            "arbitrage",
        ],
        Category::Scientific => &[
            "hypothesis",
            "experiment",
            "variable",
            "evidence",
            "measurement",
            "theory",
            "observation",
            "control",
            "replication",
            "correlation",
        ],
        Category::Engineering => &[
            "tolerance",
            "load",
            "stress",
            "design",
            "specification",
            "material",
            "failure",
            "efficiency",
            "system",
            "constraint",
        ],
        Category::General => &[],
    }
}

/// Extracts structural metrics from raw text. Stateless; lexicons are
/// static tables shared across calls.
pub struct TextMetricExtractor;

impl Default for TextMetricExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMetricExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Compute stats and heuristic sub-scores for a response. Empty or
    /// whitespace-only input yields zeroed metrics; the caller routes that
    /// through the edge-case path.
    pub fn extract(&self, text: &str, category: Category) -> (Metrics, TextStats) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return (Metrics::default(), TextStats::default());
        }

        let stats = self.collect_stats(trimmed, category);
        let metrics = self.score(&stats);
        (metrics, stats)
    }

    fn collect_stats(&self, text: &str, category: Category) -> TextStats {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .collect();
        let word_count = words.len();

        let mut unique: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
        unique.extend(words.iter().copied());
        let unique_words = unique.len();
        let vocabulary_diversity = if word_count == 0 {
            0.0
        } else {
            clamp_ratio(unique_words as f64 / word_count as f64)
        };

        let sentence_count = text
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count();
        let paragraph_count = text
            .split("\n\n")
            .filter(|p| !p.trim().is_empty())
            .count()
            .max(1);
        let avg_sentence_len = if sentence_count == 0 {
            0.0
        } else {
            word_count as f64 / sentence_count as f64
        };

        let hedging_markers = words.iter().filter(|w| HEDGING.contains(w)).count();
        let certainty_markers = words.iter().filter(|w| CERTAINTY.contains(w)).count();

        let structure_markers = text
            .lines()
            .filter(|line| {
                let t = line.trim_start();
                t.starts_with('#')
                    || t.starts_with("- ")
                    || t.starts_with("* ")
                    || t.chars().next().is_some_and(|c| c.is_ascii_digit()) && t.contains(". ")
                    || line.trim_end().ends_with(':')
            })
            .count();

        let has_conclusion = CONCLUSION_MARKERS.iter().any(|m| lower.contains(m));

        let lexicon = domain_lexicon(category);
        let technical_term_density = if word_count == 0 || lexicon.is_empty() {
            0.0
        } else {
            let hits = words.iter().filter(|w| lexicon.contains(w)).count();
            hits as f64 / word_count as f64
        };

        let long_word_ratio = if word_count == 0 {
            0.0
        } else {
            let long = words.iter().filter(|w| w.chars().count() > 8).count();
            long as f64 / word_count as f64
        };

        TextStats {
            word_count,
            sentence_count,
            paragraph_count,
            unique_words,
            vocabulary_diversity,
            avg_sentence_len,
            hedging_markers,
            certainty_markers,
            structure_markers,
            has_conclusion,
            technical_term_density,
            long_word_ratio,
        }
    }

    fn score(&self, stats: &TextStats) -> Metrics {
        let mut organization = 30.0;
        if stats.sentence_count >= 3 {
            organization += 15.0;
        }
        if stats.paragraph_count >= 2 {
            organization += 10.0;
        }
        if stats.structure_markers > 0 {
            organization += 15.0;
        }
        if stats.has_conclusion {
            organization += 15.0;
        }
        if (8.0..=30.0).contains(&stats.avg_sentence_len) {
            organization += 15.0;
        }

        let mut completeness = (stats.word_count as f64 / 100.0).min(1.0) * 40.0;
        if stats.sentence_count >= 2 {
            completeness += 20.0;
        }
        if stats.word_count >= 50 {
            completeness += 20.0;
        }
        if stats.has_conclusion {
            completeness += 20.0;
        }

        let technical_accuracy = 50.0 + (stats.technical_term_density * 200.0).min(30.0)
            + (stats.certainty_markers as f64 * 2.0).min(10.0)
            - (stats.hedging_markers as f64 * 2.0).min(15.0);

        let thoroughness = (stats.word_count as f64 / 150.0).min(1.0) * 60.0
            + stats.vocabulary_diversity * 40.0;

        let mut reliability = 50.0 + (stats.certainty_markers as f64 * 3.0).min(15.0)
            - (stats.hedging_markers as f64 * 3.0).min(20.0);
        if stats.vocabulary_diversity < 0.3 && stats.word_count > 20 {
            // Heavy repetition undermines trust in the content.
            reliability -= 25.0;
        }

        let scope_coverage = (stats.sentence_count as f64 / 8.0).min(1.0) * 60.0
            + (stats.paragraph_count as f64 / 3.0).min(1.0) * 40.0;

        let domain_appropriateness = if stats.technical_term_density > 0.0 {
            40.0 + (stats.technical_term_density * 300.0).min(60.0)
        } else {
            60.0 + stats.vocabulary_diversity * 20.0
        };

        Metrics {
            organization_quality: clamp_score(organization),
            technical_accuracy: clamp_score(technical_accuracy),
            completeness: clamp_score(completeness),
            thoroughness: clamp_score(thoroughness),
            reliability: clamp_score(reliability),
            scope_coverage: clamp_score(scope_coverage),
            domain_appropriateness: clamp_score(domain_appropriateness),
            overall_score: 0.0, // filled by the aggregator
            word_count: stats.word_count,
            vocabulary_diversity: stats.vocabulary_diversity,
        }
    }
}
