// src/evaluator/multi_tier.rs — Multi-tier pattern scoring
//
// Three tiers against a test's expected patterns: exact (verbatim),
// partial (fuzzy match against the best sentence), and semantic (lexical
// overlap proxy). Tiers blend under the test's scoring weights. Domain
// synthesis rewards responses that connect terminology from multiple
// listed domains, scored as the weakest link.

use std::collections::BTreeSet;

use crate::core::types::{clamp_ratio, CulturalContext, ScoringWeights, TestMetadata};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierScores {
    pub exact: f64,
    pub partial: f64,
    pub semantic: f64,
    /// Weighted blend of the three tiers, in [0, 1].
    pub blended: f64,
}

/// Score expected patterns against a response. Empty pattern lists score
/// a neutral 0.5 blend so a test without patterns neither rewards nor
/// punishes the enhanced path.
pub fn score_patterns(text: &str, patterns: &[String], weights: &ScoringWeights) -> TierScores {
    if patterns.is_empty() {
        return TierScores {
            exact: 0.0,
            partial: 0.0,
            semantic: 0.0,
            blended: 0.5,
        };
    }

    let lower = text.to_lowercase();
    let sentences: Vec<&str> = lower
        .split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let text_words = word_set(&lower);

    let mut exact_hits = 0usize;
    let mut partial_sum = 0.0;
    let mut semantic_sum = 0.0;

    for pattern in patterns {
        let p = pattern.to_lowercase();
        if lower.contains(&p) {
            exact_hits += 1;
            partial_sum += 1.0;
            semantic_sum += 1.0;
            continue;
        }

        let best_fuzzy = sentences
            .iter()
            .map(|s| strsim::jaro_winkler(&p, s))
            .fold(0.0_f64, f64::max);
        let overlap = word_overlap(&p, &text_words);
        partial_sum += best_fuzzy.max(overlap);
        semantic_sum += overlap;
    }

    let n = patterns.len() as f64;
    let exact = exact_hits as f64 / n;
    let partial = clamp_ratio(partial_sum / n);
    let semantic = clamp_ratio(semantic_sum / n);

    let weight_sum = weights.exact_match + weights.partial_match + weights.semantic_similarity;
    let blended = if weight_sum > 0.0 {
        (exact * weights.exact_match
            + partial * weights.partial_match
            + semantic * weights.semantic_similarity)
            / weight_sum
    } else {
        0.0
    };

    TierScores {
        exact,
        partial,
        semantic,
        blended: clamp_ratio(blended),
    }
}

/// Fraction of the pattern's content words present in the response.
fn word_overlap(pattern: &str, text_words: &BTreeSet<String>) -> f64 {
    let pattern_words: Vec<String> = pattern
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    if pattern_words.is_empty() {
        return 0.0;
    }
    let hits = pattern_words
        .iter()
        .filter(|w| text_words.contains(*w))
        .count();
    hits as f64 / pattern_words.len() as f64
}

fn word_set(lower: &str) -> BTreeSet<String> {
    lower
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Weakest-link coverage across the integrated domains. None when fewer
/// than two domains are listed — synthesis needs something to connect.
pub fn domain_synthesis(text: &str, metadata: &TestMetadata) -> Option<f64> {
    if metadata.domains_integrated.len() < 2 {
        return None;
    }
    let lower = text.to_lowercase();
    let text_words = word_set(&lower);

    let mut weakest = 1.0_f64;
    for domain in &metadata.domains_integrated {
        let coverage = word_overlap(&domain.to_lowercase(), &text_words);
        weakest = weakest.min(coverage);
    }
    Some(clamp_ratio(weakest))
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CulturalScores {
    pub depth: f64,
    pub tradition_accuracy: f64,
    pub sensitivity: f64,
}

/// Cultural-context scoring: depth is the fraction of listed traditions
/// the response engages, accuracy is fuzzy name matching, sensitivity
/// rises with breadth of engagement.
pub fn cultural_scores(text: &str, context: &CulturalContext) -> CulturalScores {
    if context.traditions.is_empty() {
        return CulturalScores::default();
    }
    let lower = text.to_lowercase();
    let text_words = word_set(&lower);

    let mut mentioned = 0usize;
    let mut accuracy_sum = 0.0;
    for tradition in &context.traditions {
        let t = tradition.to_lowercase();
        if lower.contains(&t) {
            mentioned += 1;
            accuracy_sum += 1.0;
        } else {
            accuracy_sum += word_overlap(&t, &text_words);
        }
    }

    let n = context.traditions.len() as f64;
    let depth = mentioned as f64 / n;
    CulturalScores {
        depth,
        tradition_accuracy: clamp_ratio(accuracy_sum / n),
        sensitivity: clamp_ratio(0.4 + 0.6 * depth),
    }
}

/// Lexical-novelty proxy for conceptual creativity, in [0, 1].
pub fn conceptual_creativity(vocabulary_diversity: f64, long_word_ratio: f64) -> f64 {
    clamp_ratio(0.6 * vocabulary_diversity + 0.4 * (long_word_ratio * 3.0).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_fraction() {
        let text = "The inradius equals area divided by semiperimeter. The circumradius \
                    follows from the law of sines.";
        let scores = score_patterns(
            text,
            &patterns(&["inradius", "circumradius", "euler line"]),
            &ScoringWeights::default(),
        );
        assert!((scores.exact - 2.0 / 3.0).abs() < 1e-9);
        assert!(scores.blended > 0.0 && scores.blended <= 1.0);
    }

    #[test]
    fn test_partial_matches_near_miss_phrasing() {
        let text = "We verify the computation by checking each intermediate result.";
        let scores = score_patterns(
            text,
            &patterns(&["verify the computations"]),
            &ScoringWeights::default(),
        );
        assert_eq!(scores.exact, 0.0);
        assert!(scores.partial > 0.6);
    }

    #[test]
    fn test_no_patterns_is_neutral() {
        let scores = score_patterns("anything", &[], &ScoringWeights::default());
        assert_eq!(scores.blended, 0.5);
    }

    #[test]
    fn test_zero_weights_blend_to_zero() {
        let weights = ScoringWeights {
            exact_match: 0.0,
            partial_match: 0.0,
            semantic_similarity: 0.0,
        };
        let scores = score_patterns("text", &patterns(&["text"]), &weights);
        assert_eq!(scores.blended, 0.0);
    }

    #[test]
    fn test_domain_synthesis_needs_two_domains() {
        let meta_one = TestMetadata {
            domains_integrated: vec!["economics".into()],
            ..Default::default()
        };
        assert!(domain_synthesis("economics everywhere", &meta_one).is_none());

        let meta_two = TestMetadata {
            domains_integrated: vec!["economics".into(), "ecology".into()],
            ..Default::default()
        };
        let covered = "Carbon pricing links economics and ecology through market incentives.";
        assert_eq!(domain_synthesis(covered, &meta_two), Some(1.0));

        let one_sided = "This response only discusses economics and markets.";
        assert_eq!(domain_synthesis(one_sided, &meta_two), Some(0.0));
    }

    #[test]
    fn test_cultural_scores() {
        let context = CulturalContext {
            traditions: vec!["Noh theatre".into(), "Kabuki".into()],
        };
        let text = "Kabuki staging emphasizes stylized movement and bold makeup.";
        let scores = cultural_scores(text, &context);
        assert!((scores.depth - 0.5).abs() < 1e-9);
        assert!(scores.tradition_accuracy >= 0.5);
        assert!((scores.sensitivity - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_creativity_in_range() {
        assert_eq!(conceptual_creativity(0.0, 0.0), 0.0);
        assert!(conceptual_creativity(1.0, 0.5) <= 1.0);
        assert!(conceptual_creativity(0.8, 0.2) > conceptual_creativity(0.3, 0.05));
    }
}
