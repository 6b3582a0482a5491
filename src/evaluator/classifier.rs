// src/evaluator/classifier.rs — Degenerate-generation classification
//
// Detects repetitive-loop degeneration at the sentence level, analyzes
// the text after the last loop boundary for recovery, and maps the pair
// to one of three classifications. Only a repetitive loop can route to a
// loop category; other failure kinds classify as clean.

use std::collections::BTreeMap;

use crate::core::types::{
    Category, CoherenceFailure, FailureType, FinalSegmentAnalysis, ResponseClassification,
};
use crate::evaluator::text_metrics::TextMetricExtractor;
use crate::infra::config::LoopConfig;

/// Minimum words a sentence needs before its repetition counts as a loop.
/// Short acknowledgements ("Yes.") repeat legitimately.
const MIN_UNIT_WORDS: usize = 3;

/// A sentence with its character span in the original text.
#[derive(Debug, Clone)]
struct Sentence {
    start: usize,
    end: usize,
    normalized: String,
    word_count: usize,
}

fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let bytes_len = text.len();

    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?' | '\n') {
            let end = idx + ch.len_utf8();
            push_sentence(text, start, end, &mut sentences);
            start = end;
        }
    }
    push_sentence(text, start, bytes_len, &mut sentences);
    sentences
}

fn push_sentence(text: &str, start: usize, end: usize, out: &mut Vec<Sentence>) {
    let raw = &text[start..end];
    let normalized = raw
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string();
    if normalized.is_empty() {
        return;
    }
    let word_count = normalized.split_whitespace().count();
    out.push(Sentence {
        start,
        end,
        normalized,
        word_count,
    });
}

/// Detect a repetitive loop, or a truncated tail. Returns None for
/// coherent text.
pub fn detect_coherence_failure(text: &str, config: &LoopConfig) -> Option<CoherenceFailure> {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return None;
    }

    // Total occurrences per normalized sentence, and the best consecutive
    // run. BTreeMap keeps iteration deterministic.
    let mut totals: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    let mut best_run: Option<(usize, usize, usize)> = None; // (len, first_idx, last_idx)

    let mut run_start = 0usize;
    for i in 0..sentences.len() {
        let s = &sentences[i];
        if s.word_count >= MIN_UNIT_WORDS {
            let entry = totals.entry(&s.normalized).or_insert((0, i, i));
            entry.0 += 1;
            entry.2 = i;
        }

        let continues = i > 0
            && sentences[i].normalized == sentences[i - 1].normalized
            && sentences[i].word_count >= MIN_UNIT_WORDS;
        if !continues {
            run_start = i;
        }
        let run_len = i - run_start + 1;
        if sentences[i].word_count >= MIN_UNIT_WORDS {
            let better = best_run.map(|(l, ..)| run_len > l).unwrap_or(true);
            if better && run_len >= 2 {
                best_run = Some((run_len, run_start, i));
            }
        }
    }

    // Consecutive-run trigger.
    if let Some((len, first, last)) = best_run {
        if len >= config.min_consecutive_repeats {
            return Some(CoherenceFailure {
                failure_type: FailureType::RepetitiveLoop,
                loop_span: (sentences[first].start, sentences[last].end),
                repeated_unit: sentences[first].normalized.clone(),
            });
        }
    }

    // Scattered-total trigger.
    let scattered = totals
        .iter()
        .filter(|(_, (count, ..))| *count >= config.min_total_repeats)
        .max_by_key(|(_, (count, ..))| *count);
    if let Some((unit, (_, first_idx, last_idx))) = scattered {
        return Some(CoherenceFailure {
            failure_type: FailureType::RepetitiveLoop,
            loop_span: (sentences[*first_idx].start, sentences[*last_idx].end),
            repeated_unit: (*unit).to_string(),
        });
    }

    // Truncation: substantial text that stops mid-sentence. Recorded as a
    // diagnostic; classification still treats it as clean.
    let trimmed = text.trim_end();
    let word_count: usize = sentences.iter().map(|s| s.word_count).sum();
    if word_count > 50 && !trimmed.ends_with(['.', '!', '?']) {
        let tail_start = sentences.last().map(|s| s.start).unwrap_or(0);
        return Some(CoherenceFailure {
            failure_type: FailureType::IncompleteResponse,
            loop_span: (tail_start, text.len()),
            repeated_unit: String::new(),
        });
    }

    None
}

/// Analyze the text after the last loop boundary. For a failure-free
/// response the segment is the whole text; recovery only has meaning when
/// a loop precedes it.
pub fn analyze_final_segment(
    text: &str,
    failure: Option<&CoherenceFailure>,
    config: &LoopConfig,
    category: Category,
) -> FinalSegmentAnalysis {
    let segment = match failure {
        Some(f) if f.failure_type == FailureType::RepetitiveLoop => {
            let (_, loop_end) = f.loop_span;
            text.get(loop_end..).unwrap_or("").trim()
        }
        _ => text.trim(),
    };

    if segment.is_empty() {
        return FinalSegmentAnalysis::none();
    }

    let extractor = TextMetricExtractor::new();
    let (metrics, stats) = extractor.extract(segment, category);
    let quality = 0.5 * (metrics.organization_quality + metrics.completeness);

    let recovery_detected = failure
        .map(|f| f.failure_type == FailureType::RepetitiveLoop)
        .unwrap_or(false)
        && stats.word_count >= config.recovery_min_words
        && quality >= config.recovery_quality_bar;

    FinalSegmentAnalysis {
        recovery_detected,
        segment_text: segment.to_string(),
        segment_quality: quality,
    }
}

/// Pure three-way classification, evaluated in fixed order. A response
/// without a repetitive-loop failure is clean regardless of the final
/// segment; recovery is only consulted when such a failure exists.
pub fn classify_response(
    failure: Option<&CoherenceFailure>,
    final_segment: &FinalSegmentAnalysis,
) -> ResponseClassification {
    let looped = matches!(
        failure,
        Some(CoherenceFailure {
            failure_type: FailureType::RepetitiveLoop,
            ..
        })
    );
    if !looped {
        return ResponseClassification::CleanResponse;
    }
    if final_segment.recovery_detected {
        return ResponseClassification::LoopWithRecovery;
    }
    ResponseClassification::PureCognitiveFailure
}
