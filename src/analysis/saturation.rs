// src/analysis/saturation.rs — Context-window saturation analysis
//
// Simulates a trailing context window over the token stream and measures
// how much of it a single repeated n-gram occupies. A window dominated by
// one unit is the signature of loop degeneration.

use crate::infra::config::{LoopConfig, SaturationConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct SaturationReport {
    pub saturation_detected: bool,
    /// Fraction of the trailing window covered by the dominant repeated
    /// unit, in [0, 1].
    pub repetition_saturation: f64,
    /// 1.0 - repetition_saturation, in [0, 1].
    pub context_health_score: f64,
    /// The dominant repeated unit, joined with spaces. None when the
    /// window shows no repetition.
    pub dominant_unit: Option<String>,
    /// Longest run of back-to-back occurrences of the dominant unit.
    pub consecutive_repeats: usize,
    /// Total occurrences of the dominant unit in the window.
    pub total_repeats: usize,
    /// Number of tokens actually examined.
    pub window_len: usize,
}

impl SaturationReport {
    fn healthy(window_len: usize) -> Self {
        Self {
            saturation_detected: false,
            repetition_saturation: 0.0,
            context_health_score: 1.0,
            dominant_unit: None,
            consecutive_repeats: 0,
            total_repeats: 0,
            window_len,
        }
    }
}

pub struct ContextSaturationAnalyzer {
    saturation: SaturationConfig,
    loops: LoopConfig,
}

impl ContextSaturationAnalyzer {
    pub fn new(saturation: SaturationConfig, loops: LoopConfig) -> Self {
        Self { saturation, loops }
    }

    /// Analyze a token stream. Text shorter than the window is examined
    /// as-is; text too short to repeat any candidate unit reports healthy.
    pub fn analyze(&self, tokens: &[String]) -> SaturationReport {
        let window_start = tokens.len().saturating_sub(self.saturation.window_tokens);
        let window = &tokens[window_start..];
        let window_len = window.len();

        // Need at least two occurrences of the shortest unit.
        if window_len < self.saturation.min_unit_len * 2 {
            return SaturationReport::healthy(window_len);
        }

        let mut best: Option<(f64, Vec<String>, usize, usize)> = None;

        let max_len = self.saturation.max_unit_len.min(window_len / 2);
        for unit_len in self.saturation.min_unit_len..=max_len {
            if let Some((unit, total, consecutive)) = dominant_unit(window, unit_len) {
                if total < 2 {
                    continue;
                }
                let coverage = (total * unit_len) as f64 / window_len as f64;
                let better = match &best {
                    Some((c, ..)) => coverage > *c,
                    None => true,
                };
                if better {
                    best = Some((coverage, unit.to_vec(), total, consecutive));
                }
            }
        }

        let Some((coverage, unit, total, consecutive)) = best else {
            return SaturationReport::healthy(window_len);
        };

        let saturation = coverage.clamp(0.0, 1.0);
        let sustained = consecutive >= self.loops.min_consecutive_repeats
            || total >= self.loops.min_total_repeats;
        let detected = saturation >= self.saturation.saturation_threshold && sustained;

        if detected {
            tracing::debug!(
                saturation,
                consecutive,
                total,
                "context window saturated by repeated unit"
            );
        }

        SaturationReport {
            saturation_detected: detected,
            repetition_saturation: saturation,
            context_health_score: (1.0 - saturation).clamp(0.0, 1.0),
            dominant_unit: Some(unit.join(" ")),
            consecutive_repeats: consecutive,
            total_repeats: total,
            window_len,
        }
    }
}

/// Most frequent n-gram of `unit_len` tokens in the window, with its total
/// occurrence count (non-overlapping) and longest consecutive run.
/// Candidate phases are aligned to the end of the window so a loop that
/// fills the tail is always seen on-phase.
fn dominant_unit(window: &[String], unit_len: usize) -> Option<(&[String], usize, usize)> {
    let mut best: Option<(&[String], usize, usize)> = None;

    for phase in 0..unit_len {
        // Walk backwards from the end in unit-sized steps.
        let usable = window.len() - phase;
        let steps = usable / unit_len;
        if steps < 2 {
            continue;
        }
        let start = window.len() - phase - steps * unit_len;

        let mut counts: std::collections::BTreeMap<&[String], (usize, usize, usize)> =
            std::collections::BTreeMap::new();
        let mut prev: Option<&[String]> = None;
        for i in 0..steps {
            let s = start + i * unit_len;
            let gram = &window[s..s + unit_len];
            let entry = counts.entry(gram).or_insert((0, 0, 0));
            entry.0 += 1;
            if prev == Some(gram) {
                entry.1 += 1;
            } else {
                entry.1 = 1;
            }
            entry.2 = entry.2.max(entry.1);
            prev = Some(gram);
        }

        for (gram, (total, _, max_run)) in counts {
            let better = match &best {
                Some((_, t, _)) => total > *t,
                None => true,
            };
            if better {
                best = Some((gram, total, max_run));
            }
        }
    }

    best
}
