// src/analysis/entropy.rs — Shannon entropy diagnostics
//
// Frequency tables use BTreeMap so summation order is stable and repeat
// runs over identical input produce bit-identical floats.

use std::collections::BTreeMap;

use crate::analysis::tokenizer::TokenAdapter;

/// Entropy diagnostics for one response.
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyReport {
    pub char_entropy: f64,
    /// None when no tokenizer resolved for the model.
    pub token_entropy: Option<f64>,
    /// Observed entropy over the maximum possible for the stream length
    /// (every emitted symbol distinct), in [0, 1]. Near 0 means a
    /// collapsed symbol distribution.
    pub entropy_quality_ratio: f64,
}

impl EntropyReport {
    /// Compute both entropy views for a response. The quality ratio is
    /// taken over the token stream when one is available, characters
    /// otherwise.
    pub fn compute(text: &str, adapter: Option<&dyn TokenAdapter>) -> Self {
        let char_entropy = char_entropy(text);
        let tokens = adapter.map(|a| a.tokenize(text));

        let (token_entropy, ratio) = match &tokens {
            Some(tokens) => (
                Some(symbol_entropy(tokens.iter().map(|t| t.as_str()))),
                quality_ratio(tokens.iter().map(|t| t.as_str())),
            ),
            None => (None, quality_ratio(text.chars())),
        };

        Self {
            char_entropy,
            token_entropy,
            entropy_quality_ratio: ratio,
        }
    }
}

/// Shannon entropy over the characters of `text`. Returns 0.0 for empty
/// input.
pub fn char_entropy(text: &str) -> f64 {
    symbol_entropy(text.chars())
}

/// Shannon entropy `-Σ p·log2(p)` over any symbol stream. Always finite
/// and non-negative.
pub fn symbol_entropy<S: Ord>(symbols: impl Iterator<Item = S>) -> f64 {
    let mut freq: BTreeMap<S, usize> = BTreeMap::new();
    let mut total = 0usize;
    for s in symbols {
        *freq.entry(s).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut h = 0.0;
    for count in freq.values() {
        let p = *count as f64 / total;
        h -= p * p.log2();
    }
    h.max(0.0)
}

/// Observed entropy divided by `log2(total symbols)`, the entropy the
/// stream would have if every emitted symbol were distinct. Repetition
/// drives the ratio toward 0 even when the repeated unit cycles over a
/// balanced alphabet. 0.0 when fewer than two distinct symbols exist.
pub fn quality_ratio<S: Ord + Clone>(symbols: impl Iterator<Item = S>) -> f64 {
    let mut freq: BTreeMap<S, usize> = BTreeMap::new();
    let mut total = 0usize;
    for s in symbols {
        *freq.entry(s).or_insert(0) += 1;
        total += 1;
    }
    if total < 2 || freq.len() < 2 {
        return 0.0;
    }
    let total = total as f64;
    let mut h = 0.0;
    for count in freq.values() {
        let p = *count as f64 / total;
        h -= p * p.log2();
    }
    let max_h = total.log2();
    (h / max_h).clamp(0.0, 1.0)
}

/// Boundary helper: entropy for (text, adapter, use_tokens). Falls back
/// to character entropy when tokens are requested but no adapter exists.
pub fn compute_entropy(text: &str, adapter: Option<&dyn TokenAdapter>, use_tokens: bool) -> f64 {
    if use_tokens {
        if let Some(adapter) = adapter {
            let tokens = adapter.tokenize(text);
            return symbol_entropy(tokens.iter().map(|t| t.as_str()));
        }
        tracing::debug!("token entropy requested without tokenizer, using characters");
    }
    char_entropy(text)
}
