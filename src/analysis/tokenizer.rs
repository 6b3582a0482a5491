// src/analysis/tokenizer.rs — Model-name to tokenizer resolution
//
// Resolution order: exact known-model table, then family substring match,
// then None. A None handle means "tokenize by characters" — resolution
// never fails and never raises, so the engine always has a compute path.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A tokenization strategy. Implementations must be pure: same text in,
/// same tokens out, with no per-call state.
pub trait TokenAdapter: Send + Sync {
    fn name(&self) -> &str;
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Subword approximation: words split at whitespace and punctuation, long
/// words broken into fixed-size pieces. Deliberately coarse — the engine
/// needs a stable symbol stream with realistic granularity, not a
/// vocabulary-faithful encoding.
pub struct SubwordTokenizer {
    name: String,
    max_piece_len: usize,
}

impl SubwordTokenizer {
    pub fn new(name: impl Into<String>, max_piece_len: usize) -> Self {
        Self {
            name: name.into(),
            max_piece_len: max_piece_len.max(1),
        }
    }
}

impl TokenAdapter for SubwordTokenizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for word in text.split(|c: char| c.is_whitespace()) {
            if word.is_empty() {
                continue;
            }
            // Punctuation becomes its own token, like most BPE vocabs.
            let mut current = String::new();
            for ch in word.chars() {
                if ch.is_alphanumeric() || ch == '\'' {
                    current.push(ch);
                } else {
                    if !current.is_empty() {
                        push_pieces(&mut tokens, &current, self.max_piece_len);
                        current.clear();
                    }
                    tokens.push(ch.to_string());
                }
            }
            if !current.is_empty() {
                push_pieces(&mut tokens, &current, self.max_piece_len);
            }
        }
        tokens
    }
}

fn push_pieces(tokens: &mut Vec<String>, word: &str, max_len: usize) {
    let chars: Vec<char> = word.chars().collect();
    for chunk in chars.chunks(max_len) {
        tokens.push(chunk.iter().collect());
    }
}

/// Character-level fallback used whenever no model-specific adapter
/// resolves.
pub struct CharTokenizer;

impl TokenAdapter for CharTokenizer {
    fn name(&self) -> &str {
        "char"
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.chars().map(|c| c.to_string()).collect()
    }
}

/// Keyed registry of tokenizer handles. Injectable so tests can register
/// deterministic fakes; adapters are constructed once per identity and
/// shared read-only afterwards.
pub struct TokenizerRegistry {
    exact: RwLock<HashMap<String, Arc<dyn TokenAdapter>>>,
    families: Vec<(&'static str, usize)>,
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self {
            exact: RwLock::new(HashMap::new()),
            // (family substring, subword piece length)
            families: vec![
                ("qwen", 4),
                ("llama", 4),
                ("mistral", 4),
                ("claude", 5),
                ("gpt", 4),
            ],
        }
    }
}

impl TokenizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an explicit adapter for a model name. The name is
    /// normalized, so later lookups match regardless of casing or vendor
    /// prefix.
    pub fn register(&self, model: &str, adapter: Arc<dyn TokenAdapter>) {
        let key = normalize_model_name(model);
        if let Ok(mut map) = self.exact.write() {
            map.insert(key, adapter);
        }
    }

    /// Resolve a model name to a tokenizer handle. Returns None when no
    /// strategy matches; callers fall back to character-based analysis.
    pub fn resolve(&self, model: &str) -> Option<Arc<dyn TokenAdapter>> {
        let key = normalize_model_name(model);
        if key.is_empty() {
            return None;
        }

        if let Ok(map) = self.exact.read() {
            if let Some(adapter) = map.get(&key) {
                return Some(Arc::clone(adapter));
            }
        }

        for (family, piece_len) in &self.families {
            if key.contains(family) {
                let adapter: Arc<dyn TokenAdapter> =
                    Arc::new(SubwordTokenizer::new(format!("{family}-subword"), *piece_len));
                // Cache per identity so repeat calls share the handle.
                if let Ok(mut map) = self.exact.write() {
                    map.entry(key).or_insert_with(|| Arc::clone(&adapter));
                }
                return Some(adapter);
            }
        }

        tracing::debug!(model, "no tokenizer match, using character fallback");
        None
    }
}

/// Lowercase and strip any vendor path prefix ("org/model" -> "model").
/// Identical logical names must map to the same tokenizer choice.
pub fn normalize_model_name(model: &str) -> String {
    let lower = model.trim().to_lowercase();
    match lower.rsplit_once('/') {
        Some((_, tail)) => tail.to_string(),
        None => lower,
    }
}
