// src/analysis/mod.rs — Tokenization and information-theoretic diagnostics

pub mod entropy;
pub mod saturation;
pub mod tokenizer;

pub use entropy::{compute_entropy, EntropyReport};
pub use saturation::{ContextSaturationAnalyzer, SaturationReport};
pub use tokenizer::{CharTokenizer, SubwordTokenizer, TokenAdapter, TokenizerRegistry};
