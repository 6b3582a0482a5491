// src/memory/mod.rs — Persistence for evaluation history

pub mod schema;
pub mod store;

pub use store::{EvaluationRow, PatternRow, Store};
