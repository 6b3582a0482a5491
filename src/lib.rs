// src/lib.rs — rubric: response evaluation engine

pub mod analysis;
pub mod cli;
pub mod core;
pub mod evaluator;
pub mod infra;
pub mod memory;
pub mod patterns;

pub use crate::core::types::{
    Category, EvaluationResult, Metrics, ReasoningType, ResponseClassification, TestDefinition,
};
pub use crate::evaluator::ResponseEvaluator;
pub use crate::infra::errors::RubricError;
pub use crate::patterns::detector::{CognitivePatternDetector, CognitiveProfile};
