// src/patterns/mod.rs — Cross-run cognitive pattern detection

pub mod detector;

pub use detector::{
    CognitivePatternDetector, CognitiveProfile, DetectedPattern, PatternType, ScoreRecord,
    StatisticalMeasures,
};
