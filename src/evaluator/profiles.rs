// src/evaluator/profiles.rs — Reasoning-type weight profiles
//
// Each profile fixes how sub-metrics combine into the overall score.
// Weights sum to 1.0; a marker bonus multiplies the result when the
// lexical signature of that reasoning style is actually present.

use crate::core::types::{Metrics, ReasoningType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightProfile {
    pub organization: f64,
    pub technical: f64,
    pub completeness: f64,
    pub thoroughness: f64,
    pub reliability: f64,
    pub scope: f64,
    pub domain: f64,
}

impl WeightProfile {
    /// Weighted combination of sub-metrics, in [0, 100].
    pub fn combine(&self, m: &Metrics) -> f64 {
        m.organization_quality * self.organization
            + m.technical_accuracy * self.technical
            + m.completeness * self.completeness
            + m.thoroughness * self.thoroughness
            + m.reliability * self.reliability
            + m.scope_coverage * self.scope
            + m.domain_appropriateness * self.domain
    }

    #[cfg(test)]
    fn sum(&self) -> f64 {
        self.organization
            + self.technical
            + self.completeness
            + self.thoroughness
            + self.reliability
            + self.scope
            + self.domain
    }
}

pub fn profile_for(reasoning: ReasoningType) -> WeightProfile {
    match reasoning {
        ReasoningType::ChainOfThought => WeightProfile {
            organization: 0.25,
            technical: 0.15,
            completeness: 0.20,
            thoroughness: 0.20,
            reliability: 0.10,
            scope: 0.05,
            domain: 0.05,
        },
        ReasoningType::MultiHop => WeightProfile {
            organization: 0.15,
            technical: 0.15,
            completeness: 0.20,
            thoroughness: 0.15,
            reliability: 0.10,
            scope: 0.20,
            domain: 0.05,
        },
        ReasoningType::Verification => WeightProfile {
            organization: 0.10,
            technical: 0.25,
            completeness: 0.15,
            thoroughness: 0.15,
            reliability: 0.25,
            scope: 0.05,
            domain: 0.05,
        },
        ReasoningType::Mathematical => WeightProfile {
            organization: 0.15,
            technical: 0.30,
            completeness: 0.15,
            thoroughness: 0.10,
            reliability: 0.20,
            scope: 0.05,
            domain: 0.05,
        },
        ReasoningType::Backward => WeightProfile {
            organization: 0.20,
            technical: 0.15,
            completeness: 0.20,
            thoroughness: 0.15,
            reliability: 0.15,
            scope: 0.10,
            domain: 0.05,
        },
        ReasoningType::Scaffolded => WeightProfile {
            organization: 0.30,
            technical: 0.10,
            completeness: 0.20,
            thoroughness: 0.15,
            reliability: 0.10,
            scope: 0.10,
            domain: 0.05,
        },
        ReasoningType::General => WeightProfile {
            organization: 0.20,
            technical: 0.15,
            completeness: 0.20,
            thoroughness: 0.15,
            reliability: 0.10,
            scope: 0.10,
            domain: 0.10,
        },
    }
}

/// Lexical markers for each reasoning style, with the bonus multiplier
/// applied when at least two distinct markers appear.
fn markers_for(reasoning: ReasoningType) -> (&'static [&'static str], f64) {
    match reasoning {
        ReasoningType::ChainOfThought => (
            &["step", "first", "then", "next", "therefore", "because"],
            1.3,
        ),
        ReasoningType::MultiHop => (
            &["leads to", "which means", "in turn", "consequently", "linking"],
            1.25,
        ),
        ReasoningType::Verification => (
            &["verify", "check", "confirm", "cross-reference", "validate"],
            1.35,
        ),
        ReasoningType::Mathematical => (
            &["equation", "calculate", "solve", "equals", "formula", "="],
            1.5,
        ),
        ReasoningType::Backward => (
            &["working backwards", "from the goal", "from the result", "reverse"],
            1.3,
        ),
        ReasoningType::Scaffolded => (
            &["building on", "foundation", "next layer", "finally", "extends"],
            1.2,
        ),
        ReasoningType::General => (&[], 1.0),
    }
}

/// Bonus multiplier for a response. 1.0 when the style's markers are
/// absent or the style has none.
pub fn marker_bonus(reasoning: ReasoningType, text: &str) -> f64 {
    let (markers, bonus) = markers_for(reasoning);
    if markers.is_empty() {
        return 1.0;
    }
    let lower = text.to_lowercase();
    let distinct = markers.iter().filter(|m| lower.contains(*m)).count();
    if distinct >= 2 {
        bonus
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_profiles_sum_to_one() {
        for rt in [
            ReasoningType::ChainOfThought,
            ReasoningType::MultiHop,
            ReasoningType::Verification,
            ReasoningType::Mathematical,
            ReasoningType::Backward,
            ReasoningType::Scaffolded,
            ReasoningType::General,
        ] {
            let sum = profile_for(rt).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{rt:?} weights sum to {sum}");
        }
    }

    #[test]
    fn test_combine_stays_in_range() {
        let perfect = Metrics {
            organization_quality: 100.0,
            technical_accuracy: 100.0,
            completeness: 100.0,
            thoroughness: 100.0,
            reliability: 100.0,
            scope_coverage: 100.0,
            domain_appropriateness: 100.0,
            ..Default::default()
        };
        for rt in [ReasoningType::ChainOfThought, ReasoningType::General] {
            let score = profile_for(rt).combine(&perfect);
            assert!((score - 100.0).abs() < 1e-9);
        }
        assert_eq!(
            profile_for(ReasoningType::General).combine(&Metrics::default()),
            0.0
        );
    }

    #[test]
    fn test_marker_bonus_requires_two_distinct_markers() {
        let rt = ReasoningType::ChainOfThought;
        assert_eq!(marker_bonus(rt, "no markers at all"), 1.0);
        assert_eq!(marker_bonus(rt, "the first point stands alone"), 1.0);
        let text = "First, isolate the variable. Then substitute it back.";
        assert!((marker_bonus(rt, text) - 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_bonus_multipliers_in_declared_range() {
        for rt in [
            ReasoningType::ChainOfThought,
            ReasoningType::MultiHop,
            ReasoningType::Verification,
            ReasoningType::Mathematical,
            ReasoningType::Backward,
            ReasoningType::Scaffolded,
        ] {
            let (_, bonus) = markers_for(rt);
            assert!((1.2..=1.5).contains(&bonus), "{rt:?} bonus {bonus}");
        }
        assert_eq!(marker_bonus(ReasoningType::General, "anything"), 1.0);
    }
}
