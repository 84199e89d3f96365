//! Fitness scoring for candidate disk layouts.
//!
//! A genome is first gated on feasibility: any failed constraint or Gray
//! code check scores zero and nothing else is computed. Feasible genomes get
//! five component scores in `[0, 1]` combined with the goal weights.

use crate::compute::constraints::{ConstraintCheck, ConstraintKind, Violation, feasible};
use crate::compute::gray::{code_efficiency, validate_encoder_codes};
use crate::schema::{
    EncoderParameters, FitnessComponents, FitnessReport, Gene, Genome, OptimizationGoals,
};

/// Multiplier applied to the total when every check passes.
pub const VALIDITY_BONUS: f64 = 1.2;

/// Arc angles within this distance of the target are not penalized.
const ARC_TOLERANCE_DEG: f64 = 15.0;

/// Tracks above this count cost manufacturability.
const COMFORTABLE_TRACKS: u32 = 6;

/// Track widths inside this range suit common optical sensors.
const PREFERRED_TRACK_WIDTH_MM: (f64, f64) = (4.0, 7.0);

/// Evaluates a candidate and returns its fitness report.
pub struct FitnessEvaluator {
    goals: OptimizationGoals,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(goals: OptimizationGoals) -> Self {
        Self { goals }
    }

    pub fn goals(&self) -> &OptimizationGoals {
        &self.goals
    }

    /// Score a genome. Deterministic and free of side effects.
    pub fn evaluate(&self, genome: &Genome) -> FitnessReport {
        self.evaluate_parameters(&genome.to_parameters())
    }

    /// Score a complete parameter set.
    pub fn evaluate_parameters(&self, params: &EncoderParameters) -> FitnessReport {
        let feasibility = feasible(params);
        if !feasibility.is_feasible() {
            return FitnessReport::infeasible(feasibility.violations);
        }

        // Feasibility caps the position count at MAX_POSITIONS.
        let codes = validate_encoder_codes(params.num_positions, params.num_tracks);
        if !codes.valid {
            let violations = codes
                .errors
                .into_iter()
                .map(|message| Violation {
                    kind: ConstraintKind::CodeCapacity,
                    message,
                })
                .collect();
            return FitnessReport::infeasible(violations);
        }

        let components = FitnessComponents {
            printability: printability_score(&feasibility.checks),
            resolution: self.resolution_score(params.num_positions),
            efficiency: code_efficiency(params.num_positions, params.num_tracks),
            size: self.size_score(params.outer_diameter_mm),
            manufacturability: self.manufacturability_score(params),
        };

        let weighted: f64 = components
            .as_array()
            .iter()
            .zip(self.goals.weights())
            .map(|(score, weight)| score * weight)
            .sum();

        FitnessReport {
            total: weighted * VALIDITY_BONUS,
            components,
            valid: true,
            violations: Vec::new(),
        }
    }

    /// 1 inside the preferred range, decaying proportionally outside it.
    fn resolution_score(&self, num_positions: u32) -> f64 {
        let n = f64::from(num_positions);
        let min = f64::from(self.goals.min_positions);
        let max = f64::from(self.goals.max_positions);
        if n < min {
            n / min
        } else if n > max {
            max / n
        } else {
            1.0
        }
    }

    fn size_score(&self, outer_diameter_mm: f64) -> f64 {
        if outer_diameter_mm > self.goals.max_outer_diameter_mm {
            return 0.0;
        }
        let target = self.goals.target_outer_diameter_mm.max(f64::EPSILON);
        1.0 / (1.0 + (outer_diameter_mm - target).abs() / target)
    }

    /// Rewards round gene values, arcs near the target and few tracks for
    /// the resolution achieved.
    fn manufacturability_score(&self, params: &EncoderParameters) -> f64 {
        let roundness = Gene::ALL
            .iter()
            .map(|gene| {
                let tenths = gene.get(params) * 10.0;
                1.0 - 2.0 * (tenths - tenths.round()).abs()
            })
            .sum::<f64>()
            / Gene::ALL.len() as f64;

        let arc_error = (params.arc_angle_deg - self.goals.target_arc_angle_deg).abs();
        let arc = if arc_error <= ARC_TOLERANCE_DEG {
            1.0
        } else {
            ARC_TOLERANCE_DEG / arc_error
        };

        let track_ratio = if params.num_tracks == 0 {
            0.0
        } else {
            (f64::from(params.required_bits()) / f64::from(params.num_tracks)).min(1.0)
        };

        let mut score = (roundness + arc + track_ratio) / 3.0;
        if params.num_tracks > COMFORTABLE_TRACKS {
            score *= 0.8;
        }
        if params.num_tracks > self.goals.max_tracks {
            score *= 0.5;
        }
        let (lo, hi) = PREFERRED_TRACK_WIDTH_MM;
        if !(lo..=hi).contains(&params.track_width_mm) {
            score *= 0.95;
        }
        score.clamp(0.0, 1.0)
    }
}

/// Weighted mean of per-check scores. Failed checks score 0, passed checks
/// score between 0.5 and 1 depending on their margin.
pub fn printability_score(checks: &[ConstraintCheck]) -> f64 {
    let total_weight: f64 = checks.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    checks
        .iter()
        .map(|c| {
            let score = if c.passed {
                0.5 + 0.5 * c.margin.clamp(0.0, 1.0)
            } else {
                0.0
            };
            score * c.weight
        })
        .sum::<f64>()
        / total_weight
}
