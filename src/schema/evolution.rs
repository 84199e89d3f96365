//! Configuration and result types for the layout optimizer.
//!
//! The optimizer searches the genes (track width, track spacing, gap angle)
//! while every other [`EncoderParameters`] field is held fixed.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::EncoderParameters;
use crate::compute::Violation;

/// An optimizable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gene {
    TrackWidth,
    TrackSpacing,
    GapAngle,
}

impl Gene {
    pub const ALL: [Gene; 3] = [Gene::TrackWidth, Gene::TrackSpacing, Gene::GapAngle];

    /// Read this gene's value from a parameter set.
    pub fn get(self, params: &EncoderParameters) -> f64 {
        match self {
            Gene::TrackWidth => params.track_width_mm,
            Gene::TrackSpacing => params.track_spacing_mm,
            Gene::GapAngle => params.gap_angle_deg,
        }
    }

    /// Write this gene's value into a parameter set.
    pub fn set(self, params: &mut EncoderParameters, value: f64) {
        match self {
            Gene::TrackWidth => params.track_width_mm = value,
            Gene::TrackSpacing => params.track_spacing_mm = value,
            Gene::GapAngle => params.gap_angle_deg = value,
        }
    }
}

/// Search bounds for each gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeConstraints {
    /// Track width bounds in mm.
    #[serde(default = "default_track_width_bounds")]
    pub track_width_mm: (f64, f64),
    /// Track spacing bounds in mm.
    #[serde(default = "default_track_spacing_bounds")]
    pub track_spacing_mm: (f64, f64),
    /// Gap angle bounds in degrees.
    #[serde(default = "default_gap_angle_bounds")]
    pub gap_angle_deg: (f64, f64),
}

impl Default for GenomeConstraints {
    fn default() -> Self {
        Self {
            track_width_mm: default_track_width_bounds(),
            track_spacing_mm: default_track_spacing_bounds(),
            gap_angle_deg: default_gap_angle_bounds(),
        }
    }
}

impl GenomeConstraints {
    pub fn bounds(&self, gene: Gene) -> (f64, f64) {
        match gene {
            Gene::TrackWidth => self.track_width_mm,
            Gene::TrackSpacing => self.track_spacing_mm,
            Gene::GapAngle => self.gap_angle_deg,
        }
    }
}

fn default_track_width_bounds() -> (f64, f64) {
    (0.5, 5.0)
}
fn default_track_spacing_bounds() -> (f64, f64) {
    (0.2, 3.0)
}
fn default_gap_angle_bounds() -> (f64, f64) {
    (0.5, 6.0)
}

/// Targets and component weights for fitness scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationGoals {
    /// Lower end of the preferred position range.
    #[serde(default = "default_min_positions")]
    pub min_positions: u32,
    /// Upper end of the preferred position range.
    #[serde(default = "default_max_positions")]
    pub max_positions: u32,
    #[serde(default = "default_target_outer_diameter")]
    pub target_outer_diameter_mm: f64,
    #[serde(default = "default_target_arc_angle")]
    pub target_arc_angle_deg: f64,
    /// Disks larger than this score zero for size.
    #[serde(default = "default_max_outer_diameter")]
    pub max_outer_diameter_mm: f64,
    #[serde(default = "default_max_tracks")]
    pub max_tracks: u32,
    #[serde(default = "default_weight_printability")]
    pub weight_printability: f64,
    #[serde(default = "default_weight_resolution")]
    pub weight_resolution: f64,
    #[serde(default = "default_weight_efficiency")]
    pub weight_efficiency: f64,
    #[serde(default = "default_weight_size")]
    pub weight_size: f64,
    #[serde(default = "default_weight_manufacturability")]
    pub weight_manufacturability: f64,
}

impl Default for OptimizationGoals {
    fn default() -> Self {
        Self {
            min_positions: default_min_positions(),
            max_positions: default_max_positions(),
            target_outer_diameter_mm: default_target_outer_diameter(),
            target_arc_angle_deg: default_target_arc_angle(),
            max_outer_diameter_mm: default_max_outer_diameter(),
            max_tracks: default_max_tracks(),
            weight_printability: default_weight_printability(),
            weight_resolution: default_weight_resolution(),
            weight_efficiency: default_weight_efficiency(),
            weight_size: default_weight_size(),
            weight_manufacturability: default_weight_manufacturability(),
        }
    }
}

impl OptimizationGoals {
    /// Weights in component order: printability, resolution, efficiency,
    /// size, manufacturability.
    pub fn weights(&self) -> [f64; 5] {
        [
            self.weight_printability,
            self.weight_resolution,
            self.weight_efficiency,
            self.weight_size,
            self.weight_manufacturability,
        ]
    }
}

fn default_min_positions() -> u32 {
    16
}
fn default_max_positions() -> u32 {
    64
}
fn default_target_outer_diameter() -> f64 {
    100.0
}
fn default_target_arc_angle() -> f64 {
    30.0
}
fn default_max_outer_diameter() -> f64 {
    150.0
}
fn default_max_tracks() -> u32 {
    8
}
fn default_weight_printability() -> f64 {
    0.4
}
fn default_weight_resolution() -> f64 {
    0.2
}
fn default_weight_efficiency() -> f64 {
    0.2
}
fn default_weight_size() -> f64 {
    0.1
}
fn default_weight_manufacturability() -> f64 {
    0.1
}

/// Population and generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of individuals in population.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Number of generations to run. There is no early stop.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: default_max_generations(),
        }
    }
}

fn default_population_size() -> usize {
    30
}
fn default_max_generations() -> usize {
    50
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticAlgorithmConfig {
    /// Competitors per tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Probability that an offspring is mutated.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Range of the multiplicative perturbation applied to each gene.
    #[serde(default = "default_mutation_factor")]
    pub mutation_factor: (f64, f64),
    /// Fraction of the population carried over unchanged.
    #[serde(default = "default_elite_fraction")]
    pub elite_fraction: f64,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            tournament_size: default_tournament_size(),
            mutation_rate: default_mutation_rate(),
            mutation_factor: default_mutation_factor(),
            elite_fraction: default_elite_fraction(),
        }
    }
}

impl GeneticAlgorithmConfig {
    /// Elites kept from a population of `population_size`, rounded up.
    pub fn elite_count(&self, population_size: usize) -> usize {
        // 30 * 0.1 is 3.0000000000000004 in binary floating point.
        let exact = population_size as f64 * self.elite_fraction;
        ((exact - 1e-9).ceil().max(0.0) as usize).min(population_size)
    }
}

fn default_tournament_size() -> usize {
    5
}
fn default_mutation_rate() -> f64 {
    0.1
}
fn default_mutation_factor() -> (f64, f64) {
    (0.8, 1.2)
}
fn default_elite_fraction() -> f64 {
    0.1
}

/// Top-level configuration for a layout optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    #[serde(default)]
    pub goals: OptimizationGoals,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub genetic: GeneticAlgorithmConfig,
    /// Gene bounds.
    #[serde(default)]
    pub constraints: GenomeConstraints,
    /// Genes to optimize; the rest keep their fixed values.
    #[serde(default = "default_genes")]
    pub genes: Vec<Gene>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            goals: OptimizationGoals::default(),
            population: PopulationConfig::default(),
            genetic: GeneticAlgorithmConfig::default(),
            constraints: GenomeConstraints::default(),
            genes: default_genes(),
            random_seed: None,
        }
    }
}

fn default_genes() -> Vec<Gene> {
    Gene::ALL.to_vec()
}

/// A candidate layout: values for the active genes plus the shared fixed
/// parameters they are applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub genes: BTreeMap<Gene, f64>,
    pub fixed: Arc<EncoderParameters>,
}

impl Genome {
    /// Genome carrying the fixed record's current values for `genes`.
    pub fn from_fixed(fixed: Arc<EncoderParameters>, genes: &[Gene]) -> Self {
        let genes = genes.iter().map(|&g| (g, g.get(&fixed))).collect();
        Self { genes, fixed }
    }

    /// Value of `gene`, falling back to the fixed record when inactive.
    pub fn get(&self, gene: Gene) -> f64 {
        self.genes
            .get(&gene)
            .copied()
            .unwrap_or_else(|| gene.get(&self.fixed))
    }

    /// Complete parameter set with the genes applied.
    pub fn to_parameters(&self) -> EncoderParameters {
        let mut params = (*self.fixed).clone();
        for (&gene, &value) in &self.genes {
            gene.set(&mut params, value);
        }
        params
    }
}

/// Per-component fitness scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FitnessComponents {
    pub printability: f64,
    pub resolution: f64,
    pub efficiency: f64,
    pub size: f64,
    pub manufacturability: f64,
}

impl FitnessComponents {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.printability,
            self.resolution,
            self.efficiency,
            self.size,
            self.manufacturability,
        ]
    }
}

/// Score of one genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub total: f64,
    pub components: FitnessComponents,
    /// Whether every constraint and code check passed.
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl FitnessReport {
    /// Zero-score report for an infeasible genome.
    pub fn infeasible(violations: Vec<Violation>) -> Self {
        Self {
            total: 0.0,
            components: FitnessComponents::default(),
            valid: false,
            violations,
        }
    }
}

/// Per-generation progress passed to callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationProgress {
    pub generation: usize,
    pub total_generations: usize,
    /// Best fitness seen in any generation so far.
    pub best_fitness: f64,
    pub generation_best: f64,
    pub avg_fitness: f64,
    /// Genomes passing every check this generation.
    pub valid_count: usize,
    pub diversity: f64,
}

/// Evolution history for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Standard deviation per generation.
    pub fitness_std: Vec<f64>,
    /// Mean normalized distance between genomes.
    pub diversity: Vec<f64>,
    pub valid_count: Vec<usize>,
}

/// Statistics from an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations evaluated, including the initial one.
    pub generations: usize,
    pub total_evaluations: u64,
    pub best_fitness: f64,
    pub final_avg_fitness: f64,
    pub elapsed_seconds: f64,
    pub evaluations_per_second: f64,
}

/// Final result of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Highest-fitness genome seen in any generation.
    pub best_genome: Genome,
    pub best_parameters: EncoderParameters,
    pub best_report: FitnessReport,
    /// Generation the best genome first appeared in.
    pub best_generation: usize,
    pub stats: EvolutionStats,
    pub history: EvolutionHistory,
}

/// Evolution configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 2")]
    PopulationTooSmall,
    #[error("Tournament size must be between 1 and the population size")]
    InvalidTournamentSize,
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
    #[error("Invalid parameter bounds: {0}")]
    InvalidBounds(String),
    #[error("No genes selected for optimization")]
    NoGenes,
    #[error("Fitness weights must be non-negative and not all zero")]
    InvalidWeights,
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        let size = self.population.size;
        if size < 2 {
            return Err(EvolutionConfigError::PopulationTooSmall);
        }

        let ga = &self.genetic;
        if ga.tournament_size == 0 || ga.tournament_size > size {
            return Err(EvolutionConfigError::InvalidTournamentSize);
        }
        if !(0.0..=1.0).contains(&ga.mutation_rate) {
            return Err(EvolutionConfigError::InvalidRate(format!(
                "mutation rate {} outside [0, 1]",
                ga.mutation_rate
            )));
        }
        if !(0.0..1.0).contains(&ga.elite_fraction) {
            return Err(EvolutionConfigError::InvalidRate(format!(
                "elite fraction {} outside [0, 1)",
                ga.elite_fraction
            )));
        }
        let (lo, hi) = ga.mutation_factor;
        if !(lo > 0.0 && lo <= hi && hi.is_finite()) {
            return Err(EvolutionConfigError::InvalidBounds(format!(
                "mutation factor ({lo}, {hi})"
            )));
        }

        if self.genes.is_empty() {
            return Err(EvolutionConfigError::NoGenes);
        }
        for gene in Gene::ALL {
            let (min, max) = self.constraints.bounds(gene);
            if !(min > 0.0 && min <= max && max.is_finite()) {
                return Err(EvolutionConfigError::InvalidBounds(format!(
                    "{gene:?} bounds ({min}, {max}) not positive, finite and ordered"
                )));
            }
        }

        let goals = &self.goals;
        if goals.min_positions > goals.max_positions {
            return Err(EvolutionConfigError::InvalidBounds(format!(
                "position range {}..{}",
                goals.min_positions, goals.max_positions
            )));
        }
        let weights = goals.weights();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0)
            || weights.iter().sum::<f64>() <= 0.0
        {
            return Err(EvolutionConfigError::InvalidWeights);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.genetic.elite_count(config.population.size), 3);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = EvolutionConfig::default();
        config.population.size = 1;
        assert_eq!(config.validate(), Err(EvolutionConfigError::PopulationTooSmall));

        let mut config = EvolutionConfig::default();
        config.genes.clear();
        assert_eq!(config.validate(), Err(EvolutionConfigError::NoGenes));

        let mut config = EvolutionConfig::default();
        config.constraints.track_width_mm = (5.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidBounds(_))
        ));

        let mut config = EvolutionConfig::default();
        config.goals.weight_printability = -1.0;
        assert_eq!(config.validate(), Err(EvolutionConfigError::InvalidWeights));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut config = EvolutionConfig::default();
        config.constraints.gap_angle_deg = (0.5, f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidBounds(_))
        ));

        let mut config = EvolutionConfig::default();
        config.constraints.track_spacing_mm = (f64::NAN, 3.0);
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidBounds(_))
        ));

        let mut config = EvolutionConfig::default();
        config.genetic.mutation_factor = (0.8, f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidBounds(_))
        ));

        let mut config = EvolutionConfig::default();
        config.goals.weight_size = f64::INFINITY;
        assert_eq!(config.validate(), Err(EvolutionConfigError::InvalidWeights));
    }

    #[test]
    fn test_genome_applies_active_genes_only() {
        let fixed = Arc::new(EncoderParameters::default());
        let mut genome = Genome::from_fixed(Arc::clone(&fixed), &[Gene::TrackWidth]);
        genome.genes.insert(Gene::TrackWidth, 2.5);

        let params = genome.to_parameters();
        assert_eq!(params.track_width_mm, 2.5);
        assert_eq!(params.track_spacing_mm, fixed.track_spacing_mm);
        assert_eq!(genome.get(Gene::GapAngle), fixed.gap_angle_deg);
    }

    #[test]
    fn test_serialization() {
        let config = EvolutionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let partial: EvolutionConfig =
            serde_json::from_str(r#"{"genes": ["gap_angle"], "random_seed": 7}"#).unwrap();
        assert_eq!(partial.genes, vec![Gene::GapAngle]);
        assert_eq!(partial.population.size, 30);
    }
}
