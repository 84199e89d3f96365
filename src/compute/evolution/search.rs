//! Genetic algorithm over the optimizable layout genes.

use std::sync::Arc;

use log::{info, warn};
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::compute::constraints::fixed_feasibility;
use crate::schema::{
    EncoderParameters, EvolutionConfig, EvolutionHistory, EvolutionResult, EvolutionStats,
    FitnessReport, GenerationProgress, Genome,
};

use super::EvolutionError;
use super::fitness::FitnessEvaluator;
use super::genome::{GenomeRng, genome_distance};

/// A candidate individual in the population.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Unique identifier.
    pub id: u64,
    /// The genome.
    pub genome: Genome,
    /// Fitness report, `None` until evaluated.
    pub report: Option<FitnessReport>,
    /// Generation created.
    pub generation: usize,
    /// Parent IDs.
    pub parents: Vec<u64>,
}

impl Candidate {
    /// Fitness total, 0 before evaluation.
    pub fn fitness(&self) -> f64 {
        self.report.as_ref().map_or(0.0, |r| r.total)
    }

    pub fn is_valid(&self) -> bool {
        self.report.as_ref().is_some_and(|r| r.valid)
    }
}

/// Evolution engine that runs the search.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    fixed: Arc<EncoderParameters>,
    rng: GenomeRng,
    evaluator: FitnessEvaluator,
    population: Vec<Candidate>,
    history: EvolutionHistory,
    generation: usize,
    best: Option<Candidate>,
    next_id: u64,
    evaluations: u64,
}

impl EvolutionEngine {
    /// Create a new evolution engine holding `fixed` constant.
    pub fn new(config: EvolutionConfig, fixed: EncoderParameters) -> Self {
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let rng = GenomeRng::new(seed);
        let evaluator = FitnessEvaluator::new(config.goals.clone());

        Self {
            config,
            fixed: Arc::new(fixed),
            rng,
            evaluator,
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
            best: None,
            next_id: 0,
            evaluations: 0,
        }
    }

    /// Reject configurations that cannot run, and fixed parameters that no
    /// gene values could make feasible.
    pub fn check(&self) -> Result<(), EvolutionError> {
        self.config.validate()?;
        let violations =
            fixed_feasibility(&self.fixed, &self.config.constraints, &self.config.genes);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(EvolutionError::InfeasibleFixedParameters { violations })
        }
    }

    /// Initialize the population.
    pub fn initialize(&mut self) {
        self.population.clear();
        self.history = EvolutionHistory::default();
        self.generation = 0;
        self.best = None;
        self.evaluations = 0;

        for _ in 0..self.config.population.size {
            let genome =
                self.rng
                    .random_genome(&self.fixed, &self.config.genes, &self.config.constraints);
            let id = self.take_id();
            self.population.push(Candidate {
                id,
                genome,
                report: None,
                generation: 0,
                parents: Vec::new(),
            });
        }
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Evaluate every candidate that has no report yet.
    #[cfg(not(target_arch = "wasm32"))]
    fn evaluate_population(&mut self) {
        let evaluator = &self.evaluator;

        // Parallel evaluation
        let evaluated = self
            .population
            .par_iter_mut()
            .filter(|c| c.report.is_none())
            .map(|candidate| {
                candidate.report = Some(evaluator.evaluate(&candidate.genome));
            })
            .count();
        self.evaluations += evaluated as u64;
    }

    #[cfg(target_arch = "wasm32")]
    fn evaluate_population(&mut self) {
        let evaluator = &self.evaluator;

        // Sequential evaluation for WASM
        for candidate in self.population.iter_mut().filter(|c| c.report.is_none()) {
            candidate.report = Some(evaluator.evaluate(&candidate.genome));
            self.evaluations += 1;
        }
    }

    /// Rank the evaluated population, update the best-ever candidate and
    /// append to the history.
    fn record_generation(&mut self) -> GenerationProgress {
        self.population
            .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));

        if let Some(leader) = self.population.first()
            && self
                .best
                .as_ref()
                .is_none_or(|best| leader.fitness() > best.fitness())
        {
            self.best = Some(leader.clone());
        }

        let progress = self.progress();
        let n = self.population.len().max(1) as f64;
        let variance = self
            .population
            .iter()
            .map(|c| (c.fitness() - progress.avg_fitness).powi(2))
            .sum::<f64>()
            / n;

        self.history.best_fitness.push(progress.generation_best);
        self.history.avg_fitness.push(progress.avg_fitness);
        self.history.fitness_std.push(variance.sqrt());
        self.history.diversity.push(progress.diversity);
        self.history.valid_count.push(progress.valid_count);

        info!(
            "Generation {}/{}: best {:.4}, avg {:.4}, valid {}/{}",
            progress.generation + 1,
            progress.total_generations,
            progress.generation_best,
            progress.avg_fitness,
            progress.valid_count,
            self.population.len()
        );
        if progress.valid_count == 0 {
            warn!(
                "Generation {}: no feasible genome, selection is random",
                progress.generation + 1
            );
        }
        progress
    }

    /// Genetic algorithm step. Expects a ranked population.
    fn step_genetic_algorithm(&mut self) {
        let ga_config = self.config.genetic.clone();
        let size = self.config.population.size;
        let mut next_gen = Vec::with_capacity(size);

        // Elitism: keep best individuals, scores included
        for elite in self.population.iter().take(ga_config.elite_count(size)) {
            next_gen.push(elite.clone());
        }

        // Fill rest with offspring
        while next_gen.len() < size {
            let idx1 = self.select_index(ga_config.tournament_size);
            let idx2 = self.select_index(ga_config.tournament_size);

            let parent1 = &self.population[idx1];
            let parent2 = &self.population[idx2];
            let parents = vec![parent1.id, parent2.id];

            let mut child_genome = self.rng.crossover(&parent1.genome, &parent2.genome);
            self.rng.mutate(
                &mut child_genome,
                ga_config.mutation_rate,
                ga_config.mutation_factor,
                &self.config.constraints,
            );

            let id = self.take_id();
            next_gen.push(Candidate {
                id,
                genome: child_genome,
                report: None,
                generation: self.generation + 1,
                parents,
            });
        }

        self.population = next_gen;
        self.generation += 1;
    }

    /// Tournament selection: best of `size` distinct random candidates.
    /// Ties go to the first drawn, so an all-zero population selects at
    /// random.
    fn select_index(&mut self, size: usize) -> usize {
        let entrants = self.rng.sample_indices(self.population.len(), size.max(1));
        let mut best_idx = entrants.first().copied().unwrap_or(0);
        for idx in entrants {
            if self.population[idx].fitness() > self.population[best_idx].fitness() {
                best_idx = idx;
            }
        }
        best_idx
    }

    /// Compute population diversity.
    fn compute_diversity(&self) -> f64 {
        if self.population.len() < 2 {
            return 0.0;
        }

        let mut total_distance = 0.0;
        let mut count = 0;

        for i in 0..self.population.len() {
            for j in (i + 1)..self.population.len() {
                total_distance += genome_distance(
                    &self.population[i].genome,
                    &self.population[j].genome,
                    &self.config.constraints,
                );
                count += 1;
            }
        }

        total_distance / count as f64
    }

    /// Get current progress.
    pub fn progress(&self) -> GenerationProgress {
        let avg_fitness = if self.population.is_empty() {
            0.0
        } else {
            self.population.iter().map(Candidate::fitness).sum::<f64>()
                / self.population.len() as f64
        };

        let generation_best = self
            .population
            .iter()
            .map(Candidate::fitness)
            .fold(0.0, f64::max);

        GenerationProgress {
            generation: self.generation,
            total_generations: self.config.population.max_generations,
            best_fitness: self.best.as_ref().map_or(0.0, Candidate::fitness),
            generation_best,
            avg_fitness,
            valid_count: self.population.iter().filter(|c| c.is_valid()).count(),
            diversity: self.compute_diversity(),
        }
    }

    /// Best candidate seen so far.
    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    /// Run evolution, reporting each generation once it is scored.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&GenerationProgress),
    {
        self.check()?;
        let start_time = std::time::Instant::now();

        self.initialize();
        self.evaluate_population();
        callback(&self.record_generation());

        for _ in 1..self.config.population.max_generations {
            self.step_genetic_algorithm();
            self.evaluate_population();
            callback(&self.record_generation());
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let best = self.best.clone().ok_or(EvolutionError::EmptyPopulation)?;
        let best_report = best
            .report
            .clone()
            .ok_or(EvolutionError::EmptyPopulation)?;
        let final_avg_fitness = self.history.avg_fitness.last().copied().unwrap_or(0.0);

        info!(
            "Optimization finished: best fitness {:.4} (generation {}), {} evaluations in {:.2}s",
            best_report.total,
            best.generation + 1,
            self.evaluations,
            elapsed
        );
        if !best_report.valid {
            warn!("No feasible layout found");
        }

        Ok(EvolutionResult {
            best_parameters: best.genome.to_parameters(),
            best_genome: best.genome,
            best_report,
            best_generation: best.generation,
            stats: EvolutionStats {
                generations: self.generation + 1,
                total_evaluations: self.evaluations,
                best_fitness: self.best.as_ref().map_or(0.0, Candidate::fitness),
                final_avg_fitness,
                elapsed_seconds: elapsed,
                evaluations_per_second: if elapsed > 0.0 {
                    self.evaluations as f64 / elapsed
                } else {
                    0.0
                },
            },
            history: self.history.clone(),
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }
}
