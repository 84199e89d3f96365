//! Evolutionary search over encoder disk layouts.
//!
//! The optimizer holds the mechanically fixed parameters constant and
//! searches track width, track spacing and gap angle for the layout that
//! best balances printability, resolution, code efficiency, size and ease
//! of manufacture.
//!
//! # Overview
//!
//! - **Fitness** (`fitness`): feasibility gate plus five weighted components
//! - **Genome Operations** (`genome`): random generation, uniform crossover,
//!   and clamped multiplicative mutation
//! - **Search** (`search`): generational GA with tournament selection and
//!   elitism
//!
//! # Example
//!
//! ```rust,no_run
//! use gray_encoder::compute::evolution::EvolutionEngine;
//! use gray_encoder::schema::{EncoderParameters, EvolutionConfig};
//!
//! let config = EvolutionConfig {
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//! let mut engine = EvolutionEngine::new(config, EncoderParameters::default());
//! let result = engine
//!     .run_with_callback(|progress| {
//!         println!(
//!             "Generation {}: best fitness = {:.3}",
//!             progress.generation, progress.best_fitness
//!         );
//!     })
//!     .unwrap();
//!
//! println!("Best layout fitness: {:.3}", result.best_report.total);
//! ```

mod fitness;
mod genome;
mod search;

pub use fitness::{FitnessEvaluator, VALIDITY_BONUS, printability_score};
pub use genome::{GenomeRng, genome_distance};
pub use search::{Candidate, EvolutionEngine};

use crate::compute::constraints::Violation;
use crate::schema::EvolutionConfigError;

/// Reasons an optimization run cannot start or finish.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid evolution configuration: {0}")]
    Config(#[from] EvolutionConfigError),
    #[error("Fixed parameters are infeasible for every gene value ({} violations)", .violations.len())]
    InfeasibleFixedParameters { violations: Vec<Violation> },
    #[error("Population is empty")]
    EmptyPopulation,
}
