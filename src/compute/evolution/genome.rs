//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation, crossover, and mutation operations. Only the
//! active genes are ever touched; the fixed parameter record is shared.

use std::sync::Arc;

use rand::prelude::*;
use rand_distr::Uniform;

use crate::schema::{EncoderParameters, Gene, GenomeConstraints, Genome};

/// Random number generator wrapper for genome operations.
///
/// Every random draw of a run goes through one instance so a seed
/// reproduces the run exactly.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Genome with every active gene drawn uniformly from its bounds.
    pub fn random_genome(
        &mut self,
        fixed: &Arc<EncoderParameters>,
        genes: &[Gene],
        constraints: &GenomeConstraints,
    ) -> Genome {
        let mut genome = Genome::from_fixed(Arc::clone(fixed), genes);
        for (&gene, value) in genome.genes.iter_mut() {
            *value = self.uniform(constraints.bounds(gene));
        }
        genome
    }

    /// Uniform random in bounds.
    fn uniform(&mut self, bounds: (f64, f64)) -> f64 {
        if bounds.0 >= bounds.1 {
            return bounds.0;
        }
        self.rng.gen_range(bounds.0..=bounds.1)
    }

    /// Uniform crossover: each gene comes from either parent with equal
    /// probability. The fixed record is shared by both parents.
    pub fn crossover(&mut self, parent1: &Genome, parent2: &Genome) -> Genome {
        let genes = parent1
            .genes
            .iter()
            .map(|(&gene, &v1)| {
                let v2 = parent2.genes.get(&gene).copied().unwrap_or(v1);
                (gene, if self.rng.gen_bool(0.5) { v1 } else { v2 })
            })
            .collect();
        Genome {
            genes,
            fixed: Arc::clone(&parent1.fixed),
        }
    }

    /// With probability `rate`, scale every active gene by a factor drawn
    /// from `factor` and clamp it back into bounds. Returns whether the
    /// genome was touched.
    pub fn mutate(
        &mut self,
        genome: &mut Genome,
        rate: f64,
        factor: (f64, f64),
        constraints: &GenomeConstraints,
    ) -> bool {
        if !self.rng.gen_bool(rate.clamp(0.0, 1.0)) {
            return false;
        }
        let scale = Uniform::new_inclusive(factor.0, factor.1);
        for (&gene, value) in genome.genes.iter_mut() {
            let (min, max) = constraints.bounds(gene);
            *value = (*value * scale.sample(&mut self.rng)).clamp(min, max);
        }
        true
    }

    /// `amount` distinct indices below `len`, for tournament draws.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }
}

/// Mean per-gene distance, each gene normalized by its bound width.
pub fn genome_distance(g1: &Genome, g2: &Genome, constraints: &GenomeConstraints) -> f64 {
    let mut distance = 0.0;
    let mut count = 0;

    for (&gene, &v1) in &g1.genes {
        let Some(&v2) = g2.genes.get(&gene) else {
            continue;
        };
        let (min, max) = constraints.bounds(gene);
        let span = (max - min).max(f64::EPSILON);
        distance += (v1 - v2).abs() / span;
        count += 1;
    }

    if count > 0 {
        distance / count as f64
    } else {
        0.0
    }
}
