//! Population-based heuristic search for high-support itemsets.
//!
//! Instead of enumerating combinations, the searcher keeps a population of
//! fixed-size candidate itemsets ("chromosomes") seeded from real
//! transactions and evolves it: tournament selection picks two parents,
//! crossover recombines the genes the parents do not share, and an offspring
//! replaces its parent only if it scores at least as well. A single mutation
//! pass at the end injects fresh items to preserve diversity.
//!
//! All randomness comes from a caller-supplied [`Rng`], so a seeded
//! generator replays a run exactly.

use std::collections::HashSet;
use std::fmt;
use std::ops::Index;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::table::TransactionTable;
use crate::types::Item;

/// Parameters for [`GeneticSearch`].
#[derive(Debug, Clone)]
pub struct GeneticConfig {
    /// Number of genes (items) per chromosome.
    pub chromosome_size: usize,
    /// Number of chromosomes in the population.
    pub population_size: usize,
    /// Number of evolution iterations.
    pub iterations: usize,
    /// Tournaments run per iteration.
    pub tournaments_per_iteration: usize,
    /// Probability that a chromosome is mutated in the final pass.
    pub mutation_probability: f64,
}

impl GeneticConfig {
    /// Creates a configuration with the default evolution schedule:
    /// 100 iterations of 100 tournaments, mutation probability 0.1.
    pub fn new(chromosome_size: usize, population_size: usize) -> Self {
        Self {
            chromosome_size,
            population_size,
            iterations: 100,
            tournaments_per_iteration: 100,
            mutation_probability: 0.1,
        }
    }

    /// Sets the number of evolution iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the number of tournaments per iteration.
    pub fn with_tournaments(mut self, tournaments: usize) -> Self {
        self.tournaments_per_iteration = tournaments;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }
}

/// A candidate itemset: a fixed-length gene sequence plus its cached
/// fitness, the support of the gene set when it was last scored.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Chromosome {
    genes: Vec<Item>,
    fitness: usize,
}

impl Chromosome {
    fn new(genes: Vec<Item>, table: &TransactionTable) -> Self {
        let fitness = table.support(&genes);
        Chromosome { genes, fitness }
    }

    /// The gene sequence.
    pub fn genes(&self) -> &[Item] {
        &self.genes
    }

    /// The cached support of the gene set.
    pub fn fitness(&self) -> usize {
        self.fitness
    }

    fn refresh_fitness(&mut self, table: &TransactionTable) {
        self.fitness = table.support(&self.genes);
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fitness: {:4}  items: [", self.fitness)?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", gene)?;
        }
        write!(f, "]")
    }
}

/// The population arena: chromosomes addressed by slot index.
///
/// All replacement goes through [`commit`](Population::commit), a
/// read-compare-write on a single slot, which keeps the shared-mutation
/// contract of the evolution loop auditable in one place.
#[derive(Debug, Clone)]
pub struct Population {
    slots: Vec<Chromosome>,
}

impl Population {
    fn with_capacity(capacity: usize) -> Self {
        Population { slots: Vec::with_capacity(capacity) }
    }

    fn push(&mut self, chromosome: Chromosome) {
        self.slots.push(chromosome);
    }

    /// Returns the number of chromosomes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Checks whether the population has no chromosomes.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over the chromosomes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Chromosome> {
        self.slots.iter()
    }

    /// Replaces the slot iff `candidate` scores at least as well as the
    /// current occupant. Ties go to the candidate, allowing lateral drift
    /// across equal-fitness itemsets. Returns whether the slot changed.
    fn commit(&mut self, index: usize, candidate: Chromosome) -> bool {
        if candidate.fitness >= self.slots[index].fitness {
            self.slots[index] = candidate;
            true
        } else {
            false
        }
    }
}

impl Index<usize> for Population {
    type Output = Chromosome;

    fn index(&self, index: usize) -> &Chromosome {
        &self.slots[index]
    }
}

impl IntoIterator for Population {
    type Item = Chromosome;
    type IntoIter = std::vec::IntoIter<Chromosome>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

/// Tournament-driven itemset search over a transaction table.
///
/// # Example
///
/// ```
/// use itemset_rs::genetic::{GeneticConfig, GeneticSearch};
/// use itemset_rs::table::TransactionTable;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let table = TransactionTable::from_rows(vec![
///     vec![1, 2, 3, 4],
///     vec![1, 2, 3, 5],
///     vec![2, 3, 4, 6],
///     vec![1, 3, 4, 7],
/// ]);
/// let config = GeneticConfig::new(2, 3).with_iterations(10).with_tournaments(5);
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let population = GeneticSearch::new(config).run(&table, &mut rng).unwrap();
/// assert_eq!(population.len(), 3);
/// ```
pub struct GeneticSearch {
    config: GeneticConfig,
}

impl GeneticSearch {
    /// Creates a searcher with the given configuration.
    pub fn new(config: GeneticConfig) -> Self {
        Self { config }
    }

    /// Runs the search and returns the final population.
    ///
    /// Fitness is recomputed after crossover but not after the trailing
    /// mutation pass, so a mutated chromosome reports the support of its
    /// pre-mutation genes; callers that need exact counts for mutated
    /// chromosomes can re-score them with
    /// [`TransactionTable::support`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the parameters are infeasible for the
    /// table (see [`GeneticConfig`]) and [`Error::Data`] when the table is
    /// empty.
    pub fn run<R: Rng>(&self, table: &TransactionTable, rng: &mut R) -> Result<Population> {
        let universe = self.validate(table)?;

        let mut population = self.seed_population(table, rng);
        debug!(
            "seeded {} chromosomes of {} genes",
            population.len(),
            self.config.chromosome_size
        );

        for iteration in 0..self.config.iterations {
            for _ in 0..self.config.tournaments_per_iteration {
                self.tournament(&mut population, table, rng);
            }
            debug!(
                "iteration {}: best fitness {}",
                iteration,
                population.iter().map(Chromosome::fitness).max().unwrap_or(0)
            );
        }

        self.mutate(&mut population, &universe, rng);
        Ok(population)
    }

    /// Checks feasibility before any work; returns the distinct item
    /// universe used by the mutation pass.
    fn validate(&self, table: &TransactionTable) -> Result<Vec<Item>> {
        let config = &self.config;
        if config.chromosome_size == 0 {
            return Err(Error::Config("chromosome_size must be at least 1".to_string()));
        }
        if config.population_size == 0 {
            return Err(Error::Config("population_size must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&config.mutation_probability) {
            return Err(Error::Config(format!(
                "mutation_probability {} is outside [0, 1]",
                config.mutation_probability
            )));
        }
        if table.is_empty() {
            return Err(Error::Data("empty transaction table".to_string()));
        }

        let eligible = table
            .iter()
            .filter(|txn| txn.len() >= config.chromosome_size)
            .count();
        if eligible < config.population_size {
            return Err(Error::Config(format!(
                "population_size {} exceeds the {} transactions with at least {} items",
                config.population_size, eligible, config.chromosome_size
            )));
        }

        // A tournament draws two distinct population indices.
        let runs_tournaments = config.iterations > 0 && config.tournaments_per_iteration > 0;
        if config.population_size < 2 && runs_tournaments {
            return Err(Error::Config(
                "population_size must be at least 2 to run tournaments".to_string(),
            ));
        }

        let universe = table.distinct_items();
        if config.mutation_probability > 0.0 && universe.len() <= config.chromosome_size {
            return Err(Error::Config(format!(
                "mutation needs more than {} distinct items, table has {}",
                config.chromosome_size,
                universe.len()
            )));
        }
        Ok(universe)
    }

    /// Seeds the population from distinct transactions with enough items:
    /// each chosen row is shuffled and its first `chromosome_size` items
    /// become a new chromosome's genes.
    fn seed_population<R: Rng>(&self, table: &TransactionTable, rng: &mut R) -> Population {
        let mut used_rows = HashSet::new();
        let mut population = Population::with_capacity(self.config.population_size);
        while population.len() < self.config.population_size {
            let row = rng.gen_range(0..table.len());
            if !used_rows.insert(row) {
                continue;
            }
            let transaction = &table[row];
            if transaction.len() < self.config.chromosome_size {
                continue;
            }
            let mut genes: Vec<Item> = transaction.iter().collect();
            genes.shuffle(rng);
            genes.truncate(self.config.chromosome_size);
            population.push(Chromosome::new(genes, table));
        }
        population
    }

    /// One tournament: pick two parents, recombine copies of them, and
    /// commit each offspring to its parent's slot if it scores at least as
    /// well.
    fn tournament<R: Rng>(&self, population: &mut Population, table: &TransactionTable, rng: &mut R) {
        let first = pick_parent(population, rng);
        let second = pick_parent(population, rng);

        let mut first_offspring = population[first].clone();
        let mut second_offspring = population[second].clone();
        crossover(&mut first_offspring, &mut second_offspring, rng);
        first_offspring.refresh_fitness(table);
        second_offspring.refresh_fitness(table);

        population.commit(first, first_offspring);
        population.commit(second, second_offspring);
    }

    /// Mutation pass over the whole population: with
    /// `mutation_probability`, one random gene position is overwritten by a
    /// universe item re-drawn until it is not already present in that
    /// chromosome. Cached fitness values are left as they were before the
    /// pass.
    fn mutate<R: Rng>(&self, population: &mut Population, universe: &[Item], rng: &mut R) {
        for slot in &mut population.slots {
            if rng.gen::<f64>() < self.config.mutation_probability {
                let position = rng.gen_range(0..slot.genes.len());
                let mut replacement = universe[rng.gen_range(0..universe.len())];
                while slot.genes.contains(&replacement) {
                    replacement = universe[rng.gen_range(0..universe.len())];
                }
                slot.genes[position] = replacement;
            }
        }
    }
}

/// Draws two distinct slots and returns the fitter one.
fn pick_parent<R: Rng>(population: &Population, rng: &mut R) -> usize {
    let first = rng.gen_range(0..population.len());
    let mut second = rng.gen_range(0..population.len());
    while second == first {
        second = rng.gen_range(0..population.len());
    }
    if population[first].fitness() >= population[second].fitness() {
        first
    } else {
        second
    }
}

/// Recombines the genes the parents do not share.
///
/// A uniformly drawn number of positions (possibly zero) swap one of the
/// first chromosome's unique genes for one of the second's, with the mirror
/// swap on the second chromosome. Shared genes never move, so both
/// chromosomes keep their length and stay duplicate-free. Parents sharing
/// every gene are left untouched.
fn crossover<R: Rng>(first: &mut Chromosome, second: &mut Chromosome, rng: &mut R) {
    let first_unique: Vec<Item> = first
        .genes
        .iter()
        .copied()
        .filter(|gene| !second.genes.contains(gene))
        .collect();
    let second_unique: Vec<Item> = second
        .genes
        .iter()
        .copied()
        .filter(|gene| !first.genes.contains(gene))
        .collect();
    if first_unique.is_empty() {
        return;
    }

    let swaps = rng.gen_range(0..first_unique.len());
    for i in 0..swaps {
        swap_gene(&mut first.genes, first_unique[i], second_unique[i]);
        swap_gene(&mut second.genes, second_unique[i], first_unique[i]);
    }
}

/// Removes `out` and appends `incoming`, keeping the gene count fixed.
fn swap_gene(genes: &mut Vec<Item>, out: Item, incoming: Item) {
    if let Some(position) = genes.iter().position(|&gene| gene == out) {
        genes.remove(position);
        genes.push(incoming);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    use super::*;

    fn demo_table() -> TransactionTable {
        // Six customers over eight products; every row has at least three
        // items, so any chromosome_size up to 3 is feasible.
        TransactionTable::from_rows(vec![
            vec![1, 2, 3, 4, 5],
            vec![1, 2, 3, 6],
            vec![2, 3, 4, 7],
            vec![1, 3, 5, 8],
            vec![2, 4, 6, 8],
            vec![1, 2, 3, 4],
        ])
    }

    fn config() -> GeneticConfig {
        GeneticConfig::new(3, 4)
            .with_iterations(20)
            .with_tournaments(10)
            .with_mutation_probability(0.0)
    }

    fn items(ids: &[u32]) -> Vec<Item> {
        ids.iter().map(|&id| Item::new(id)).collect()
    }

    #[test]
    fn test_population_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let population = GeneticSearch::new(config()).run(&demo_table(), &mut rng).unwrap();
        assert_eq!(population.len(), 4);
        for chromosome in population.iter() {
            assert_eq!(chromosome.genes().len(), 3);
        }
    }

    #[test]
    fn test_no_duplicate_genes_after_mutation() {
        // Mutation probability 1 touches every chromosome.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let search = GeneticSearch::new(config().with_mutation_probability(1.0));
        let population = search.run(&demo_table(), &mut rng).unwrap();
        for chromosome in population.iter() {
            let mut genes = chromosome.genes().to_vec();
            genes.sort_unstable();
            genes.dedup();
            assert_eq!(genes.len(), 3, "{}", chromosome);
        }
    }

    #[test]
    fn test_fitness_matches_support_without_mutation() {
        let table = demo_table();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let population = GeneticSearch::new(config()).run(&table, &mut rng).unwrap();
        for chromosome in population.iter() {
            assert_eq!(chromosome.fitness(), table.support(chromosome.genes()));
            // Genes were seeded from a real transaction, so some
            // transaction always contains them.
            assert!(chromosome.fitness() >= 1);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let table = demo_table();
        let search = GeneticSearch::new(config().with_mutation_probability(0.5));
        let mut rng = ChaCha8Rng::seed_from_u64(123);
        let a = search.run(&table, &mut rng).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(123);
        let b = search.run(&table, &mut rng).unwrap();
        assert!(a.iter().eq(b.iter()));
    }

    #[test]
    fn test_commit_never_lowers_fitness() {
        let table = demo_table();
        let mut population = Population {
            slots: vec![Chromosome::new(items(&[1, 2, 3]), &table)],
        };
        let before = population[0].fitness();
        assert_eq!(before, 3);

        let worse = Chromosome { genes: items(&[6, 7, 8]), fitness: 0 };
        assert!(!population.commit(0, worse));
        assert_eq!(population[0].fitness(), before);

        // A tie replaces the occupant; the fitness still does not drop.
        let equal = Chromosome { genes: items(&[2, 3, 4]), fitness: before };
        assert!(population.commit(0, equal.clone()));
        assert_eq!(population[0], equal);
    }

    #[test]
    fn test_crossover_swaps_only_unique_genes() {
        let table = demo_table();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut a = Chromosome::new(items(&[1, 2, 3]), &table);
        let mut b = Chromosome::new(items(&[3, 4, 5]), &table);
        crossover(&mut a, &mut b, &mut rng);

        assert_eq!(a.genes().len(), 3);
        assert_eq!(b.genes().len(), 3);
        // The shared gene stays on both sides.
        assert!(a.genes().contains(&Item::new(3)));
        assert!(b.genes().contains(&Item::new(3)));
        // Swaps move genes between the parents, never invent or drop any.
        let mut combined: Vec<Item> = a.genes().iter().chain(b.genes().iter()).copied().collect();
        combined.sort_unstable();
        assert_eq!(combined, items(&[1, 2, 3, 3, 4, 5]));
    }

    #[test]
    fn test_crossover_noop_for_identical_parents() {
        let table = demo_table();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut a = Chromosome::new(items(&[1, 2, 3]), &table);
        let mut b = Chromosome::new(items(&[3, 1, 2]), &table);
        let before_a = a.clone();
        let before_b = b.clone();
        crossover(&mut a, &mut b, &mut rng);
        assert_eq!(a, before_a);
        assert_eq!(b, before_b);
    }

    #[test]
    fn test_rejects_oversized_chromosome() {
        // One transaction of five items cannot seed six-gene chromosomes.
        let table = TransactionTable::from_rows(vec![vec![1, 2, 3, 4, 5]]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = GeneticSearch::new(GeneticConfig::new(6, 1)).run(&table, &mut rng);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_infeasible_population_size() {
        // Seeding uses distinct rows, so the population cannot outnumber
        // the eligible transactions.
        let table = TransactionTable::from_rows(vec![vec![1, 2, 3], vec![2, 3, 4]]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = GeneticSearch::new(GeneticConfig::new(2, 3)).run(&table, &mut rng);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_mutation_probability() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let search = GeneticSearch::new(config().with_mutation_probability(1.5));
        let result = search.run(&demo_table(), &mut rng);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_empty_table() {
        let table = TransactionTable::from_rows(Vec::<Vec<u32>>::new());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = GeneticSearch::new(config()).run(&table, &mut rng);
        assert!(matches!(result, Err(Error::Data(_))));
    }

    #[test]
    fn test_chromosome_display() {
        let chromosome = Chromosome { genes: items(&[5, 1, 9]), fitness: 3 };
        assert_eq!(chromosome.to_string(), "fitness:    3  items: [5, 1, 9]");
    }
}
