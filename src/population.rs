//! Population lifecycle and the generational loop.
//!
//! [`Population`] owns the evolving set of genomes and drives one run:
//! representation-driven initialization ([`gen_population`]), then
//! [`run`], which repeats {store elites → selection → crossover →
//! mutation → re-admit elites → fitness refresh → report} once per
//! generation. The individuals collection is replaced wholesale at each
//! step — never edited element-by-element — which keeps generation
//! boundaries crisp and elitism trivially correct.
//!
//! The loop is single-threaded and synchronous; all randomness flows
//! through one seeded [`StdRng`] owned by the population, so a fixed
//! [`GaConfig::seed`] reproduces a run exactly.
//!
//! [`gen_population`]: Population::gen_population
//! [`run`]: Population::run

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::GaConfig;
use crate::error::Error;
use crate::fitness::{FitnessFn, FitnessPolicy};
use crate::genome::{Genes, Genome};
use crate::mutation::Mutation;
use crate::report::{GenerationStats, NullObserver, Observer};
use crate::representation::{Kind, Representation};

/// The evolving set of candidate solutions.
pub struct Population<F: FitnessFn> {
    representation: Representation,
    config: GaConfig,
    fitness_fn: F,
    policy: FitnessPolicy,
    size: usize,
    elite_count: usize,
    individuals: Vec<Genome>,
    elite_reserve: Vec<Genome>,
    generation: usize,
    rng: StdRng,
}

impl<F: FitnessFn> Population<F> {
    /// Builds an empty population for one run.
    ///
    /// Validates the configuration and its compatibility with the
    /// representation, rounds the population size (and elite count) up to
    /// even, and seeds the run's random source. Call
    /// [`gen_population`](Self::gen_population) next.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] from [`GaConfig::validate`], or when the
    /// mutation strategy cannot operate on the representation's gene kind
    /// (bit-flip needs binary genes, generalization needs chunk-aligned
    /// symbolic genes, variable-length mutation needs a representation
    /// declared variable-length).
    pub fn new(
        representation: Representation,
        fitness_fn: F,
        config: GaConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        check_operator_compatibility(&representation, &config)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            size: config.effective_population_size(),
            elite_count: config.effective_elite_count(),
            policy: config.fitness_policy(),
            representation,
            fitness_fn,
            config,
            individuals: Vec::new(),
            elite_reserve: Vec::new(),
            generation: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Materializes the initial individuals from the representation.
    ///
    /// Fitness caches start empty; they fill lazily on the first
    /// statistics access or at the start of [`run`](Self::run).
    pub fn gen_population(&mut self) {
        self.individuals = (0..self.size)
            .map(|_| random_genome(&self.representation, &mut self.rng))
            .collect();
        self.elite_reserve.clear();
        self.generation = 0;
        debug!(size = self.size, kind = self.representation.kind().name(), "population generated");
    }

    /// Runs the generational loop: one evolutionary step per generation
    /// `1..generations`. `run(0)` and `run(1)` only evaluate the initial
    /// population.
    pub fn run(&mut self, generations: usize) -> Result<(), Error> {
        self.run_with_observer(generations, &mut NullObserver)
    }

    /// [`run`](Self::run), reporting each generation's statistics to
    /// `observer`.
    pub fn run_with_observer<O: Observer + ?Sized>(
        &mut self,
        generations: usize,
        observer: &mut O,
    ) -> Result<(), Error> {
        if self.individuals.is_empty() {
            return Err(Error::invariant(
                "run on an empty population; call gen_population first",
            ));
        }
        self.evaluate_all()?;
        for _ in 1..generations {
            self.step(observer)?;
        }
        info!(
            generation = self.generation,
            best_fitness = self.max_individual().fitness(),
            "run complete"
        );
        Ok(())
    }

    /// One full generation.
    fn step<O: Observer + ?Sized>(&mut self, observer: &mut O) -> Result<(), Error> {
        self.store_elites();
        self.select_parents()?;
        self.crossover()?;
        self.mutate()?;
        self.load_elites();
        self.evaluate_all()?;
        self.generation += 1;

        let stats = self.stats();
        debug!(
            generation = stats.generation,
            mean_fitness = stats.mean_fitness,
            best_fitness = stats.best_fitness,
            "generation evolved"
        );
        observer.on_generation(&stats, self.max_individual(), self.min_individual());
        Ok(())
    }

    /// Withholds the `elite_count` fittest individuals from this
    /// generation's operators. Ties break toward the earliest index.
    fn store_elites(&mut self) {
        while self.elite_reserve.len() < self.elite_count && !self.individuals.is_empty() {
            let mut best = 0;
            for i in 1..self.individuals.len() {
                if self.individuals[i].fitness() > self.individuals[best].fitness() {
                    best = i;
                }
            }
            let elite = self.individuals.remove(best);
            self.elite_reserve.push(elite);
        }
    }

    /// Re-admits the withheld elites unchanged.
    fn load_elites(&mut self) {
        self.individuals.append(&mut self.elite_reserve);
    }

    /// Replaces the population with selected parent copies.
    fn select_parents(&mut self) -> Result<(), Error> {
        let before = self.individuals.len();
        let selected = self.config.selection.apply(&self.individuals, &mut self.rng);
        if selected.len() != before {
            return Err(Error::invariant(format!(
                "selection changed population size: {before} -> {}",
                selected.len()
            )));
        }
        self.individuals = selected;
        Ok(())
    }

    /// Pairs individuals in encounter order and recombines each pair
    /// with the configured probability. Always rebuilds every genome so
    /// no fitness cache survives into the new generation's gene state.
    fn crossover(&mut self) -> Result<(), Error> {
        let before = self.individuals.len();
        let pairs = self.individuals.chunks_exact(2);
        if !pairs.remainder().is_empty() {
            return Err(Error::invariant(format!(
                "population of size {before} cannot be paired for crossover"
            )));
        }

        let operator = self.config.crossover;
        let probability = self.config.crossover_probability;
        let mut next = Vec::with_capacity(before);
        for pair in pairs {
            let (male, female) = (&pair[0], &pair[1]);
            if self.rng.random_range(0.0..1.0) < probability {
                let (child1, child2) =
                    operator.apply(male.genes(), female.genes(), &mut self.rng)?;
                next.push(Genome::new(child1));
                next.push(Genome::new(child2));
            } else {
                next.push(Genome::new(male.genes().clone()));
                next.push(Genome::new(female.genes().clone()));
            }
        }

        if next.len() != before {
            return Err(Error::invariant(format!(
                "crossover changed population size: {before} -> {}",
                next.len()
            )));
        }
        self.individuals = next;
        Ok(())
    }

    /// Mutates each individual with the configured probability.
    /// Per-allele operators are invoked unconditionally and consume the
    /// probability internally (their declared contract).
    fn mutate(&mut self) -> Result<(), Error> {
        let operator = self.config.mutation;
        let probability = self.config.mutation_probability;
        let per_allele = operator.applies_probability_per_allele();
        let fixed_length =
            (!self.representation.is_variable_length()).then(|| self.representation.length());

        for i in 0..self.individuals.len() {
            if !per_allele && self.rng.random_range(0.0..1.0) >= probability {
                continue;
            }
            let genes = operator.apply(self.individuals[i].genes(), probability, &mut self.rng)?;
            if let Some(expected) = fixed_length {
                if genes.len() != expected {
                    return Err(Error::invariant(format!(
                        "mutation changed genome length {expected} -> {} on a \
                         fixed-length representation",
                        genes.len()
                    )));
                }
            }
            self.individuals[i] = Genome::new(genes);
        }
        Ok(())
    }

    /// Fills every empty fitness cache. Genomes are immutable, so an
    /// already-cached score is still valid and is not recomputed.
    fn evaluate_all(&self) -> Result<(), Error> {
        for genome in &self.individuals {
            genome.evaluate(&self.fitness_fn, self.policy)?;
        }
        Ok(())
    }

    /// Aggregate statistics for the current generation.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty or not yet evaluated.
    pub fn stats(&self) -> GenerationStats {
        let n = self.individuals.len();
        let total = self.total_fitness();
        let mean_length = self
            .individuals
            .iter()
            .map(|g| g.len() as f64)
            .sum::<f64>()
            / n as f64;
        GenerationStats {
            generation: self.generation,
            total_fitness: total,
            mean_fitness: total / n as f64,
            best_fitness: self.max_individual().fitness(),
            worst_fitness: self.min_individual().fitness(),
            mean_length,
        }
    }

    /// Sum of normalized fitness over the population.
    pub fn total_fitness(&self) -> f64 {
        self.individuals.iter().map(Genome::fitness).sum()
    }

    /// Mean normalized fitness.
    pub fn mean_fitness(&self) -> f64 {
        self.total_fitness() / self.individuals.len() as f64
    }

    /// The fittest individual by normalized fitness; first seen wins
    /// ties.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty.
    pub fn max_individual(&self) -> &Genome {
        assert!(!self.individuals.is_empty(), "population is empty");
        let mut best = &self.individuals[0];
        for genome in &self.individuals[1..] {
            if genome.fitness() > best.fitness() {
                best = genome;
            }
        }
        best
    }

    /// The least fit individual by normalized fitness; first seen wins
    /// ties.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty.
    pub fn min_individual(&self) -> &Genome {
        assert!(!self.individuals.is_empty(), "population is empty");
        let mut worst = &self.individuals[0];
        for genome in &self.individuals[1..] {
            if genome.fitness() < worst.fitness() {
                worst = genome;
            }
        }
        worst
    }

    /// The individuals of the current generation.
    pub fn individuals(&self) -> &[Genome] {
        &self.individuals
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// True before [`gen_population`](Self::gen_population) has run.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Completed-generation counter; 0 for the initial population.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The run's representation.
    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    /// Recomputes an individual's raw (unnormalized) fitness for
    /// reporting.
    pub fn raw_fitness(&self, genome: &Genome) -> Result<f64, Error> {
        genome.raw_fitness(&self.fitness_fn)
    }
}

impl<'a, F: FitnessFn> IntoIterator for &'a Population<F> {
    type Item = &'a Genome;
    type IntoIter = std::slice::Iter<'a, Genome>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

/// Construction-time check that the configured mutation can operate on
/// the representation's genes.
fn check_operator_compatibility(
    representation: &Representation,
    config: &GaConfig,
) -> Result<(), Error> {
    match config.mutation {
        Mutation::BitFlip => {
            if !matches!(representation.kind(), Kind::Binary) {
                return Err(Error::configuration(format!(
                    "bit-flip mutation needs a binary representation, got {}",
                    representation.kind().name()
                )));
            }
        }
        Mutation::Swap => {}
        Mutation::Generalize { chunk_len, .. } => {
            check_chunked_enum(representation, chunk_len)?;
        }
        Mutation::GeneralizeVariable { chunk_len, .. } => {
            check_chunked_enum(representation, chunk_len)?;
            if !representation.is_variable_length() {
                return Err(Error::configuration(
                    "variable-length mutation needs a representation declared variable-length",
                ));
            }
        }
    }
    Ok(())
}

fn check_chunked_enum(representation: &Representation, chunk_len: usize) -> Result<(), Error> {
    if !matches!(representation.kind(), Kind::Enum { .. }) {
        return Err(Error::configuration(format!(
            "generalization mutation needs an enum representation, got {}",
            representation.kind().name()
        )));
    }
    if representation.length() % chunk_len != 0 {
        return Err(Error::configuration(format!(
            "representation length {} is not a multiple of the chunk length {chunk_len}",
            representation.length()
        )));
    }
    Ok(())
}

/// Draws one genome according to the representation.
fn random_genome<R: Rng>(representation: &Representation, rng: &mut R) -> Genome {
    let length = representation.length();
    let genes = match representation.kind() {
        // Independent uniform bits: the binary expansion of a uniform
        // integer in [0, 2^length), without the 64-bit width limit.
        Kind::Binary => Genes::Binary((0..length).map(|_| rng.random_bool(0.5)).collect()),
        Kind::Integer { min, max } => {
            Genes::Integer((0..length).map(|_| rng.random_range(*min..=*max)).collect())
        }
        Kind::Float { min, max } => {
            Genes::Float((0..length).map(|_| rng.random_range(*min..=*max)).collect())
        }
        Kind::Enum {
            values,
            allow_duplicates: true,
        } => Genes::Symbolic(
            (0..length)
                .map(|_| values[rng.random_range(0..values.len())].clone())
                .collect(),
        ),
        Kind::Enum {
            values,
            allow_duplicates: false,
        } => {
            let mut permutation = values.clone();
            permutation.shuffle(rng);
            Genes::Symbolic(permutation)
        }
    };
    Genome::new(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossover::Crossover;
    use crate::fitness::{self, TourLength};
    use crate::selection::Selection;

    fn symbols(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn sorted_genes(population: &[Genome]) -> Vec<Genes> {
        let mut genes: Vec<Genes> = population.iter().map(|g| g.genes().clone()).collect();
        genes.sort_by_key(|g| format!("{g:?}"));
        genes
    }

    fn binary_config() -> GaConfig {
        GaConfig::default().with_seed(42)
    }

    #[test]
    fn test_gen_population_rounds_odd_size_up() {
        let rep = Representation::binary(8).unwrap();
        let config = binary_config().with_population_size(5).with_elite_count(2);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();
        assert_eq!(population.len(), 6);
    }

    #[test]
    fn test_gen_population_binary() {
        let rep = Representation::binary(12).unwrap();
        let mut population =
            Population::new(rep, fitness::all_ones, binary_config().with_population_size(10))
                .unwrap();
        population.gen_population();

        for genome in &population {
            assert_eq!(genome.len(), 12);
            assert!(matches!(genome.genes(), Genes::Binary(_)));
        }
    }

    #[test]
    fn test_gen_population_integer_respects_bounds() {
        let rep = Representation::integer_in(6, -3, 3).unwrap();
        let config = binary_config().with_mutation(Mutation::Swap).with_population_size(20);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();

        for genome in &population {
            let Genes::Integer(ints) = genome.genes() else {
                panic!("expected integer genes");
            };
            assert!(ints.iter().all(|&i| (-3..=3).contains(&i)));
        }
    }

    #[test]
    fn test_gen_population_float_respects_default_bounds() {
        let rep = Representation::float(6).unwrap();
        let config = binary_config().with_mutation(Mutation::Swap).with_population_size(20);
        let mut population = Population::new(rep, fitness::all_small, config).unwrap();
        population.gen_population();

        for genome in &population {
            let Genes::Float(floats) = genome.genes() else {
                panic!("expected float genes");
            };
            assert!(floats.iter().all(|&f| (0.0..=1.0).contains(&f)));
        }
    }

    #[test]
    fn test_gen_population_enum_draws_from_value_set() {
        let rep = Representation::enumeration(10, symbols(&["a", "b", "c"])).unwrap();
        let config = binary_config().with_mutation(Mutation::Swap).with_population_size(20);
        let mut population = Population::new(rep, fitness::all_a, config).unwrap();
        population.gen_population();

        for genome in &population {
            let Genes::Symbolic(syms) = genome.genes() else {
                panic!("expected symbolic genes");
            };
            assert_eq!(syms.len(), 10);
            assert!(syms.iter().all(|s| ["a", "b", "c"].contains(&s.as_str())));
        }
    }

    #[test]
    fn test_gen_population_permutations_are_valid() {
        let cities = symbols(&["a", "b", "c", "d", "e"]);
        let rep = Representation::permutation(cities.clone()).unwrap();
        let config = binary_config().with_mutation(Mutation::Swap).with_population_size(20);
        let mut population = Population::new(rep, fitness::all_a, config).unwrap();
        population.gen_population();

        let mut expected = cities;
        expected.sort();
        for genome in &population {
            let Genes::Symbolic(syms) = genome.genes() else {
                panic!("expected symbolic genes");
            };
            let mut sorted = syms.clone();
            sorted.sort();
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn test_noop_pipeline_leaves_population_unchanged() {
        // Singleton tournaments, zero crossover/mutation probability and
        // no elites: a full generation must have no effect beyond
        // reordering.
        let rep = Representation::binary(8).unwrap();
        let config = binary_config()
            .with_population_size(4)
            .with_selection(Selection::Tournament(1))
            .with_crossover_probability(0.0)
            .with_mutation_probability(0.0)
            .with_elite_count(0);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();
        population.evaluate_all().unwrap();

        let before = sorted_genes(population.individuals());
        let bit_count_sum: f64 = population
            .individuals()
            .iter()
            .map(|g| fitness::all_ones(g.genes()))
            .sum();

        population.run(2).unwrap();

        assert_eq!(sorted_genes(population.individuals()), before);
        assert_eq!(population.total_fitness(), bit_count_sum);
        assert_eq!(population.generation(), 1);
    }

    #[test]
    fn test_population_size_constant_and_even_across_generations() {
        let rep = Representation::binary(16).unwrap();
        let config = binary_config()
            .with_population_size(9)
            .with_mutation_probability(0.5)
            .with_crossover_probability(0.8)
            .with_elite_count(3);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();

        let mut sizes = Vec::new();
        let mut observer = |stats: &GenerationStats, _: &Genome, _: &Genome| {
            sizes.push((stats.generation, stats.total_fitness));
        };
        population.run_with_observer(6, &mut observer).unwrap();

        assert_eq!(population.len(), 10);
        assert_eq!(sizes.len(), 5);
        assert_eq!(
            sizes.iter().map(|(g, _)| *g).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_elites_survive_bit_for_bit() {
        let rep = Representation::binary(16).unwrap();
        let config = binary_config()
            .with_population_size(10)
            .with_selection(Selection::Tournament(3))
            .with_crossover_probability(1.0)
            .with_mutation_probability(1.0)
            .with_elite_count(2);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();
        population.evaluate_all().unwrap();

        // The top two by fitness, ties to the earliest index.
        let mut ranked: Vec<&Genome> = population.individuals().iter().collect();
        ranked.sort_by(|a, b| b.fitness().partial_cmp(&a.fitness()).unwrap());
        let elites: Vec<Genome> = ranked[..2].iter().map(|g| (*g).clone()).collect();

        population.run(2).unwrap();

        for elite in &elites {
            assert!(
                population.individuals().iter().any(|g| g == elite),
                "elite genome missing from next generation"
            );
        }
    }

    #[test]
    fn test_elitism_never_degrades_best_fitness() {
        let rep = Representation::binary(20).unwrap();
        let config = binary_config()
            .with_population_size(30)
            .with_selection(Selection::Tournament(3))
            .with_crossover_probability(0.8)
            .with_mutation_probability(0.5)
            .with_elite_count(2);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();

        let mut bests = Vec::new();
        let mut observer = |stats: &GenerationStats, _: &Genome, _: &Genome| {
            bests.push(stats.best_fitness);
        };
        population.run_with_observer(40, &mut observer).unwrap();

        for window in bests.windows(2) {
            assert!(
                window[1] >= window[0],
                "best fitness degraded despite elitism: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_onemax_converges() {
        let rep = Representation::binary(20).unwrap();
        let config = binary_config()
            .with_population_size(50)
            .with_selection(Selection::Tournament(3))
            .with_crossover_probability(0.8)
            .with_mutation_probability(0.3)
            .with_elite_count(2);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();
        population.run(100).unwrap();

        assert!(
            population.max_individual().fitness() >= 15.0,
            "expected >= 15 ones on 20-bit OneMax, got {}",
            population.max_individual().fitness()
        );
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let run = || {
            let rep = Representation::binary(12).unwrap();
            let config = binary_config()
                .with_population_size(10)
                .with_crossover_probability(0.7)
                .with_mutation_probability(0.3)
                .with_elite_count(2);
            let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
            population.gen_population();
            population.run(20).unwrap();
            sorted_genes(population.individuals())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_tie_break_is_first_seen() {
        let rep = Representation::binary(2).unwrap();
        let config = binary_config().with_population_size(4).with_elite_count(0);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.individuals = vec![
            Genome::new(Genes::Binary(vec![true, false])),
            Genome::new(Genes::Binary(vec![false, true])),
            Genome::new(Genes::Binary(vec![true, true])),
            Genome::new(Genes::Binary(vec![false, false])),
        ];
        population.evaluate_all().unwrap();

        // Indices 0 and 1 tie on fitness 1.0; index 0 wins neither max
        // nor min outright but must be preferred over index 1 everywhere.
        assert!(std::ptr::eq(
            population.max_individual(),
            &population.individuals()[2]
        ));
        assert!(std::ptr::eq(
            population.min_individual(),
            &population.individuals()[3]
        ));

        // With the extremes removed, the tied pair resolves to index 0.
        population.individuals.truncate(2);
        assert!(std::ptr::eq(
            population.max_individual(),
            &population.individuals()[0]
        ));
        assert!(std::ptr::eq(
            population.min_individual(),
            &population.individuals()[0]
        ));
    }

    #[test]
    fn test_inverted_fitness_prefers_low_raw_scores() {
        let tour = TourLength::new(
            symbols(&["a", "b", "c", "d"]),
            vec![
                vec![0.0, 1.0, 9.0, 4.0],
                vec![1.0, 0.0, 2.0, 8.0],
                vec![9.0, 2.0, 0.0, 3.0],
                vec![4.0, 8.0, 3.0, 0.0],
            ],
        )
        .unwrap();
        let rep = Representation::permutation(symbols(&["a", "b", "c", "d"])).unwrap();
        let config = binary_config()
            .with_population_size(12)
            .with_selection(Selection::Tournament(4))
            .with_crossover(Crossover::Noop)
            .with_mutation(Mutation::Swap)
            .with_mutation_probability(0.5)
            .with_elite_count(2)
            .with_natural_fitness(false);
        let mut population = Population::new(rep, tour, config).unwrap();
        population.gen_population();
        population.run(30).unwrap();

        let best = population.max_individual();
        let worst = population.min_individual();
        let best_raw = population.raw_fitness(best).unwrap();
        let worst_raw = population.raw_fitness(worst).unwrap();
        assert!(
            best_raw <= worst_raw,
            "inverted fitness must rank shorter tours higher: {best_raw} vs {worst_raw}"
        );
        // Optimal tour a-b-c-d scores 1 + 2 + 3 + 4 = 10.
        assert!(best_raw >= 10.0);
    }

    #[test]
    fn test_permutations_stay_valid_through_evolution() {
        let cities = symbols(&["a", "b", "c", "d", "e", "f"]);
        let mut expected = cities.clone();
        expected.sort();

        let rep = Representation::permutation(cities.clone()).unwrap();
        let config = binary_config()
            .with_population_size(10)
            .with_selection(Selection::Tournament(3))
            .with_crossover(Crossover::Noop)
            .with_mutation(Mutation::Swap)
            .with_mutation_probability(0.8)
            .with_elite_count(2);
        let mut population = Population::new(rep, fitness::all_a, config).unwrap();
        population.gen_population();

        let mut observer = |_: &GenerationStats, best: &Genome, _: &Genome| {
            let Genes::Symbolic(syms) = best.genes() else {
                panic!("expected symbolic genes");
            };
            let mut sorted = syms.clone();
            sorted.sort();
            assert_eq!(sorted, expected);
        };
        population.run_with_observer(20, &mut observer).unwrap();

        for genome in &population {
            let Genes::Symbolic(syms) = genome.genes() else {
                panic!("expected symbolic genes");
            };
            let mut sorted = syms.clone();
            sorted.sort();
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn test_variable_length_run_keeps_chunk_alignment() {
        let rep = Representation::enumeration(16, symbols(&["0", "1"]))
            .unwrap()
            .with_variable_length();
        let config = binary_config()
            .with_population_size(10)
            .with_selection(Selection::Tournament(3))
            .with_crossover(Crossover::Uniform)
            .with_crossover_probability(0.2)
            .with_mutation(Mutation::generalize_variable(4))
            .with_mutation_probability(0.05)
            .with_elite_count(2);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();

        population.run(15).unwrap();

        for genome in &population {
            assert!(genome.len() >= 4, "genome shrank below one chunk");
            assert_eq!(genome.len() % 4, 0, "genome lost chunk alignment");
        }
        let stats = population.stats();
        assert!(stats.mean_length >= 4.0);
        assert!(stats.mean_length <= 16.0);
    }

    #[test]
    fn test_fixed_length_violation_is_an_invariant_error() {
        // A variable-length operator on a representation that was never
        // declared variable-length is refused up front.
        let rep = Representation::enumeration(8, symbols(&["0", "1"])).unwrap();
        let config = binary_config().with_mutation(Mutation::generalize_variable(4));
        assert!(matches!(
            Population::new(rep, fitness::all_ones, config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_operator_kind_mismatch_rejected_at_construction() {
        let rep = Representation::float(8).unwrap();
        let config = binary_config(); // bit-flip mutation by default
        assert!(matches!(
            Population::new(rep, fitness::all_small, config),
            Err(Error::Configuration(_))
        ));

        let rep = Representation::binary(8).unwrap();
        let config = binary_config().with_mutation(Mutation::generalize(4));
        assert!(matches!(
            Population::new(rep, fitness::all_ones, config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_misaligned_chunk_length_rejected() {
        let rep = Representation::enumeration(10, symbols(&["0", "1"])).unwrap();
        let config = binary_config().with_mutation(Mutation::generalize(4));
        assert!(matches!(
            Population::new(rep, fitness::all_ones, config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let rep = Representation::binary(8).unwrap();
        let config = binary_config().with_crossover_probability(2.0);
        assert!(matches!(
            Population::new(rep, fitness::all_ones, config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_invalid_genome_aborts_the_run() {
        // A fitness function that rejects everything: the run surfaces
        // the error instead of retrying.
        struct Rejecting;
        impl FitnessFn for Rejecting {
            fn evaluate(&self, _: &Genes, _: bool) -> Result<f64, Error> {
                Err(Error::invalid_genome("always invalid"))
            }
        }

        let rep = Representation::binary(8).unwrap();
        let config = binary_config().with_population_size(4).with_elite_count(0);
        let mut population = Population::new(rep, Rejecting, config).unwrap();
        population.gen_population();
        assert!(matches!(
            population.run(5),
            Err(Error::InvalidGenome(_))
        ));
    }

    #[test]
    fn test_run_zero_or_one_generations_only_evaluates() {
        let rep = Representation::binary(8).unwrap();
        let config = binary_config().with_population_size(4).with_elite_count(0);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();
        let before = sorted_genes(population.individuals());

        population.run(1).unwrap();
        assert_eq!(population.generation(), 0);
        assert_eq!(sorted_genes(population.individuals()), before);
        assert!(population.individuals().iter().all(Genome::is_evaluated));
    }

    #[test]
    fn test_observer_sees_best_and_worst() {
        let rep = Representation::binary(8).unwrap();
        let config = binary_config()
            .with_population_size(8)
            .with_mutation_probability(0.2)
            .with_elite_count(2);
        let mut population = Population::new(rep, fitness::all_ones, config).unwrap();
        population.gen_population();

        let mut observer = |stats: &GenerationStats, best: &Genome, worst: &Genome| {
            assert_eq!(stats.best_fitness, best.fitness());
            assert_eq!(stats.worst_fitness, worst.fitness());
            assert!(best.fitness() >= worst.fitness());
            assert!(stats.mean_fitness <= stats.best_fitness);
            assert!(stats.mean_fitness >= stats.worst_fitness);
        };
        population.run_with_observer(10, &mut observer).unwrap();
    }
}
