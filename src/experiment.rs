//! Experiments comparing trait-linked extinction with random extinction.
//!
//! Each run generates an ensemble of trees, evolves traits along them and
//! prunes every tree twice, once under a trait-dependent extinction policy
//! and once under a trait-independent null policy. Both branches start from
//! the same trees with the same traits; the diversities of the two pruned
//! ensembles are compared slot by slot.
//!
//! | run                      | trees                       | traits             | trait policy       | null policy                    |
//! |--------------------------|-----------------------------|--------------------|--------------------|--------------------------------|
//! | [run_birth_death_taxa]   | birth-death, `num_taxa`     | [MarkovTraitTract] | [TraitFrequency]   | [FieldOfBullets], matched rate |
//! | [run_birth_death_time]   | birth-death, `max_time`     | [MarkovTrait]      | [TraitDependent]   | [FieldOfBullets], `ext_prob`   |
//! | [run_kingman]            | Kingman coalescent          | [MarkovTrait]      | [TraitDependent]   | [FieldOfBullets], `ext_prob`   |
//!
//! Every stage of a run draws from its own stream derived from
//! [ExperimentConfig::seed], so runs are reproducible.

use crate::config::ExperimentConfig;
use crate::diversity::{DiversityComparison, compare_diversity, ensemble_diversity};
use crate::error::{ExperimentError, PruneError};
use crate::extinction::{ExtinctionPolicy, FieldOfBullets, TraitDependent, TraitFrequency};
use crate::model::LeafLabelMap;
use crate::pruning::{prune_ensemble, prune_ensemble_with};
use crate::rng::{Stage, stage_seed};
use crate::simulate::{BirthDeath, Kingman, TreeProvider, generate_ensemble};
use crate::traits::{BinaryTrait, MarkovTrait, MarkovTraitTract, TraitModel, TraitTree, TraitVector, evolve_ensemble};
use log::info;

/// Pruned ensembles of one experiment run.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome<T> {
    /// Ensemble pruned under the trait-independent null policy
    pub random_pruned: Vec<TraitTree<T>>,
    /// Ensemble pruned under the trait-dependent policy
    pub trait_pruned: Vec<TraitTree<T>>,
    /// Diversities; `first` of the random, `second` of the trait-pruned ensemble
    pub diversity: DiversityComparison,
    /// Diversities of the trees before pruning
    pub original_diversity: Vec<f64>,
    /// Taxa shared by all trees
    pub taxa: LeafLabelMap,
}

impl<T> ExperimentOutcome<T> {
    /// Number of trees per ensemble.
    pub fn replicates(&self) -> usize {
        self.diversity.len()
    }

    /// Splits into `(random_pruned, trait_pruned, diversity)`.
    pub fn into_parts(self) -> (Vec<TraitTree<T>>, Vec<TraitTree<T>>, DiversityComparison) {
        (self.random_pruned, self.trait_pruned, self.diversity)
    }
}

/// Per tree, the fraction of leaves that went extinct from `original` to `pruned`.
///
/// This is the extinction probability under which a trait-independent policy
/// removes, in expectation, as many leaves as were actually removed. An empty
/// original tree yields rate 0.
///
/// # Panics
/// Panics if the ensembles differ in length.
pub fn matched_extinction_rates<T, U>(original: &[TraitTree<T>], pruned: &[TraitTree<U>]) -> Vec<f64> {
    assert_eq!(
        original.len(),
        pruned.len(),
        "matched ensembles must be index-aligned"
    );
    original
        .iter()
        .zip(pruned)
        .map(|(before, after)| {
            let total = before.num_leaves();
            if total == 0 {
                0.0
            } else {
                total.saturating_sub(after.num_leaves()) as f64 / total as f64
            }
        })
        .collect()
}

/// Birth-death trees grown to `num_taxa` taxa with trait tracts; extinction
/// by trait frequency against a random null matched per tree.
///
/// # Errors
/// * [ExperimentError::Config] if `config` is invalid
/// * [ExperimentError::Generation] if trees cannot be generated
pub fn run_birth_death_taxa(config: &ExperimentConfig) -> Result<ExperimentOutcome<TraitVector>, ExperimentError> {
    config.validate()?;
    let provider = BirthDeath::to_taxa(&config.birth_death)?;
    let model = MarkovTraitTract::from_config(&config.trait_tract)?;
    info!(
        "birth-death to {} taxa: {} trees, tract length {}",
        config.birth_death.num_taxa,
        config.replicates,
        model.len()
    );

    let (evolved, taxa) = evolved_ensemble(&provider, &model, config)?;
    let trait_pruned = prune_branch(&evolved, &TraitFrequency, config.seed, Stage::TraitExtinction);
    let rates = matched_extinction_rates(&evolved, &trait_pruned);
    let random_pruned = prune_ensemble_with(
        &evolved,
        |index| FieldOfBullets::new(rates[index]).map_err(PruneError::from),
        stage_seed(config.seed, Stage::RandomExtinction),
    );

    Ok(finish(&evolved, random_pruned, trait_pruned, taxa))
}

/// Birth-death trees grown for `max_time` with a single trait; trait-dependent
/// extinction against a field of bullets with `ext_prob`.
///
/// # Errors
/// * [ExperimentError::Config] if `config` is invalid
/// * [ExperimentError::Generation] if trees cannot be generated
pub fn run_birth_death_time(config: &ExperimentConfig) -> Result<ExperimentOutcome<BinaryTrait>, ExperimentError> {
    config.validate()?;
    let provider = BirthDeath::to_time(&config.birth_death)?;
    info!(
        "birth-death for time {}: {} trees",
        config.birth_death.max_time, config.replicates
    );
    run_scalar(&provider, config)
}

/// Kingman coalescent trees with a single trait; trait-dependent extinction
/// against a field of bullets with `ext_prob`.
///
/// # Errors
/// * [ExperimentError::Config] if `config` is invalid
/// * [ExperimentError::Generation] if trees cannot be generated
pub fn run_kingman(config: &ExperimentConfig) -> Result<ExperimentOutcome<BinaryTrait>, ExperimentError> {
    config.validate()?;
    let provider = Kingman::from_config(&config.kingman)?;
    info!(
        "Kingman coalescent of {} leaves: {} trees",
        config.kingman.num_leaves, config.replicates
    );
    run_scalar(&provider, config)
}

fn run_scalar<P: TreeProvider>(
    provider: &P,
    config: &ExperimentConfig,
) -> Result<ExperimentOutcome<BinaryTrait>, ExperimentError> {
    let model = MarkovTrait::from_config(&config.scalar_trait)?;
    let trait_policy = TraitDependent::from_config(&config.extinction)?;
    let null_policy = FieldOfBullets::from_config(&config.extinction)?;

    let (evolved, taxa) = evolved_ensemble(provider, &model, config)?;
    let trait_pruned = prune_branch(&evolved, &trait_policy, config.seed, Stage::TraitExtinction);
    let random_pruned = prune_branch(&evolved, &null_policy, config.seed, Stage::RandomExtinction);

    Ok(finish(&evolved, random_pruned, trait_pruned, taxa))
}

fn evolved_ensemble<P: TreeProvider, M: TraitModel>(
    provider: &P,
    model: &M,
    config: &ExperimentConfig,
) -> Result<(Vec<TraitTree<M::Trait>>, LeafLabelMap), ExperimentError> {
    let (trees, taxa) = generate_ensemble(
        provider,
        config.replicates,
        stage_seed(config.seed, Stage::Generation),
    )?;
    let evolved = evolve_ensemble(trees, model, stage_seed(config.seed, Stage::TraitEvolution));
    Ok((evolved, taxa))
}

fn prune_branch<T, P>(evolved: &[TraitTree<T>], policy: &P, seed: u64, stage: Stage) -> Vec<TraitTree<T>>
where
    T: Clone + Send + Sync,
    P: ExtinctionPolicy<T>,
{
    prune_ensemble(evolved, policy, stage_seed(seed, stage))
}

fn finish<T>(
    evolved: &[TraitTree<T>],
    random_pruned: Vec<TraitTree<T>>,
    trait_pruned: Vec<TraitTree<T>>,
    taxa: LeafLabelMap,
) -> ExperimentOutcome<T> {
    let original_diversity = ensemble_diversity(evolved);
    let diversity = compare_diversity(&random_pruned, &trait_pruned);
    info!(
        "mean diversity: original {:.4}, random {:.4}, trait {:.4}",
        mean(&original_diversity),
        mean(&diversity.first),
        mean(&diversity.second)
    );
    ExperimentOutcome {
        random_pruned,
        trait_pruned,
        diversity,
        original_diversity,
        taxa,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
