use pdprune::config::{BirthDeathConfig, ExperimentConfig, ExtinctionConfig};
use pdprune::diversity::{compare_diversity, ensemble_diversity, phylogenetic_diversity};
use pdprune::error::{ConfigError, ExperimentError, GenerationError};
use pdprune::experiment::{matched_extinction_rates, run_birth_death_taxa, run_birth_death_time, run_kingman};
use pdprune::simulate::{Kingman, generate_ensemble};
use pdprune::traits::{BinaryTrait, TraitTree};

fn small_config(replicates: usize) -> ExperimentConfig {
    ExperimentConfig {
        replicates,
        birth_death: BirthDeathConfig {
            num_taxa: 20,
            ..BirthDeathConfig::default()
        },
        ..ExperimentConfig::default()
    }
}

#[test]
fn test_birth_death_taxa_scenario() {
    // 10 trees of 20 taxa through the whole pipeline
    let outcome = run_birth_death_taxa(&small_config(10)).unwrap();

    assert_eq!(outcome.replicates(), 10);
    assert_eq!(outcome.random_pruned.len(), 10);
    assert_eq!(outcome.trait_pruned.len(), 10);
    assert_eq!(outcome.original_diversity.len(), 10);
    assert_eq!(outcome.taxa.num_labels(), 20);

    for (index, (random, selective)) in outcome.diversity.pairs().enumerate() {
        let original = outcome.original_diversity[index];
        assert!(random <= original + 1e-9);
        assert!(selective <= original + 1e-9);
        assert_eq!(random, phylogenetic_diversity(&outcome.random_pruned[index].tree));
        assert_eq!(selective, phylogenetic_diversity(&outcome.trait_pruned[index].tree));
        assert!(outcome.trait_pruned[index].num_leaves() <= 20);
        assert!(outcome.trait_pruned[index].tree.is_valid());
    }

    let (random_pruned, trait_pruned, diversity) = outcome.into_parts();
    assert_eq!(diversity, compare_diversity(&random_pruned, &trait_pruned));
}

#[test]
fn test_runs_are_reproducible() {
    let config = small_config(6);
    let first = run_birth_death_taxa(&config).unwrap();
    let second = run_birth_death_taxa(&config).unwrap();
    assert_eq!(first.diversity, second.diversity);
    assert_eq!(first.original_diversity, second.original_diversity);

    let other = run_birth_death_taxa(&ExperimentConfig {
        seed: config.seed + 1,
        ..config
    })
    .unwrap();
    assert_ne!(first.original_diversity, other.original_diversity);
}

#[test]
fn test_matched_null_removes_as_many_taxa() {
    let outcome = run_birth_death_taxa(&small_config(200)).unwrap();
    let originals = 20;

    let mut trait_removed = 0.0;
    let mut random_removed = 0.0;
    let mut variance = 0.0;
    for (selective, random) in outcome.trait_pruned.iter().zip(&outcome.random_pruned) {
        let removed = (originals - selective.num_leaves()) as f64;
        let rate = removed / originals as f64;
        trait_removed += removed;
        random_removed += (originals - random.num_leaves()) as f64;
        variance += originals as f64 * rate * (1.0 - rate);
    }
    assert!(
        (trait_removed - random_removed).abs() <= 5.0 * variance.sqrt() + 1.0,
        "trait removed {trait_removed}, random removed {random_removed}"
    );
}

#[test]
fn test_matched_extinction_rates() {
    let provider = Kingman::new(20, 20.0).unwrap();
    let (trees, _) = generate_ensemble(&provider, 2, 1).unwrap();
    let original: Vec<TraitTree<BinaryTrait>> = trees.into_iter().map(TraitTree::unannotated).collect();
    let taxa: Vec<usize> = (0..15).collect();
    let pruned = vec![
        TraitTree::<BinaryTrait>::unannotated(original[0].tree.prune_taxa(&taxa).tree),
        TraitTree::unannotated(original[1].tree.clone()),
    ];
    assert_eq!(matched_extinction_rates(&original, &pruned), vec![0.75, 0.0]);

    let empty = vec![TraitTree::<BinaryTrait>::placeholder()];
    assert_eq!(matched_extinction_rates(&empty, &empty), vec![0.0]);
}

#[test]
fn test_kingman_without_extinction() {
    let config = ExperimentConfig {
        replicates: 8,
        extinction: ExtinctionConfig {
            ext_prob: 0.0,
            ext0: 0.0,
            ext1: 0.0,
        },
        ..ExperimentConfig::default()
    };
    let outcome = run_kingman(&config).unwrap();
    for (index, (random, selective)) in outcome.diversity.pairs().enumerate() {
        let original = outcome.original_diversity[index];
        assert!((random - original).abs() < 1e-9);
        assert!((selective - original).abs() < 1e-9);
    }
    assert!(outcome.trait_pruned.iter().all(|t| t.num_leaves() == 49));
}

#[test]
fn test_kingman_total_extinction() {
    let config = ExperimentConfig {
        replicates: 5,
        extinction: ExtinctionConfig {
            ext_prob: 1.0,
            ext0: 1.0,
            ext1: 1.0,
        },
        ..ExperimentConfig::default()
    };
    let outcome = run_kingman(&config).unwrap();
    assert!(outcome.diversity.pairs().all(|(a, b)| a == 0.0 && b == 0.0));
    assert!(outcome.trait_pruned.iter().all(|t| t.is_placeholder()));
    assert!(outcome.random_pruned.iter().all(|t| t.is_placeholder()));
}

#[test]
fn test_kingman_trait_selectivity() {
    let config = ExperimentConfig {
        replicates: 10,
        extinction: ExtinctionConfig {
            ext_prob: 0.5,
            ext0: 1.0,
            ext1: 0.0,
        },
        ..ExperimentConfig::default()
    };
    let outcome = run_kingman(&config).unwrap();
    for pruned in &outcome.trait_pruned {
        assert!(pruned.leaf_traits().all(|(_, t)| t == Some(&BinaryTrait::One)));
    }
}

#[test]
fn test_birth_death_time() {
    let config = ExperimentConfig {
        replicates: 12,
        ..ExperimentConfig::default()
    };
    let outcome = run_birth_death_time(&config).unwrap();
    assert_eq!(outcome.replicates(), 12);
    assert!(outcome.original_diversity.iter().all(|&pd| pd >= 0.0));
    for (index, (random, selective)) in outcome.diversity.pairs().enumerate() {
        assert!(random <= outcome.original_diversity[index] + 1e-9);
        assert!(selective <= outcome.original_diversity[index] + 1e-9);
    }
    assert_eq!(ensemble_diversity(&outcome.trait_pruned), outcome.diversity.second);
}

#[test]
fn test_invalid_config_rejected() {
    let config = ExperimentConfig {
        replicates: 0,
        ..ExperimentConfig::default()
    };
    assert!(matches!(
        run_kingman(&config),
        Err(ExperimentError::Config(ConfigError::TooSmall { name: "replicates", .. }))
    ));

    let mut config = ExperimentConfig::default();
    config.extinction.ext1 = 1.01;
    assert!(matches!(
        run_birth_death_time(&config),
        Err(ExperimentError::Config(ConfigError::InvalidProbability { name: "ext1", .. }))
    ));
}

#[test]
fn test_generation_failure_surfaces() {
    let config = ExperimentConfig {
        replicates: 3,
        birth_death: BirthDeathConfig {
            birth: 0.01,
            death: 10.0,
            num_taxa: 10,
            max_attempts: 1,
            ..BirthDeathConfig::default()
        },
        ..ExperimentConfig::default()
    };
    assert!(matches!(
        run_birth_death_taxa(&config),
        Err(ExperimentError::Generation(GenerationError::AllAttemptsExtinct { attempts: 1 }))
    ));
}
