use pdprune::error::{ConfigError, GenerationError};
use pdprune::simulate::{BirthDeath, Kingman, StopCondition, TreeProvider, generate_ensemble};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// --- KINGMAN ---
#[test]
fn test_kingman_trees_are_ultrametric() {
    let model = Kingman::new(12, 12.0).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..50 {
        let tree = model.generate(&mut rng).unwrap();
        assert!(tree.is_valid());
        assert!(tree.is_ultrametric());
        assert!(tree.vertices_have_branch_lengths());
        assert_eq!(tree.num_leaves(), 12);
        assert_eq!(tree.root().branch_length(), None);

        let mut taxa: Vec<_> = tree.leaf_labels().copied().collect();
        taxa.sort_unstable();
        assert_eq!(taxa, (0..12).collect::<Vec<_>>());
    }
}

#[test]
fn test_kingman_mean_height() {
    // Expected time to the most recent common ancestor is 2 N (1 - 1/n)
    let (num_leaves, pop_size) = (10, 10.0);
    let model = Kingman::new(num_leaves, pop_size).unwrap();
    let (trees, _) = generate_ensemble(&model, 2000, 5).unwrap();
    let mean = trees.iter().map(|t| t.height()).sum::<f64>() / trees.len() as f64;
    let expected = 2.0 * pop_size * (1.0 - 1.0 / num_leaves as f64);
    assert!((mean - expected).abs() < 1.5, "mean height {mean}, expected {expected}");
}

#[test]
fn test_kingman_rejects_invalid_parameters() {
    assert!(matches!(
        Kingman::new(1, 10.0),
        Err(ConfigError::TooSmall { name: "num_leaves", .. })
    ));
    assert!(matches!(
        Kingman::new(5, 0.0),
        Err(ConfigError::NotPositive { name: "pop_size", .. })
    ));
}

// --- BIRTH-DEATH ---
#[test]
fn test_birth_death_to_taxa() {
    let model = BirthDeath::new(1.0, 0.3, StopCondition::Taxa(20), 1000).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    for _ in 0..30 {
        let tree = model.generate(&mut rng).unwrap();
        assert!(tree.is_valid());
        assert!(tree.is_ultrametric());
        assert_eq!(tree.num_leaves(), 20);
        assert_eq!(tree.root().branch_length(), None);
        // Taxa numbered left to right
        assert_eq!(tree.leaf_labels().copied().collect::<Vec<_>>(), (0..20).collect::<Vec<_>>());
    }
}

#[test]
fn test_pure_birth_to_taxa() {
    let model = BirthDeath::new(1.0, 0.0, StopCondition::Taxa(2), 1).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let tree = model.generate(&mut rng).unwrap();
    assert_eq!(tree.num_vertices(), 3);
    assert!(tree.total_branch_length() > 0.0);
}

#[test]
fn test_birth_death_to_time() {
    let max_time = 4.0;
    let model = BirthDeath::new(0.8, 0.2, StopCondition::Time(max_time), 1000).unwrap();
    assert_eq!(model.stop(), StopCondition::Time(max_time));

    let mut rng = ChaCha8Rng::seed_from_u64(4);
    for _ in 0..30 {
        let tree = model.generate(&mut rng).unwrap();
        assert!(tree.is_valid());
        assert!(tree.is_ultrametric());
        assert!(tree.num_leaves() >= 1);
        assert!(tree.height() <= max_time + 1e-9);
    }
}

#[test]
fn test_birth_death_gives_up() {
    let model = BirthDeath::new(0.1, 10.0, StopCondition::Taxa(5), 3).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    assert_eq!(
        model.generate(&mut rng).unwrap_err(),
        GenerationError::AllAttemptsExtinct { attempts: 3 }
    );
}

#[test]
fn test_birth_death_rejects_invalid_parameters() {
    assert!(BirthDeath::new(0.0, 0.1, StopCondition::Taxa(10), 10).is_err());
    assert!(BirthDeath::new(1.0, -0.1, StopCondition::Taxa(10), 10).is_err());
    assert!(BirthDeath::new(1.0, 0.1, StopCondition::Taxa(1), 10).is_err());
    assert!(BirthDeath::new(1.0, 0.1, StopCondition::Time(0.0), 10).is_err());
    assert!(BirthDeath::new(1.0, 0.1, StopCondition::Time(5.0), 0).is_err());
}

// --- ENSEMBLES ---
#[test]
fn test_ensemble_is_reproducible() {
    let model = BirthDeath::new(1.0, 0.5, StopCondition::Taxa(15), 1000).unwrap();
    let (first, taxa) = generate_ensemble(&model, 8, 99).unwrap();
    let (second, _) = generate_ensemble(&model, 8, 99).unwrap();

    assert_eq!(first.len(), 8);
    assert_eq!(taxa.num_labels(), 15);
    assert_eq!(taxa.get_label(0), Some("T1"));
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.total_branch_length(), b.total_branch_length());
    }
    assert_ne!(first[0].total_branch_length(), first[1].total_branch_length());
}

#[test]
fn test_empty_ensemble() {
    let model = Kingman::new(4, 4.0).unwrap();
    let (trees, taxa) = generate_ensemble(&model, 0, 1).unwrap();
    assert!(trees.is_empty());
    assert_eq!(taxa.num_labels(), 0);
}
