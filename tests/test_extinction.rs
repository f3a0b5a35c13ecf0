use pdprune::error::{ConfigError, PruneError};
use pdprune::extinction::{ExtinctionPolicy, FieldOfBullets, TraitDependent, TraitFrequency, extinction_verdict};
use pdprune::model::{Annotations, CompactTree, VertexIndex};
use pdprune::simulate::{Kingman, TreeProvider};
use pdprune::traits::{BinaryTrait, MarkovTrait, MarkovTraitTract, TraitTree, TraitVector, evolve};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn kingman_tree(num_leaves: usize, rng: &mut ChaCha8Rng) -> CompactTree {
    Kingman::new(num_leaves, num_leaves as f64)
        .unwrap()
        .generate(rng)
        .unwrap()
}

fn scalar_tree(num_leaves: usize, seed: u64) -> TraitTree<BinaryTrait> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let tree = kingman_tree(num_leaves, &mut rng);
    evolve(tree, &MarkovTrait::new(0.4, 0.4).unwrap(), &mut rng)
}

#[test]
fn test_policy_validation() {
    assert!(matches!(
        FieldOfBullets::new(1.5),
        Err(ConfigError::InvalidProbability { name: "ext_prob", .. })
    ));
    assert!(TraitDependent::new(0.5, -0.1).is_err());
    assert_eq!(FieldOfBullets::new(0.25).unwrap().ext_prob(), 0.25);
}

#[test]
fn test_field_of_bullets_extremes() {
    let annotated: TraitTree<BinaryTrait> = scalar_tree(25, 1);
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    let none = extinction_verdict(&annotated, &FieldOfBullets::new(0.0).unwrap(), &mut rng).unwrap();
    assert!(none.is_empty());

    let all = extinction_verdict(&annotated, &FieldOfBullets::new(1.0).unwrap(), &mut rng).unwrap();
    let expected: Vec<_> = annotated.tree.leaf_labels().copied().collect();
    assert_eq!(all, expected);
}

#[test]
fn test_field_of_bullets_ignores_traits() {
    let unannotated: TraitTree<BinaryTrait> = TraitTree::unannotated(kingman_tree(5, &mut ChaCha8Rng::seed_from_u64(3)));
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let extinct = extinction_verdict(&unannotated, &FieldOfBullets::new(1.0).unwrap(), &mut rng).unwrap();
    assert_eq!(extinct.len(), 5);
}

#[test]
fn test_field_of_bullets_rate() {
    let policy = FieldOfBullets::new(0.2).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut extinct = 0;
    let mut total = 0;
    for seed in 0..100 {
        let annotated = scalar_tree(100, seed);
        extinct += extinction_verdict(&annotated, &policy, &mut rng).unwrap().len();
        total += annotated.num_leaves();
    }
    let rate = extinct as f64 / total as f64;
    assert!((rate - 0.2).abs() < 0.02, "observed rate {rate}");
}

#[test]
fn test_trait_dependent_selectivity() {
    let annotated = scalar_tree(40, 6);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    // Exactly the leaves with trait 0 die
    let policy = TraitDependent::new(1.0, 0.0).unwrap();
    let extinct = extinction_verdict(&annotated, &policy, &mut rng).unwrap();
    let zeros: Vec<_> = annotated
        .leaf_traits()
        .filter(|(_, t)| *t == Some(&BinaryTrait::Zero))
        .map(|(taxon, _)| taxon)
        .collect();
    assert_eq!(extinct, zeros);

    // Exactly the leaves with trait 1 die
    let policy = TraitDependent::new(0.0, 1.0).unwrap();
    let extinct = extinction_verdict(&annotated, &policy, &mut rng).unwrap();
    let ones: Vec<_> = annotated
        .leaf_traits()
        .filter(|(_, t)| *t == Some(&BinaryTrait::One))
        .map(|(taxon, _)| taxon)
        .collect();
    assert_eq!(extinct, ones);
}

#[test]
fn test_trait_dependent_requires_traits() {
    let unannotated: TraitTree<BinaryTrait> = TraitTree::unannotated(kingman_tree(5, &mut ChaCha8Rng::seed_from_u64(8)));
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let policy = TraitDependent::new(0.5, 0.5).unwrap();
    assert!(matches!(
        extinction_verdict(&unannotated, &policy, &mut rng),
        Err(PruneError::MissingTrait(_))
    ));
}

#[test]
fn test_trait_frequency_extremes() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);

    // Never switching: all-zero tracts survive
    let stable = MarkovTraitTract::uniform(10, 0.0, 0.0).unwrap();
    let annotated = evolve(kingman_tree(30, &mut rng), &stable, &mut rng);
    assert!(extinction_verdict(&annotated, &TraitFrequency, &mut rng).unwrap().is_empty());

    // Certain switch to one, never back: all-one tracts die
    let saturating = MarkovTraitTract::uniform(10, 1.0, 0.0).unwrap();
    let annotated = evolve(kingman_tree(30, &mut rng), &saturating, &mut rng);
    assert_eq!(
        extinction_verdict(&annotated, &TraitFrequency, &mut rng).unwrap().len(),
        30
    );
}

#[test]
fn test_trait_frequency_probability() {
    use BinaryTrait::{One, Zero};
    let tract = vec![One, Zero, Zero, One];
    assert_eq!(TraitFrequency.extinction_probability(0, Some(&tract)), Ok(0.5));
    assert_eq!(
        TraitFrequency.extinction_probability(3, None),
        Err(PruneError::MissingTrait(3))
    );
    assert_eq!(
        TraitFrequency.extinction_probability(4, Some(&Vec::new())),
        Err(PruneError::EmptyTraitVector(4))
    );
}

#[test]
fn test_empty_tract_fails_verdict() {
    let tree = CompactTree::single_leaf(0);
    let mut traits: Annotations<TraitVector> = Annotations::new(1);
    traits.set(0, Vec::new()).unwrap();
    let annotated = TraitTree { tree, traits };
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    assert_eq!(
        extinction_verdict(&annotated, &TraitFrequency, &mut rng),
        Err(PruneError::EmptyTraitVector(0))
    );
}

struct Overconfident;

impl ExtinctionPolicy<BinaryTrait> for Overconfident {
    fn extinction_probability(&self, _leaf: VertexIndex, _trait_value: Option<&BinaryTrait>) -> Result<f64, PruneError> {
        Ok(1.5)
    }
}

#[test]
fn test_probability_out_of_range() {
    let annotated = scalar_tree(4, 12);
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    assert!(matches!(
        extinction_verdict(&annotated, &Overconfident, &mut rng),
        Err(PruneError::InvalidProbability { probability, .. }) if probability == 1.5
    ));
}
