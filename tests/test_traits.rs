use pdprune::error::ConfigError;
use pdprune::model::CompactTree;
use pdprune::simulate::{Kingman, TreeProvider, generate_ensemble};
use pdprune::traits::{
    BinaryTrait, MarkovTrait, MarkovTraitTract, TraitModel, TraitTree, evolve, evolve_ensemble, fraction_one,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn kingman_trees(num_leaves: usize, replicates: usize, seed: u64) -> Vec<CompactTree> {
    let model = Kingman::new(num_leaves, num_leaves as f64).unwrap();
    generate_ensemble(&model, replicates, seed).unwrap().0
}

#[test]
fn test_binary_trait_conversions() {
    assert_eq!(BinaryTrait::from(true), BinaryTrait::One);
    assert_eq!(BinaryTrait::from(false), BinaryTrait::Zero);
    assert_eq!(BinaryTrait::One.as_f64(), 1.0);
    assert_eq!(BinaryTrait::Zero.as_f64(), 0.0);
    assert!(BinaryTrait::One.is_one());
    assert!(!BinaryTrait::Zero.is_one());
}

#[test]
fn test_fraction_one() {
    use BinaryTrait::{One, Zero};
    assert_eq!(fraction_one(&[One, Zero, One, One]), Some(0.75));
    assert_eq!(fraction_one(&[Zero, Zero]), Some(0.0));
    assert_eq!(fraction_one(&[]), None);
}

#[test]
fn test_model_validation() {
    assert!(matches!(
        MarkovTrait::new(1.2, 0.1),
        Err(ConfigError::InvalidProbability { name: "p01", .. })
    ));
    assert!(matches!(
        MarkovTrait::new(0.1, -0.5),
        Err(ConfigError::InvalidProbability { name: "p10", .. })
    ));
    assert!(MarkovTraitTract::new(vec![]).is_err());
    assert!(MarkovTraitTract::new(vec![[0.1, 0.1], [0.1, 2.0]]).is_err());

    let tract = MarkovTraitTract::uniform(3, 0.2, 0.4).unwrap();
    assert_eq!(tract.len(), 3);
    assert!(!tract.is_empty());
}

#[test]
fn test_every_vertex_annotated() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let tree = Kingman::new(15, 15.0).unwrap().generate(&mut rng).unwrap();
    let num_vertices = tree.num_vertices();
    let annotated = evolve(tree, &MarkovTrait::new(0.3, 0.2).unwrap(), &mut rng);

    assert!(annotated.traits.is_complete());
    assert_eq!(annotated.traits.len(), num_vertices);
    assert_eq!(annotated.leaf_traits().count(), 15);
    assert!(annotated.leaf_traits().all(|(_, t)| t.is_some()));
}

#[test]
fn test_degenerate_trees() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let model = MarkovTrait::new(0.5, 0.5).unwrap();

    let empty = evolve(CompactTree::empty(), &model, &mut rng);
    assert!(empty.is_placeholder());
    assert!(empty.traits.is_empty());

    let lone = evolve(CompactTree::single_leaf(0), &model, &mut rng);
    assert_eq!(lone.traits.num_set(), 1);
    assert!(lone.trait_of(0).is_some());
}

#[test]
fn test_scalar_root_is_uniform() {
    let roots = vec![CompactTree::single_leaf(0); 10_000];
    let evolved = evolve_ensemble(roots, &MarkovTrait::new(0.1, 0.1).unwrap(), 12);
    let ones = evolved
        .iter()
        .filter(|t| t.trait_of(0).is_some_and(|state| state.is_one()))
        .count();
    let fraction = ones as f64 / evolved.len() as f64;
    assert!((fraction - 0.5).abs() < 0.02, "fraction of ones at root {fraction}");
}

#[test]
fn test_transition_frequencies() {
    let (p01, p10) = (0.3, 0.1);
    let model = MarkovTrait::new(p01, p10).unwrap();
    let evolved = evolve_ensemble(kingman_trees(50, 200, 13), &model, 14);

    // Count parent-child state pairs over all branches
    let mut counts = [[0usize; 2]; 2];
    for annotated in &evolved {
        for vertex in annotated.tree.pre_order_iter() {
            if let Some(parent) = vertex.parent() {
                let from = annotated.trait_of(parent).unwrap().is_one() as usize;
                let to = annotated.trait_of(vertex.index()).unwrap().is_one() as usize;
                counts[from][to] += 1;
            }
        }
    }
    let observed_p01 = counts[0][1] as f64 / (counts[0][0] + counts[0][1]) as f64;
    let observed_p10 = counts[1][0] as f64 / (counts[1][0] + counts[1][1]) as f64;
    assert!((observed_p01 - p01).abs() < 0.03, "observed p01 {observed_p01}");
    assert!((observed_p10 - p10).abs() < 0.03, "observed p10 {observed_p10}");
}

#[test]
fn test_certain_switch_alternates() {
    let mut rng = ChaCha8Rng::seed_from_u64(15);
    let tree = Kingman::new(20, 20.0).unwrap().generate(&mut rng).unwrap();
    let annotated = evolve(tree, &MarkovTrait::new(1.0, 1.0).unwrap(), &mut rng);
    for vertex in annotated.tree.pre_order_iter() {
        if let Some(parent) = vertex.parent() {
            assert_ne!(annotated.trait_of(parent), annotated.trait_of(vertex.index()));
        }
    }
}

#[test]
fn test_tract_root_is_all_zero() {
    let model = MarkovTraitTract::uniform(10, 0.5, 0.5).unwrap();
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        assert_eq!(model.root_state(&mut rng), vec![BinaryTrait::Zero; 10]);

        let tree = Kingman::new(6, 6.0).unwrap().generate(&mut rng).unwrap();
        let root = tree.root_index();
        let annotated = evolve(tree, &model, &mut rng);
        assert_eq!(annotated.trait_of(root), Some(&vec![BinaryTrait::Zero; 10]));
    }
}

#[test]
fn test_tract_positions_evolve_independently() {
    // First position never switches, second always does
    let model = MarkovTraitTract::new(vec![[0.0, 0.0], [1.0, 1.0]]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(16);
    let tree = Kingman::new(10, 10.0).unwrap().generate(&mut rng).unwrap();
    let annotated = evolve(tree, &model, &mut rng);

    for vertex in annotated.tree.pre_order_iter() {
        let tract = annotated.trait_of(vertex.index()).unwrap();
        assert_eq!(tract.len(), 2);
        assert_eq!(tract[0], BinaryTrait::Zero);
        if let Some(parent) = vertex.parent() {
            assert_ne!(annotated.trait_of(parent).unwrap()[1], tract[1]);
        }
    }
}

#[test]
fn test_evolve_ensemble_is_reproducible() {
    let model = MarkovTrait::new(0.4, 0.2).unwrap();
    let trees = kingman_trees(10, 20, 17);
    let first = evolve_ensemble(trees.clone(), &model, 18);
    let second = evolve_ensemble(trees, &model, 18);
    assert_eq!(first.len(), 20);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.traits, b.traits);
    }
}

#[test]
fn test_unannotated_tree() {
    let annotated: TraitTree<BinaryTrait> = TraitTree::unannotated(CompactTree::single_leaf(3));
    assert_eq!(annotated.num_leaves(), 1);
    assert_eq!(annotated.leaf_traits().collect::<Vec<_>>(), vec![(3, None)]);
    assert!(TraitTree::<BinaryTrait>::placeholder().is_placeholder());
}
