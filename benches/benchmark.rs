use criterion::{Criterion, criterion_group, criterion_main};
use pdprune::config::{BirthDeathConfig, ExperimentConfig, KingmanConfig};
use pdprune::extinction::FieldOfBullets;
use pdprune::pruning::prune_ensemble;
use pdprune::simulate::{Kingman, generate_ensemble};
use pdprune::traits::{MarkovTrait, evolve_ensemble};
use pdprune::{run_birth_death_taxa, run_kingman};
use std::hint::black_box;

const TAXA: &[(&str, usize)] = &[("n49", 49), ("n200", 200), ("n1000", 1000)];

fn config(num_taxa: usize) -> ExperimentConfig {
    ExperimentConfig {
        replicates: 100,
        birth_death: BirthDeathConfig {
            num_taxa,
            ..BirthDeathConfig::default()
        },
        kingman: KingmanConfig {
            num_leaves: num_taxa,
            pop_size: num_taxa as f64,
        },
        ..ExperimentConfig::default()
    }
}

fn experiments(c: &mut Criterion) {
    for (name, num_taxa) in TAXA {
        let config = config(*num_taxa);
        c.bench_function(&format!("birth_death_taxa/{name}"), |b| {
            b.iter(|| run_birth_death_taxa(black_box(&config)).unwrap());
        });
        c.bench_function(&format!("kingman/{name}"), |b| {
            b.iter(|| run_kingman(black_box(&config)).unwrap());
        });
    }
}

fn pruning(c: &mut Criterion) {
    let provider = Kingman::new(1000, 1000.0).unwrap();
    let (trees, _) = generate_ensemble(&provider, 100, 1).unwrap();
    let evolved = evolve_ensemble(trees, &MarkovTrait::new(0.3, 0.2).unwrap(), 2);
    let policy = FieldOfBullets::new(0.2).unwrap();

    c.bench_function("prune_ensemble/n1000", |b| {
        b.iter(|| prune_ensemble(black_box(&evolved), &policy, 3));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = experiments, pruning
}
criterion_main!(benches);
