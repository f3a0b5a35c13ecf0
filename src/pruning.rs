//! Pruning of annotated trees under an extinction policy.
//!
//! [prune] handles a single tree and reports failure explicitly. The ensemble
//! functions run it on every tree in parallel; [prune_ensemble] replaces each
//! failed tree by [TraitTree::placeholder], so one bad tree never aborts a
//! batch and the output stays aligned with the input.
//!
//! Inputs are borrowed: pruning builds a new tree and leaves the original
//! untouched, so the same ensemble can be pruned under several policies.

use crate::error::PruneError;
use crate::extinction::{ExtinctionPolicy, extinction_verdict};
use crate::rng::tree_rng;
use crate::traits::TraitTree;
use log::{debug, warn};
use rand::Rng;
use rayon::prelude::*;

/// Prunes the leaves of `tree` that go extinct under `policy`.
///
/// Extinct leaves are removed, unifurcations suppressed and branch lengths
/// merged (see [GenTree::prune_leaves](crate::model::GenTree::prune_leaves));
/// the traits of the remaining vertices carry over.
///
/// # Errors
/// * [PruneError::MalformedTree] if `tree` is not a valid tree
/// * Any error of the policy, see [extinction_verdict]
pub fn prune<T, P, R>(tree: &TraitTree<T>, policy: &P, rng: &mut R) -> Result<TraitTree<T>, PruneError>
where
    T: Clone,
    P: ExtinctionPolicy<T> + ?Sized,
    R: Rng + ?Sized,
{
    if !tree.tree.is_valid() {
        return Err(PruneError::MalformedTree);
    }
    let extinct = extinction_verdict(tree, policy, rng)?;
    let pruned = tree.tree.prune_taxa(&extinct);
    let traits = tree
        .traits
        .remap(&pruned.mapping, pruned.tree.num_vertices());
    Ok(TraitTree {
        tree: pruned.tree,
        traits,
    })
}

/// Prunes every tree of `ensemble` with the same policy.
///
/// Tree `i` draws from random stream `i` of `seed`.
///
/// # Returns
/// One result per tree, in ensemble order.
pub fn try_prune_ensemble<T, P>(ensemble: &[TraitTree<T>], policy: &P, seed: u64) -> Vec<Result<TraitTree<T>, PruneError>>
where
    T: Clone + Send + Sync,
    P: ExtinctionPolicy<T> + ?Sized,
{
    ensemble
        .par_iter()
        .enumerate()
        .map(|(index, tree)| prune(tree, policy, &mut tree_rng(seed, index)))
        .collect()
}

/// Prunes every tree of `ensemble` with the same policy, substituting
/// failures by placeholders.
pub fn prune_ensemble<T, P>(ensemble: &[TraitTree<T>], policy: &P, seed: u64) -> Vec<TraitTree<T>>
where
    T: Clone + Send + Sync,
    P: ExtinctionPolicy<T> + ?Sized,
{
    settle(try_prune_ensemble(ensemble, policy, seed))
}

/// Prunes every tree of `ensemble` with its own policy, created by
/// `policy_for(index)`; failures are substituted by placeholders.
///
/// Tree `i` draws from random stream `i` of `seed`.
pub fn prune_ensemble_with<T, P, F>(ensemble: &[TraitTree<T>], policy_for: F, seed: u64) -> Vec<TraitTree<T>>
where
    T: Clone + Send + Sync,
    P: ExtinctionPolicy<T>,
    F: Fn(usize) -> Result<P, PruneError> + Sync,
{
    let results: Vec<_> = ensemble
        .par_iter()
        .enumerate()
        .map(|(index, tree)| {
            let policy = policy_for(index)?;
            prune(tree, &policy, &mut tree_rng(seed, index))
        })
        .collect();
    settle(results)
}

/// Replaces failed slots by placeholders, logging each failure.
fn settle<T>(results: Vec<Result<TraitTree<T>, PruneError>>) -> Vec<TraitTree<T>> {
    let mut failures = 0;
    let pruned: Vec<_> = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            result.unwrap_or_else(|err| {
                warn!("tree {index} replaced by placeholder: {err}");
                failures += 1;
                TraitTree::placeholder()
            })
        })
        .collect();
    debug!("pruned {} trees, {} failed", pruned.len(), failures);
    pruned
}
