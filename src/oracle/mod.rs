//! The semantics oracle, computing ground-truth extension sets by exact combinatorial search.
//!
//! The oracle enumerates the complete extensions of a framework through a
//! recursive backtracking search, then derives the other semantics by
//! filtering the complete (or conflict-free, or admissible) sets with the
//! extremal property defining each of them.
//! The search is exponential in the number of arguments; this is
//! acceptable since generated test instances are deliberately small.

use crate::aa::{
    ArgumentId, ArgumentSetId, AttackSetId, EntityStore, ExtensionSetId, Semantics,
};
use std::collections::HashSet;

/// Computes the extension set of a framework under the given semantics.
///
/// The result is interned in the store, so two frameworks with the same
/// extensions get the identical handle.
///
/// # Example
///
/// ```
/// # use scrutari::aa::{EntityStore, Semantics};
/// # use scrutari::oracle;
/// let mut store = EntityStore::default();
/// let a = store.argument("a");
/// let args = store.argument_set(&[a]);
/// let no_attack = store.attack_set(&[]);
/// let exts = oracle::compute(Semantics::CO, args, no_attack, &mut store);
/// assert_eq!(1, store.extension_set_members(exts).len());
/// ```
pub fn compute(
    semantics: Semantics,
    arguments: ArgumentSetId,
    attacks: AttackSetId,
    store: &mut EntityStore,
) -> ExtensionSetId {
    let search = Search::new(arguments, attacks, store);
    let extensions = match semantics {
        Semantics::CO => search.complete_sets(),
        Semantics::PR => maximal_sets(search.complete_sets()),
        Semantics::ST => search.stable_sets(),
        Semantics::GR => search.grounded_set(),
        Semantics::SST => search.maximal_range_sets(search.complete_sets()),
        Semantics::STG => search.maximal_range_sets(search.conflict_free_sets()),
        Semantics::ID => search.ideal_set(),
    };
    intern_extensions(&extensions, store)
}

/// Computes the grounded, stable and preferred extension sets of a framework.
///
/// This is the ground truth of the combined-track query.
pub fn compute_triathlon(
    arguments: ArgumentSetId,
    attacks: AttackSetId,
    store: &mut EntityStore,
) -> [ExtensionSetId; 3] {
    let search = Search::new(arguments, attacks, store);
    let grounded = intern_extensions(&search.grounded_set(), store);
    let stable = intern_extensions(&search.stable_sets(), store);
    let preferred = intern_extensions(&maximal_sets(search.complete_sets()), store);
    [grounded, stable, preferred]
}

fn intern_extensions(extensions: &[Vec<ArgumentId>], store: &mut EntityStore) -> ExtensionSetId {
    let set_ids = extensions
        .iter()
        .map(|e| store.argument_set(e))
        .collect::<Vec<ArgumentSetId>>();
    store.extension_set(&set_ids)
}

struct Search {
    args: Vec<ArgumentId>,
    attack_pairs: HashSet<(ArgumentId, ArgumentId)>,
}

impl Search {
    fn new(arguments: ArgumentSetId, attacks: AttackSetId, store: &EntityStore) -> Self {
        let args = store.argument_set_members(arguments).to_vec();
        let attack_pairs = store
            .attack_set_members(attacks)
            .iter()
            .map(|att| store.attack_arguments(*att))
            .collect::<HashSet<(ArgumentId, ArgumentId)>>();
        Search { args, attack_pairs }
    }

    fn attacks(&self, attacker: ArgumentId, attacked: ArgumentId) -> bool {
        self.attack_pairs.contains(&(attacker, attacked))
    }

    fn set_attacks(&self, set: &[ArgumentId], attacked: ArgumentId) -> bool {
        set.iter().any(|member| self.attacks(*member, attacked))
    }

    /// Enumerates the conflict-free sets.
    ///
    /// Each argument is either excluded or, when doing so keeps the set
    /// conflict-free, included; a self-attacking argument is never
    /// included.
    fn conflict_free_sets(&self) -> Vec<Vec<ArgumentId>> {
        let mut result = Vec::new();
        let mut current = Vec::new();
        self.conflict_free_search(0, &mut current, &mut result);
        result
    }

    fn conflict_free_search(
        &self,
        next: usize,
        current: &mut Vec<ArgumentId>,
        result: &mut Vec<Vec<ArgumentId>>,
    ) {
        if next == self.args.len() {
            result.push(current.clone());
            return;
        }
        let candidate = self.args[next];
        self.conflict_free_search(next + 1, current, result);
        let conflicts = self.attacks(candidate, candidate)
            || current.iter().any(|member| {
                self.attacks(candidate, *member) || self.attacks(*member, candidate)
            });
        if !conflicts {
            current.push(candidate);
            self.conflict_free_search(next + 1, current, result);
            current.pop();
        }
    }

    fn defends_itself(&self, set: &[ArgumentId]) -> bool {
        set.iter().all(|member| {
            self.args
                .iter()
                .filter(|attacker| self.attacks(**attacker, *member))
                .all(|attacker| self.set_attacks(set, *attacker))
        })
    }

    fn defends(&self, set: &[ArgumentId], arg: ArgumentId) -> bool {
        self.args
            .iter()
            .filter(|attacker| self.attacks(**attacker, arg))
            .all(|attacker| self.set_attacks(set, *attacker))
    }

    fn admissible_sets(&self) -> Vec<Vec<ArgumentId>> {
        self.conflict_free_sets()
            .into_iter()
            .filter(|set| self.defends_itself(set))
            .collect()
    }

    /// Enumerates the complete extensions: the admissible sets containing
    /// every argument they defend.
    fn complete_sets(&self) -> Vec<Vec<ArgumentId>> {
        self.admissible_sets()
            .into_iter()
            .filter(|set| {
                self.args
                    .iter()
                    .filter(|arg| !set.contains(arg))
                    .all(|arg| !self.defends(set, *arg))
            })
            .collect()
    }

    fn range(&self, set: &[ArgumentId]) -> Vec<ArgumentId> {
        let mut range = self
            .args
            .iter()
            .filter(|arg| set.contains(arg) || self.set_attacks(set, **arg))
            .copied()
            .collect::<Vec<ArgumentId>>();
        range.sort_unstable();
        range
    }

    fn stable_sets(&self) -> Vec<Vec<ArgumentId>> {
        let mut all_args = self.args.clone();
        all_args.sort_unstable();
        self.complete_sets()
            .into_iter()
            .filter(|set| self.range(set) == all_args)
            .collect()
    }

    /// Returns the unique inclusion-minimal complete extension as a singleton.
    fn grounded_set(&self) -> Vec<Vec<ArgumentId>> {
        let complete = self.complete_sets();
        let grounded = complete
            .iter()
            .find(|candidate| complete.iter().all(|other| is_subset(candidate, other)))
            .expect("a framework always has a grounded extension")
            .clone();
        vec![grounded]
    }

    fn maximal_range_sets(&self, candidates: Vec<Vec<ArgumentId>>) -> Vec<Vec<ArgumentId>> {
        let ranges = candidates
            .iter()
            .map(|set| self.range(set))
            .collect::<Vec<Vec<ArgumentId>>>();
        candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                !ranges.iter().enumerate().any(|(j, other)| {
                    *i != j && is_subset(&ranges[*i], other) && ranges[*i] != *other
                })
            })
            .map(|(_, set)| set.clone())
            .collect()
    }

    /// Returns the ideal extension as a singleton: the inclusion-maximal
    /// admissible set included in every preferred extension.
    fn ideal_set(&self) -> Vec<Vec<ArgumentId>> {
        let preferred = maximal_sets(self.complete_sets());
        let ideal = self
            .admissible_sets()
            .into_iter()
            .filter(|set| preferred.iter().all(|p| is_subset(set, p)))
            .max_by_key(|set| set.len())
            .expect("the empty set is admissible and included in every extension");
        vec![ideal]
    }
}

fn is_subset(candidate: &[ArgumentId], other: &[ArgumentId]) -> bool {
    candidate.iter().all(|arg| other.contains(arg))
}

fn maximal_sets(candidates: Vec<Vec<ArgumentId>>) -> Vec<Vec<ArgumentId>> {
    candidates
        .iter()
        .filter(|candidate| {
            !candidates
                .iter()
                .any(|other| is_subset(candidate, other) && *candidate != other)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn build_af(
        store: &mut EntityStore,
        arg_names: &[&str],
        attack_names: &[(&str, &str)],
    ) -> (ArgumentSetId, AttackSetId) {
        let args = arg_names
            .iter()
            .map(|n| store.argument(n))
            .collect::<Vec<ArgumentId>>();
        let arguments = store.argument_set(&args);
        let attacks = attack_names
            .iter()
            .map(|(from, to)| {
                let from = store.argument(from);
                let to = store.argument(to);
                store.attack(from, to)
            })
            .collect::<Vec<crate::aa::AttackId>>();
        let attacks = store.attack_set(&attacks);
        (arguments, attacks)
    }

    fn extension_names(exts: ExtensionSetId, store: &EntityStore) -> Vec<Vec<String>> {
        store
            .extension_set_members(exts)
            .iter()
            .map(|ext| {
                let mut names = store
                    .argument_set_members(*ext)
                    .iter()
                    .map(|a| store.argument_name(*a).to_string())
                    .collect::<Vec<String>>();
                names.sort_unstable();
                names
            })
            .collect()
    }

    fn sorted_extension_names(exts: ExtensionSetId, store: &EntityStore) -> Vec<Vec<String>> {
        let mut names = extension_names(exts, store);
        names.sort_unstable();
        names
    }

    fn names(strs: &[&[&str]]) -> Vec<Vec<String>> {
        let mut result = strs
            .iter()
            .map(|e| e.iter().map(|s| s.to_string()).collect::<Vec<String>>())
            .collect::<Vec<Vec<String>>>();
        result.sort_unstable();
        result
    }

    #[test]
    fn test_empty_af_has_the_empty_extension() {
        let mut store = EntityStore::default();
        let (arguments, attacks) = build_af(&mut store, &[], &[]);
        for semantics in Semantics::iter() {
            let exts = compute(semantics, arguments, attacks, &mut store);
            assert_eq!(
                names(&[&[]]),
                sorted_extension_names(exts, &store),
                "under {:?}",
                semantics
            );
        }
    }

    #[test]
    fn test_no_attack_single_complete_extension() {
        let mut store = EntityStore::default();
        let (arguments, attacks) = build_af(&mut store, &["a", "b", "c"], &[]);
        let exts = compute(Semantics::CO, arguments, attacks, &mut store);
        assert_eq!(
            names(&[&["a", "b", "c"]]),
            sorted_extension_names(exts, &store)
        );
    }

    #[test]
    fn test_chain_af() {
        let mut store = EntityStore::default();
        let (arguments, attacks) =
            build_af(&mut store, &["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        for semantics in [Semantics::CO, Semantics::PR, Semantics::ST, Semantics::GR] {
            let exts = compute(semantics, arguments, attacks, &mut store);
            assert_eq!(
                names(&[&["a", "c"]]),
                sorted_extension_names(exts, &store),
                "under {:?}",
                semantics
            );
        }
    }

    #[test]
    fn test_mutual_attack() {
        let mut store = EntityStore::default();
        let (arguments, attacks) =
            build_af(&mut store, &["a", "b"], &[("a", "b"), ("b", "a")]);
        let complete = compute(Semantics::CO, arguments, attacks, &mut store);
        assert_eq!(
            names(&[&[], &["a"], &["b"]]),
            sorted_extension_names(complete, &store)
        );
        let preferred = compute(Semantics::PR, arguments, attacks, &mut store);
        assert_eq!(
            names(&[&["a"], &["b"]]),
            sorted_extension_names(preferred, &store)
        );
        let stable = compute(Semantics::ST, arguments, attacks, &mut store);
        assert_eq!(
            names(&[&["a"], &["b"]]),
            sorted_extension_names(stable, &store)
        );
        let grounded = compute(Semantics::GR, arguments, attacks, &mut store);
        assert_eq!(names(&[&[]]), sorted_extension_names(grounded, &store));
        let ideal = compute(Semantics::ID, arguments, attacks, &mut store);
        assert_eq!(names(&[&[]]), sorted_extension_names(ideal, &store));
    }

    #[test]
    fn test_self_attack_has_no_stable_extension() {
        let mut store = EntityStore::default();
        let (arguments, attacks) = build_af(&mut store, &["a"], &[("a", "a")]);
        let stable = compute(Semantics::ST, arguments, attacks, &mut store);
        assert!(store.extension_set_members(stable).is_empty());
        let complete = compute(Semantics::CO, arguments, attacks, &mut store);
        assert_eq!(names(&[&[]]), sorted_extension_names(complete, &store));
    }

    #[test]
    fn test_semi_stable_and_stage() {
        let mut store = EntityStore::default();
        // "a" and "b" attack each other; "c" attacks itself
        let (arguments, attacks) = build_af(
            &mut store,
            &["a", "b", "c"],
            &[("a", "b"), ("b", "a"), ("c", "c")],
        );
        let semi_stable = compute(Semantics::SST, arguments, attacks, &mut store);
        assert_eq!(
            names(&[&["a"], &["b"]]),
            sorted_extension_names(semi_stable, &store)
        );
        let stage = compute(Semantics::STG, arguments, attacks, &mut store);
        assert_eq!(
            names(&[&["a"], &["b"]]),
            sorted_extension_names(stage, &store)
        );
    }

    #[test]
    fn test_stable_subset_of_preferred_subset_of_complete() {
        let mut store = EntityStore::default();
        let (arguments, attacks) = build_af(
            &mut store,
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("b", "c"), ("c", "d"), ("d", "c")],
        );
        let complete = sorted_extension_names(
            compute(Semantics::CO, arguments, attacks, &mut store),
            &store,
        );
        let preferred = sorted_extension_names(
            compute(Semantics::PR, arguments, attacks, &mut store),
            &store,
        );
        let stable = sorted_extension_names(
            compute(Semantics::ST, arguments, attacks, &mut store),
            &store,
        );
        assert!(stable.iter().all(|e| preferred.contains(e)));
        assert!(preferred.iter().all(|e| complete.contains(e)));
    }

    #[test]
    fn test_compute_triathlon() {
        let mut store = EntityStore::default();
        let (arguments, attacks) =
            build_af(&mut store, &["a", "b"], &[("a", "b"), ("b", "a")]);
        let [grounded, stable, preferred] = compute_triathlon(arguments, attacks, &mut store);
        assert_eq!(grounded, compute(Semantics::GR, arguments, attacks, &mut store));
        assert_eq!(stable, compute(Semantics::ST, arguments, attacks, &mut store));
        assert_eq!(preferred, compute(Semantics::PR, arguments, attacks, &mut store));
    }

    #[test]
    fn test_result_is_interned() {
        let mut store = EntityStore::default();
        let (arguments, attacks) = build_af(&mut store, &["a", "b"], &[("a", "b")]);
        let first = compute(Semantics::CO, arguments, attacks, &mut store);
        let second = compute(Semantics::CO, arguments, attacks, &mut store);
        assert_eq!(first, second);
    }
}
