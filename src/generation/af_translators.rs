use super::InstanceTranslator;
use crate::aa::{AfInstance, ArgumentId, AttackId, EntityStore, Semantics};
use crate::oracle;
use rand::rngs::StdRng;
use rand::Rng;

/// A translator adding one fresh, unattacked argument.
///
/// Since the new argument is isolated, it belongs to every extension of
/// the translated instance: when the instance has at least one extension,
/// the ground truth is updated by extending every stored extension with
/// it, without calling the oracle.
/// When the extension set is empty (no stable extension), adding an
/// unattacked argument cannot restore one, so the ground truth is
/// recomputed through the oracle.
pub struct NewArgumentTranslator {
    semantics: Semantics,
}

impl NewArgumentTranslator {
    /// Builds a new translator for the given semantics.
    pub fn new(semantics: Semantics) -> Self {
        NewArgumentTranslator { semantics }
    }
}

impl InstanceTranslator<AfInstance> for NewArgumentTranslator {
    fn name(&self) -> &str {
        "new_argument"
    }

    fn can_apply(&self, _instance: &AfInstance, _store: &EntityStore) -> bool {
        true
    }

    fn apply(&self, instance: &AfInstance, store: &mut EntityStore, _rng: &mut StdRng) -> AfInstance {
        let members = store.argument_set_members(instance.arguments()).to_vec();
        let name = fresh_argument_name(&members, store);
        let new_arg = store.argument(&name);
        let mut new_members = members;
        new_members.push(new_arg);
        let new_arguments = store.argument_set(&new_members);
        let old_extensions = store.extension_set_members(instance.extensions()).to_vec();
        let new_extensions = if old_extensions.is_empty() {
            oracle::compute(self.semantics, new_arguments, instance.attacks(), store)
        } else {
            let extended = old_extensions
                .iter()
                .map(|ext| {
                    let mut ext_members = store.argument_set_members(*ext).to_vec();
                    ext_members.push(new_arg);
                    store.argument_set(&ext_members)
                })
                .collect::<Vec<_>>();
            store.extension_set(&extended)
        };
        let mut result = instance.translated_into(new_arguments, instance.attacks(), new_extensions);
        result.push_history(format!("arg({}).", name));
        result
    }
}

fn fresh_argument_name(members: &[ArgumentId], store: &EntityStore) -> String {
    let existing = members
        .iter()
        .map(|a| store.argument_name(*a))
        .collect::<Vec<&str>>();
    let mut i = members.len();
    loop {
        let candidate = format!("a{}", i);
        if !existing.contains(&candidate.as_str()) {
            return candidate;
        }
        i += 1;
    }
}

/// A translator adding one attack between two arguments not already attacking each other.
///
/// The attack is selected uniformly at random among the missing edges.
/// The ground truth is recomputed through the oracle.
pub struct NewAttackTranslator {
    semantics: Semantics,
    allow_self_attacks: bool,
}

impl NewAttackTranslator {
    /// Builds a new translator for the given semantics.
    pub fn new(semantics: Semantics, allow_self_attacks: bool) -> Self {
        NewAttackTranslator {
            semantics,
            allow_self_attacks,
        }
    }

    fn missing_attacks(
        &self,
        instance: &AfInstance,
        store: &EntityStore,
    ) -> Vec<(ArgumentId, ArgumentId)> {
        let members = store.argument_set_members(instance.arguments());
        let present = store
            .attack_set_members(instance.attacks())
            .iter()
            .map(|att| store.attack_arguments(*att))
            .collect::<Vec<(ArgumentId, ArgumentId)>>();
        let mut missing = Vec::new();
        for from in members {
            for to in members {
                if !self.allow_self_attacks && from == to {
                    continue;
                }
                if !present.contains(&(*from, *to)) {
                    missing.push((*from, *to));
                }
            }
        }
        missing
    }

    pub(crate) fn apply_with_delta(
        &self,
        instance: &AfInstance,
        store: &mut EntityStore,
        rng: &mut StdRng,
    ) -> (AfInstance, String) {
        let missing = self.missing_attacks(instance, store);
        let (from, to) = missing[rng.gen_range(0..missing.len())];
        let new_attack = store.attack(from, to);
        let mut attacks = store.attack_set_members(instance.attacks()).to_vec();
        attacks.push(new_attack);
        let new_attacks = store.attack_set(&attacks);
        let new_extensions =
            oracle::compute(self.semantics, instance.arguments(), new_attacks, store);
        let result = instance.translated_into(instance.arguments(), new_attacks, new_extensions);
        let delta = format!(
            "+att({},{}).",
            store.argument_name(from),
            store.argument_name(to)
        );
        (result, delta)
    }
}

impl InstanceTranslator<AfInstance> for NewAttackTranslator {
    fn name(&self) -> &str {
        "new_attack"
    }

    fn can_apply(&self, instance: &AfInstance, store: &EntityStore) -> bool {
        let n = instance.n_arguments(store);
        let max_attacks = if self.allow_self_attacks {
            n * n
        } else {
            n * n - n
        };
        n > 0 && instance.n_attacks(store) < max_attacks
    }

    fn apply(&self, instance: &AfInstance, store: &mut EntityStore, rng: &mut StdRng) -> AfInstance {
        let (mut result, delta) = self.apply_with_delta(instance, store, rng);
        result.push_history(delta);
        result
    }
}

/// A translator removing one attack, selected uniformly at random.
///
/// The ground truth is recomputed through the oracle.
pub struct AttackRemovalTranslator {
    semantics: Semantics,
}

impl AttackRemovalTranslator {
    /// Builds a new translator for the given semantics.
    pub fn new(semantics: Semantics) -> Self {
        AttackRemovalTranslator { semantics }
    }

    pub(crate) fn apply_with_delta(
        &self,
        instance: &AfInstance,
        store: &mut EntityStore,
        rng: &mut StdRng,
    ) -> (AfInstance, String) {
        let attacks = store.attack_set_members(instance.attacks()).to_vec();
        let removed = attacks[rng.gen_range(0..attacks.len())];
        let remaining = attacks
            .iter()
            .filter(|att| **att != removed)
            .copied()
            .collect::<Vec<AttackId>>();
        let new_attacks = store.attack_set(&remaining);
        let new_extensions =
            oracle::compute(self.semantics, instance.arguments(), new_attacks, store);
        let result = instance.translated_into(instance.arguments(), new_attacks, new_extensions);
        let (from, to) = store.attack_arguments(removed);
        let delta = format!(
            "-att({},{}).",
            store.argument_name(from),
            store.argument_name(to)
        );
        (result, delta)
    }
}

impl InstanceTranslator<AfInstance> for AttackRemovalTranslator {
    fn name(&self) -> &str {
        "attack_removal"
    }

    fn can_apply(&self, instance: &AfInstance, store: &EntityStore) -> bool {
        instance.n_attacks(store) > 0
    }

    fn apply(&self, instance: &AfInstance, store: &mut EntityStore, rng: &mut StdRng) -> AfInstance {
        let (mut result, delta) = self.apply_with_delta(instance, store, rng);
        result.push_history(delta);
        result
    }
}
