use super::{AttackRemovalTranslator, InstanceTranslator, NewAttackTranslator};
use crate::aa::{AfInstance, DynamicAfInstance, EntityStore, Semantics};
use rand::rngs::StdRng;

/// A decorator turning a static translator into a dynamic-track one.
///
/// The wrapped translator is applied to the initial instance of the
/// dynamic framework; a short random sequence of attack additions and
/// removals is then appended, preferring additions and removals
/// alternately but falling back to whichever is applicable.
/// Each step records its APXM delta description and its
/// oracle-consistent resulting instance.
pub struct DynamicTranslator {
    inner: Box<dyn InstanceTranslator<AfInstance>>,
    addition: NewAttackTranslator,
    removal: AttackRemovalTranslator,
}

impl DynamicTranslator {
    /// Builds a dynamic translator wrapping the given static translator.
    pub fn new(
        inner: Box<dyn InstanceTranslator<AfInstance>>,
        semantics: Semantics,
        allow_self_attacks: bool,
    ) -> Self {
        DynamicTranslator {
            inner,
            addition: NewAttackTranslator::new(semantics, allow_self_attacks),
            removal: AttackRemovalTranslator::new(semantics),
        }
    }

    fn sequence_len(n_arguments: usize) -> usize {
        1 + ((1. + n_arguments as f64).ln().floor() as usize)
    }
}

impl InstanceTranslator<DynamicAfInstance> for DynamicTranslator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn can_apply(&self, instance: &DynamicAfInstance, store: &EntityStore) -> bool {
        self.inner.can_apply(instance.initial(), store)
    }

    fn apply(
        &self,
        instance: &DynamicAfInstance,
        store: &mut EntityStore,
        rng: &mut StdRng,
    ) -> DynamicAfInstance {
        let initial = self.inner.apply(instance.initial(), store, rng);
        let mut result = DynamicAfInstance::new(initial);
        let mut current = result.initial().clone();
        let mut prefer_addition = true;
        for _ in 0..Self::sequence_len(current.n_arguments(store)) {
            let use_addition = if prefer_addition {
                self.addition.can_apply(&current, store)
            } else {
                !self.removal.can_apply(&current, store)
                    && self.addition.can_apply(&current, store)
            };
            let (next, delta) = if use_addition {
                self.addition.apply_with_delta(&current, store, rng)
            } else if self.removal.can_apply(&current, store) {
                self.removal.apply_with_delta(&current, store, rng)
            } else {
                break;
            };
            result.push_step(delta, next.clone());
            current = next;
            prefer_addition = !prefer_addition;
        }
        result
    }
}
