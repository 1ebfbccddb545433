//! The instance generation engine and its translators.
//!
//! Test instances are grown as a tree: starting from an initial instance,
//! translators are repeatedly applied to the frontier until a depth bound
//! is reached.
//! Each translator is a pure function from an instance to a new instance
//! and keeps the stored ground truth consistent with the semantics
//! oracle.

mod af_translators;
pub use af_translators::{AttackRemovalTranslator, NewArgumentTranslator, NewAttackTranslator};

mod dynamic;
pub use dynamic::DynamicTranslator;

mod engine;
pub use engine::GenerationEngine;

use crate::aa::{AfInstance, DynamicAfInstance, EntityStore};
use rand::rngs::StdRng;
use std::hash::{Hash, Hasher};

/// A transformation of a test instance into a new one.
///
/// Translators must keep the ground truth of the instances they produce
/// consistent with the semantics oracle: whenever arguments or attacks
/// change, the stored extensions are recomputed (or updated in a way
/// provably equivalent to recomputing them).
pub trait InstanceTranslator<I> {
    /// Returns the name of the translator, used in logs and histories.
    fn name(&self) -> &str;

    /// Returns `true` iff the translator can be applied to the instance.
    fn can_apply(&self, instance: &I, store: &EntityStore) -> bool;

    /// Applies the translator, returning the translated instance.
    ///
    /// Must only be called when [can_apply](Self::can_apply) returns `true`.
    fn apply(&self, instance: &I, store: &mut EntityStore, rng: &mut StdRng) -> I;
}

/// A trait for instances the generation engine can deduplicate.
pub trait GeneratedInstance: Clone {
    /// Returns a key identifying the instance content.
    ///
    /// Two instances built from the same store have the same key iff
    /// their interned content is identical.
    fn dedup_key(&self) -> u64;
}

impl GeneratedInstance for AfInstance {
    fn dedup_key(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.arguments().index().hash(&mut hasher);
        self.attacks().index().hash(&mut hasher);
        hasher.finish()
    }
}

impl GeneratedInstance for DynamicAfInstance {
    fn dedup_key(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.initial().dedup_key().hash(&mut hasher);
        for (delta, instance) in self.steps() {
            delta.hash(&mut hasher);
            instance.dedup_key().hash(&mut hasher);
        }
        hasher.finish()
    }
}
