use super::{GeneratedInstance, InstanceTranslator};
use crate::aa::EntityStore;
use log::debug;
use rand::rngs::StdRng;
use std::collections::HashSet;

type IgnorePredicate<I> = Box<dyn Fn(&I, &EntityStore) -> bool>;

/// The engine growing a tree of test instances.
///
/// Starting from a root instance, the engine expands a frontier: each
/// registered translator applicable to a frontier member produces one
/// child per unit of its weight.
/// Children equal to an already generated instance (by entity-store
/// identity) are discarded, as are the ones matched by the optional
/// ignore predicate.
/// A branch stops expanding once the maximum depth is reached.
pub struct GenerationEngine<I> {
    translators: Vec<(Box<dyn InstanceTranslator<I>>, usize)>,
    max_depth: usize,
    ignore_instance: Option<IgnorePredicate<I>>,
}

impl<I> GenerationEngine<I>
where
    I: GeneratedInstance,
{
    /// Builds an engine with the given maximum tree depth.
    pub fn new(max_depth: usize) -> Self {
        GenerationEngine {
            translators: Vec::new(),
            max_depth,
            ignore_instance: None,
        }
    }

    /// Registers a translator with weight 1.
    pub fn add_translator(&mut self, translator: Box<dyn InstanceTranslator<I>>) {
        self.add_weighted_translator(translator, 1);
    }

    /// Registers a translator with the given weight.
    ///
    /// The weight acts as a repetition count in the candidate pool: a
    /// translator of weight `w` is invoked `w` times per frontier member
    /// it applies to, biasing the instance diversity towards it.
    pub fn add_weighted_translator(
        &mut self,
        translator: Box<dyn InstanceTranslator<I>>,
        weight: usize,
    ) {
        self.translators.push((translator, weight));
    }

    /// Sets a predicate filtering out unwanted instances.
    ///
    /// Matched instances are neither collected nor expanded.
    pub fn set_ignore_instance(&mut self, predicate: IgnorePredicate<I>) {
        self.ignore_instance = Some(predicate);
    }

    /// Grows the generation tree from the given root and returns the instances.
    ///
    /// The root itself is the first returned instance.
    pub fn generate(&self, root: I, store: &mut EntityStore, rng: &mut StdRng) -> Vec<I> {
        let mut seen = HashSet::new();
        seen.insert(root.dedup_key());
        let mut collected = vec![root.clone()];
        let mut frontier = vec![root];
        for depth in 0..self.max_depth {
            let mut next_frontier = Vec::new();
            for instance in &frontier {
                for (translator, weight) in &self.translators {
                    for _ in 0..*weight {
                        if !translator.can_apply(instance, store) {
                            continue;
                        }
                        let child = translator.apply(instance, store, rng);
                        if let Some(ignore) = &self.ignore_instance {
                            if (ignore)(&child, store) {
                                continue;
                            }
                        }
                        if seen.insert(child.dedup_key()) {
                            collected.push(child.clone());
                            next_frontier.push(child);
                        }
                    }
                }
            }
            debug!(
                "generated {} new instance(s) at depth {}",
                next_frontier.len(),
                depth + 1
            );
            frontier = next_frontier;
        }
        collected
    }
}
