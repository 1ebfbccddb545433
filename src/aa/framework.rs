use super::{ArgumentId, ArgumentSetId, AttackSetId, EntityStore, ExtensionSetId};

/// An argumentation-framework test instance together with its ground truth.
///
/// An instance stores handles into an [`EntityStore`]: its arguments, its
/// attacks, and the extension set the oracle computed for them under the
/// semantics of the current campaign.
/// The translators of the generation engine are the only producers of
/// instances, and they keep the stored extensions consistent with the
/// oracle at every step.
///
/// For acceptance queries, an instance may designate one of its arguments
/// as the argument under decision.
/// For the combined-track query, it may carry the grounded, stable and
/// preferred extension sets as a triple.
///
/// The translation history, when tracked, records a textual description
/// of each transformation that led to this instance; it is appended to
/// failure reports to ease debugging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AfInstance {
    arguments: ArgumentSetId,
    attacks: AttackSetId,
    extensions: ExtensionSetId,
    decision_argument: Option<ArgumentId>,
    triathlon: Option<[ExtensionSetId; 3]>,
    history: Option<Vec<String>>,
}

impl AfInstance {
    /// Builds an instance given its arguments, attacks and ground-truth extensions.
    ///
    /// The translation history of the new instance is untracked.
    pub fn new(
        arguments: ArgumentSetId,
        attacks: AttackSetId,
        extensions: ExtensionSetId,
    ) -> Self {
        AfInstance {
            arguments,
            attacks,
            extensions,
            decision_argument: None,
            triathlon: None,
            history: None,
        }
    }

    /// Enables history tracking on this instance, starting from an empty history.
    pub fn with_tracked_history(mut self) -> Self {
        self.history = Some(Vec::new());
        self
    }

    /// Sets the argument under decision.
    ///
    /// # Panics
    ///
    /// Panics if the argument does not belong to the instance's argument set;
    /// such a call is a programmer error.
    pub fn with_decision_argument(mut self, arg: ArgumentId, store: &EntityStore) -> Self {
        assert!(
            store.argument_set_members(self.arguments).contains(&arg),
            "decision argument {} does not belong to the instance",
            store.argument_name(arg)
        );
        self.decision_argument = Some(arg);
        self
    }

    /// Sets the grounded, stable and preferred extension sets for the combined-track query.
    pub fn with_triathlon_truth(mut self, triple: [ExtensionSetId; 3]) -> Self {
        self.triathlon = Some(triple);
        self
    }

    /// Returns the handle of the instance's argument set.
    pub fn arguments(&self) -> ArgumentSetId {
        self.arguments
    }

    /// Returns the handle of the instance's attack set.
    pub fn attacks(&self) -> AttackSetId {
        self.attacks
    }

    /// Returns the handle of the instance's ground-truth extension set.
    pub fn extensions(&self) -> ExtensionSetId {
        self.extensions
    }

    /// Returns the argument under decision, if any.
    pub fn decision_argument(&self) -> Option<ArgumentId> {
        self.decision_argument
    }

    /// Returns the grounded, stable and preferred extension sets, if stored.
    pub fn triathlon_truth(&self) -> Option<[ExtensionSetId; 3]> {
        self.triathlon
    }

    /// Returns the translation history, or `None` if it is untracked.
    pub fn history(&self) -> Option<&[String]> {
        self.history.as_deref()
    }

    /// Appends a transformation description to the history, if it is tracked.
    pub fn push_history(&mut self, description: String) {
        if let Some(h) = self.history.as_mut() {
            h.push(description);
        }
    }

    /// Returns a successor of this instance with updated content.
    ///
    /// The decision argument and the triathlon truth are cleared (the
    /// transformation may have invalidated them); the history is carried
    /// over.
    pub fn translated_into(
        &self,
        arguments: ArgumentSetId,
        attacks: AttackSetId,
        extensions: ExtensionSetId,
    ) -> Self {
        AfInstance {
            arguments,
            attacks,
            extensions,
            decision_argument: None,
            triathlon: None,
            history: self.history.clone(),
        }
    }

    /// Returns the number of arguments of the instance.
    pub fn n_arguments(&self, store: &EntityStore) -> usize {
        store.argument_set_members(self.arguments).len()
    }

    /// Returns the number of attacks of the instance.
    pub fn n_attacks(&self, store: &EntityStore) -> usize {
        store.attack_set_members(self.attacks).len()
    }

    /// Formats the translation history for failure reports.
    ///
    /// Returns the string `"none"` if the history is untracked.
    pub fn format_history(&self) -> String {
        match &self.history {
            Some(h) => h.join(" "),
            None => "none".to_string(),
        }
    }
}
