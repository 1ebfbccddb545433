use super::AfInstance;

/// A dynamic-track test instance.
///
/// It is made of an initial instance and an ordered sequence of attack
/// changes, each recorded as a human-readable delta description (in the
/// APXM syntax, `+att(a,b).` or `-att(a,b).`) together with the instance
/// resulting from the change.
/// The ground truth of every step is kept oracle-consistent by the
/// translators that build these objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamicAfInstance {
    initial: AfInstance,
    steps: Vec<(String, AfInstance)>,
}

impl DynamicAfInstance {
    /// Builds a dynamic instance with no attack change.
    pub fn new(initial: AfInstance) -> Self {
        DynamicAfInstance {
            initial,
            steps: Vec::new(),
        }
    }

    /// Returns the initial instance.
    pub fn initial(&self) -> &AfInstance {
        &self.initial
    }

    /// Returns the recorded attack changes and their resulting instances.
    pub fn steps(&self) -> &[(String, AfInstance)] {
        &self.steps
    }

    /// Appends an attack change.
    pub fn push_step(&mut self, delta: String, result: AfInstance) {
        self.steps.push((delta, result));
    }

    /// Returns the instances the solver must answer for, in query order.
    ///
    /// The initial instance comes first, followed by the result of each
    /// attack change.
    pub fn query_instances(&self) -> impl Iterator<Item = &AfInstance> + '_ {
        std::iter::once(&self.initial).chain(self.steps.iter().map(|(_, i)| i))
    }
}
