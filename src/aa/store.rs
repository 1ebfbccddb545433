use std::collections::HashMap;

/// The handle of an interned argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgumentId(usize);

/// The handle of an interned attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttackId(usize);

/// The handle of an interned set of arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgumentSetId(usize);

/// The handle of an interned set of attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttackSetId(usize);

/// The handle of an interned set of extensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionSetId(usize);

impl ArgumentSetId {
    /// Returns the raw index of this handle, for use in deduplication signatures.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl AttackSetId {
    /// Returns the raw index of this handle, for use in deduplication signatures.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The canonical store for argumentation entities.
///
/// All entities handled during a generation run are interned in a store:
/// two calls with equal content return the identical handle, making
/// content equality an O(1) handle comparison and deduplication a hash
/// set of handles.
///
/// Sets are interned by their sorted member list.
/// Extension sets are kept sorted by their members' interning order so
/// that iterating them is deterministic across runs.
///
/// A store can be [reset](Self::reset); handles obtained before a reset
/// must not be compared with handles obtained after it.
///
/// # Example
///
/// ```
/// # use scrutari::aa::EntityStore;
/// let mut store = EntityStore::default();
/// let a = store.argument("a");
/// assert_eq!(a, store.argument("a"));
/// assert_ne!(a, store.argument("b"));
/// ```
#[derive(Default)]
pub struct EntityStore {
    argument_names: Vec<String>,
    argument_ids: HashMap<String, ArgumentId>,
    attacks: Vec<(ArgumentId, ArgumentId)>,
    attack_ids: HashMap<(ArgumentId, ArgumentId), AttackId>,
    argument_sets: Vec<Vec<ArgumentId>>,
    argument_set_ids: HashMap<Vec<ArgumentId>, ArgumentSetId>,
    attack_sets: Vec<Vec<AttackId>>,
    attack_set_ids: HashMap<Vec<AttackId>, AttackSetId>,
    extension_sets: Vec<Vec<ArgumentSetId>>,
    extension_set_ids: HashMap<Vec<ArgumentSetId>, ExtensionSetId>,
}

impl EntityStore {
    /// Interns an argument given its name.
    pub fn argument(&mut self, name: &str) -> ArgumentId {
        match self.argument_ids.get(name) {
            Some(id) => *id,
            None => {
                let id = ArgumentId(self.argument_names.len());
                self.argument_names.push(name.to_string());
                self.argument_ids.insert(name.to_string(), id);
                id
            }
        }
    }

    /// Returns the name of an interned argument.
    pub fn argument_name(&self, id: ArgumentId) -> &str {
        &self.argument_names[id.0]
    }

    /// Interns an attack given its attacker and attacked arguments.
    pub fn attack(&mut self, attacker: ArgumentId, attacked: ArgumentId) -> AttackId {
        match self.attack_ids.get(&(attacker, attacked)) {
            Some(id) => *id,
            None => {
                let id = AttackId(self.attacks.len());
                self.attacks.push((attacker, attacked));
                self.attack_ids.insert((attacker, attacked), id);
                id
            }
        }
    }

    /// Returns the attacker and attacked arguments of an interned attack.
    pub fn attack_arguments(&self, id: AttackId) -> (ArgumentId, ArgumentId) {
        self.attacks[id.0]
    }

    /// Interns a set of arguments given its members.
    ///
    /// The member list may be given in any order and may contain duplicates;
    /// the interned content is the sorted, deduplicated list.
    pub fn argument_set(&mut self, members: &[ArgumentId]) -> ArgumentSetId {
        let mut content = members.to_vec();
        content.sort_unstable();
        content.dedup();
        match self.argument_set_ids.get(&content) {
            Some(id) => *id,
            None => {
                let id = ArgumentSetId(self.argument_sets.len());
                self.argument_sets.push(content.clone());
                self.argument_set_ids.insert(content, id);
                id
            }
        }
    }

    /// Returns the sorted members of an interned argument set.
    pub fn argument_set_members(&self, id: ArgumentSetId) -> &[ArgumentId] {
        &self.argument_sets[id.0]
    }

    /// Interns a set of attacks given its members.
    pub fn attack_set(&mut self, members: &[AttackId]) -> AttackSetId {
        let mut content = members.to_vec();
        content.sort_unstable();
        content.dedup();
        match self.attack_set_ids.get(&content) {
            Some(id) => *id,
            None => {
                let id = AttackSetId(self.attack_sets.len());
                self.attack_sets.push(content.clone());
                self.attack_set_ids.insert(content, id);
                id
            }
        }
    }

    /// Returns the sorted members of an interned attack set.
    pub fn attack_set_members(&self, id: AttackSetId) -> &[AttackId] {
        &self.attack_sets[id.0]
    }

    /// Interns a set of extensions given its members.
    ///
    /// The members are sorted by their interning order, making the
    /// iteration order of every extension set deterministic.
    pub fn extension_set(&mut self, extensions: &[ArgumentSetId]) -> ExtensionSetId {
        let mut content = extensions.to_vec();
        content.sort_unstable();
        content.dedup();
        match self.extension_set_ids.get(&content) {
            Some(id) => *id,
            None => {
                let id = ExtensionSetId(self.extension_sets.len());
                self.extension_sets.push(content.clone());
                self.extension_set_ids.insert(content, id);
                id
            }
        }
    }

    /// Returns the members of an interned extension set, sorted by interning order.
    pub fn extension_set_members(&self, id: ExtensionSetId) -> &[ArgumentSetId] {
        &self.extension_sets[id.0]
    }

    /// Formats an argument set as a bracketed, comma-separated name list.
    pub fn format_argument_set(&self, id: ArgumentSetId) -> String {
        let mut result = String::from("[");
        let mut first = true;
        for arg in self.argument_set_members(id) {
            if first {
                first = false;
            } else {
                result.push(',');
            }
            result.push_str(self.argument_name(*arg));
        }
        result.push(']');
        result
    }

    /// Formats an extension set as a bracketed list of formatted argument sets.
    pub fn format_extension_set(&self, id: ExtensionSetId) -> String {
        let mut result = String::from("[");
        let mut first = true;
        for ext in self.extension_set_members(id) {
            if first {
                first = false;
            } else {
                result.push(',');
            }
            result.push_str(&self.format_argument_set(*ext));
        }
        result.push(']');
        result
    }

    /// Clears every interning table.
    ///
    /// After a reset, the store behaves as a fresh one; handles delivered
    /// before the reset must not be compared with handles delivered after
    /// it.
    pub fn reset(&mut self) {
        self.argument_names.clear();
        self.argument_ids.clear();
        self.attacks.clear();
        self.attack_ids.clear();
        self.argument_sets.clear();
        self.argument_set_ids.clear();
        self.attack_sets.clear();
        self.attack_set_ids.clear();
        self.extension_sets.clear();
        self.extension_set_ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_argument_twice() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let b = store.argument("b");
        assert_eq!(a, store.argument("a"));
        assert_eq!(b, store.argument("b"));
        assert_ne!(a, b);
        assert_eq!("a", store.argument_name(a));
    }

    #[test]
    fn test_intern_attack_twice() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let b = store.argument("b");
        let att = store.attack(a, b);
        assert_eq!(att, store.attack(a, b));
        assert_ne!(att, store.attack(b, a));
        assert_eq!((a, b), store.attack_arguments(att));
    }

    #[test]
    fn test_intern_argument_set_order_independent() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let b = store.argument("b");
        let set = store.argument_set(&[a, b]);
        assert_eq!(set, store.argument_set(&[b, a]));
        assert_eq!(set, store.argument_set(&[b, a, a]));
        assert_eq!(&[a, b], store.argument_set_members(set));
    }

    #[test]
    fn test_intern_extension_set_order_independent() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let b = store.argument("b");
        let singleton_a = store.argument_set(&[a]);
        let singleton_b = store.argument_set(&[b]);
        let exts = store.extension_set(&[singleton_b, singleton_a]);
        assert_eq!(exts, store.extension_set(&[singleton_a, singleton_b]));
        assert_eq!(
            &[singleton_a, singleton_b],
            store.extension_set_members(exts)
        );
    }

    #[test]
    fn test_format_argument_set() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let b = store.argument("b");
        let empty = store.argument_set(&[]);
        let set = store.argument_set(&[a, b]);
        assert_eq!("[]", store.format_argument_set(empty));
        assert_eq!("[a,b]", store.format_argument_set(set));
    }

    #[test]
    fn test_format_extension_set() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let empty = store.argument_set(&[]);
        let singleton = store.argument_set(&[a]);
        let exts = store.extension_set(&[empty, singleton]);
        assert_eq!("[[],[a]]", store.format_extension_set(exts));
    }

    #[test]
    fn test_reset() {
        let mut store = EntityStore::default();
        let a_before = store.argument("a");
        store.argument("b");
        store.reset();
        let b_after = store.argument("b");
        assert_eq!("b", store.argument_name(b_after));
        // interning restarts from scratch, so pre-reset handles must not
        // be compared with post-reset ones
        assert_eq!(a_before, b_after);
    }
}
