//! Checkers comparing a decoded solver answer against an instance's ground truth.
//!
//! There is one checker per query kind, plus a decorator handling
//! dynamic-track answers by re-applying a static checker to each step.
//! A malformed answer is reported as a check failure carrying the
//! decoder's syntax error; it never aborts a campaign.

use crate::aa::{AfInstance, DynamicAfInstance, EntityStore, Query};
use crate::decoding::OutputDecoder;

/// The verdict of a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// The solver answer matches the ground truth
    Success,
    /// The solver answer is wrong or malformed; the reason is attached
    Failure(String),
}

impl CheckResult {
    /// Returns `true` iff the check succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, CheckResult::Success)
    }

    /// Returns the failure reason, or `None` on success.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            CheckResult::Success => None,
            CheckResult::Failure(reason) => Some(reason),
        }
    }
}

/// The checker associated with a query kind.
///
/// Checkers decode the solver answer with the provided decoder and
/// compare it with the instance's ground truth; the comparison logic of
/// each query kind is carried by its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChecker {
    /// Checks an extension enumeration (EE) answer
    EnumerateExtensions,
    /// Checks a single extension (SE) answer
    SingleExtension,
    /// Checks a credulous acceptance (DC) answer
    CredulousAcceptance,
    /// Checks a skeptical acceptance (DS) answer
    SkepticalAcceptance,
    /// Checks a combined-track (D3) answer
    Triathlon,
}

impl QueryChecker {
    /// Returns the checker for the given query.
    pub fn for_query(query: Query) -> Self {
        match query {
            Query::EE => QueryChecker::EnumerateExtensions,
            Query::SE => QueryChecker::SingleExtension,
            Query::DC => QueryChecker::CredulousAcceptance,
            Query::DS => QueryChecker::SkepticalAcceptance,
            Query::D3 => QueryChecker::Triathlon,
        }
    }

    /// Returns the query this checker handles.
    pub fn query(&self) -> Query {
        match self {
            QueryChecker::EnumerateExtensions => Query::EE,
            QueryChecker::SingleExtension => Query::SE,
            QueryChecker::CredulousAcceptance => Query::DC,
            QueryChecker::SkepticalAcceptance => Query::DS,
            QueryChecker::Triathlon => Query::D3,
        }
    }

    /// Checks a solver answer against the instance's ground truth.
    ///
    /// # Panics
    ///
    /// Panics if the instance lacks the data the query needs (an argument
    /// under decision for DC/DS, the extension-set triple for D3); such a
    /// call is a programmer error.
    pub fn check(
        &self,
        text: &str,
        decoder: &dyn OutputDecoder,
        instance: &AfInstance,
        store: &mut EntityStore,
    ) -> CheckResult {
        let result = match self {
            QueryChecker::EnumerateExtensions => check_enumeration(text, decoder, instance, store),
            QueryChecker::SingleExtension => check_single(text, decoder, instance, store),
            QueryChecker::CredulousAcceptance => check_acceptance(text, decoder, instance, store, true),
            QueryChecker::SkepticalAcceptance => {
                check_acceptance(text, decoder, instance, store, false)
            }
            QueryChecker::Triathlon => check_triathlon(text, decoder, instance, store),
        };
        match result {
            CheckResult::Failure(reason) if instance.history().is_some() => CheckResult::Failure(
                format!("{} (translation history: {})", reason, instance.format_history()),
            ),
            other => other,
        }
    }
}

fn check_enumeration(
    text: &str,
    decoder: &dyn OutputDecoder,
    instance: &AfInstance,
    store: &mut EntityStore,
) -> CheckResult {
    match decoder.read_extension_set(text, store) {
        Ok(decoded) if decoded == instance.extensions() => CheckResult::Success,
        Ok(decoded) => CheckResult::Failure(format!(
            "expected the extension set {}, got {}",
            store.format_extension_set(instance.extensions()),
            store.format_extension_set(decoded)
        )),
        Err(e) => CheckResult::Failure(e.to_string()),
    }
}

fn check_single(
    text: &str,
    decoder: &dyn OutputDecoder,
    instance: &AfInstance,
    store: &mut EntityStore,
) -> CheckResult {
    let extensions = store.extension_set_members(instance.extensions()).to_vec();
    if decoder.is_no_extension(text) {
        return if extensions.is_empty() {
            CheckResult::Success
        } else {
            CheckResult::Failure(format!(
                "got the no-extension answer, but expected a member of {}",
                store.format_extension_set(instance.extensions())
            ))
        };
    }
    match decoder.read_extension(text, store) {
        Ok(decoded) if extensions.contains(&decoded) => CheckResult::Success,
        Ok(decoded) => CheckResult::Failure(format!(
            "the extension {} is not a member of the expected set {}",
            store.format_argument_set(decoded),
            store.format_extension_set(instance.extensions())
        )),
        Err(e) => CheckResult::Failure(e.to_string()),
    }
}

fn check_acceptance(
    text: &str,
    decoder: &dyn OutputDecoder,
    instance: &AfInstance,
    store: &mut EntityStore,
    credulous: bool,
) -> CheckResult {
    let arg = instance
        .decision_argument()
        .expect("checking an acceptance query requires an argument under decision");
    let extensions = store.extension_set_members(instance.extensions());
    let accepted = if credulous {
        extensions
            .iter()
            .any(|ext| store.argument_set_members(*ext).contains(&arg))
    } else {
        extensions
            .iter()
            .all(|ext| store.argument_set_members(*ext).contains(&arg))
    };
    let expected_token = if accepted { "YES" } else { "NO" };
    if (accepted && decoder.is_true(text)) || (!accepted && decoder.is_false(text)) {
        CheckResult::Success
    } else {
        CheckResult::Failure(format!(
            r#"expected "{}", got "{}""#,
            expected_token,
            text.trim()
        ))
    }
}

fn check_triathlon(
    text: &str,
    decoder: &dyn OutputDecoder,
    instance: &AfInstance,
    store: &mut EntityStore,
) -> CheckResult {
    let truth = instance
        .triathlon_truth()
        .expect("checking a combined-track query requires its ground-truth triple");
    let decoded = match decoder.read_triple(text, store) {
        Ok(d) => d,
        Err(e) => return CheckResult::Failure(e.to_string()),
    };
    for (part, (expected, got)) in ["grounded", "stable", "preferred"]
        .iter()
        .zip(truth.iter().zip(decoded.iter()))
    {
        if expected != got {
            return CheckResult::Failure(format!(
                "wrong {} extension set: expected {}, got {}",
                part,
                store.format_extension_set(*expected),
                store.format_extension_set(*got)
            ));
        }
    }
    CheckResult::Success
}

/// The checker for dynamic-track answers.
///
/// The raw solver output is split into one chunk per query step; the
/// wrapped static checker is then applied to each chunk against the
/// corresponding step's instance.
pub struct DynamicChecker {
    inner: QueryChecker,
}

impl DynamicChecker {
    /// Builds a dynamic checker wrapping the checker of the given static query.
    ///
    /// # Panics
    ///
    /// Panics if the query is D3, which has no dynamic track.
    pub fn new(query: Query) -> Self {
        assert!(
            query != Query::D3,
            "the combined-track query has no dynamic track"
        );
        DynamicChecker {
            inner: QueryChecker::for_query(query),
        }
    }

    /// Checks a dynamic-track solver answer against every step of the instance.
    pub fn check(
        &self,
        text: &str,
        decoder: &dyn OutputDecoder,
        instance: &DynamicAfInstance,
        store: &mut EntityStore,
    ) -> CheckResult {
        let chunks = match decoder.split_dynamic(text, self.inner.query()) {
            Ok(c) => c,
            Err(e) => return CheckResult::Failure(e.to_string()),
        };
        let expected_len = 1 + instance.steps().len();
        if chunks.len() != expected_len {
            return CheckResult::Failure(format!(
                "wrong number of results: expected {}, got {}",
                expected_len,
                chunks.len()
            ));
        }
        for (k, (chunk, step)) in chunks.iter().zip(instance.query_instances()).enumerate() {
            if let CheckResult::Failure(reason) = self.inner.check(chunk, decoder, step, store) {
                return if k == 0 {
                    CheckResult::Failure(format!("on the initial framework: {}", reason))
                } else {
                    CheckResult::Failure(format!("after {} change(s): {}", k, reason))
                };
            }
        }
        CheckResult::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aa::Semantics;
    use crate::decoding::SingleLineDecoder;
    use crate::oracle;

    fn no_conflict_instance(store: &mut EntityStore) -> AfInstance {
        let args = ["a", "b", "c"]
            .iter()
            .map(|n| store.argument(n))
            .collect::<Vec<_>>();
        let arguments = store.argument_set(&args);
        let attacks = store.attack_set(&[]);
        let extensions = oracle::compute(Semantics::CO, arguments, attacks, store);
        AfInstance::new(arguments, attacks, extensions)
    }

    #[test]
    fn test_enumeration_pass() {
        let mut store = EntityStore::default();
        let instance = no_conflict_instance(&mut store);
        let checker = QueryChecker::for_query(Query::EE);
        let result = checker.check("[[a,b,c]]", &SingleLineDecoder, &instance, &mut store);
        assert!(result.is_success());
    }

    #[test]
    fn test_enumeration_fail_names_expected_set() {
        let mut store = EntityStore::default();
        let instance = no_conflict_instance(&mut store);
        let checker = QueryChecker::for_query(Query::EE);
        let result = checker.check("[[a,b]]", &SingleLineDecoder, &instance, &mut store);
        let reason = result.failure_reason().unwrap();
        assert!(reason.contains("[[a,b,c]]"), "unexpected reason: {}", reason);
    }

    #[test]
    fn test_enumeration_fail_on_syntax_error() {
        let mut store = EntityStore::default();
        let instance = no_conflict_instance(&mut store);
        let checker = QueryChecker::for_query(Query::EE);
        let result = checker.check("[[a,b,c]", &SingleLineDecoder, &instance, &mut store);
        assert!(!result.is_success());
    }

    #[test]
    fn test_enumeration_fail_appends_history() {
        let mut store = EntityStore::default();
        let mut instance = no_conflict_instance(&mut store).with_tracked_history();
        instance.push_history("arg(c).".to_string());
        let checker = QueryChecker::for_query(Query::EE);
        let result = checker.check("[[a,b]]", &SingleLineDecoder, &instance, &mut store);
        let reason = result.failure_reason().unwrap();
        assert!(
            reason.contains("translation history: arg(c)."),
            "unexpected reason: {}",
            reason
        );
    }

    #[test]
    fn test_single_extension_member() {
        let mut store = EntityStore::default();
        // mutual attack: the preferred extensions are {a} and {b}
        let a = store.argument("a");
        let b = store.argument("b");
        let arguments = store.argument_set(&[a, b]);
        let ab = store.attack(a, b);
        let ba = store.attack(b, a);
        let attacks = store.attack_set(&[ab, ba]);
        let extensions = oracle::compute(Semantics::PR, arguments, attacks, &mut store);
        let instance = AfInstance::new(arguments, attacks, extensions);
        let checker = QueryChecker::for_query(Query::SE);
        assert!(checker
            .check("[a]", &SingleLineDecoder, &instance, &mut store)
            .is_success());
        assert!(checker
            .check("[b]", &SingleLineDecoder, &instance, &mut store)
            .is_success());
        assert!(!checker
            .check("[a,b]", &SingleLineDecoder, &instance, &mut store)
            .is_success());
    }

    #[test]
    fn test_single_extension_no_extension_answer() {
        let mut store = EntityStore::default();
        // a self-attack leaves no stable extension
        let a = store.argument("a");
        let arguments = store.argument_set(&[a]);
        let aa = store.attack(a, a);
        let attacks = store.attack_set(&[aa]);
        let extensions = oracle::compute(Semantics::ST, arguments, attacks, &mut store);
        let instance = AfInstance::new(arguments, attacks, extensions);
        let checker = QueryChecker::for_query(Query::SE);
        assert!(checker
            .check("NO\n", &SingleLineDecoder, &instance, &mut store)
            .is_success());
        let other = no_conflict_instance(&mut store);
        assert!(!checker
            .check("NO\n", &SingleLineDecoder, &other, &mut store)
            .is_success());
    }

    fn credulous_instance(store: &mut EntityStore) -> AfInstance {
        // "a" belongs to some but not all complete extensions
        let a = store.argument("a");
        let b = store.argument("b");
        let arguments = store.argument_set(&[a, b]);
        let ab = store.attack(a, b);
        let ba = store.attack(b, a);
        let attacks = store.attack_set(&[ab, ba]);
        let extensions = oracle::compute(Semantics::CO, arguments, attacks, store);
        AfInstance::new(arguments, attacks, extensions).with_decision_argument(a, store)
    }

    #[test]
    fn test_credulous_acceptance() {
        let mut store = EntityStore::default();
        let instance = credulous_instance(&mut store);
        let checker = QueryChecker::for_query(Query::DC);
        assert!(checker
            .check("YES\n", &SingleLineDecoder, &instance, &mut store)
            .is_success());
        assert!(!checker
            .check("NO\n", &SingleLineDecoder, &instance, &mut store)
            .is_success());
        assert!(!checker
            .check("MAYBE\n", &SingleLineDecoder, &instance, &mut store)
            .is_success());
    }

    #[test]
    fn test_skeptical_acceptance() {
        let mut store = EntityStore::default();
        let instance = credulous_instance(&mut store);
        let checker = QueryChecker::for_query(Query::DS);
        // the empty complete extension excludes "a"
        assert!(checker
            .check("NO\n", &SingleLineDecoder, &instance, &mut store)
            .is_success());
        assert!(!checker
            .check("YES\n", &SingleLineDecoder, &instance, &mut store)
            .is_success());
    }

    #[test]
    #[should_panic(expected = "argument under decision")]
    fn test_acceptance_without_decision_argument() {
        let mut store = EntityStore::default();
        let instance = no_conflict_instance(&mut store);
        QueryChecker::for_query(Query::DC).check(
            "YES\n",
            &SingleLineDecoder,
            &instance,
            &mut store,
        );
    }

    #[test]
    fn test_triathlon() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let b = store.argument("b");
        let arguments = store.argument_set(&[a, b]);
        let ab = store.attack(a, b);
        let ba = store.attack(b, a);
        let attacks = store.attack_set(&[ab, ba]);
        let extensions = oracle::compute(Semantics::CO, arguments, attacks, &mut store);
        let truth = oracle::compute_triathlon(arguments, attacks, &mut store);
        let instance = AfInstance::new(arguments, attacks, extensions).with_triathlon_truth(truth);
        let checker = QueryChecker::for_query(Query::D3);
        assert!(checker
            .check("[[]],[[a],[b]],[[a],[b]]", &SingleLineDecoder, &instance, &mut store)
            .is_success());
        let result = checker.check(
            "[[]],[[a]],[[a],[b]]",
            &SingleLineDecoder,
            &instance,
            &mut store,
        );
        let reason = result.failure_reason().unwrap();
        assert!(reason.contains("stable"), "unexpected reason: {}", reason);
    }

    #[test]
    fn test_dynamic_checker() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let b = store.argument("b");
        let arguments = store.argument_set(&[a, b]);
        let no_attack = store.attack_set(&[]);
        let initial_exts = oracle::compute(Semantics::CO, arguments, no_attack, &mut store);
        let initial = AfInstance::new(arguments, no_attack, initial_exts);
        let ab = store.attack(a, b);
        let with_attack = store.attack_set(&[ab]);
        let step_exts = oracle::compute(Semantics::CO, arguments, with_attack, &mut store);
        let step = AfInstance::new(arguments, with_attack, step_exts);
        let mut dynamic = DynamicAfInstance::new(initial);
        dynamic.push_step("+att(a,b).".to_string(), step);
        let checker = DynamicChecker::new(Query::EE);
        assert!(checker
            .check("[[a,b]]\n[[a]]\n", &SingleLineDecoder, &dynamic, &mut store)
            .is_success());
        let wrong_step = checker.check("[[a,b]]\n[[b]]\n", &SingleLineDecoder, &dynamic, &mut store);
        let reason = wrong_step.failure_reason().unwrap();
        assert!(reason.contains("after 1 change(s)"), "unexpected reason: {}", reason);
        let wrong_count =
            checker.check("[[a,b]]\n", &SingleLineDecoder, &dynamic, &mut store);
        let reason = wrong_count.failure_reason().unwrap();
        assert!(
            reason.contains("wrong number of results"),
            "unexpected reason: {}",
            reason
        );
    }
}
