//! The CNF track: instances, translators and SAT solver answer checking.
//!
//! A CNF instance carries its exhaustively computed model set as ground
//! truth; instances are deliberately small, so the 2^n enumeration stays
//! tractable.

use crate::aa::EntityStore;
use crate::checking::CheckResult;
use crate::decoding::{DecodingResult, SyntaxError};
use crate::generation::{GeneratedInstance, InstanceTranslator};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// A CNF formula together with its exhaustively computed model set.
///
/// Variables are numbered from 1 to the declared count; literals are
/// signed integers and models are sets of literals assigning every
/// declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnfInstance {
    n_vars: usize,
    clauses: Vec<Vec<isize>>,
    models: Vec<BTreeSet<isize>>,
}

impl CnfInstance {
    /// Builds an instance and computes its models.
    ///
    /// # Panics
    ///
    /// Panics if a clause contains the literal 0 or a literal referring
    /// to an undeclared variable.
    pub fn new(n_vars: usize, clauses: Vec<Vec<isize>>) -> Self {
        for clause in &clauses {
            for &l in clause {
                assert!(
                    l != 0 && l.unsigned_abs() <= n_vars,
                    "the literal {} does not fit an instance with {} variables",
                    l,
                    n_vars
                );
            }
        }
        let models = compute_models(n_vars, &clauses);
        CnfInstance {
            n_vars,
            clauses,
            models,
        }
    }

    /// Returns the number of declared variables.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Returns the clauses.
    pub fn clauses(&self) -> &[Vec<isize>] {
        &self.clauses
    }

    /// Returns the models, each assigning every declared variable.
    pub fn models(&self) -> &[BTreeSet<isize>] {
        &self.models
    }

    /// Returns `true` iff the instance has at least one model.
    pub fn is_satisfiable(&self) -> bool {
        !self.models.is_empty()
    }
}

impl GeneratedInstance for CnfInstance {
    fn dedup_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.n_vars.hash(&mut hasher);
        self.clauses.hash(&mut hasher);
        hasher.finish()
    }
}

fn compute_models(n_vars: usize, clauses: &[Vec<isize>]) -> Vec<BTreeSet<isize>> {
    let mut models = Vec::new();
    for bits in 0..1u64 << n_vars {
        let model = (1..=n_vars)
            .map(|v| {
                if bits >> (v - 1) & 1 == 1 {
                    v as isize
                } else {
                    -(v as isize)
                }
            })
            .collect::<BTreeSet<isize>>();
        if clauses.iter().all(|cl| cl.iter().any(|l| model.contains(l))) {
            models.push(model);
        }
    }
    models
}

/// Formats a model the way it appears in failure messages.
pub(crate) fn format_model(model: &BTreeSet<isize>) -> String {
    let literals = model
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<String>>();
    format!("{{{}}}", literals.join(","))
}

/// A translator declaring one more variable, leaving the clauses unchanged.
#[derive(Default)]
pub struct NewVariableTranslator;

impl NewVariableTranslator {
    /// Builds a new instance of the translator.
    pub fn new() -> Self {
        NewVariableTranslator
    }
}

impl InstanceTranslator<CnfInstance> for NewVariableTranslator {
    fn name(&self) -> &str {
        "new-variable"
    }

    fn can_apply(&self, _instance: &CnfInstance, _store: &EntityStore) -> bool {
        true
    }

    fn apply(&self, instance: &CnfInstance, _store: &mut EntityStore, _rng: &mut StdRng) -> CnfInstance {
        CnfInstance::new(instance.n_vars() + 1, instance.clauses().to_vec())
    }
}

const MAX_RANDOM_CLAUSE_LEN: usize = 3;

/// A translator adding a random clause over the declared variables.
///
/// The clause involves up to three distinct variables, each with a
/// random polarity.
#[derive(Default)]
pub struct NewClauseTranslator;

impl NewClauseTranslator {
    /// Builds a new instance of the translator.
    pub fn new() -> Self {
        NewClauseTranslator
    }
}

impl InstanceTranslator<CnfInstance> for NewClauseTranslator {
    fn name(&self) -> &str {
        "new-clause"
    }

    fn can_apply(&self, instance: &CnfInstance, _store: &EntityStore) -> bool {
        instance.n_vars() > 0
    }

    fn apply(&self, instance: &CnfInstance, _store: &mut EntityStore, rng: &mut StdRng) -> CnfInstance {
        let len = rng.gen_range(1..=usize::min(MAX_RANDOM_CLAUSE_LEN, instance.n_vars()));
        let mut vars = BTreeSet::new();
        while vars.len() < len {
            vars.insert(rng.gen_range(1..=instance.n_vars()) as isize);
        }
        let clause = vars
            .into_iter()
            .map(|v| if rng.gen::<bool>() { v } else { -v })
            .collect::<Vec<isize>>();
        let mut clauses = instance.clauses().to_vec();
        clauses.push(clause);
        CnfInstance::new(instance.n_vars(), clauses)
    }
}

/// A SAT solver answer, as read from its standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatAnswer {
    /// The solver found a model
    Satisfiable(BTreeSet<isize>),
    /// The solver proved the instance has no model
    Unsatisfiable,
}

/// Reads a SAT-competition answer from the solver's standard output.
///
/// Lines beginning with `c` are ignored; exactly one `s` status line is
/// expected, and satisfiable answers must carry `v` lines whose literals
/// end with a terminating 0.
pub fn read_sat_answer(text: &str) -> DecodingResult<SatAnswer> {
    let mut status = None;
    let mut model = BTreeSet::new();
    let mut value_lines_seen = false;
    let mut model_terminated = false;
    for line in text.lines() {
        if line.starts_with('c') || line.trim().is_empty() {
            continue;
        }
        if line == "s SATISFIABLE" || line == "s UNSATISFIABLE" {
            if status.is_some() {
                return Err(SyntaxError::new(text, "multiple status lines"));
            }
            status = Some(line == "s SATISFIABLE");
        } else if let Some(literals) = line.strip_prefix("v ") {
            value_lines_seen = true;
            for word in literals.split_ascii_whitespace() {
                let n = word.parse::<isize>().map_err(|_| {
                    SyntaxError::new(text, &format!(r#""{}" is not a literal"#, word))
                })?;
                if model_terminated {
                    return Err(SyntaxError::new(text, "literal after the terminating 0"));
                }
                if n == 0 {
                    model_terminated = true;
                } else {
                    model.insert(n);
                }
            }
        } else {
            return Err(SyntaxError::new(
                text,
                &format!(r#"unexpected line "{}""#, line),
            ));
        }
    }
    match status {
        None => Err(SyntaxError::new(text, "no status line")),
        Some(false) if value_lines_seen => {
            Err(SyntaxError::new(text, "value lines in an unsatisfiable answer"))
        }
        Some(false) => Ok(SatAnswer::Unsatisfiable),
        Some(true) if !model_terminated => {
            Err(SyntaxError::new(text, "missing model terminating 0"))
        }
        Some(true) => Ok(SatAnswer::Satisfiable(model)),
    }
}

/// Checks a SAT solver answer against the instance's model set.
pub fn check_sat_answer(text: &str, instance: &CnfInstance) -> CheckResult {
    match read_sat_answer(text) {
        Err(e) => CheckResult::Failure(e.to_string()),
        Ok(SatAnswer::Unsatisfiable) => {
            if instance.is_satisfiable() {
                CheckResult::Failure(format!(
                    "got the unsatisfiable status although the instance has {} model(s)",
                    instance.models().len()
                ))
            } else {
                CheckResult::Success
            }
        }
        Ok(SatAnswer::Satisfiable(model)) => {
            if instance.models().contains(&model) {
                CheckResult::Success
            } else {
                CheckResult::Failure(format!(
                    "the assignment {} is not a model of the instance",
                    format_model(&model)
                ))
            }
        }
    }
}
