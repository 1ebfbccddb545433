//! The dDNNF validator: parsing, structural checks and model enumeration.
//!
//! Compiled forms are read from the node-based `nnf` text format.
//! Decomposability and determinism are checked while the nodes are
//! built; each node carries its list of partial models, and the root's
//! list is completed over the declared variables on demand.

use crate::checking::CheckResult;
use crate::cnf::{format_model, CnfInstance};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// An error raised when a compiled form is malformed or ill-structured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NnfError {
    /// The preamble line is absent or does not match `nnf <n> <e> <v>`
    InvalidPreamble(String),
    /// The declared node count does not match the number of node lines
    WrongNodeCount {
        /// The count declared in the preamble
        declared: usize,
        /// The number of node lines actually read
        got: usize,
    },
    /// The declared edge count does not match the number of child references
    WrongEdgeCount {
        /// The count declared in the preamble
        declared: usize,
        /// The number of child references actually read
        got: usize,
    },
    /// A node line does not match any of the `L`, `A` and `O` patterns
    InvalidNodeLine {
        /// The index of the offending node
        node: usize,
        /// The offending line
        line: String,
    },
    /// A node refers to a child that is not declared before it
    UndeclaredChild {
        /// The index of the offending node
        node: usize,
        /// The out-of-range child index
        child: usize,
    },
    /// A literal refers to a variable beyond the declared count
    OutOfRangeLiteral {
        /// The index of the offending node
        node: usize,
        /// The offending literal
        literal: isize,
    },
    /// The children of an AND node share a variable
    NotDecomposable {
        /// The index of the offending node
        node: usize,
    },
    /// The children of an OR node do not oppose on its conflict variable
    NotDeterministic {
        /// The index of the offending node
        node: usize,
    },
}

impl Display for NnfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NnfError::InvalidPreamble(line) => {
                write!(f, r#"invalid preamble "{}""#, line)
            }
            NnfError::WrongNodeCount { declared, got } => {
                write!(f, "expected {} node(s), got {}", declared, got)
            }
            NnfError::WrongEdgeCount { declared, got } => {
                write!(f, "expected {} edge(s), got {}", declared, got)
            }
            NnfError::InvalidNodeLine { node, line } => {
                write!(f, r#"invalid line "{}" for node {}"#, line, node)
            }
            NnfError::UndeclaredChild { node, child } => {
                write!(f, "node {} refers to the undeclared node {}", node, child)
            }
            NnfError::OutOfRangeLiteral { node, literal } => {
                write!(f, "node {} holds the out-of-range literal {}", node, literal)
            }
            NnfError::NotDecomposable { node } => {
                write!(f, "the AND node {} is not decomposable", node)
            }
            NnfError::NotDeterministic { node } => {
                write!(f, "the OR node {} is not deterministic", node)
            }
        }
    }
}

impl std::error::Error for NnfError {}

type PartialModel = BTreeMap<usize, bool>;

struct Node {
    models: Vec<PartialModel>,
    vars: BTreeSet<usize>,
}

/// A parsed, structurally checked compiled form.
pub struct Ddnnf {
    n_vars: usize,
    root_models: Vec<PartialModel>,
}

impl Ddnnf {
    /// Parses a compiled form, checking its structure along the way.
    pub fn parse(text: &str) -> Result<Self, NnfError> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let preamble = lines
            .next()
            .ok_or_else(|| NnfError::InvalidPreamble(String::new()))?;
        let (n_nodes, n_edges, n_vars) = read_preamble(preamble)?;
        let mut nodes: Vec<Node> = Vec::with_capacity(n_nodes);
        let mut edges = 0;
        for line in lines {
            let index = nodes.len();
            if index == n_nodes {
                return Err(NnfError::WrongNodeCount {
                    declared: n_nodes,
                    got: index + 1,
                });
            }
            let node = read_node(line, index, n_vars, &mut edges, &nodes)?;
            nodes.push(node);
        }
        if nodes.len() != n_nodes {
            return Err(NnfError::WrongNodeCount {
                declared: n_nodes,
                got: nodes.len(),
            });
        }
        if edges != n_edges {
            return Err(NnfError::WrongEdgeCount {
                declared: n_edges,
                got: edges,
            });
        }
        let root_models = nodes
            .pop()
            .map(|n| n.models)
            .unwrap_or_default();
        Ok(Ddnnf {
            n_vars,
            root_models,
        })
    }

    /// Returns the declared variable count.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Returns the number of models over the declared variables.
    pub fn count_models(&self) -> u64 {
        self.root_models
            .iter()
            .map(|m| 1u64 << (self.n_vars - m.len()))
            .sum()
    }

    /// Enumerates the models over the declared variables.
    ///
    /// Each partial model of the root is completed by enumerating the
    /// assignments of its free variables.
    pub fn enumerate_models(&self) -> Vec<BTreeSet<isize>> {
        let mut models = Vec::new();
        for partial in &self.root_models {
            let free = (1..=self.n_vars)
                .filter(|v| !partial.contains_key(v))
                .collect::<Vec<usize>>();
            for bits in 0..1u64 << free.len() {
                let mut model = partial
                    .iter()
                    .map(|(&v, &b)| signed(v, b))
                    .collect::<BTreeSet<isize>>();
                for (i, &v) in free.iter().enumerate() {
                    model.insert(signed(v, bits >> i & 1 == 1));
                }
                models.push(model);
            }
        }
        models
    }

    /// Checks that the compiled form has exactly the models of the CNF instance.
    pub fn check_against(&self, instance: &CnfInstance) -> CheckResult {
        if self.n_vars != instance.n_vars() {
            return CheckResult::Failure(format!(
                "the compiled form declares {} variable(s), the instance {}",
                self.n_vars,
                instance.n_vars()
            ));
        }
        let compiled = self.enumerate_models();
        if let Some(missing) = instance.models().iter().find(|m| !compiled.contains(m)) {
            return CheckResult::Failure(format!(
                "the model {} is missing from the compiled form",
                format_model(missing)
            ));
        }
        if let Some(unexpected) = compiled.iter().find(|m| !instance.models().contains(m)) {
            return CheckResult::Failure(format!(
                "the compiled form has the unexpected model {}",
                format_model(unexpected)
            ));
        }
        CheckResult::Success
    }
}

fn signed(var: usize, value: bool) -> isize {
    if value {
        var as isize
    } else {
        -(var as isize)
    }
}

fn read_preamble(line: &str) -> Result<(usize, usize, usize), NnfError> {
    let error = || NnfError::InvalidPreamble(line.to_string());
    let words = line.split_ascii_whitespace().collect::<Vec<&str>>();
    if words.len() != 4 || words[0] != "nnf" {
        return Err(error());
    }
    let counts = words[1..]
        .iter()
        .map(|w| w.parse::<usize>().map_err(|_| error()))
        .collect::<Result<Vec<usize>, NnfError>>()?;
    Ok((counts[0], counts[1], counts[2]))
}

fn read_node(
    line: &str,
    index: usize,
    n_vars: usize,
    edges: &mut usize,
    nodes: &[Node],
) -> Result<Node, NnfError> {
    let error = || NnfError::InvalidNodeLine {
        node: index,
        line: line.to_string(),
    };
    let words = line.split_ascii_whitespace().collect::<Vec<&str>>();
    match words.first() {
        Some(&"L") => {
            if words.len() != 2 {
                return Err(error());
            }
            let literal = words[1].parse::<isize>().map_err(|_| error())?;
            if literal == 0 || literal.unsigned_abs() > n_vars {
                return Err(NnfError::OutOfRangeLiteral {
                    node: index,
                    literal,
                });
            }
            Ok(Node {
                models: vec![BTreeMap::from([(literal.unsigned_abs(), literal > 0)])],
                vars: BTreeSet::from([literal.unsigned_abs()]),
            })
        }
        Some(&"A") => {
            let children = read_children(&words[1..], words.get(1), index, edges, nodes, error)?;
            and_node(&children, index)
        }
        Some(&"O") => {
            if words.len() < 3 {
                return Err(error());
            }
            let conflict_var = words[1].parse::<usize>().map_err(|_| error())?;
            let children = read_children(&words[2..], words.get(2), index, edges, nodes, error)?;
            or_node(&children, conflict_var, index, error)
        }
        _ => Err(error()),
    }
}

/// Reads a `<k> <child>*k` suffix and resolves the child indices.
fn read_children<'a>(
    words: &[&str],
    count_word: Option<&&str>,
    index: usize,
    edges: &mut usize,
    nodes: &'a [Node],
    error: impl Fn() -> NnfError,
) -> Result<Vec<&'a Node>, NnfError> {
    let declared = count_word
        .ok_or_else(&error)?
        .parse::<usize>()
        .map_err(|_| error())?;
    if words.len() != declared + 1 {
        return Err(error());
    }
    let mut children = Vec::with_capacity(declared);
    for word in &words[1..] {
        let child = word.parse::<usize>().map_err(|_| error())?;
        if child >= index {
            return Err(NnfError::UndeclaredChild { node: index, child });
        }
        children.push(&nodes[child]);
    }
    *edges += declared;
    Ok(children)
}

/// Builds an AND node, checking decomposability; no children means True.
fn and_node(children: &[&Node], index: usize) -> Result<Node, NnfError> {
    let mut vars = BTreeSet::new();
    for child in children {
        if !vars.is_disjoint(&child.vars) {
            return Err(NnfError::NotDecomposable { node: index });
        }
        vars.extend(child.vars.iter().copied());
    }
    let mut models: Vec<PartialModel> = vec![BTreeMap::new()];
    for child in children {
        models = models
            .iter()
            .flat_map(|m| {
                child.models.iter().map(|cm| {
                    let mut merged = m.clone();
                    merged.extend(cm.iter().map(|(&v, &b)| (v, b)));
                    merged
                })
            })
            .collect();
    }
    Ok(Node { models, vars })
}

/// Builds an OR node, checking determinism; no children means False.
fn or_node(
    children: &[&Node],
    conflict_var: usize,
    index: usize,
    error: impl Fn() -> NnfError,
) -> Result<Node, NnfError> {
    match children {
        [] => Ok(Node {
            models: Vec::new(),
            vars: BTreeSet::new(),
        }),
        [left, right] => {
            let left_value = constant_value_of(left, conflict_var);
            let right_value = constant_value_of(right, conflict_var);
            match (left_value, right_value) {
                (Some(l), Some(r)) if l != r => {}
                _ => return Err(NnfError::NotDeterministic { node: index }),
            }
            Ok(Node {
                models: left
                    .models
                    .iter()
                    .chain(right.models.iter())
                    .cloned()
                    .collect(),
                vars: left.vars.union(&right.vars).copied().collect(),
            })
        }
        _ => Err(error()),
    }
}

/// Returns the single truth value a node assigns to a variable across
/// all of its models, if any.
fn constant_value_of(node: &Node, var: usize) -> Option<bool> {
    let mut value = None;
    for model in &node.models {
        match (value, model.get(&var)) {
            (_, None) => return None,
            (None, Some(&b)) => value = Some(b),
            (Some(v), Some(&b)) if v != b => return None,
            _ => {}
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_literal() {
        let ddnnf = Ddnnf::parse("nnf 1 0 1\nL 1\n").unwrap();
        assert_eq!(1, ddnnf.n_vars());
        assert_eq!(1, ddnnf.count_models());
        assert_eq!(vec![BTreeSet::from([1])], ddnnf.enumerate_models());
    }

    #[test]
    fn test_free_variable_completion() {
        let ddnnf = Ddnnf::parse("nnf 1 0 2\nL 1\n").unwrap();
        assert_eq!(2, ddnnf.count_models());
        let models = ddnnf.enumerate_models();
        assert_eq!(2, models.len());
        assert!(models.contains(&BTreeSet::from([1, -2])));
        assert!(models.contains(&BTreeSet::from([1, 2])));
    }

    #[test]
    fn test_constants() {
        let truth = Ddnnf::parse("nnf 1 0 1\nA 0\n").unwrap();
        assert_eq!(2, truth.count_models());
        let falsum = Ddnnf::parse("nnf 1 0 1\nO 0 0\n").unwrap();
        assert_eq!(0, falsum.count_models());
        assert!(falsum.enumerate_models().is_empty());
    }

    #[test]
    fn test_conjunction() {
        let ddnnf = Ddnnf::parse("nnf 3 2 2\nL 1\nL -2\nA 2 0 1\n").unwrap();
        assert_eq!(vec![BTreeSet::from([1, -2])], ddnnf.enumerate_models());
    }

    #[test]
    fn test_deterministic_disjunction() {
        // x1 XOR x2, decided on variable 1
        let ddnnf =
            Ddnnf::parse("nnf 7 6 2\nL 1\nL -2\nA 2 0 1\nL -1\nL 2\nA 2 3 4\nO 1 2 2 5\n").unwrap();
        assert_eq!(2, ddnnf.count_models());
        let models = ddnnf.enumerate_models();
        assert!(models.contains(&BTreeSet::from([1, -2])));
        assert!(models.contains(&BTreeSet::from([-1, 2])));
    }

    #[test]
    fn test_preamble_errors() {
        assert!(matches!(
            Ddnnf::parse(""),
            Err(NnfError::InvalidPreamble(_))
        ));
        assert!(matches!(
            Ddnnf::parse("cnf 1 0 1\nL 1\n"),
            Err(NnfError::InvalidPreamble(_))
        ));
        assert!(matches!(
            Ddnnf::parse("nnf 1 0\nL 1\n"),
            Err(NnfError::InvalidPreamble(_))
        ));
    }

    #[test]
    fn test_count_mismatches() {
        assert!(matches!(
            Ddnnf::parse("nnf 2 0 1\nL 1\n"),
            Err(NnfError::WrongNodeCount {
                declared: 2,
                got: 1
            })
        ));
        assert!(matches!(
            Ddnnf::parse("nnf 1 0 1\nL 1\nL -1\n"),
            Err(NnfError::WrongNodeCount { declared: 1, .. })
        ));
        assert!(matches!(
            Ddnnf::parse("nnf 3 1 2\nL 1\nL -2\nA 2 0 1\n"),
            Err(NnfError::WrongEdgeCount {
                declared: 1,
                got: 2
            })
        ));
    }

    #[test]
    fn test_reference_errors() {
        assert!(matches!(
            Ddnnf::parse("nnf 2 2 1\nL 1\nA 2 0 1\n"),
            Err(NnfError::UndeclaredChild { node: 1, child: 1 })
        ));
        assert!(matches!(
            Ddnnf::parse("nnf 2 1 1\nL 1\nA 1 2\n"),
            Err(NnfError::UndeclaredChild { node: 1, child: 2 })
        ));
    }

    #[test]
    fn test_out_of_range_literal() {
        assert!(matches!(
            Ddnnf::parse("nnf 1 0 1\nL 2\n"),
            Err(NnfError::OutOfRangeLiteral {
                node: 0,
                literal: 2
            })
        ));
    }

    #[test]
    fn test_non_decomposable_and() {
        assert!(matches!(
            Ddnnf::parse("nnf 3 2 1\nL 1\nL -1\nA 2 0 1\n"),
            Err(NnfError::NotDecomposable { node: 2 })
        ));
    }

    #[test]
    fn test_non_deterministic_or() {
        // both children assign the conflict variable the same value
        assert!(matches!(
            Ddnnf::parse("nnf 3 2 2\nL 1\nL 1\nO 1 2 0 1\n"),
            Err(NnfError::NotDeterministic { node: 2 })
        ));
        // a child leaves the conflict variable free
        assert!(matches!(
            Ddnnf::parse("nnf 3 2 2\nL 1\nL 2\nO 1 2 0 1\n"),
            Err(NnfError::NotDeterministic { node: 2 })
        ));
    }

    #[test]
    fn test_invalid_node_lines() {
        assert!(matches!(
            Ddnnf::parse("nnf 1 0 1\nL\n"),
            Err(NnfError::InvalidNodeLine { node: 0, .. })
        ));
        assert!(matches!(
            Ddnnf::parse("nnf 1 0 1\nX 1\n"),
            Err(NnfError::InvalidNodeLine { node: 0, .. })
        ));
        assert!(matches!(
            Ddnnf::parse("nnf 1 0 1\nA 1\n"),
            Err(NnfError::InvalidNodeLine { node: 0, .. })
        ));
        assert!(matches!(
            Ddnnf::parse("nnf 4 3 2\nL 1\nL -1\nL 2\nO 1 3 0 1 2\n"),
            Err(NnfError::InvalidNodeLine { node: 3, .. })
        ));
    }

    #[test]
    fn test_check_against() {
        let ddnnf = Ddnnf::parse("nnf 1 0 1\nL 1\n").unwrap();
        let matching = CnfInstance::new(1, vec![vec![1]]);
        assert!(ddnnf.check_against(&matching).is_success());
        let wider = CnfInstance::new(1, vec![]);
        let result = ddnnf.check_against(&wider);
        let reason = result.failure_reason().unwrap();
        assert!(reason.contains("{-1}"), "unexpected reason: {}", reason);
        assert!(reason.contains("missing"), "unexpected reason: {}", reason);
        let narrower = CnfInstance::new(1, vec![vec![1], vec![-1]]);
        let result = ddnnf.check_against(&narrower);
        let reason = result.failure_reason().unwrap();
        assert!(reason.contains("unexpected"), "unexpected reason: {}", reason);
    }
}
