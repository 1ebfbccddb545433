//! Argumentation framework entities: the canonical entity store, test instances and problem descriptions.

mod dynamic;
pub use dynamic::DynamicAfInstance;

mod framework;
pub use framework::AfInstance;

mod problem;
pub use problem::{read_problem_string, Query, Semantics};

mod store;
pub use store::{
    ArgumentId, ArgumentSetId, AttackId, AttackSetId, EntityStore, ExtensionSetId,
};
