use crate::aa::{read_problem_string, AfInstance, EntityStore, Query, Semantics};
use crate::generation::{
    AttackRemovalTranslator, DynamicTranslator, GenerationEngine, InstanceTranslator,
    NewArgumentTranslator, NewAttackTranslator,
};
use crate::checking::CheckResult;
use crate::oracle;
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use log::{debug, info, warn};
use std::str::FromStr;

pub(crate) const ARG_PROBLEM: &str = "PROBLEM";
pub(crate) const ARG_SEED: &str = "SEED";
pub(crate) const ARG_MAX_DEPTH: &str = "MAX_DEPTH";
pub(crate) const ARG_DYNAMICS: &str = "DYNAMICS";
pub(crate) const ARG_SELF_ATTACKS: &str = "SELF_ATTACKS";

pub(crate) fn problem_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_PROBLEM)
        .short("p")
        .empty_values(false)
        .multiple(false)
        .help("the problem to check, eg. EE-CO (D3 stands alone)")
        .required(true)
}

pub(crate) fn seed_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_SEED)
        .long("seed")
        .empty_values(false)
        .multiple(false)
        .default_value("0")
        .help("the seed of the random instance generation")
}

pub(crate) fn max_depth_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_MAX_DEPTH)
        .long("max-depth")
        .empty_values(false)
        .multiple(false)
        .default_value("3")
        .help("the maximal depth of the generation tree")
}

pub(crate) fn dynamics_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_DYNAMICS)
        .long("dynamics")
        .takes_value(false)
        .help("generate dynamic instances (attack changes described in the APXM format)")
}

pub(crate) fn self_attacks_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_SELF_ATTACKS)
        .long("allow-self-attacks")
        .takes_value(false)
        .help("allow the generation of self-attacking arguments")
}

/// Reads the problem CLI argument.
///
/// The combined-track problem string has no semantics part; the complete
/// semantics is returned for it, as the generation engine needs one for
/// its bookkeeping.
pub(crate) fn read_problem_arg(arg_matches: &ArgMatches<'_>) -> Result<(Query, Semantics)> {
    let problem = arg_matches.value_of(ARG_PROBLEM).unwrap();
    if problem.eq_ignore_ascii_case("d3") {
        Ok((Query::D3, Semantics::CO))
    } else {
        read_problem_string(problem)
    }
}

pub(crate) fn read_number_arg<T>(arg_matches: &ArgMatches<'_>, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    arg_matches
        .value_of(name)
        .unwrap()
        .parse::<T>()
        .with_context(|| format!(r#"while parsing the "{}" argument"#, name.to_lowercase()))
}

/// Returns the empty initial instance of a campaign, with tracked history.
pub(crate) fn empty_af_instance(semantics: Semantics, store: &mut EntityStore) -> AfInstance {
    let arguments = store.argument_set(&[]);
    let attacks = store.attack_set(&[]);
    let extensions = oracle::compute(semantics, arguments, attacks, store);
    AfInstance::new(arguments, attacks, extensions).with_tracked_history()
}

fn af_translators(
    semantics: Semantics,
    allow_self_attacks: bool,
) -> Vec<Box<dyn InstanceTranslator<AfInstance>>> {
    vec![
        Box::new(NewArgumentTranslator::new(semantics)),
        Box::new(NewAttackTranslator::new(semantics, allow_self_attacks)),
        Box::new(AttackRemovalTranslator::new(semantics)),
    ]
}

/// Builds the generation engine of a static campaign.
pub(crate) fn af_engine(
    semantics: Semantics,
    max_depth: usize,
    allow_self_attacks: bool,
) -> GenerationEngine<AfInstance> {
    let mut engine = GenerationEngine::new(max_depth);
    for translator in af_translators(semantics, allow_self_attacks) {
        engine.add_translator(translator);
    }
    engine
}

/// Builds the generation engine of a dynamic campaign.
pub(crate) fn dynamic_af_engine(
    semantics: Semantics,
    max_depth: usize,
    allow_self_attacks: bool,
) -> GenerationEngine<crate::aa::DynamicAfInstance> {
    let mut engine = GenerationEngine::new(max_depth);
    for translator in af_translators(semantics, allow_self_attacks) {
        engine.add_translator(Box::new(DynamicTranslator::new(
            translator,
            semantics,
            allow_self_attacks,
        )));
    }
    engine
}

/// The counters of a checking campaign.
#[derive(Default)]
pub(crate) struct CampaignSummary {
    pub(crate) checked: usize,
    pub(crate) failures: usize,
    pub(crate) skipped: usize,
}

impl CampaignSummary {
    pub(crate) fn record(&mut self, index: usize, result: CheckResult) {
        self.checked += 1;
        match result {
            CheckResult::Success => info!("instance {}: success", index),
            CheckResult::Failure(reason) => {
                self.failures += 1;
                warn!("instance {}: {}", index, reason);
            }
        }
    }

    pub(crate) fn skip(&mut self, index: usize) {
        self.skipped += 1;
        debug!("instance {}: skipped (no argument to decide on)", index);
    }

    /// Logs the campaign totals; errors iff at least one check failed.
    pub(crate) fn into_result(self) -> Result<()> {
        info!(
            "checked {} instance(s): {} success(es), {} failure(s), {} skipped",
            self.checked + self.skipped,
            self.checked - self.failures,
            self.failures,
            self.skipped
        );
        if self.failures > 0 {
            Err(anyhow!(
                "{} out of {} check(s) failed",
                self.failures,
                self.checked
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::App;

    fn problem_matches(problem: &str) -> ArgMatches<'static> {
        App::new("test")
            .arg(problem_arg())
            .get_matches_from(vec!["test".to_string(), "-p".to_string(), problem.to_string()])
    }

    #[test]
    fn test_read_problem_arg() {
        assert_eq!(
            (Query::EE, Semantics::ST),
            read_problem_arg(&problem_matches("EE-ST")).unwrap()
        );
        assert_eq!(Query::D3, read_problem_arg(&problem_matches("D3")).unwrap().0);
        assert!(read_problem_arg(&problem_matches("EE")).is_err());
    }

    #[test]
    fn test_read_number_arg() {
        let matches = App::new("test")
            .arg(seed_arg())
            .get_matches_from(vec!["test", "--seed", "42"]);
        assert_eq!(42u64, read_number_arg(&matches, ARG_SEED).unwrap());
        let matches = App::new("test")
            .arg(seed_arg())
            .get_matches_from(vec!["test", "--seed", "foo"]);
        assert!(read_number_arg::<u64>(&matches, ARG_SEED).is_err());
    }
}
