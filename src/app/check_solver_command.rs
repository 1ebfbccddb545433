use super::common::CampaignSummary;
use super::{app_helper::logging_level_cli_arg, command::Command, common};
use crate::aa::{AfInstance, DynamicAfInstance, EntityStore, Query};
use crate::checking::{CheckResult, DynamicChecker, QueryChecker};
use crate::decoding::{DecoderVariant, OutputDecoder};
use crate::exec::{argumentation_solver_args, ProcessOutput, ProcessRunner, TempInstanceFile};
use crate::io::{ApxWriter, ApxmWriter};
use crate::oracle;
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const CMD_NAME: &str = "check-solver";

const ARG_SOLVER: &str = "SOLVER";
const ARG_TIMEOUT: &str = "TIMEOUT";
const ARG_OUTPUT_FORMAT: &str = "OUTPUT_FORMAT";

/// A command running a differential campaign against an external solver.
pub struct CheckSolverCommand;

impl CheckSolverCommand {
    /// Builds a new instance of the command.
    pub fn new() -> Self {
        CheckSolverCommand
    }
}

impl Default for CheckSolverCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Command<'a> for CheckSolverCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks the answers of an argumentation solver on generated instances")
            .setting(AppSettings::DisableVersion)
            .arg(
                Arg::with_name(ARG_SOLVER)
                    .short("s")
                    .long("solver")
                    .empty_values(false)
                    .multiple(false)
                    .help("the path to the solver under test")
                    .required(true),
            )
            .arg(common::problem_arg())
            .arg(
                Arg::with_name(ARG_TIMEOUT)
                    .long("timeout")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("10")
                    .help("the time limit given to the solver on each instance, in seconds"),
            )
            .arg(
                Arg::with_name(ARG_OUTPUT_FORMAT)
                    .long("solver-output-format")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("single-line")
                    .possible_values(&["single-line", "multi-line"])
                    .help("the grammar of the solver answers"),
            )
            .arg(common::seed_arg())
            .arg(common::max_depth_arg())
            .arg(common::dynamics_arg())
            .arg(common::self_attacks_arg())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let solver = arg_matches.value_of(ARG_SOLVER).unwrap().to_string();
        let problem = arg_matches.value_of(common::ARG_PROBLEM).unwrap().to_string();
        let (query, semantics) = common::read_problem_arg(arg_matches)?;
        let dynamics = arg_matches.is_present(common::ARG_DYNAMICS);
        if dynamics && query == Query::D3 {
            return Err(anyhow!("the combined-track problem has no dynamic track"));
        }
        let seed = common::read_number_arg::<u64>(arg_matches, common::ARG_SEED)?;
        let max_depth = common::read_number_arg::<usize>(arg_matches, common::ARG_MAX_DEPTH)?;
        let timeout = common::read_number_arg::<u64>(arg_matches, ARG_TIMEOUT)?;
        let allow_self_attacks = arg_matches.is_present(common::ARG_SELF_ATTACKS);
        let decoder = DecoderVariant::try_from(arg_matches.value_of(ARG_OUTPUT_FORMAT).unwrap())?
            .decoder();
        let campaign = Campaign {
            solver,
            problem,
            query,
            runner: ProcessRunner::new(Duration::from_secs(timeout)),
        };
        let mut store = EntityStore::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let summary = if dynamics {
            let engine = common::dynamic_af_engine(semantics, max_depth, allow_self_attacks);
            let root = DynamicAfInstance::new(common::empty_af_instance(semantics, &mut store));
            let instances = engine.generate(root, &mut store, &mut rng);
            campaign.check_dynamic_instances(&instances, &*decoder, &mut store, &mut rng)?
        } else {
            let engine = common::af_engine(semantics, max_depth, allow_self_attacks);
            let root = common::empty_af_instance(semantics, &mut store);
            let instances = engine.generate(root, &mut store, &mut rng);
            campaign.check_static_instances(&instances, &*decoder, &mut store, &mut rng)?
        };
        summary.into_result()
    }
}

struct Campaign {
    solver: String,
    problem: String,
    query: Query,
    runner: ProcessRunner,
}

impl Campaign {
    fn check_static_instances(
        &self,
        instances: &[AfInstance],
        decoder: &dyn OutputDecoder,
        store: &mut EntityStore,
        rng: &mut StdRng,
    ) -> Result<CampaignSummary> {
        let checker = QueryChecker::for_query(self.query);
        let mut summary = CampaignSummary::default();
        for (index, instance) in instances.iter().enumerate() {
            let instance = match self.prepare_static(instance, store, rng) {
                Some(i) => i,
                None => {
                    summary.skip(index);
                    continue;
                }
            };
            let result = self.run_solver(&instance, None, store, |stdout, store| {
                checker.check(stdout, decoder, &instance, store)
            })?;
            summary.record(index, result);
        }
        Ok(summary)
    }

    fn check_dynamic_instances(
        &self,
        instances: &[DynamicAfInstance],
        decoder: &dyn OutputDecoder,
        store: &mut EntityStore,
        rng: &mut StdRng,
    ) -> Result<CampaignSummary> {
        let checker = DynamicChecker::new(self.query);
        let mut summary = CampaignSummary::default();
        for (index, instance) in instances.iter().enumerate() {
            let instance = match self.prepare_dynamic(instance, store, rng) {
                Some(i) => i,
                None => {
                    summary.skip(index);
                    continue;
                }
            };
            let result =
                self.run_solver(instance.initial(), Some(&instance), store, |stdout, store| {
                    checker.check(stdout, decoder, &instance, store)
                })?;
            summary.record(index, result);
        }
        Ok(summary)
    }

    /// Attaches the per-query data a static instance needs, or `None` if
    /// the instance cannot support the query.
    fn prepare_static(
        &self,
        instance: &AfInstance,
        store: &mut EntityStore,
        rng: &mut StdRng,
    ) -> Option<AfInstance> {
        if self.query.is_acceptance_query() {
            let arg = pick_argument(instance, store, rng)?;
            Some(instance.clone().with_decision_argument(arg, store))
        } else if self.query == Query::D3 {
            let triple = oracle::compute_triathlon(instance.arguments(), instance.attacks(), store);
            Some(instance.clone().with_triathlon_truth(triple))
        } else {
            Some(instance.clone())
        }
    }

    /// Attaches the argument under decision to every step of a dynamic
    /// instance; the argument set is constant across attack changes.
    fn prepare_dynamic(
        &self,
        instance: &DynamicAfInstance,
        store: &mut EntityStore,
        rng: &mut StdRng,
    ) -> Option<DynamicAfInstance> {
        if !self.query.is_acceptance_query() {
            return Some(instance.clone());
        }
        let arg = pick_argument(instance.initial(), store, rng)?;
        let mut prepared = DynamicAfInstance::new(
            instance.initial().clone().with_decision_argument(arg, store),
        );
        for (delta, step) in instance.steps() {
            prepared.push_step(
                delta.clone(),
                step.clone().with_decision_argument(arg, store),
            );
        }
        Some(prepared)
    }

    /// Writes the instance files, runs the solver and checks its answer.
    ///
    /// Temp file errors abort the whole campaign; solver launch errors
    /// and timeouts are per-instance failures.
    fn run_solver(
        &self,
        initial: &AfInstance,
        dynamic: Option<&DynamicAfInstance>,
        store: &mut EntityStore,
        check: impl FnOnce(&str, &mut EntityStore) -> CheckResult,
    ) -> Result<CheckResult> {
        let mut apx = Vec::new();
        ApxWriter::default().write_instance(initial, store, &mut apx)?;
        let apx_file = TempInstanceFile::new("scrutari", "apx", &String::from_utf8(apx)?)?;
        let apxm_file = match dynamic {
            Some(instance) => {
                let mut apxm = Vec::new();
                ApxmWriter::default().write_deltas(instance, &mut apxm)?;
                Some(TempInstanceFile::new(
                    "scrutari",
                    "apxm",
                    &String::from_utf8(apxm)?,
                )?)
            }
            None => None,
        };
        let arg_name = initial
            .decision_argument()
            .map(|a| store.argument_name(a).to_string());
        let args = argumentation_solver_args(
            apx_file.path(),
            &self.problem,
            arg_name.as_deref(),
            apxm_file.as_ref().map(|f| f.path()),
        );
        match self.runner.run(&self.solver, &args) {
            Err(e) => Ok(CheckResult::Failure(format!("cannot run the solver: {}", e))),
            Ok(ProcessOutput::TimedOut) => {
                Ok(CheckResult::Failure("the solver timed out".to_string()))
            }
            Ok(ProcessOutput::Completed { success: false, stderr, .. }) => {
                Ok(CheckResult::Failure(format!(
                    "the solver exited with an error: {}",
                    stderr.trim()
                )))
            }
            Ok(ProcessOutput::Completed { stdout, .. }) => Ok(check(&stdout, store)),
        }
    }
}

fn pick_argument(
    instance: &AfInstance,
    store: &EntityStore,
    rng: &mut StdRng,
) -> Option<crate::aa::ArgumentId> {
    let members = store.argument_set_members(instance.arguments());
    if members.is_empty() {
        None
    } else {
        Some(members[rng.gen_range(0..members.len())])
    }
}
