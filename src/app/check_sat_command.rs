use super::common::CampaignSummary;
use super::{app_helper::logging_level_cli_arg, command::Command, common};
use crate::aa::EntityStore;
use crate::checking::CheckResult;
use crate::cnf::{check_sat_answer, CnfInstance, NewClauseTranslator, NewVariableTranslator};
use crate::exec::{ProcessOutput, ProcessRunner, TempInstanceFile};
use crate::generation::GenerationEngine;
use crate::io::DimacsWriter;
use anyhow::Result;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

const CMD_NAME: &str = "check-sat";

const ARG_SOLVER: &str = "SOLVER";
const ARG_TIMEOUT: &str = "TIMEOUT";

// the ground truth is a 2^n model enumeration, so the variable count of
// the generated instances must stay small
const MAX_GENERATED_VARS: usize = 8;

const NEW_CLAUSE_WEIGHT: usize = 2;

/// A command running a differential campaign against a SAT solver.
pub struct CheckSatCommand;

impl CheckSatCommand {
    /// Builds a new instance of the command.
    pub fn new() -> Self {
        CheckSatCommand
    }
}

impl Default for CheckSatCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Command<'a> for CheckSatCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks the answers of a SAT solver on generated DIMACS instances")
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
            .arg(
                Arg::with_name(ARG_TIMEOUT)
                    .long("timeout")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("10")
                    .help("the time limit given to the solver on each instance, in seconds"),
            )
            .arg(common::seed_arg())
            .arg(common::max_depth_arg())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let solver = arg_matches.value_of(ARG_SOLVER).unwrap();
        let seed = common::read_number_arg::<u64>(arg_matches, common::ARG_SEED)?;
        let max_depth = common::read_number_arg::<usize>(arg_matches, common::ARG_MAX_DEPTH)?;
        let timeout = common::read_number_arg::<u64>(arg_matches, ARG_TIMEOUT)?;
        let runner = ProcessRunner::new(Duration::from_secs(timeout));
        let engine = cnf_engine(max_depth);
        let mut store = EntityStore::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let instances = engine.generate(CnfInstance::new(0, vec![]), &mut store, &mut rng);
        let mut summary = CampaignSummary::default();
        for (index, instance) in instances.iter().enumerate() {
            summary.record(index, check_instance(&runner, solver, instance)?);
        }
        summary.into_result()
    }
}

/// Builds the generation engine of a SAT campaign.
///
/// Clause additions outweigh variable declarations so the campaign
/// reaches unsatisfiable instances early; instances with too many
/// variables are dropped to keep the model enumeration tractable.
fn cnf_engine(max_depth: usize) -> GenerationEngine<CnfInstance> {
    let mut engine = GenerationEngine::new(max_depth);
    engine.add_translator(Box::new(NewVariableTranslator::new()));
    engine.add_weighted_translator(Box::new(NewClauseTranslator::new()), NEW_CLAUSE_WEIGHT);
    engine.set_ignore_instance(Box::new(|instance: &CnfInstance, _: &EntityStore| {
        instance.n_vars() > MAX_GENERATED_VARS
    }));
    engine
}

/// Writes the instance file, runs the solver and checks its answer.
///
/// The exit status is ignored: SAT solvers conventionally exit with a
/// nonzero status code reflecting their answer.
fn check_instance(
    runner: &ProcessRunner,
    solver: &str,
    instance: &CnfInstance,
) -> Result<CheckResult> {
    let mut dimacs = Vec::new();
    DimacsWriter::default().write_cnf(instance, &mut dimacs)?;
    let cnf_file = TempInstanceFile::new("scrutari", "cnf", &String::from_utf8(dimacs)?)?;
    let args = vec![cnf_file.path().display().to_string()];
    match runner.run(solver, &args) {
        Err(e) => Ok(CheckResult::Failure(format!("cannot run the solver: {}", e))),
        Ok(ProcessOutput::TimedOut) => {
            Ok(CheckResult::Failure("the solver timed out".to_string()))
        }
        Ok(ProcessOutput::Completed { stdout, .. }) => Ok(check_sat_answer(&stdout, instance)),
    }
}
