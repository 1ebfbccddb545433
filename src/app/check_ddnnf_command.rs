use super::{app_helper::logging_level_cli_arg, command::Command};
use crate::checking::CheckResult;
use crate::ddnnf::Ddnnf;
use crate::io::DimacsReader;
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use std::fs::File;
use std::io::BufReader;

const CMD_NAME: &str = "check-ddnnf";

const ARG_NNF: &str = "NNF";
const ARG_CNF: &str = "CNF";

/// A command validating a compiled form against its CNF instance.
pub struct CheckDdnnfCommand;

impl CheckDdnnfCommand {
    /// Builds a new instance of the command.
    pub fn new() -> Self {
        CheckDdnnfCommand
    }
}

impl Default for CheckDdnnfCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Command<'a> for CheckDdnnfCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks a dDNNF compiled form against a DIMACS CNF instance")
            .setting(AppSettings::DisableVersion)
            .arg(
                Arg::with_name(ARG_NNF)
                    .short("f")
                    .empty_values(false)
                    .multiple(false)
                    .help("the file that contains the compiled form")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_CNF)
                    .long("cnf")
                    .empty_values(false)
                    .multiple(false)
                    .help("the file that contains the CNF instance")
                    .required(true),
            )
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let cnf_path = arg_matches.value_of(ARG_CNF).unwrap();
        let mut cnf_file = BufReader::new(
            File::open(cnf_path)
                .with_context(|| format!(r#"while opening the file "{}""#, cnf_path))?,
        );
        let instance = DimacsReader::default()
            .read(&mut cnf_file)
            .with_context(|| format!(r#"while reading the file "{}""#, cnf_path))?;
        let nnf_path = arg_matches.value_of(ARG_NNF).unwrap();
        let nnf_content = std::fs::read_to_string(nnf_path)
            .with_context(|| format!(r#"while reading the file "{}""#, nnf_path))?;
        let ddnnf = Ddnnf::parse(&nnf_content)
            .with_context(|| format!(r#"while parsing the compiled form "{}""#, nnf_path))?;
        info!("the compiled form has {} model(s)", ddnnf.count_models());
        match ddnnf.check_against(&instance) {
            CheckResult::Success => {
                info!("the compiled form matches the instance");
                Ok(())
            }
            CheckResult::Failure(reason) => Err(anyhow!("{}", reason)),
        }
    }
}
