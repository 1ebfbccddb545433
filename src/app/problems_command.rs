use super::{app_helper::logging_level_cli_arg, command::Command};
use crate::aa::{Query, Semantics};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use strum::IntoEnumIterator;

const CMD_NAME: &str = "problems";

/// A command displaying the problems the checker handles.
pub struct ProblemsCommand;

impl ProblemsCommand {
    /// Builds a new instance of the command.
    pub fn new() -> Self {
        ProblemsCommand
    }
}

impl Default for ProblemsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Command<'a> for ProblemsCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Displays the problems handled by the checker")
            .setting(AppSettings::DisableVersion)
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, _arg_matches: &ArgMatches<'_>) -> Result<()> {
        let problems = iter_problem_strings().fold(String::new(), |mut acc, s| {
            if !acc.is_empty() {
                acc.push(',')
            };
            acc.push_str(&s);
            acc
        });
        println!("[{}]", problems);
        Ok(())
    }
}

/// Iterates over the handled problem strings.
///
/// The combined-track query stands alone, without a semantics part.
fn iter_problem_strings() -> impl Iterator<Item = String> {
    Query::iter().flat_map(|q| {
        let strings: Box<dyn Iterator<Item = String>> = if q == Query::D3 {
            Box::new(std::iter::once(q.to_short_str().to_string()))
        } else {
            Box::new(
                Semantics::iter().map(move |s| format!("{}-{}", q.to_short_str(), s.to_short_str())),
            )
        };
        strings
    })
}
