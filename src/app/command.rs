use anyhow::Result;
use clap::App;
use clap::ArgMatches;

/// A trait shared by the subcommands of the checker.
///
/// A command owns its clap subcommand definition and executes itself on
/// the matches parsed from it.
/// Command names must be unique within the app.
pub trait Command<'a> {
    /// Returns the name under which the command is invoked.
    fn name(&self) -> &str;

    /// Returns the clap subcommand declaring the command's CLI arguments.
    fn clap_subcommand(&self) -> App<'a, 'a>;

    /// Executes the command.
    ///
    /// Returning an error makes the app display the error chain and exit
    /// with a failure status.
    ///
    /// # Arguments
    ///
    /// * `arg_matches` - the matches clap computed for this subcommand
    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()>;
}
