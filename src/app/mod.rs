//! The app module handles the command line interface of the checker.

mod app_helper;
pub use app_helper::{init_logger, init_logger_with_level, logging_level_cli_arg, AppHelper};

mod command;
pub use command::Command;

mod check_ddnnf_command;
pub use check_ddnnf_command::CheckDdnnfCommand;

mod check_sat_command;
pub use check_sat_command::CheckSatCommand;

mod check_solver_command;
pub use check_solver_command::CheckSolverCommand;

mod common;

mod generate_command;
pub use generate_command::GenerateCommand;

mod problems_command;
pub use problems_command::ProblemsCommand;

mod writable_string;
