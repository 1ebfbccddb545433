use scrutari::app::{
    AppHelper, CheckDdnnfCommand, CheckSatCommand, CheckSolverCommand, Command, GenerateCommand,
    ProblemsCommand,
};

const AUTHORS: &str = "Jean-Marie Lagniez <lagniez@cril.fr> and Emmanuel Lonca <lonca@cril.fr>";

fn main() {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        AUTHORS,
        "Scrutari, a differential test oracle for argumentation and knowledge-compilation solvers.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(CheckDdnnfCommand::new()),
        Box::new(CheckSatCommand::new()),
        Box::new(CheckSolverCommand::new()),
        Box::new(GenerateCommand::new()),
        Box::new(ProblemsCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app.launch_app();
}
