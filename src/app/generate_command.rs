use super::{app_helper::logging_level_cli_arg, command::Command, common};
use crate::aa::{AfInstance, DynamicAfInstance, EntityStore, Semantics};
use crate::io::{ApxWriter, ApxmWriter, ExtsWriter};
use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const CMD_NAME: &str = "generate";

const ARG_SEMANTICS: &str = "SEMANTICS";
const ARG_OUTPUT: &str = "OUTPUT";

/// A command generating test instances and their ground truth into a directory.
pub struct GenerateCommand;

impl GenerateCommand {
    /// Builds a new instance of the command.
    pub fn new() -> Self {
        GenerateCommand
    }
}

impl Default for GenerateCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Command<'a> for GenerateCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Generates test instances and writes them with their ground truth")
            .setting(AppSettings::DisableVersion)
            .arg(
                Arg::with_name(ARG_SEMANTICS)
                    .long("semantics")
                    .empty_values(false)
                    .multiple(false)
                    .help("the semantics used to compute the ground truth")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_OUTPUT)
                    .short("o")
                    .empty_values(false)
                    .multiple(false)
                    .help("the directory in which the instances are written")
                    .required(true),
            )
            .arg(common::seed_arg())
            .arg(common::max_depth_arg())
            .arg(common::dynamics_arg())
            .arg(common::self_attacks_arg())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let semantics = Semantics::try_from(arg_matches.value_of(ARG_SEMANTICS).unwrap())?;
        let out_dir = PathBuf::from(arg_matches.value_of(ARG_OUTPUT).unwrap());
        fs::create_dir_all(&out_dir)
            .with_context(|| format!(r#"while creating the directory "{}""#, out_dir.display()))?;
        let seed = common::read_number_arg::<u64>(arg_matches, common::ARG_SEED)?;
        let max_depth = common::read_number_arg::<usize>(arg_matches, common::ARG_MAX_DEPTH)?;
        let allow_self_attacks = arg_matches.is_present(common::ARG_SELF_ATTACKS);
        let mut store = EntityStore::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let n_instances = if arg_matches.is_present(common::ARG_DYNAMICS) {
            let engine = common::dynamic_af_engine(semantics, max_depth, allow_self_attacks);
            let root = DynamicAfInstance::new(common::empty_af_instance(semantics, &mut store));
            let instances = engine.generate(root, &mut store, &mut rng);
            for (i, instance) in instances.iter().enumerate() {
                write_dynamic_instance(instance, &store, &out_dir, i)?;
            }
            instances.len()
        } else {
            let engine = common::af_engine(semantics, max_depth, allow_self_attacks);
            let root = common::empty_af_instance(semantics, &mut store);
            let instances = engine.generate(root, &mut store, &mut rng);
            for (i, instance) in instances.iter().enumerate() {
                write_static_instance(instance, &store, &out_dir, i)?;
            }
            instances.len()
        };
        info!(
            r#"wrote {} instance(s) into "{}""#,
            n_instances,
            out_dir.display()
        );
        Ok(())
    }
}

fn create_file(out_dir: &Path, index: usize, extension: &str) -> Result<BufWriter<File>> {
    let path = out_dir.join(format!("instance_{:04}.{}", index, extension));
    let file = File::create(&path)
        .with_context(|| format!(r#"while creating the file "{}""#, path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_static_instance(
    instance: &AfInstance,
    store: &EntityStore,
    out_dir: &Path,
    index: usize,
) -> Result<()> {
    let mut apx = create_file(out_dir, index, "apx")?;
    ApxWriter::default().write_instance(instance, store, &mut apx)?;
    let mut exts = create_file(out_dir, index, "exts")?;
    ExtsWriter::default().write_extension_set(instance.extensions(), store, &mut exts)?;
    Ok(())
}

fn write_dynamic_instance(
    instance: &DynamicAfInstance,
    store: &EntityStore,
    out_dir: &Path,
    index: usize,
) -> Result<()> {
    let mut apx = create_file(out_dir, index, "apx")?;
    ApxWriter::default().write_instance(instance.initial(), store, &mut apx)?;
    let mut apxm = create_file(out_dir, index, "apxm")?;
    ApxmWriter::default().write_deltas(instance, &mut apxm)?;
    let mut exts = create_file(out_dir, index, "exts")?;
    let writer = ExtsWriter::default();
    for step in instance.query_instances() {
        writer.write_extension_set(step.extensions(), store, &mut exts)?;
    }
    Ok(())
}
