//! Readers and writers for the solver input and ground-truth file formats.

use crate::aa::{AfInstance, DynamicAfInstance, EntityStore, ExtensionSetId};
use crate::cnf::CnfInstance;
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, BufReader, Read, Write};

/// A writer for the APX format.
///
/// An instance is written as one `arg(x).` line per argument followed by
/// one `att(a,b).` line per attack.
#[derive(Default)]
pub struct ApxWriter {}

impl ApxWriter {
    /// Writes an instance using the APX format to the provided writer.
    pub fn write_instance(
        &self,
        instance: &AfInstance,
        store: &EntityStore,
        writer: &mut dyn Write,
    ) -> Result<()> {
        for &arg in store.argument_set_members(instance.arguments()) {
            writeln!(writer, "arg({}).", store.argument_name(arg))?;
        }
        for &attack in store.attack_set_members(instance.attacks()) {
            let (attacker, attacked) = store.attack_arguments(attack);
            writeln!(
                writer,
                "att({},{}).",
                store.argument_name(attacker),
                store.argument_name(attacked)
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// A writer for the APXM format, listing the changes of a dynamic campaign.
#[derive(Default)]
pub struct ApxmWriter {}

impl ApxmWriter {
    /// Writes the change lines of a dynamic instance, in applied order.
    pub fn write_deltas(
        &self,
        instance: &DynamicAfInstance,
        writer: &mut dyn Write,
    ) -> Result<()> {
        for (delta, _) in instance.steps() {
            writeln!(writer, "{}", delta)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// A writer for extension-set ground-truth files.
///
/// The output follows the multi-line answer grammar: a `[` line, one
/// extension line per member and a `]` line.
#[derive(Default)]
pub struct ExtsWriter {}

impl ExtsWriter {
    /// Writes an extension set to the provided writer.
    pub fn write_extension_set(
        &self,
        extensions: ExtensionSetId,
        store: &EntityStore,
        writer: &mut dyn Write,
    ) -> Result<()> {
        writeln!(writer, "[")?;
        for &ext in store.extension_set_members(extensions) {
            writeln!(writer, "{}", store.format_argument_set(ext))?;
        }
        writeln!(writer, "]")?;
        writer.flush()?;
        Ok(())
    }
}

/// A reader for the DIMACS CNF format.
///
/// Comment lines are ignored; a clause may span several lines and ends
/// at its terminating 0.
#[derive(Default)]
pub struct DimacsReader {}

impl DimacsReader {
    /// Reads a CNF instance using the DIMACS format from the provided reader.
    pub fn read(&self, reader: &mut dyn Read) -> Result<CnfInstance> {
        let context = "while reading a DIMACS instance";
        let mut preamble = None;
        let mut clauses = Vec::new();
        let mut current = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line.context(context)?;
            if line.starts_with('c') || line.trim().is_empty() {
                continue;
            }
            if let Some(counts) = line.strip_prefix("p cnf ") {
                if preamble.is_some() {
                    return Err(anyhow!("multiple preamble lines")).context(context);
                }
                let counts = counts
                    .split_ascii_whitespace()
                    .map(|w| w.parse::<usize>().context(context))
                    .collect::<Result<Vec<usize>>>()?;
                if counts.len() != 2 {
                    return Err(anyhow!(r#"invalid preamble "{}""#, line)).context(context);
                }
                preamble = Some((counts[0], counts[1]));
                continue;
            }
            if preamble.is_none() {
                return Err(anyhow!("clause lines before the preamble")).context(context);
            }
            for word in line.split_ascii_whitespace() {
                let l = word
                    .parse::<isize>()
                    .with_context(|| format!(r#"{}: "{}" is not a literal"#, context, word))?;
                if l == 0 {
                    clauses.push(std::mem::take(&mut current));
                } else {
                    current.push(l);
                }
            }
        }
        if !current.is_empty() {
            return Err(anyhow!("the last clause lacks its terminating 0")).context(context);
        }
        let (n_vars, n_clauses) = preamble.ok_or_else(|| anyhow!("{}: no preamble", context))?;
        if clauses.len() != n_clauses {
            return Err(anyhow!(
                "expected {} clause(s), got {}",
                n_clauses,
                clauses.len()
            ))
            .context(context);
        }
        if let Some(l) = clauses
            .iter()
            .flatten()
            .find(|l| l.unsigned_abs() > n_vars)
        {
            return Err(anyhow!("the literal {} is out of range", l)).context(context);
        }
        Ok(CnfInstance::new(n_vars, clauses))
    }
}

/// A writer for the DIMACS CNF format.
#[derive(Default)]
pub struct DimacsWriter {}

impl DimacsWriter {
    /// Writes a CNF instance using the DIMACS format to the provided writer.
    pub fn write_cnf(&self, instance: &CnfInstance, writer: &mut dyn Write) -> Result<()> {
        writeln!(
            writer,
            "p cnf {} {}",
            instance.n_vars(),
            instance.clauses().len()
        )?;
        for clause in instance.clauses() {
            for l in clause {
                write!(writer, "{} ", l)?;
            }
            writeln!(writer, "0")?;
        }
        writer.flush()?;
        Ok(())
    }
}
