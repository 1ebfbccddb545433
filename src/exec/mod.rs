//! External solver execution: command lines, timeouts and temp files.

use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Builds the ICCMA command line arguments for an argumentation solver.
///
/// The returned arguments are `-fo apx -f <file> -p <problem>`, followed
/// by `-a <arg>` for acceptance queries and `-m <file>` for dynamic
/// campaigns.
pub fn argumentation_solver_args(
    instance_file: &Path,
    problem: &str,
    arg: Option<&str>,
    apxm_file: Option<&Path>,
) -> Vec<String> {
    let mut args = vec![
        "-fo".to_string(),
        "apx".to_string(),
        "-f".to_string(),
        instance_file.display().to_string(),
        "-p".to_string(),
        problem.to_string(),
    ];
    if let Some(a) = arg {
        args.push("-a".to_string());
        args.push(a.to_string());
    }
    if let Some(f) = apxm_file {
        args.push("-m".to_string());
        args.push(f.display().to_string());
    }
    args
}

/// The outcome of an external solver execution.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessOutput {
    /// The process exited before the deadline
    Completed {
        /// The captured standard output
        stdout: String,
        /// The captured standard error
        stderr: String,
        /// Whether the process exited successfully
        success: bool,
    },
    /// The process was killed at the deadline
    TimedOut,
}

const POLLING_PERIOD: Duration = Duration::from_millis(10);

/// An external process runner enforcing a wall-clock timeout.
///
/// Both output streams are drained by dedicated threads while the exit
/// status is polled, so a verbose solver cannot fill a pipe and hang.
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    /// Builds a runner with the given timeout.
    pub fn new(timeout: Duration) -> Self {
        ProcessRunner { timeout }
    }

    /// Runs a program to completion or to the deadline.
    ///
    /// An error is raised if the program cannot be spawned; a timeout is
    /// a regular [`ProcessOutput`] value.
    pub fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!(r#"while spawning the solver command "{}""#, program))?;
        let stdout = drain(child.stdout.take().expect("stdout must be piped"));
        let stderr = drain(child.stderr.take().expect("stderr must be piped"));
        let deadline = Instant::now() + self.timeout;
        loop {
            match child
                .try_wait()
                .context("while polling the solver process")?
            {
                Some(status) => {
                    return Ok(ProcessOutput::Completed {
                        stdout: join_drained(stdout),
                        stderr: join_drained(stderr),
                        success: status.success(),
                    });
                }
                None if Instant::now() >= deadline => {
                    child.kill().context("while killing the solver process")?;
                    child.wait().context("while reaping the solver process")?;
                    join_drained(stdout);
                    join_drained(stderr);
                    return Ok(ProcessOutput::TimedOut);
                }
                None => thread::sleep(POLLING_PERIOD),
            }
        }
    }
}

fn drain(mut stream: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut content = String::new();
        if let Err(e) = stream.read_to_string(&mut content) {
            warn!("error while reading a solver stream: {}", e);
        }
        content
    })
}

fn join_drained(handle: JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

static TEMP_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A solver input file written in the system's temp directory.
///
/// Deletion is handed to a detached thread when the value is dropped, so
/// a slow filesystem never delays the next check.
pub struct TempInstanceFile {
    path: PathBuf,
}

impl TempInstanceFile {
    /// Writes a temp file with the given content.
    ///
    /// The file name is built from the prefix, the extension and a
    /// process-unique counter.
    pub fn new(prefix: &str, extension: &str, content: &str) -> Result<Self> {
        let path = std::env::temp_dir().join(format!(
            "{}_{}_{}.{}",
            prefix,
            std::process::id(),
            TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed),
            extension
        ));
        fs::write(&path, content)
            .with_context(|| format!(r#"while writing the instance file "{}""#, path.display()))?;
        Ok(TempInstanceFile { path })
    }

    /// Returns the path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempInstanceFile {
    fn drop(&mut self) {
        let path = std::mem::take(&mut self.path);
        thread::spawn(move || {
            if let Err(e) = fs::remove_file(&path) {
                warn!(
                    r#"error while deleting the instance file "{}": {}"#,
                    path.display(),
                    e
                );
            }
        });
    }
}
