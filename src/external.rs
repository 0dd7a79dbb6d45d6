use crate::env::Environment;
use crate::error::LaunchError;
use crate::interrupt::InterruptGuard;
use crate::runtime::{ExitCode, Runtime, RuntimeFactory};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

#[cfg(windows)]
const INTERPRETER_NAMES: &[&str] = &["python.exe"];
#[cfg(not(windows))]
const INTERPRETER_NAMES: &[&str] = &["python3", "python"];

/// A Python interpreter executable run as a child process.
///
/// Used when libpython is not linked into the launcher. The child inherits
/// stdio, environment and working directory, so from the outside it behaves
/// like the interpreter was started directly.
pub struct ExternalInterpreter {
    program: PathBuf,
}

impl ExternalInterpreter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Runtime for ExternalInterpreter {
    fn name(&self) -> &str {
        "external interpreter"
    }

    fn run_main(self: Box<Self>, argv: Vec<OsString>) -> Result<ExitCode, LaunchError> {
        // argv[0] names the launcher; the child gets the interpreter's own path instead.
        let mut command = Command::new(&self.program);
        command
            .args(argv.into_iter().skip(1))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let interrupts = InterruptGuard::install()?;
        interrupts.prepare_child(&mut command);
        let mut child = command.spawn()?;
        let exit_status = child.wait()?;
        drop(interrupts);

        debug!(status = %exit_status, "interpreter exited");
        match exit_status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(exit_status)),
        }
    }
}

/// Looks for an interpreter bundled next to the launcher, then on `PATH`.
pub struct InterpreterFactory {
    names: Vec<OsString>,
}

impl InterpreterFactory {
    /// Factory trying `names` in order, each first in the launcher directory.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve the interpreter executable for `env`.
    pub fn resolve(&self, env: &Environment) -> Option<PathBuf> {
        if let Some(dir) = env.launcher_dir() {
            let bundled = self
                .names
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file());
            if bundled.is_some() {
                return bundled;
            }
        }

        let search_paths = env.get_var("PATH")?;
        self.names
            .iter()
            .find_map(|name| find_in_path(search_paths, name))
    }
}

impl Default for InterpreterFactory {
    fn default() -> Self {
        Self::with_names(INTERPRETER_NAMES.iter().copied())
    }
}

impl RuntimeFactory for InterpreterFactory {
    fn describe(&self) -> String {
        let names: Vec<_> = self.names.iter().map(|n| n.to_string_lossy()).collect();
        format!("{} in the launcher directory and PATH", names.join(", "))
    }

    fn try_create(&self, env: &Environment) -> Option<Box<dyn Runtime>> {
        let program = self.resolve(env)?;
        debug!(program = %program.display(), "resolved interpreter");
        Some(Box::new(ExternalInterpreter::new(program)))
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

/// First `name` found among the `search_paths` entries, in order.
fn find_in_path(search_paths: &OsStr, name: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
