use crate::env::Environment;
use crate::error::LaunchError;
use std::ffi::OsString;

/// Process exit status relayed from the runtime.
///
/// A value of 0 indicates success; anything else is whatever the runtime or
/// the module decided to report. The launcher never assigns meaning to it.
pub type ExitCode = i32;

/// A Python entry point that runs "as if launched with this argument vector".
///
/// `argv[0]` is the program name, followed by the module-execution directive
/// and the module's own arguments.
pub trait Runtime {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Run the runtime to completion and return its exit status.
    fn run_main(self: Box<Self>, argv: Vec<OsString>) -> Result<ExitCode, LaunchError>;
}

/// Factory that tries to provide a [`Runtime`] for the current environment.
///
/// Returns `None` when this kind of runtime is not available, for instance
/// when no interpreter executable can be found.
pub trait RuntimeFactory {
    /// What this factory looks for, reported when no runtime is found.
    fn describe(&self) -> String;

    fn try_create(&self, env: &Environment) -> Option<Box<dyn Runtime>>;
}
