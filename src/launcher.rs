use crate::directive::Directive;
use crate::env::Environment;
use crate::error::LaunchError;
use crate::runtime::{ExitCode, RuntimeFactory};
use std::ffi::OsString;
use tracing::debug;

/// Front door that hands the process over to the backend module.
///
/// The launcher rewrites the argument vector with its [`Directive`] and passes
/// it to the first runtime one of its [`RuntimeFactory`] objects can provide.
/// See [`Default`] for the factories included out of the box.
///
/// Example
/// ```no_run
/// use wahu_launcher::Launcher;
/// let code = Launcher::default().launch(std::env::args_os()).unwrap();
/// std::process::exit(code);
/// ```
pub struct Launcher {
    directive: Directive,
    env: Environment,
    runtimes: Vec<Box<dyn RuntimeFactory>>,
}

impl Launcher {
    /// Create a launcher with a custom directive and set of runtime factories.
    pub fn new(directive: Directive, runtimes: Vec<Box<dyn RuntimeFactory>>) -> Self {
        Self {
            directive,
            env: Environment::capture(),
            runtimes,
        }
    }

    /// Replace the captured environment used to look up runtimes.
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn directive(&self) -> &Directive {
        &self.directive
    }

    /// Rewrite `args` and run the module, returning the runtime's exit code.
    ///
    /// The rewrite happens before any runtime is looked up, so a failed
    /// rewrite never reaches the runtime. Once delegated, the status is
    /// returned as is.
    pub fn launch<I>(&self, args: I) -> Result<ExitCode, LaunchError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let argv = self.directive.rewrite(args.into_iter().collect())?;
        debug!(?argv, "rewritten argument vector");

        let runtime = self
            .runtimes
            .iter()
            .find_map(|factory| factory.try_create(&self.env))
            .ok_or_else(|| LaunchError::RuntimeNotFound {
                searched: self.searched(),
            })?;

        debug!(runtime = runtime.name(), "delegating");
        runtime.run_main(argv)
    }

    fn searched(&self) -> String {
        let searched: Vec<String> = self.runtimes.iter().map(|f| f.describe()).collect();
        if searched.is_empty() {
            "nothing".to_string()
        } else {
            searched.join("; ")
        }
    }
}

impl Default for Launcher {
    /// Launch [`ENTRY_MODULE`](crate::directive::ENTRY_MODULE) with:
    /// - the linked interpreter, when built with the `embedded` feature
    /// - an interpreter executable next to the launcher or on `PATH`
    fn default() -> Self {
        let mut runtimes: Vec<Box<dyn RuntimeFactory>> = Vec::new();
        #[cfg(feature = "embedded")]
        runtimes.push(Box::new(crate::embedded::EmbeddedFactory));
        runtimes.push(Box::new(crate::external::InterpreterFactory::default()));
        Self::new(Directive::default(), runtimes)
    }
}
