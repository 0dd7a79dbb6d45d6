//! Native front door for the PixivWahu backend.
//!
//! The launcher turns its own command line into the command line of a Python
//! runtime running the backend module: `prog ARGS...` becomes
//! `prog -m wahu_backend.__init__ ARGS...`. The arguments are never parsed
//! here, they belong to the module.
//!
//! [`Launcher`] ties the pieces together: a [`Directive`] describing what
//! to insert, and a list of [`RuntimeFactory`] objects providing either the
//! libpython linked into the binary (feature `embedded`) or an interpreter
//! executable found next to the launcher or on `PATH`.

pub mod directive;
#[cfg(feature = "embedded")]
mod embedded;
pub mod env;
pub mod error;
mod external;
mod interrupt;
mod launcher;
pub mod logging;
pub mod runtime;

pub use directive::Directive;
pub use error::LaunchError;
pub use external::{ExternalInterpreter, InterpreterFactory};
pub use launcher::Launcher;
pub use runtime::{ExitCode, Runtime, RuntimeFactory};

#[cfg(feature = "embedded")]
pub use embedded::{EmbeddedFactory, EmbeddedPython};
