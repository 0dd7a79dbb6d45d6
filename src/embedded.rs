//! In-process runtime: libpython's own `main`, linked into the launcher.

use crate::env::Environment;
use crate::error::LaunchError;
use crate::runtime::{ExitCode, Runtime, RuntimeFactory};
use std::ffi::{OsString, c_int};
use tracing::debug;

/// The CPython interpreter linked into this executable.
pub struct EmbeddedPython;

impl Runtime for EmbeddedPython {
    fn name(&self) -> &str {
        "embedded python"
    }

    fn run_main(self: Box<Self>, argv: Vec<OsString>) -> Result<ExitCode, LaunchError> {
        let argc = c_int::try_from(argv.len())
            .map_err(|_| LaunchError::TooManyArguments(argv.len()))?;
        debug!(argc, "entering embedded interpreter");
        py_main(argc, &argv)
    }
}

#[cfg(unix)]
fn py_main(argc: c_int, argv: &[OsString]) -> Result<ExitCode, LaunchError> {
    use std::ffi::{CString, c_char};
    use std::os::unix::ffi::OsStrExt;

    let owned = argv
        .iter()
        .enumerate()
        .map(|(index, arg)| {
            CString::new(arg.as_bytes()).map_err(|_| LaunchError::InvalidArgument { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut ptrs: Vec<*mut c_char> = owned
        .iter()
        .map(|arg| arg.as_ptr().cast_mut())
        .chain(std::iter::once(std::ptr::null_mut()))
        .collect();

    // SAFETY: `ptrs` holds `argc` valid NUL-terminated strings followed by a
    // null pointer, and `owned` keeps them alive for the whole call.
    let status = unsafe { pyo3::ffi::Py_BytesMain(argc, ptrs.as_mut_ptr()) };
    Ok(status)
}

#[cfg(windows)]
fn py_main(argc: c_int, argv: &[OsString]) -> Result<ExitCode, LaunchError> {
    use std::os::windows::ffi::OsStrExt;

    let mut owned = Vec::with_capacity(argv.len());
    for (index, arg) in argv.iter().enumerate() {
        let wide: Vec<u16> = arg.encode_wide().chain(std::iter::once(0)).collect();
        if wide[..wide.len() - 1].contains(&0) {
            return Err(LaunchError::InvalidArgument { index });
        }
        owned.push(wide);
    }

    let mut ptrs: Vec<*mut u16> = owned
        .iter_mut()
        .map(|arg| arg.as_mut_ptr())
        .chain(std::iter::once(std::ptr::null_mut()))
        .collect();

    // SAFETY: same layout as the Unix variant, with UTF-16 strings.
    let status = unsafe { pyo3::ffi::Py_Main(argc, ptrs.as_mut_ptr()) };
    Ok(status)
}

/// Always available when the launcher is built with the `embedded` feature.
#[derive(Default)]
pub struct EmbeddedFactory;

impl RuntimeFactory for EmbeddedFactory {
    fn describe(&self) -> String {
        "linked libpython".to_string()
    }

    fn try_create(&self, _env: &Environment) -> Option<Box<dyn Runtime>> {
        Some(Box::new(EmbeddedPython))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn interior_nul_is_rejected_before_the_call() {
        use std::os::unix::ffi::OsStringExt;

        let argv = vec!["python".into(), OsString::from_vec(b"a\0b".to_vec())];
        let err = Box::new(EmbeddedPython).run_main(argv).unwrap_err();
        assert!(matches!(err, LaunchError::InvalidArgument { index: 1 }));
    }

    // The interpreter can only be run once per process, so this is the one
    // test that enters it. Runs a module, like the launcher does; argparse
    // rejects the option with status 2.
    #[test]
    fn relays_module_exit_status() {
        let argv = ["python", "-m", "json.tool", "--no-such-option"]
            .into_iter()
            .map(OsString::from)
            .collect();
        assert_eq!(Box::new(EmbeddedPython).run_main(argv).unwrap(), 2);
    }
}
