use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Snapshot of the process state the launcher needs to pick a runtime.
///
/// The rewrite itself never looks at it; only runtime factories do, to find
/// an interpreter next to the launcher or on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<OsString, OsString>,
    launcher_dir: Option<PathBuf>,
}

impl Environment {
    /// Capture variables and the directory holding the running executable.
    pub fn capture() -> Self {
        let launcher_dir = stdenv::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            vars: stdenv::vars_os().collect(),
            launcher_dir,
        }
    }

    pub fn get_var(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn set_var(&mut self, key: impl Into<OsString>, val: impl Into<OsString>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Directory of the launcher executable, where a bundled interpreter lives.
    pub fn launcher_dir(&self) -> Option<&Path> {
        self.launcher_dir.as_deref()
    }

    pub fn set_launcher_dir(&mut self, dir: impl Into<PathBuf>) {
        self.launcher_dir = Some(dir.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_var() {
        let mut env = Environment::default();
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");
        assert_eq!(env.get_var("KEY"), Some(OsStr::new("VALUE")));
    }

    #[test]
    fn capture_reads_process_state() {
        let env = Environment::capture();
        assert!(env.get_var("PATH").is_some());
        assert!(env.launcher_dir().is_some());
    }
}
