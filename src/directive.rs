//! The module-execution directive and the argument-vector rewrite.
//!
//! The launcher's only piece of policy lives here: which flag asks the
//! runtime to run a module, and which module that is. Everything else on the
//! command line belongs to the module and is passed through untouched.

use crate::error::LaunchError;
use std::collections::TryReserveError;
use std::ffi::{OsStr, OsString};

/// Flag that makes the runtime treat the next token as a module to run as `__main__`.
pub const MODULE_FLAG: &str = "-m";

/// Dotted path of the backend entry module.
pub const ENTRY_MODULE: &str = "wahu_backend.__init__";

/// Number of tokens the directive inserts after the program name.
pub const DIRECTIVE_LEN: usize = 2;

type ReserveFn = fn(&mut Vec<OsString>, usize) -> Result<(), TryReserveError>;

/// A `<flag> <module>` pair inserted right after the program name.
#[derive(Debug, Clone)]
pub struct Directive {
    flag: OsString,
    module: OsString,
    reserve: ReserveFn,
}

impl Directive {
    /// Directive running `module` through the standard [`MODULE_FLAG`].
    pub fn for_module(module: impl Into<OsString>) -> Self {
        Self {
            flag: MODULE_FLAG.into(),
            module: module.into(),
            reserve: Vec::try_reserve_exact,
        }
    }

    pub fn flag(&self) -> &OsStr {
        &self.flag
    }

    pub fn module(&self) -> &OsStr {
        &self.module
    }

    /// Build the argument vector handed to the runtime.
    ///
    /// The result is `[args[0], flag, module, args[1..]...]`: the program
    /// name stays first, the directive takes positions 1 and 2, and every
    /// remaining argument follows in its original order. Tokens are moved,
    /// never inspected.
    ///
    /// The buffer is reserved up front and fallibly, so an allocation
    /// failure is reported as [`LaunchError::Allocation`] instead of
    /// aborting inside the allocator.
    pub fn rewrite(&self, args: Vec<OsString>) -> Result<Vec<OsString>, LaunchError> {
        let mut args = args.into_iter();
        let program = args.next().ok_or(LaunchError::MissingProgramName)?;

        let len = args.len().saturating_add(1 + DIRECTIVE_LEN);
        let mut argv = Vec::new();
        (self.reserve)(&mut argv, len)?;

        argv.push(program);
        argv.push(self.flag.clone());
        argv.push(self.module.clone());
        argv.extend(args);
        Ok(argv)
    }

    #[cfg(test)]
    pub(crate) fn with_reserve(mut self, reserve: ReserveFn) -> Self {
        self.reserve = reserve;
        self
    }
}

impl Default for Directive {
    fn default() -> Self {
        Self::for_module(ENTRY_MODULE)
    }
}

#[cfg(test)]
pub(crate) fn failing_reserve(
    buf: &mut Vec<OsString>,
    _additional: usize,
) -> Result<(), TryReserveError> {
    // Asking for more than isize::MAX bytes always fails with CapacityOverflow.
    buf.try_reserve_exact(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    fn assert_insertion_law(input: &[OsString], output: &[OsString], directive: &Directive) {
        assert_eq!(output.len(), input.len() + DIRECTIVE_LEN);
        assert_eq!(output[0], input[0]);
        assert_eq!(output[1], directive.flag());
        assert_eq!(output[2], directive.module());
        assert_eq!(&output[3..], &input[1..]);
    }

    #[test]
    fn program_name_only() {
        let argv = Directive::default().rewrite(os(&["prog"])).unwrap();
        assert_eq!(argv, os(&["prog", "-m", "wahu_backend.__init__"]));
    }

    #[test]
    fn trailing_arguments_follow_the_directive() {
        let argv = Directive::default()
            .rewrite(os(&["prog", "file.txt", "--flag"]))
            .unwrap();
        assert_eq!(
            argv,
            os(&["prog", "-m", "wahu_backend.__init__", "file.txt", "--flag"])
        );
    }

    #[test]
    fn options_are_not_interpreted() {
        // Looks like launcher options but belongs to the module.
        let input = os(&["prog", "--port", "8080", "-m", "other", "--", "-h"]);
        let directive = Directive::default();
        let argv = directive.rewrite(input.clone()).unwrap();
        assert_insertion_law(&input, &argv, &directive);
    }

    #[test]
    fn law_holds_for_varied_lengths() {
        let directive = Directive::for_module("pkg.main");
        for n in 1..16 {
            let input: Vec<OsString> = (0..n).map(|i| format!("arg{i}").into()).collect();
            let argv = directive.rewrite(input.clone()).unwrap();
            assert_insertion_law(&input, &argv, &directive);
        }
    }

    #[test]
    fn rewriting_twice_inserts_another_pair() {
        let directive = Directive::default();
        let once = directive.rewrite(os(&["prog", "x"])).unwrap();
        let twice = directive.rewrite(once.clone()).unwrap();
        assert_insertion_law(&once, &twice, &directive);
        assert_eq!(twice.len(), 6);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = Directive::default().rewrite(Vec::new()).unwrap_err();
        assert!(matches!(err, LaunchError::MissingProgramName));
    }

    #[test]
    fn empty_tokens_are_kept() {
        let argv = Directive::default().rewrite(os(&["", "", "a"])).unwrap();
        assert_eq!(argv, os(&["", "-m", "wahu_backend.__init__", "", "a"]));
    }

    #[test]
    fn allocation_failure_is_reported() {
        let directive = Directive::default().with_reserve(failing_reserve);
        let err = directive.rewrite(os(&["prog", "a"])).unwrap_err();
        assert!(matches!(err, LaunchError::Allocation(_)));
        assert!(err.is_fatal());
    }

    #[test]
    #[cfg(unix)]
    fn non_utf8_arguments_pass_through() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let raw = OsString::from_vec(vec![0x66, 0x6f, 0xff, 0x6f]);
        let argv = Directive::default()
            .rewrite(vec!["prog".into(), raw.clone()])
            .unwrap();
        assert_eq!(argv[3].as_bytes(), raw.as_bytes());
    }
}
