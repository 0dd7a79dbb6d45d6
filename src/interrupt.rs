//! Keeping the launcher alive while a child interpreter handles an interrupt.
//!
//! A terminal Ctrl-C reaches the whole foreground process group. The child
//! interpreter turns it into `KeyboardInterrupt` and exits with a status of
//! its own choosing. The launcher has to survive the same signal to relay
//! that status, so it ignores interrupts for as long as the child runs, the
//! way `system(3)` does.

use std::io;
use std::process::Command;

#[cfg(unix)]
mod imp {
    use nix::sys::signal::{SigHandler, Signal, signal};
    use std::io;
    use std::os::unix::process::CommandExt;
    use std::process::Command;
    use std::sync::{Mutex, PoisonError};

    const SIGNALS: [Signal; 2] = [Signal::SIGINT, Signal::SIGQUIT];

    type Dispositions = [(Signal, SigHandler); 2];

    struct Installed {
        guards: usize,
        previous: Dispositions,
    }

    // Dispositions are process-wide; concurrent waits share one installation.
    static INSTALLED: Mutex<Option<Installed>> = Mutex::new(None);

    pub(super) struct Guard {
        previous: Dispositions,
    }

    impl Guard {
        pub(super) fn install() -> io::Result<Self> {
            let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(installed) = installed.as_mut() {
                installed.guards += 1;
                return Ok(Self {
                    previous: installed.previous,
                });
            }

            let mut previous = SIGNALS.map(|sig| (sig, SigHandler::SigDfl));
            for (i, sig) in SIGNALS.into_iter().enumerate() {
                // SAFETY: SIG_IGN runs no code in signal context.
                match unsafe { signal(sig, SigHandler::SigIgn) } {
                    Ok(handler) => previous[i].1 = handler,
                    Err(errno) => {
                        restore(&previous[..i]);
                        return Err(errno.into());
                    }
                }
            }
            *installed = Some(Installed {
                guards: 1,
                previous,
            });
            Ok(Self { previous })
        }

        /// Give the child the dispositions the launcher started with.
        pub(super) fn prepare_child(&self, command: &mut Command) {
            let previous = self.previous;
            // SAFETY: the hook only calls sigaction, which is async-signal-safe,
            // and touches no memory shared with the parent.
            unsafe {
                command.pre_exec(move || {
                    for (sig, handler) in previous {
                        signal(sig, handler)?;
                    }
                    Ok(())
                });
            }
        }
    }

    impl Drop for Guard {
        fn drop(&mut self) {
            let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
            let last = match installed.as_mut() {
                Some(installed) => {
                    installed.guards -= 1;
                    installed.guards == 0
                }
                None => false,
            };
            if last {
                restore(&self.previous);
                *installed = None;
            }
        }
    }

    fn restore(dispositions: &[(Signal, SigHandler)]) {
        for &(sig, handler) in dispositions {
            // SAFETY: puts back a disposition that was installed before.
            let _ = unsafe { signal(sig, handler) };
        }
    }
}

#[cfg(windows)]
mod imp {
    use std::io;
    use std::process::Command;
    use windows_sys::Win32::Foundation::BOOL;
    use windows_sys::Win32::System::Console::SetConsoleCtrlHandler;

    // Handler routines are per process and not inherited, so the child keeps
    // the default console behaviour.
    unsafe extern "system" fn swallow(_ctrl_type: u32) -> BOOL {
        1
    }

    pub(super) struct Guard;

    impl Guard {
        pub(super) fn install() -> io::Result<Self> {
            // SAFETY: `swallow` is a valid handler for the life of the process.
            if unsafe { SetConsoleCtrlHandler(Some(swallow), 1) } == 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(Self)
        }

        pub(super) fn prepare_child(&self, _command: &mut Command) {}
    }

    impl Drop for Guard {
        fn drop(&mut self) {
            // SAFETY: removes the registration made in `install`.
            unsafe { SetConsoleCtrlHandler(Some(swallow), 0) };
        }
    }
}

#[cfg(not(any(unix, windows)))]
mod imp {
    use std::io;
    use std::process::Command;

    pub(super) struct Guard;

    impl Guard {
        pub(super) fn install() -> io::Result<Self> {
            Ok(Self)
        }

        pub(super) fn prepare_child(&self, _command: &mut Command) {}
    }
}

/// Interrupts are ignored by the launcher until this guard is dropped.
pub(crate) struct InterruptGuard(imp::Guard);

impl InterruptGuard {
    pub(crate) fn install() -> io::Result<Self> {
        imp::Guard::install().map(Self)
    }

    /// Make sure `command` does not inherit the ignored interrupts.
    pub(crate) fn prepare_child(&self, command: &mut Command) {
        self.0.prepare_child(command)
    }
}
