//! Bounded execution of the external packaging tool.
//!
//! The tool's stdout and stderr are forwarded to ours. A run that outlives
//! its bound is killed together with any children it spawned.

use camino::Utf8Path;
use log::{debug, warn};
use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// How a packaging-tool run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit status, absent when the run was killed on timeout.
    pub status: Option<ExitStatus>,
    /// Whether the run exceeded its bound.
    pub timed_out: bool,
}

impl ProcessOutcome {
    /// A run that finished with `status`.
    #[must_use]
    pub const fn completed(status: ExitStatus) -> Self {
        Self {
            status: Some(status),
            timed_out: false,
        }
    }

    /// A run that was killed after exceeding its bound.
    #[must_use]
    pub const fn timed_out() -> Self {
        Self {
            status: None,
            timed_out: true,
        }
    }

    /// Whether the run finished in time with a zero exit status.
    #[must_use]
    pub fn success(&self) -> bool {
        !self.timed_out && self.status.is_some_and(|status| status.success())
    }
}

/// Runs external programs with a time bound.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner {
    /// Run `program` with `args`, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the program cannot be started or waited on.
    fn run(
        &self,
        program: &Utf8Path,
        args: &[String],
        timeout: Duration,
    ) -> io::Result<ProcessOutcome>;
}

/// Runs programs as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(
        &self,
        program: &Utf8Path,
        args: &[String],
        timeout: Duration,
    ) -> io::Result<ProcessOutcome> {
        let mut command = Command::new(program.as_std_path());
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        debug!(target: "packaging", "spawning {program} {}", args.join(" "));
        let mut child = command.spawn()?;

        match child.wait_timeout(timeout)? {
            Some(status) => Ok(ProcessOutcome::completed(status)),
            None => {
                warn!(
                    target: "packaging",
                    "{program} exceeded {}s, killing it",
                    timeout.as_secs()
                );
                kill_tree(&mut child);
                let _ = child.wait();
                Ok(ProcessOutcome::timed_out())
            }
        }
    }
}

#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    // The child leads its own process group, so its group id is its pid.
    let killed_group = i32::try_from(child.id()).is_ok_and(|pgid| {
        // SAFETY: kill(2) has no memory-safety preconditions; a negative pid
        // addresses the process group created for this child.
        unsafe { libc::kill(-pgid, libc::SIGKILL) == 0 }
    });
    if !killed_group {
        let _ = child.kill();
    }
}

#[cfg(windows)]
fn kill_tree(child: &mut Child) {
    let killed_tree = Command::new("taskkill")
        .args(["/T", "/F", "/PID", &child.id().to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success());
    if !killed_tree {
        let _ = child.kill();
    }
}

#[cfg(not(any(unix, windows)))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
}
