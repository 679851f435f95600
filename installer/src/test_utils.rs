//! Shared test utilities for the installer crate.

use crate::packaging::{ProcessOutcome, ProcessRunner};
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
#[expect(clippy::cast_sign_loss, reason = "test exit codes are small and non-negative")]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// The result a [`StubRunner`] replays for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubOutcome {
    /// The tool exits with the given code.
    Exit(i32),
    /// The tool exceeds its time bound.
    TimedOut,
    /// The tool cannot be started.
    SpawnFailure,
}

impl StubOutcome {
    fn replay(self) -> io::Result<ProcessOutcome> {
        match self {
            Self::Exit(code) => Ok(ProcessOutcome::completed(exit_status(code))),
            Self::TimedOut => Ok(ProcessOutcome::timed_out()),
            Self::SpawnFailure => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "stub packaging tool not found",
            )),
        }
    }
}

/// A packaging-tool invocation captured by [`StubRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The program that would have been run.
    pub program: Utf8PathBuf,
    /// Its arguments.
    pub args: Vec<String>,
    /// The time bound it was given.
    pub timeout: Duration,
}

impl Invocation {
    /// The value following the first occurrence of `flag`.
    #[must_use]
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|index| self.args.get(index + 1))
            .map(String::as_str)
    }
}

/// A stub implementation of [`ProcessRunner`] for testing.
///
/// Records every invocation and replays queued outcomes in order, falling
/// back to a fixed outcome once the queue is empty. No process is spawned.
#[derive(Debug)]
pub struct StubRunner {
    queued: RefCell<VecDeque<StubOutcome>>,
    fallback: StubOutcome,
    invocations: RefCell<Vec<Invocation>>,
}

impl StubRunner {
    /// A runner whose every invocation exits successfully.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::with_outcomes(Vec::new())
    }

    /// A runner replaying `outcomes`, then succeeding.
    #[must_use]
    pub fn with_outcomes(outcomes: Vec<StubOutcome>) -> Self {
        Self {
            queued: RefCell::new(outcomes.into()),
            fallback: StubOutcome::Exit(0),
            invocations: RefCell::new(Vec::new()),
        }
    }

    /// Every invocation so far, in call order.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }
}

impl ProcessRunner for StubRunner {
    fn run(
        &self,
        program: &Utf8Path,
        args: &[String],
        timeout: Duration,
    ) -> io::Result<ProcessOutcome> {
        self.invocations.borrow_mut().push(Invocation {
            program: program.to_owned(),
            args: args.to_vec(),
            timeout,
        });
        let next = self.queued.borrow_mut().pop_front().unwrap_or(self.fallback);
        next.replay()
    }
}
