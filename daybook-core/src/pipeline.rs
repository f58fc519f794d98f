//! Per-invocation stage tracking for commands.

use strum_macros::{AsRefStr, Display};
use tracing::{error, trace};

use crate::error::{JournalError, JournalResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Idle,
    Parsing,
    Resolving,
    Loading,
    Injecting,
    Done,
    Cancelled,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Cancelled | Stage::Failed)
    }
}

/// One run of a command. Stages only move forward and each is entered at most once.
#[derive(Debug)]
pub struct Invocation {
    command: &'static str,
    visited: Vec<Stage>,
}

impl Invocation {
    pub fn start(command: &'static str) -> Self {
        trace!(command, stage = %Stage::Idle, "start");
        Self {
            command,
            visited: vec![Stage::Idle],
        }
    }

    pub fn stage(&self) -> Stage {
        self.visited.last().copied().unwrap_or(Stage::Idle)
    }

    pub fn visited(&self) -> &[Stage] {
        &self.visited
    }

    pub fn enter(&mut self, stage: Stage) {
        debug_assert!(
            !self.visited.contains(&stage),
            "{} entered {stage} twice",
            self.command
        );
        debug_assert!(!self.stage().is_terminal(), "{} already finished", self.command);
        trace!(command = self.command, from = %self.stage(), to = %stage, "transition");
        self.visited.push(stage);
    }

    /// Moves to a terminal stage. Cancellation becomes `Ok(None)`.
    pub fn finish<T>(&mut self, result: JournalResult<T>) -> JournalResult<Option<T>> {
        match result {
            Ok(value) => {
                self.enter(Stage::Done);
                Ok(Some(value))
            }
            Err(JournalError::Cancelled) => {
                self.enter(Stage::Cancelled);
                Ok(None)
            }
            Err(err) => {
                let at = self.stage();
                self.enter(Stage::Failed);
                match &err {
                    JournalError::Validation(message) => {
                        trace!(command = self.command, stage = %at, message, "rejected")
                    }
                    _ => error!(command = self.command, stage = %at, "{err:#}"),
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Stage::*;

    #[test]
    fn successful_run() {
        let mut run = Invocation::start("process_input");
        run.enter(Parsing);
        run.enter(Resolving);
        run.enter(Loading);
        assert_eq!(run.finish(Ok(7)).unwrap(), Some(7));
        assert_eq!(run.visited(), &[Idle, Parsing, Resolving, Loading, Done]);
        assert!(run.stage().is_terminal());
    }

    #[test]
    fn cancellation_is_not_an_error() {
        let mut run = Invocation::start("show_note");
        run.enter(Parsing);
        let result: JournalResult<Option<()>> = run.finish(Err(JournalError::Cancelled));
        assert!(matches!(result, Ok(None)));
        assert_eq!(run.stage(), Cancelled);
    }

    #[test]
    fn failures_are_surfaced() {
        let mut run = Invocation::start("print_sum");
        run.enter(Parsing);
        let result: JournalResult<Option<()>> = run.finish(Err(JournalError::validation("no")));
        assert!(matches!(result, Err(JournalError::Validation(_))));
        assert_eq!(run.visited(), &[Idle, Parsing, Failed]);
    }

    #[test]
    fn stage_names() {
        assert_eq!(Injecting.to_string(), "injecting");
        assert_eq!(Done.as_ref(), "done");
    }
}
