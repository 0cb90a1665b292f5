//! Line-oriented trainer loop.
//!
//! Each input line is fed to the session one key at a time. Lines starting
//! with `:` are commands: `:back`, `:clear`, `:target <text>`, `:skip`,
//! `:quit`. The loop ends on `:quit`, at end of input, or once the last
//! queued target is done.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::sync::Arc;

use serde::Serialize;

use kana_engine::{KeyEvent, KeyResponse, SessionOptions, TypingEngine, TypingSession};

use super::CommandError;

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct TrainSummary {
    pub completed: usize,
    pub skipped: usize,
    pub keys: usize,
    pub mistypes: usize,
}

enum Step {
    Continue,
    Quit,
}

pub struct Trainer<W: Write> {
    session: TypingSession,
    queue: VecDeque<String>,
    active: bool,
    out: W,
    summary: TrainSummary,
}

impl<W: Write> Trainer<W> {
    pub fn new(
        engine: Arc<TypingEngine>,
        options: SessionOptions,
        targets: Vec<String>,
        out: W,
    ) -> Self {
        Self {
            session: TypingSession::new(engine, "", options),
            queue: targets.into(),
            active: false,
            out,
            summary: TrainSummary::default(),
        }
    }

    pub fn run<R: BufRead>(mut self, input: R) -> Result<TrainSummary, CommandError> {
        if !self.next_target()? {
            writeln!(self.out, "no target; use :target <text>")?;
        }
        for line in input.lines() {
            let line = line?;
            if let Step::Quit = self.handle_line(line.trim_end())? {
                break;
            }
        }
        if self.active {
            self.summary.mistypes += self.session.mistypes();
        }
        writeln!(
            self.out,
            "completed {}, skipped {}, {} keys, {} mistypes",
            self.summary.completed, self.summary.skipped, self.summary.keys, self.summary.mistypes
        )?;
        Ok(self.summary)
    }

    fn handle_line(&mut self, line: &str) -> Result<Step, CommandError> {
        if let Some(command) = line.strip_prefix(':') {
            let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
            match name {
                "quit" | "q" => return Ok(Step::Quit),
                "target" | "t" if !arg.trim().is_empty() => {
                    self.finish_target();
                    self.queue.push_front(arg.trim().to_string());
                    self.next_target()?;
                }
                "skip" if self.active => {
                    self.finish_target();
                    self.summary.skipped += 1;
                    if !self.next_target()? {
                        writeln!(self.out, "no more targets")?;
                        return Ok(Step::Quit);
                    }
                }
                "back" | "b" if self.active => {
                    let resp = self.session.handle_key(KeyEvent::Backspace);
                    self.report(&resp)?;
                }
                "clear" if self.active => {
                    let resp = self.session.handle_key(KeyEvent::Clear);
                    self.report(&resp)?;
                }
                _ => writeln!(self.out, "unknown command: {line}")?,
            }
            return Ok(Step::Continue);
        }

        if !self.active {
            writeln!(self.out, "no target; use :target <text>")?;
            return Ok(Step::Continue);
        }
        let mut last = None;
        for c in line.chars() {
            self.summary.keys += 1;
            last = Some(self.session.handle_key(KeyEvent::Char(c)));
        }
        if let Some(resp) = last {
            self.report(&resp)?;
            if resp.is_complete() {
                writeln!(self.out, "done ({} mistypes)", self.session.mistypes())?;
                self.finish_target();
                self.summary.completed += 1;
                if !self.next_target()? {
                    writeln!(self.out, "no more targets")?;
                    return Ok(Step::Quit);
                }
            }
        }
        Ok(Step::Continue)
    }

    fn finish_target(&mut self) {
        if self.active {
            self.summary.mistypes += self.session.mistypes();
            self.active = false;
        }
    }

    /// Load the next queued target; `false` when the queue is empty.
    fn next_target(&mut self) -> Result<bool, CommandError> {
        let Some(target) = self.queue.pop_front() else {
            return Ok(false);
        };
        self.session.set_target(&target);
        self.active = true;
        writeln!(self.out, "target: {}", self.session.target())?;
        let state = self.session.snapshot().state;
        self.report(&state)?;
        Ok(true)
    }

    fn report(&mut self, resp: &KeyResponse) -> Result<(), CommandError> {
        let total = self.session.target().chars().count();
        match resp {
            KeyResponse::Progress {
                committed,
                remaining,
                complete: false,
            } => writeln!(self.out, "  [{committed}/{total}] next: {remaining}")?,
            KeyResponse::Progress { committed, .. } => {
                writeln!(self.out, "  [{committed}/{total}] complete")?
            }
            KeyResponse::Mismatch {
                fallback: Some(full),
            } => {
                write!(
                    self.out,
                    "  mismatch at {:?} (start over with: {full})",
                    self.session.typed()
                )?;
                match self.session.stuck_keys() {
                    Some(stuck) => writeln!(self.out, "; no rule continues {stuck:?}")?,
                    None => writeln!(self.out)?,
                }
            }
            KeyResponse::Mismatch { fallback: None } => {
                writeln!(self.out, "  {} cannot be typed with this table", self.session.target())?
            }
            KeyResponse::Rejected => writeln!(self.out, "  rejected")?,
        }
        Ok(())
    }
}
