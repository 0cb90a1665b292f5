//! Key-by-key typing trainer session.
//!
//! `TypingSession` holds the text typed against one target and answers each
//! keystroke with the remaining shortest input, or a mismatch once the typed
//! text can no longer produce the target.

mod key_handlers;
mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use kana_core::normalize::normalize_target;
use kana_core::TypingEngine;

pub use types::{KeyEvent, KeyResponse, SessionOptions, SessionSnapshot};

pub struct TypingSession {
    engine: Arc<TypingEngine>,
    options: SessionOptions,
    target: String,
    typed: String,
    /// Keys that left the valid path, rejected or not.
    mistypes: usize,
    /// `typed` evaluated against `target`; refreshed whenever either changes.
    state: KeyResponse,
}

impl TypingSession {
    pub fn new(engine: Arc<TypingEngine>, target: &str, options: SessionOptions) -> Self {
        let mut session = Self {
            engine,
            options,
            target: String::new(),
            typed: String::new(),
            mistypes: 0,
            state: KeyResponse::Rejected,
        };
        session.set_target(target);
        session
    }

    /// Start over on a new target.
    pub fn set_target(&mut self, target: &str) {
        self.target = if self.options.normalize_target {
            normalize_target(target)
        } else {
            target.to_string()
        };
        self.typed.clear();
        self.mistypes = 0;
        self.state = self.evaluate(&self.typed);
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn mistypes(&self) -> usize {
        self.mistypes
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            typed: self.typed.clone(),
            target: self.target.clone(),
            mistypes: self.mistypes,
            state: self.state.clone(),
        }
    }

    /// The untypeable tail of the input, when no rule fires on it or
    /// extends it. `None` while the typed keys can still form kana.
    pub fn stuck_keys(&self) -> Option<String> {
        let pending = self.engine.convert(&self.typed).pending;
        (!pending.is_empty() && !self.engine.forward().has_successor(&pending)).then_some(pending)
    }

    /// Where `typed` stands against the target.
    fn evaluate(&self, typed: &str) -> KeyResponse {
        match self.engine.best_path(typed, &self.target) {
            Some(best) => KeyResponse::Progress {
                committed: best.committed,
                complete: best.is_complete(),
                remaining: best.remaining,
            },
            None => KeyResponse::Mismatch {
                fallback: self.engine.shortest_input(&self.target),
            },
        }
    }
}
