use tracing::{debug, debug_span};

use kana_core::normalize::normalize_input_char;

use super::types::{KeyEvent, KeyResponse};
use super::TypingSession;

impl TypingSession {
    /// Process one key and report where the typed text now stands.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyResponse {
        let _span = debug_span!("handle_key", ?event).entered();

        match event {
            KeyEvent::Char(c) => self.handle_char(c),
            KeyEvent::Backspace => {
                self.typed.pop();
                self.refresh()
            }
            KeyEvent::Clear => {
                self.typed.clear();
                self.refresh()
            }
        }
    }

    fn handle_char(&mut self, c: char) -> KeyResponse {
        let c = if self.options.normalize_input {
            normalize_input_char(c)
        } else {
            c
        };
        if c.is_control() || self.typed.chars().count() >= self.options.max_input_len {
            return KeyResponse::Rejected;
        }

        let mut candidate = self.typed.clone();
        candidate.push(c);
        let response = self.evaluate(&candidate);

        if matches!(response, KeyResponse::Mismatch { .. }) {
            let was_on_path = !matches!(self.state, KeyResponse::Mismatch { .. });
            if was_on_path {
                self.mistypes += 1;
                debug!(typed = %self.typed, key = %c, mistypes = self.mistypes, "mistype");
            }
            if self.options.reject_mistyped_keys {
                return KeyResponse::Rejected;
            }
        }

        self.typed = candidate;
        self.state = response.clone();
        response
    }

    fn refresh(&mut self) -> KeyResponse {
        self.state = self.evaluate(&self.typed);
        self.state.clone()
    }
}
