
use std::sync::{Arc, OnceLock};

use kana_core::{Flavor, TypingEngine};

use super::{KeyEvent, KeyResponse, SessionOptions, TypingSession};

pub(super) fn engine() -> Arc<TypingEngine> {
    static ENGINE: OnceLock<Arc<TypingEngine>> = OnceLock::new();
    Arc::clone(ENGINE.get_or_init(|| Arc::new(TypingEngine::builtin(Flavor::Any))))
}

pub(super) fn session(target: &str) -> TypingSession {
    TypingSession::new(engine(), target, SessionOptions::default())
}

/// Type each character of `keys`, returning the last response.
pub(super) fn type_string(session: &mut TypingSession, keys: &str) -> KeyResponse {
    let mut last = KeyResponse::Rejected;
    for c in keys.chars() {
        last = session.handle_key(KeyEvent::Char(c));
    }
    last
}
