//! Romaji typing engine.
//!
//! Forward romaji-to-kana conversion, shortest-input search for a kana
//! target, and a per-keystroke typing session built on both.

pub mod trace_init;

pub use kana_core::{BestPath, ConversionRule, Flavor, RuleElement, RuleError, TypingEngine};
pub use kana_core::{charset, forward, inverse, normalize, rule, settings, table};
pub use kana_session::{KeyEvent, KeyResponse, SessionOptions, SessionSnapshot, TypingSession};

pub use trace_init::init_tracing;
