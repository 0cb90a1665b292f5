use kana_core::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Char(char),
    Backspace,
    /// Drop everything typed so far.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResponse {
    /// The typed input is on a shortest path to the target.
    Progress {
        /// Target characters produced so far.
        committed: usize,
        /// Keys still to type.
        remaining: String,
        complete: bool,
    },
    /// The typed input can no longer produce the target. `fallback` is the
    /// suggestion for starting over, if the target is typeable at all.
    Mismatch { fallback: Option<String> },
    /// The key was not appended.
    Rejected,
}

impl KeyResponse {
    pub fn is_complete(&self) -> bool {
        matches!(self, KeyResponse::Progress { complete: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub normalize_input: bool,
    pub normalize_target: bool,
    /// Keys that would leave every valid path are refused instead of typed.
    pub reject_mistyped_keys: bool,
    /// Keys accepted past this length are rejected.
    pub max_input_len: usize,
}

impl SessionOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            normalize_input: settings.normalize.input,
            normalize_target: settings.normalize.target,
            reject_mistyped_keys: settings.session.reject_mistyped_keys,
            max_input_len: settings.session.max_input_len,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub typed: String,
    pub target: String,
    pub mistypes: usize,
    pub state: KeyResponse,
}
