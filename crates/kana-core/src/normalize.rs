//! Character normalisation applied before matching typed input against a
//! target.

/// Full-width ASCII block (！..～).
fn is_fullwidth_ascii(c: char) -> bool {
    ('\u{FF01}'..='\u{FF5E}').contains(&c)
}

fn to_halfwidth(c: char) -> char {
    if is_fullwidth_ascii(c) {
        char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
    } else if c == '\u{3000}' {
        ' '
    } else {
        c
    }
}

/// Normalise one typed key: full-width ASCII to half-width, then lower case.
pub fn normalize_input_char(c: char) -> char {
    to_halfwidth(c).to_ascii_lowercase()
}

pub fn normalize_input(s: &str) -> String {
    s.chars().map(normalize_input_char).collect()
}

/// Normalise one target character to the script the rule table produces:
/// katakana ァ..ン become hiragana, while ゔ..ゖ become katakana because the
/// table writes ヴ/ヵ/ヶ in katakana. Punctuation is left alone: the table
/// outputs full-width forms.
pub fn normalize_target_char(c: char) -> char {
    match c {
        'ァ'..='ン' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        'ゔ'..='ゖ' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
        _ => c,
    }
}

pub fn normalize_target(s: &str) -> String {
    s.chars().map(normalize_target_char).collect()
}
