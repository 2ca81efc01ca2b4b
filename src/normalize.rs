/// Word characters survive normalization; everything else except whitespace is dropped.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Canonical comparison form of a recognized or reference word.
///
/// Lowercases, removes anything that is neither a word character nor
/// whitespace (apostrophes included, so "don't" becomes "dont") and trims
/// the ends. Interior whitespace is kept.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize a whole text and split it into tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Parse a textual duration such as `"1.520s"` into seconds.
///
/// Absent offsets count as the start of the recording. Anything that does
/// not carry a finite number is treated the same way.
pub fn parse_offset_seconds(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('s').unwrap_or(trimmed).trim_end();

    match number.parse::<f64>() {
        Ok(secs) if secs.is_finite() => secs,
        _ => {
            log::warn!("ignoring malformed time offset {raw:?}, using 0s");
            0.0
        }
    }
}
