//! Best-effort numeric parsing shared by the IES and LDT decoders.
//!
//! A token that cannot be read yields `None` for that slot only, so one bad
//! field never stops the rest of a file from being decoded.

/// Parse a float, accepting a comma as the decimal separator.
pub fn parse_float(token: &str) -> Option<f64> {
    let cleaned = token.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integer. Values written as floats ("3.0") are truncated.
pub fn parse_int(token: &str) -> Option<i64> {
    let cleaned = token.trim();
    if let Ok(value) = cleaned.parse::<i64>() {
        return Some(value);
    }
    parse_float(cleaned).map(|v| v.trunc() as i64)
}

/// Parse a free-text field: trimmed, `None` when blank.
pub fn parse_text(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whitespace tokenizer over a block of text that may span many lines.
pub struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    /// Next raw token, `None` at end of input.
    pub fn next_raw(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    /// Next token parsed as float. End of input and malformed tokens both give `None`.
    pub fn next_float(&mut self) -> Option<f64> {
        self.inner.next().and_then(parse_float)
    }

    pub fn next_int(&mut self) -> Option<i64> {
        self.inner.next().and_then(parse_int)
    }

    /// Read `count` floats, one slot per token, stopping early at end of input.
    pub fn take_floats(&mut self, count: usize) -> Vec<Option<f64>> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            match self.inner.next() {
                Some(token) => values.push(parse_float(token)),
                None => break,
            }
        }
        values
    }
}

/// Decode file bytes as UTF-8, falling back to Latin-1 for legacy files.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Shortest text for a value rounded to four decimals, as written by the exporters.
pub fn format_number(value: f64) -> String {
    let rounded = round_to(value, 4);
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Drop repeated angles, keeping first occurrences in input order.
pub fn unique_angles(angles: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut unique: Vec<f64> = Vec::new();
    for angle in angles {
        if !unique.iter().any(|a| (a - angle).abs() < 1e-6) {
            unique.push(angle);
        }
    }
    unique
}
