//! Environment variable names used by this crate for configuring the codec
//! and layer from a service's environment.
//!
//! These are purely helpers; [`LineCodec`] and [`RecordLayer`] never read
//! the environment themselves.
//!
//! [`RecordLayer`]: crate::layer::RecordLayer

use crate::codec::{LineCodec, DEFAULT_DELIMITER};
use crate::record::Level;

/// Field delimiter, e.g. `tab`, `pipe` or a literal single character.
pub const LINE_CODEC_DELIMITER_ENV: &str = "LINE_CODEC_DELIMITER";

/// Minimum level captured by the layer, e.g. `info`.
pub const LINE_CODEC_MIN_LEVEL_ENV: &str = "LINE_CODEC_MIN_LEVEL";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a delimiter setting.
///
/// Accepts a name (`tab`, `comma`, `pipe`, `semicolon`), the two-character
/// escape `\t`, or any single character except newline, carriage return and
/// backslash, which would collide with line framing or body escaping.
pub fn parse_delimiter(text: &str) -> Option<char> {
    match text.to_ascii_lowercase().as_str() {
        "tab" | "\\t" => return Some('\t'),
        "comma" => return Some(','),
        "pipe" => return Some('|'),
        "semicolon" => return Some(';'),
        _ => {}
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !matches!(c, '\n' | '\r' | '\\') => Some(c),
        _ => None,
    }
}

/// Delimiter from [`LINE_CODEC_DELIMITER_ENV`], or tab when unset or
/// invalid. Invalid values are reported with a warning.
pub fn delimiter_from_env() -> char {
    let Ok(raw) = std::env::var(LINE_CODEC_DELIMITER_ENV) else {
        return DEFAULT_DELIMITER;
    };
    parse_delimiter(&raw).unwrap_or_else(|| {
        tracing::warn!(value = %raw, "invalid {}, using tab", LINE_CODEC_DELIMITER_ENV);
        DEFAULT_DELIMITER
    })
}

/// Codec using [`delimiter_from_env`].
pub fn codec_from_env() -> LineCodec {
    LineCodec::new(delimiter_from_env())
}

/// Minimum level from [`LINE_CODEC_MIN_LEVEL_ENV`], or `default` when unset
/// or unparseable.
pub fn min_level_from_env(default: Level) -> Level {
    let raw = env_or(LINE_CODEC_MIN_LEVEL_ENV, default.as_str());
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid {}, using {}", LINE_CODEC_MIN_LEVEL_ENV, default);
        default
    })
}
