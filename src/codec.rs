use crate::error::{CodecError, Field};
use crate::record::{Level, LogRecord, Timestamp};
use std::str::FromStr;

/// Delimiter used when none is configured: horizontal tab.
pub const DEFAULT_DELIMITER: char = '\t';

const NEWLINE: char = '\n';
const ESCAPED_NEWLINE: &str = "\\n";

/// Converts a [`LogRecord`] to a single delimited line and back.
///
/// Wire layout, fields joined by the delimiter `D`:
///
/// ```text
/// level D date-bits D body D file D function D line D is-active
/// ```
///
/// - `level` is the rank `0..=4`, see [`Level::rank`].
/// - `date` is the decimal `u64` bit pattern of the `f64` seconds since the
///   reference epoch, so the timestamp is restored bit for bit.
/// - `body` has each newline replaced by the two characters `\n`.
/// - `is-active` is `1` or `0`.
///
/// The delimiter itself is never escaped. If `file`, `function` or the
/// escaped body contain it, decode sees misaligned fields and usually
/// rejects the line; picking a delimiter that cannot occur in those fields
/// is up to the caller. A body holding a literal backslash followed by `n`
/// comes back as a newline.
///
/// Lines encoded with one delimiter must be decoded with the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCodec {
    delimiter: char,
}

impl LineCodec {
    pub const fn new(delimiter: char) -> Self {
        LineCodec { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Encode `record` into one line with no trailing delimiter or newline.
    pub fn encode(&self, record: &LogRecord) -> String {
        let body = escape_body(&record.body);
        let mut out = String::with_capacity(
            body.len() + record.file.len() + record.function.len() + 48,
        );
        let delim = self.delimiter;

        out.push_str(&record.level.rank().to_string());
        out.push(delim);
        out.push_str(&record.date.to_bits().to_string());
        out.push(delim);
        out.push_str(&body);
        out.push(delim);
        out.push_str(&record.file);
        out.push(delim);
        out.push_str(&record.function);
        out.push(delim);
        out.push_str(&record.line.to_string());
        out.push(delim);
        out.push(if record.is_active { '1' } else { '0' });
        out
    }

    /// Decode one line produced by [`LineCodec::encode`] with the same
    /// delimiter.
    ///
    /// Any malformed field rejects the whole line.
    pub fn decode(&self, line: &str) -> Result<LogRecord, CodecError> {
        let fields: Vec<&str> = line.split(self.delimiter).collect();
        if fields.len() != Field::COUNT {
            tracing::debug!(found = fields.len(), "rejecting line with wrong field count");
            return Err(CodecError::field_count(fields.len()));
        }
        let raw = |field: Field| fields[field.position()];

        let level = parse_field::<i64>(Field::Level, raw(Field::Level))
            .and_then(|rank| {
                Level::from_rank(rank).ok_or_else(|| reject(Field::Level, raw(Field::Level)))
            })?;
        let date = parse_field::<u64>(Field::Date, raw(Field::Date)).map(Timestamp::from_bits)?;
        let body = unescape_body(raw(Field::Body));
        let file = raw(Field::File).to_string();
        let function = raw(Field::Function).to_string();
        let line_no = parse_field::<u64>(Field::Line, raw(Field::Line))?;
        // Only the exact value 1 is true; other integers are false, not errors.
        let is_active = parse_field::<i64>(Field::IsActive, raw(Field::IsActive))? == 1;

        Ok(LogRecord {
            level,
            date,
            body,
            file,
            function,
            line: line_no,
            is_active,
        })
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        LineCodec::new(DEFAULT_DELIMITER)
    }
}

fn parse_field<T: FromStr>(field: Field, value: &str) -> Result<T, CodecError> {
    value.parse::<T>().map_err(|_| reject(field, value))
}

fn reject(field: Field, value: &str) -> CodecError {
    tracing::debug!(field = field.name(), value, "rejecting malformed field");
    CodecError::invalid(field, value)
}

/// Replace every newline with the two-character sequence `\n`.
pub fn escape_body(body: &str) -> String {
    body.replace(NEWLINE, ESCAPED_NEWLINE)
}

/// Inverse of [`escape_body`].
pub fn unescape_body(body: &str) -> String {
    body.replace(ESCAPED_NEWLINE, "\n")
}
