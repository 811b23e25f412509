use crate::codec::LineCodec;
use crate::error::CodecError;
use crate::record::LogRecord;

/// Decode newline-framed text, one record per non-empty line.
///
/// Yields the 1-based line number alongside each result so callers can
/// report or skip bad lines. A trailing `\r` is stripped before decoding.
pub fn decode_lines<'a>(
    codec: &'a LineCodec,
    text: &'a str,
) -> impl Iterator<Item = (usize, Result<LogRecord, CodecError>)> + 'a {
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.is_empty())
        .map(move |(line_no, line)| (line_no, codec.decode(line)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Level, Timestamp};

    #[test]
    fn decodes_each_line_and_reports_failures() {
        let codec = LineCodec::default();
        let first = LogRecord::new(Level::Info, "a\nb", "x.rs", "x", 1)
            .with_date(Timestamp::from_seconds_since_reference(1.0));
        let second = LogRecord::new(Level::Error, "c", "y.rs", "y", 2)
            .with_date(Timestamp::from_seconds_since_reference(2.0))
            .with_active(false);
        let text = format!(
            "{}\r\n\ngarbage\n{}\n",
            codec.encode(&first),
            codec.encode(&second)
        );

        let results: Vec<_> = decode_lines(&codec, &text).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], (1, Ok(first)));
        assert_eq!(results[1].0, 3);
        assert!(results[1].1.is_err());
        assert_eq!(results[2], (4, Ok(second)));
    }
}
