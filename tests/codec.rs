use proptest::prelude::*;
use tracing_line_codec::{
    serializer::LogSerializer, CodecError, Field, Level, LineCodec, LogRecord, Timestamp,
};

fn fixed_record() -> LogRecord {
    LogRecord {
        level: Level::Info,
        date: Timestamp::from_seconds_since_reference(718_000_000.25),
        body: "hello\nworld".to_string(),
        file: "a.txt".to_string(),
        function: "f()".to_string(),
        line: 42,
        is_active: true,
    }
}

#[test]
fn concrete_scenario_matches_wire_format() {
    let codec = LineCodec::default();
    let record = fixed_record();
    let bits = 718_000_000.25_f64.to_bits();

    let line = codec.encode(&record);
    assert_eq!(line, format!("2\t{bits}\thello\\nworld\ta.txt\tf()\t42\t1"));
    assert_eq!(codec.decode(&line), Ok(record));
}

#[test]
fn escaped_body_spans_one_line() {
    let codec = LineCodec::default();
    let mut record = fixed_record();
    record.body = "line1\nline2\n\nline4\n".to_string();

    let line = codec.encode(&record);
    assert!(!line.contains('\n'));
    assert_eq!(codec.decode(&line).unwrap().body, record.body);
}

#[test]
fn every_failure_is_the_same_kind() {
    let codec = LineCodec::default();
    let garbage = [
        "",
        "\t\t\t\t\t",
        "\t\t\t\t\t\t\t",
        "9\t0\tb\tf\tg\t0\t0",
        "1\tnan\tb\tf\tg\t0\t0",
        "1\t0\tb\tf\tg\t18446744073709551616\t0",
        "1\t0\tb\tf\tg\t0\tyes",
    ];
    for line in garbage {
        let err = codec.decode(line).unwrap_err();
        assert!(matches!(err, CodecError::MalformedRecord { .. }), "{line:?}");
        assert!(err.to_string().starts_with("serialized data is broken"));
    }
}

#[test]
fn empty_date_segment_is_a_date_error() {
    let err = LineCodec::default()
        .decode("2\t\tbody\ta.txt\tf()\t42\t1")
        .unwrap_err();
    assert_eq!(err.field(), Some(Field::Date));
}

#[test]
fn delimiter_inside_file_misaligns_the_line() {
    let codec = LineCodec::default();
    let mut record = fixed_record();
    record.file = "dir\tname.rs".to_string();
    assert!(codec.decode(&codec.encode(&record)).is_err());
}

#[test]
fn extreme_values_survive() {
    let codec = LineCodec::new('\u{1f}');
    let record = LogRecord {
        level: Level::Verbose,
        date: Timestamp::from_bits(u64::MAX),
        body: String::new(),
        file: String::new(),
        function: "ünïcødé → 日本".to_string(),
        line: u64::MAX,
        is_active: false,
    };
    assert_eq!(codec.deserialize(&codec.serialize(&record)), Ok(record));
}

fn record_strategy() -> impl Strategy<Value = LogRecord> {
    (
        0usize..5,
        any::<u64>(),
        "[^\t\\\\]{0,40}",
        "[^\t\n]{0,20}",
        "[^\t\n]{0,20}",
        any::<u64>(),
        any::<bool>(),
    )
        .prop_map(|(rank, bits, body, file, function, line, is_active)| LogRecord {
            level: Level::ALL[rank],
            date: Timestamp::from_bits(bits),
            body,
            file,
            function,
            line,
            is_active,
        })
}

proptest! {
    #[test]
    fn decode_inverts_encode(record in record_strategy()) {
        let codec = LineCodec::default();
        let line = codec.encode(&record);
        prop_assert!(!line.contains('\n'));
        prop_assert_eq!(codec.decode(&line), Ok(record));
    }
}
