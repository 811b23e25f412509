use tracing_line_codec::{env::codec_from_env, lines::decode_lines, Level, LogRecord};

fn main() {
    let codec = codec_from_env();

    let records = [
        LogRecord::new(Level::Info, "service started", "main.rs", "main()", 10),
        LogRecord::new(Level::Error, "request failed\nretrying", "http.rs", "fetch()", 88),
    ];

    let mut text = String::new();
    for record in &records {
        let line = codec.encode(record);
        println!("{}", line.escape_debug());
        text.push_str(&line);
        text.push('\n');
    }
    text.push_str("not a record\n");

    for (line_no, result) in decode_lines(&codec, &text) {
        match result {
            Ok(record) => println!("{line_no}: [{}] {:?}", record.level, record.body),
            Err(e) => println!("{line_no}: skipped ({e})"),
        }
    }
}
