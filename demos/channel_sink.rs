use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use tracing_line_codec::{
    init::{init_tracing_with_config, LayerConfig},
    line_sink::LineSink,
    sink::LogSink,
    LineCodec,
};

#[tokio::main]
async fn main() {
    let (sink, mut lines) = LineSink::channel(LineCodec::new('|'), 256);
    let sink: Arc<dyn LogSink> = Arc::new(sink);

    let config = LayerConfig {
        flush_interval: Duration::from_millis(50),
        ..LayerConfig::default()
    };
    init_tracing_with_config(sink, config).expect("install subscriber");

    // Stand-in for a transport: frames each line with a newline.
    let writer = tokio::spawn(async move {
        while let Some(line) = lines.recv().await {
            println!("{line}");
        }
    });

    info!("channel sink example started");
    error!(user_id = 42, "authentication failed\nbad password");

    sleep(Duration::from_millis(200)).await;
    writer.abort();
}
