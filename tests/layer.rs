use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::time::{timeout, Duration};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use tracing_line_codec::{
    init::{init_tracing_with_config, InitError, LayerConfig},
    layer::RecordLayer,
    line_sink::LineSink,
    noop_sink::NoopSink,
    Level, LineCodec,
};

#[tokio::test]
async fn global_subscriber_feeds_the_line_channel() {
    let codec = LineCodec::new('|');
    let (sink, mut lines) = LineSink::channel(codec, 32);
    let config = LayerConfig {
        batch_size: 1,
        flush_interval: Duration::from_millis(10),
        min_level: Level::Info,
        ..LayerConfig::default()
    };
    init_tracing_with_config(Arc::new(sink), config).unwrap();

    tracing::trace!("ignored");
    tracing::error!(code = 503, "upstream unavailable");

    let line = timeout(Duration::from_secs(5), lines.recv())
        .await
        .expect("line within timeout")
        .expect("channel open");
    let record = codec.decode(&line).unwrap();
    assert_eq!(record.level, Level::Error);
    assert_eq!(record.body, "upstream unavailable code=503");
    assert_eq!(record.function, "layer");
    assert!(record.file.ends_with("layer.rs"));

    let second = init_tracing_with_config(Arc::new(NoopSink), LayerConfig::default());
    assert!(matches!(second, Err(InitError::AlreadyInstalled(_))));
}

#[tokio::test]
async fn full_channel_drops_instead_of_blocking() {
    let (layer, _handle) = RecordLayer::new(
        Arc::new(NoopSink),
        Level::Verbose,
        16,
        10_000,
        Duration::from_secs(3600),
    );
    let total = Arc::clone(&layer.total_events);
    let enqueued = Arc::clone(&layer.enqueued_events);
    let dropped = Arc::clone(&layer.dropped_events);
    let subscriber = Registry::default().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        for i in 0..100 {
            tracing::info!(target: "load", i, "burst");
        }
    });

    // The current-thread runtime never polls the background task during
    // the burst: 16 records sit in the channel and the rest are dropped.
    assert_eq!(total.load(Ordering::Relaxed), 100);
    assert_eq!(enqueued.load(Ordering::Relaxed), 0);
    assert_eq!(dropped.load(Ordering::Relaxed), 100 - 16);
}
