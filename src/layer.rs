use crate::record::{Level, LogRecord, Timestamp};
use crate::sink::LogSink;
use std::error::Error;
use std::fmt::Write as _;
use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Events whose target starts with this prefix are our own diagnostics and
/// are never turned into records.
const SELF_TARGET: &str = "tracing_line_codec";

/// Attempts per batch before it is dropped.
const MAX_SEND_ATTEMPTS: u32 = 5;

/// `tracing_subscriber` layer that turns events into [`LogRecord`]s and
/// forwards them to a [`LogSink`] via a bounded channel and background task.
///
/// Events below `min_level` are ignored. Sink I/O is fully decoupled from
/// application threads: when the channel is full the record is dropped and
/// counted instead of blocking the caller.
///
/// Message and field values are copied into the record verbatim. An event
/// whose text contains the sink's delimiter (a tab, with the default
/// [`LineCodec`](crate::LineCodec)) produces a line that cannot be decoded
/// again; pick a delimiter the application never logs.
pub struct RecordLayer {
    sender: mpsc::Sender<LogRecord>,
    min_level: Level,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Successfully enqueued into channel.
    pub enqueued_events: Arc<AtomicU64>,
    /// Dropped because the channel was full or the sink kept failing.
    pub dropped_events: Arc<AtomicU64>,
}

impl RecordLayer {
    /// Create a new layer and spawn the background task that drains the
    /// channel into `sink`. Must be called inside a tokio runtime.
    ///
    /// Minimal thresholds are enforced for `buffer`, `batch_size` and
    /// `flush_interval` to avoid degenerate configurations.
    pub fn new(
        sink: Arc<dyn LogSink>,
        min_level: Level,
        buffer: usize,
        batch_size: usize,
        flush_interval: Duration,
    ) -> (Self, JoinHandle<()>) {
        let buffer = buffer.max(16);
        let batch_size = batch_size.max(1);
        let flush_interval = flush_interval.max(Duration::from_millis(10));

        let (tx, mut rx) = mpsc::channel::<LogRecord>(buffer);

        let total_events = Arc::new(AtomicU64::new(0));
        let enqueued_events = Arc::new(AtomicU64::new(0));
        let dropped_events = Arc::new(AtomicU64::new(0));

        let enqueued_bg = Arc::clone(&enqueued_events);
        let dropped_bg = Arc::clone(&dropped_events);

        let handle = tokio::spawn(async move {
            let mut batch = Vec::with_capacity(batch_size);
            let mut ticker = interval(flush_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Some(record) => {
                            batch.push(record);
                            enqueued_bg.fetch_add(1, Ordering::Relaxed);
                            if batch.len() >= batch_size {
                                ship(&*sink, &mut batch, &dropped_bg).await;
                            }
                        }
                        None => {
                            ship(&*sink, &mut batch, &dropped_bg).await;
                            break;
                        }
                    },
                    _ = ticker.tick() => {
                        if !batch.is_empty() {
                            ship(&*sink, &mut batch, &dropped_bg).await;
                        }
                    }
                }
            }
        });

        (
            Self {
                sender: tx,
                min_level,
                total_events,
                enqueued_events,
                dropped_events,
            },
            handle,
        )
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }
}

async fn ship(sink: &dyn LogSink, batch: &mut Vec<LogRecord>, dropped: &AtomicU64) {
    if batch.is_empty() {
        return;
    }
    if let Err(e) = send_batch(sink, batch).await {
        dropped.fetch_add(batch.len() as u64, Ordering::Relaxed);
        tracing::warn!(error = %e, records = batch.len(), "dropping log batch");
        batch.clear();
    }
}

/// Send every record in `batch` and flush the sink, retrying the whole
/// batch with exponential backoff. The batch is cleared only once the flush
/// succeeds; on error it is left intact for the caller to account for.
async fn send_batch(
    sink: &dyn LogSink,
    batch: &mut Vec<LogRecord>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut backoff = Duration::from_millis(100);
    let max_backoff = Duration::from_secs(10);
    let mut attempt = 1;

    loop {
        match deliver(sink, batch).await {
            Ok(()) => {
                batch.clear();
                return Ok(());
            }
            Err(e) if attempt >= MAX_SEND_ATTEMPTS => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, ?backoff, attempt, "log sink delivery failed, retrying");
                sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, max_backoff);
                attempt += 1;
            }
        }
    }
}

async fn deliver(sink: &dyn LogSink, batch: &[LogRecord]) -> Result<(), Box<dyn Error + Send + Sync>> {
    for record in batch {
        sink.send(record).await?;
    }
    sink.flush().await
}

impl<S> Layer<S> for RecordLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target().starts_with(SELF_TARGET) {
            return;
        }
        self.total_events.fetch_add(1, Ordering::Relaxed);
        let level = Level::from(meta.level());
        if level < self.min_level {
            return;
        }

        let mut visitor = BodyVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord {
            level,
            date: Timestamp::now(),
            body: visitor.into_body(),
            file: meta.file().unwrap_or("<unknown>").to_string(),
            function: meta.module_path().unwrap_or(meta.target()).to_string(),
            line: meta.line().map(u64::from).unwrap_or(0),
            is_active: true,
        };

        if self.sender.try_send(record).is_err() {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Collects an event's message and fields into a record body.
///
/// The message comes first, followed by ` key=value` for each other field
/// in the order tracing reports them.
#[derive(Default)]
pub struct BodyVisitor {
    message: Option<String>,
    fields: String,
}

impl BodyVisitor {
    pub fn into_body(self) -> String {
        let mut body = self.message.unwrap_or_default();
        if !self.fields.is_empty() {
            if body.is_empty() {
                body.push_str(self.fields.trim_start());
            } else {
                body.push_str(&self.fields);
            }
        }
        body
    }

    fn push_field(&mut self, field: &Field, value: impl std::fmt::Display) {
        let _ = write!(self.fields, " {}={}", field.name(), value);
    }
}

impl Visit for BodyVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push_field(field, value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push_field(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push_field(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push_field(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.push_field(field, format_args!("{:?}", value));
        }
    }
}
