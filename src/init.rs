use crate::env::min_level_from_env;
use crate::layer::RecordLayer;
use crate::record::Level;
use crate::sink::LogSink;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the record layer.
///
/// **Fields**
/// - `channel_buffer`: maximum number of queued [`LogRecord`]s before new
///   ones are dropped.
/// - `batch_size`: records handed to the sink per batch.
/// - `flush_interval`: longest time a partial batch waits before it is sent.
/// - `min_level`: events below this level are ignored.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is
///   installed next to the record layer.
///
/// [`LogRecord`]: crate::record::LogRecord
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub channel_buffer: usize,
    pub batch_size: usize,
    pub flush_interval: Duration,
    pub min_level: Level,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 1024,
            batch_size: 128,
            flush_interval: Duration::from_secs(1),
            min_level: Level::Verbose,
            enable_stdout: false,
        }
    }
}

impl LayerConfig {
    /// Defaults, with `min_level` taken from the environment when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_level: min_level_from_env(defaults.min_level),
            ..defaults
        }
    }

    /// Build the layer described by this config. Must be called inside a
    /// tokio runtime.
    pub fn build(&self, sink: Arc<dyn LogSink>) -> (RecordLayer, JoinHandle<()>) {
        RecordLayer::new(
            sink,
            self.min_level,
            self.channel_buffer,
            self.batch_size,
            self.flush_interval,
        )
    }
}

/// Error type returned when installing the global subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install a global `tracing` subscriber feeding `sink`.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`RecordLayer`] as the global
/// default subscriber, so all `tracing` events in the process at or above
/// `config.min_level` become records. Returns the background task handle.
pub fn init_tracing_with_config(
    sink: Arc<dyn LogSink>,
    config: LayerConfig,
) -> Result<JoinHandle<()>, InitError> {
    let (layer, handle) = config.build(sink);

    // The two subscriber shapes have different types, so each branch
    // installs its own.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(handle)
}

/// Initialize tracing with [`LayerConfig::from_env`].
pub fn init_tracing(sink: Arc<dyn LogSink>) -> Result<JoinHandle<()>, InitError> {
    init_tracing_with_config(sink, LayerConfig::from_env())
}
