use crate::record::LogRecord;
use async_trait::async_trait;
use std::error::Error;

/// Asynchronous destination for [`LogRecord`]s produced by the
/// [`RecordLayer`](crate::layer::RecordLayer).
///
/// Implementations decide what happens to a record: encode it into a line
/// and hand it to a transport, keep it in memory, or drop it. The layer
/// calls `send` from a background task and never awaits it on the
/// application thread.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Deliver a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was accepted.
    /// - `Err(..)` if the destination failed. The layer treats this as
    ///   transient and retries the batch with backoff.
    async fn send(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush any buffered records. Default implementation is a no-op.
    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
