use crate::record::LogRecord;
use crate::sink::LogSink;
use async_trait::async_trait;
use std::error::Error;

/// A sink that drops every record.
///
/// Handy for measuring the layer on its own and for tests that only care
/// about what reaches the layer.
#[derive(Clone, Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl LogSink for NoopSink {
    async fn send(&self, _record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Level;

    #[tokio::test]
    async fn accepts_everything() {
        let sink = NoopSink;
        let record = LogRecord::new(Level::Error, "gone", "main.rs", "main", 1);
        assert!(sink.send(&record).await.is_ok());
        assert!(sink.flush().await.is_ok());
    }
}
