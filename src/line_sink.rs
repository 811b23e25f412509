use crate::codec::LineCodec;
use crate::record::LogRecord;
use crate::serializer::LogSerializer;
use crate::sink::LogSink;
use async_trait::async_trait;
use std::error::Error;
use tokio::sync::mpsc;

/// Error type returned by [`LineSink`].
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("line receiver has been dropped")]
    Closed,
}

/// Sink that encodes each record into a line and forwards it over a
/// bounded channel.
///
/// The receiving side owns framing and I/O: it decides how lines are
/// terminated and where they are written. `send` waits for channel
/// capacity, so a slow receiver applies backpressure to the layer's
/// background task rather than to application threads.
pub struct LineSink<S = LineCodec> {
    serializer: S,
    sender: mpsc::Sender<String>,
}

impl LineSink<LineCodec> {
    /// Create a sink using `codec` and return the receiving half of the
    /// line channel.
    pub fn channel(codec: LineCodec, buffer: usize) -> (Self, mpsc::Receiver<String>) {
        Self::with_serializer(codec, buffer)
    }
}

impl<S> LineSink<S>
where
    S: LogSerializer<Serialized = String>,
{
    pub fn with_serializer(serializer: S, buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (LineSink { serializer, sender }, receiver)
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }
}

#[async_trait]
impl<S> LogSink for LineSink<S>
where
    S: LogSerializer<Serialized = String>,
{
    async fn send(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        let line = self.serializer.serialize(record);
        self.sender.send(line).await.map_err(|_| SinkError::Closed)?;
        Ok(())
    }
}
