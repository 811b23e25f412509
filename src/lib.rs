pub mod codec;
pub mod error;
pub mod record;
pub mod serializer;
pub mod lines;

pub mod sink;
pub mod line_sink;
pub mod noop_sink;
pub mod layer;

pub mod env;
pub mod init;

pub use codec::{LineCodec, DEFAULT_DELIMITER};
pub use error::{CodecError, Field};
pub use record::{Level, LogRecord, Timestamp};
pub use serializer::LogSerializer;
