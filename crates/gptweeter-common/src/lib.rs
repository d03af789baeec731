pub mod errors;
pub mod id;

pub use errors::{ConfigError, GptweeterError};
pub use id::{new_correlation_id, SessionId, CORRELATION_ID_LEN};

pub type Result<T> = std::result::Result<T, GptweeterError>;
