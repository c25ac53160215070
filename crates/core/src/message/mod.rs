//! Message and MessageHandler
#![warn(missing_docs)]

mod payload;
pub use payload::MessagePayload;

mod types;
pub use types::*;

pub mod handlers;
pub use handlers::HandleMsg;
pub use handlers::MessageHandler;
pub use handlers::RingService;
