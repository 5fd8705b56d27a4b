pub mod client;
pub mod error;
pub mod types;

pub use client::{AgentApi, CursorClient};
pub use error::AgentError;
pub use types::{Conversation, ConversationMessage, LaunchRequest};
