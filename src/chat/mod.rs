//! Tool-augmented conversation loop.
//!
//! A [`ChatSession`] drives one user query through as many rounds of model
//! response and tool execution as the model asks for, until it answers with
//! text only.

mod conversation;
mod session;

pub use conversation::Conversation;
pub use session::{ChatEvent, ChatSession, QueryOutcome, ToolCallRecord};
