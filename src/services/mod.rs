//! Services
//!
//! The two halves of the bot: the chat-facing layer and the client-side
//! view of the control API.

pub mod bot;
pub mod control;
