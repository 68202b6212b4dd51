//! Chat Bot Layer
//!
//! Translates chat commands into control API calls and renders the results
//! back as chat messages.
//!
//! ## Architecture
//!
//! ```text
//! Chat Platform → ChatAdapter → mpsc → BotGateway (one task per command)
//!                                        ↓
//!                               CommandRouter.parse()
//!                                        ↓
//!                               ControlClient call
//!                               (start/stop: Selection Flow first)
//!                                        ↓
//!                               ResponseMapper → ChatAdapter.edit_message()
//! ```

pub mod adapters;
pub mod commands;
pub mod gateway;
pub mod render;
pub mod selection;
pub mod types;

pub use types::*;
