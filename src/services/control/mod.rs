//! Control API
//!
//! Client-side view of the homelab control API: wire types, the
//! success/failure result envelope, and the HTTP client that speaks to the
//! game-server endpoints.

pub mod client;
pub mod types;

pub use client::ControlClient;
pub use types::*;
