//! Integration Tests Module
//!
//! End-to-end tests for craftops-bot. The control API is mocked with an
//! in-process axum server on an ephemeral port; the chat platform is mocked
//! with a channel-backed adapter that records every outgoing call.

// Shared mocks: control API server and chat adapter
mod support;

// ControlClient against the mock control API
mod client_test;
