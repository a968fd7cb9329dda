//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Text generation gateways (Anthropic Messages API, in-process mock)
//! - HTTP API (axum) exposing the analysis pipeline

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::{router, serve, ApiError, Container, ContainerConfig};
