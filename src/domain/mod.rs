//! # Domain Layer
//!
//! Core business logic: the analysis models, the prompt builder and the
//! response parser that must agree on one JSON shape, and the error taxonomy.
//! This layer is independent of HTTP clients and servers.

pub mod models;
pub mod services;

pub use models::*;
pub use services::*;
