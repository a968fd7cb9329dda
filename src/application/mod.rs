//! # Application Layer
//!
//! The gateway interface the pipeline depends on, and the `AnalysisClient`
//! use case coordinating domain and connector layers.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
