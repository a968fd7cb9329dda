//! Domain services: prompt construction, response parsing and the error types
//! shared by every layer.

mod error;
mod prompt_builder;
mod response_parser;

pub use error::*;
pub use prompt_builder::*;
pub use response_parser::*;
