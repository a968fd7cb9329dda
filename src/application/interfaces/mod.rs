mod text_generation_gateway;

pub use text_generation_gateway::*;
