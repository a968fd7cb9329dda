mod anthropic_gateway;
mod mock_gateway;

pub use anthropic_gateway::*;
pub use mock_gateway::*;
