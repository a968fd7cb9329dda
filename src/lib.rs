pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AnalysisClient, GenerationRequest, GenerationResponse, TextGenerationGateway,
};

pub use connector::{AnthropicGateway, ApiError, Container, ContainerConfig, MockGateway};

pub use domain::{
    AnalysisConfig, AnalysisError, AnalysisReport, GatewayError, MarketAnalysis, Potential,
    ProductDescription, Prompt, PromptBuilder, ResponseParser, SchemaPolicy,
};
