mod analysis_config;
mod analysis_report;
mod product_description;
mod prompt;

pub use analysis_config::*;
pub use analysis_report::*;
pub use product_description::*;
pub use prompt::*;
