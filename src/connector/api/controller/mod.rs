pub mod analyze_controller;
pub mod health_controller;
pub mod lead_controller;
pub mod sequence_controller;

pub use analyze_controller::{analyze_product, AnalyzeController, AnalyzeProductRequest};
pub use health_controller::health_check;
pub use lead_controller::generate_leads;
pub use sequence_controller::send_sequence;
