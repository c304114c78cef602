pub mod service_traits;

pub use service_traits::{ExtractionService, GenerationService, LivenessProbe};
