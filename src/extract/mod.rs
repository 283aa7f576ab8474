// Structured extraction over the annotator contract: ingredients, atomic
// steps, tools, methods, and per-step annotations.
pub mod annotations;
pub mod ingredients;
pub mod methods;
pub mod steps;
pub mod tools;

pub use annotations::{OvenContext, StepAnnotator};
pub use ingredients::IngredientExtractor;
pub use methods::MethodExtractor;
pub use steps::StepSegmenter;
pub use tools::ToolExtractor;
