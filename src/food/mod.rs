pub mod analysis;
pub mod api;
pub mod normalizer;
pub mod types;

pub use analysis::FoodAnalyzer;
pub use types::{AnalysisReport, AnalysisResult, FoodEntry, NutrientRecord};
