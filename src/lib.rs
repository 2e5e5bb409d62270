pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod food;
pub mod ledger;
pub mod vision;

// Re-export commonly used items
pub use error::AnalysisError;
pub use food::{AnalysisReport, AnalysisResult, FoodAnalyzer, FoodEntry, NutrientRecord};
pub use ledger::{format_summary, DailyLedger, MealType};
