pub mod edamam;

// Re-export common types
pub use edamam::{EdamamClient, LookupOutcome, NutrientSource};
