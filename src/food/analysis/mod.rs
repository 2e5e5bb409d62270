pub mod aggregator;
pub mod pipeline;

pub use aggregator::aggregate_nutrients;
pub use pipeline::FoodAnalyzer;
