use crate::error::AnalysisError;
use crate::food::analysis::aggregator::aggregate_nutrients;
use crate::food::api::NutrientSource;
use crate::food::normalizer::normalize_food_names;
use crate::food::types::AnalysisReport;
use crate::vision::{encode_image, FoodRecognizer};
use image::DynamicImage;
use log::info;
use std::sync::Arc;

/// Runs the full image-to-report pipeline: encode, recognize, normalize,
/// then fan out one nutrient lookup per food.
pub struct FoodAnalyzer {
    recognizer: Arc<dyn FoodRecognizer>,
    source: Arc<dyn NutrientSource>,
}

impl FoodAnalyzer {
    pub fn new(recognizer: Arc<dyn FoodRecognizer>, source: Arc<dyn NutrientSource>) -> Self {
        Self { recognizer, source }
    }

    /// One full analysis attempt for one image. Recognition-stage failures
    /// abort with an `AnalysisError`; per-food lookup failures only thin
    /// out the report.
    pub async fn analyze_image(&self, image: &DynamicImage) -> Result<AnalysisReport, AnalysisError> {
        let encoded = encode_image(image)?;
        let answer = self.recognizer.recognize(&encoded).await?;
        info!("recognized foods: {}", answer.trim());
        self.analyze_foods(&answer).await
    }

    /// Lookup-only entry point for an already known comma-separated food
    /// list. Also the tail of `analyze_image`.
    pub async fn analyze_foods(&self, raw: &str) -> Result<AnalysisReport, AnalysisError> {
        let (foods, merged) = normalize_food_names(raw);
        if foods.is_empty() {
            return Err(AnalysisError::EmptyResult);
        }

        let mut report = aggregate_nutrients(Arc::clone(&self.source), &foods).await;
        report.recognized = foods;
        report.merged = merged;
        Ok(report)
    }
}
