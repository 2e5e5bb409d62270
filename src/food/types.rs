use serde::{Deserialize, Serialize};

/// Canonical per-food nutrient quantities. Calories in kcal, everything else
/// in grams. Produced once by a resolver call and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientRecord {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub fiber: f64,
}

impl NutrientRecord {
    pub const ZERO: NutrientRecord = NutrientRecord {
        calories: 0.0,
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
        fiber: 0.0,
    };

    pub fn add(&mut self, other: &NutrientRecord) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.fat += other.fat;
        self.carbs += other.carbs;
        self.fiber += other.fiber;
    }
}

/// One recognized food with its resolved nutrients. The name is already
/// normalized (trimmed, lowercase) by the time an entry exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub name: String,
    pub nutrients: NutrientRecord,
}

/// The outcome of one image analysis: entries in completion order plus their
/// component-wise totals. Final once the fan-out join completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub entries: Vec<FoodEntry>,
    pub totals: NutrientRecord,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: FoodEntry) {
        self.totals.add(&entry.nutrients);
        self.entries.push(entry);
    }
}

/// An `AnalysisResult` together with everything the user is told about the
/// analysis: the normalized names that were looked up, the components the
/// normalizer merged away, and the foods that resolved to no data. Missing
/// foods are reported but never counted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub recognized: Vec<String>,
    pub merged: Vec<String>,
    pub result: AnalysisResult,
    pub missing: Vec<String>,
}

/// Round to one decimal place, the precision the lookup service's gram
/// values are reported at.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
