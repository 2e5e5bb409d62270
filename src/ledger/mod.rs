pub mod summary;

pub use summary::format_summary;

use crate::food::types::{AnalysisResult, FoodEntry, NutrientRecord};
use chrono::{Local, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of meals a day is divided into. Declaration order is the
/// display order everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
    #[serde(rename = "Afternoon Tea")]
    AfternoonTea,
}

impl MealType {
    pub const ALL: [MealType; 6] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Dessert,
        MealType::AfternoonTea,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
            MealType::Dessert => "Dessert",
            MealType::AfternoonTea => "Afternoon Tea",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .iter()
            .find(|meal| meal.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown meal type '{}'", s.trim()))
    }
}

/// Running log of everything committed today: per-meal entries plus grand
/// totals kept incrementally in step with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLedger {
    pub date: NaiveDate,
    pub totals: NutrientRecord,
    pub meals: BTreeMap<MealType, Vec<FoodEntry>>,
}

impl DailyLedger {
    pub fn new() -> Self {
        Self {
            date: Local::now().date_naive(),
            totals: NutrientRecord::ZERO,
            meals: MealType::ALL.iter().map(|m| (*m, Vec::new())).collect(),
        }
    }

    /// Folds a confirmed analysis into one meal. No-op on an empty result;
    /// otherwise every entry lands and the totals move together, so a
    /// snapshot taken before or after sees a consistent ledger.
    pub fn commit(&mut self, result: &AnalysisResult, meal: MealType) {
        if result.is_empty() {
            return;
        }
        let entries = self.meals.entry(meal).or_default();
        entries.extend(result.entries.iter().cloned());
        self.totals.add(&result.totals);
        info!(
            "committed {} entries to {meal}, daily total now {:.0} kcal",
            result.entries.len(),
            self.totals.calories
        );
    }

    /// Back to an empty ledger, re-stamped with today's date.
    pub fn reset(&mut self) {
        *self = DailyLedger::new();
    }

    pub fn snapshot(&self) -> DailyLedger {
        self.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.values().all(|entries| entries.is_empty())
    }
}

impl Default for DailyLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, calories: f64, protein: f64) -> FoodEntry {
        FoodEntry {
            name: name.to_string(),
            nutrients: NutrientRecord {
                calories,
                protein,
                fat: 1.0,
                carbs: 5.0,
                fiber: 0.2,
            },
        }
    }

    fn result_of(entries: Vec<FoodEntry>) -> AnalysisResult {
        let mut result = AnalysisResult::default();
        for e in entries {
            result.push(e);
        }
        result
    }

    #[test]
    fn test_commit_appends_to_one_meal_and_moves_totals() {
        let mut ledger = DailyLedger::new();
        let result = result_of(vec![entry("rice", 130.0, 2.7), entry("soup", 75.0, 4.0)]);

        ledger.commit(&result, MealType::Lunch);

        assert_eq!(ledger.meals[&MealType::Lunch].len(), 2);
        for meal in MealType::ALL {
            if meal != MealType::Lunch {
                assert!(ledger.meals[&meal].is_empty());
            }
        }
        assert!((ledger.totals.calories - 205.0).abs() < 1e-9);
        assert!((ledger.totals.protein - 6.7).abs() < 1e-9);
    }

    #[test]
    fn test_commit_empty_result_is_noop() {
        let mut ledger = DailyLedger::new();
        ledger.commit(&AnalysisResult::default(), MealType::Dinner);

        assert_eq!(ledger.totals, NutrientRecord::ZERO);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_totals_equal_sum_over_all_meals() {
        let mut ledger = DailyLedger::new();
        ledger.commit(&result_of(vec![entry("toast", 80.0, 3.0)]), MealType::Breakfast);
        ledger.commit(&result_of(vec![entry("cake", 350.0, 4.5)]), MealType::Dessert);
        ledger.commit(&result_of(vec![entry("noodles", 190.0, 7.0)]), MealType::Dinner);

        let mut summed = NutrientRecord::ZERO;
        for entries in ledger.meals.values() {
            for e in entries {
                summed.add(&e.nutrients);
            }
        }
        assert_eq!(ledger.totals, summed);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ledger = DailyLedger::new();
        ledger.commit(&result_of(vec![entry("pizza", 266.0, 11.0)]), MealType::Snack);

        ledger.reset();

        assert_eq!(ledger.totals, NutrientRecord::ZERO);
        for meal in MealType::ALL {
            assert!(ledger.meals[&meal].is_empty());
        }
    }

    #[test]
    fn test_meal_type_parses_case_insensitively() {
        assert_eq!("lunch".parse::<MealType>().unwrap(), MealType::Lunch);
        assert_eq!(
            "Afternoon Tea".parse::<MealType>().unwrap(),
            MealType::AfternoonTea
        );
        assert_eq!(
            "afternoon tea".parse::<MealType>().unwrap(),
            MealType::AfternoonTea
        );
        assert!("brunch".parse::<MealType>().is_err());
    }
}
