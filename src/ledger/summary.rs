use crate::ledger::{DailyLedger, MealType};
use std::fmt::Write;

/// Renders a ledger snapshot as the plain-text daily report: totals first,
/// then every non-empty meal with its foods. Pure and deterministic.
pub fn format_summary(ledger: &DailyLedger) -> String {
    let mut summary = format!("Daily Summary for {}\n\n", ledger.date.format("%Y-%m-%d"));

    summary.push_str("Total Nutrient Intake:\n");
    let _ = writeln!(summary, "  Calories: {} kcal", ledger.totals.calories as i64);
    let _ = writeln!(summary, "  Protein: {:.1} g", ledger.totals.protein);
    let _ = writeln!(summary, "  Fat: {:.1} g", ledger.totals.fat);
    let _ = writeln!(summary, "  Carbohydrates: {:.1} g", ledger.totals.carbs);
    let _ = writeln!(summary, "  Fiber: {:.1} g", ledger.totals.fiber);

    for meal in MealType::ALL {
        let entries = match ledger.meals.get(&meal) {
            Some(entries) if !entries.is_empty() => entries,
            _ => continue,
        };
        let _ = write!(summary, "\n{}:\n", meal.label());
        for entry in entries {
            let _ = writeln!(summary, "  - {}", capitalize_words(&entry.name));
        }
    }

    summary
}

/// "fried rice" -> "Fried Rice", for display only; stored names stay
/// lowercase.
fn capitalize_words(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::types::{AnalysisResult, FoodEntry, NutrientRecord};

    fn ledger_with_lunch() -> DailyLedger {
        let mut ledger = DailyLedger::new();
        let mut result = AnalysisResult::default();
        result.push(FoodEntry {
            name: "fried rice".to_string(),
            nutrients: NutrientRecord {
                calories: 200.0,
                protein: 5.0,
                fat: 7.0,
                carbs: 30.0,
                fiber: 2.0,
            },
        });
        ledger.commit(&result, MealType::Lunch);
        ledger
    }

    #[test]
    fn test_summary_lists_totals_and_nonempty_meals_only() {
        let summary = format_summary(&ledger_with_lunch());

        assert!(summary.contains("Total Nutrient Intake:"));
        assert!(summary.contains("  Calories: 200 kcal"));
        assert!(summary.contains("  Protein: 5.0 g"));
        assert!(summary.contains("Lunch:\n  - Fried Rice"));
        assert!(!summary.contains("Breakfast:"));
        assert!(!summary.contains("Dinner:"));
    }

    #[test]
    fn test_summary_is_idempotent() {
        let ledger = ledger_with_lunch();
        assert_eq!(format_summary(&ledger), format_summary(&ledger));
    }

    #[test]
    fn test_empty_ledger_has_zeroed_totals() {
        let summary = format_summary(&DailyLedger::new());
        assert!(summary.contains("  Calories: 0 kcal"));
        assert!(summary.contains("  Fiber: 0.0 g"));
        assert!(!summary.contains("  - "));
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("fried rice"), "Fried Rice");
        assert_eq!(capitalize_words("egg"), "Egg");
    }
}
