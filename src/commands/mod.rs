use crate::food::types::AnalysisReport;
use crate::food::FoodAnalyzer;
use crate::ledger::{format_summary, DailyLedger, MealType};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

/// Interactive command dispatch: holds the analyzer, the day's ledger and
/// the last analysis awaiting confirmation.
pub struct CommandHandler {
    analyzer: FoodAnalyzer,
    ledger: DailyLedger,
    pending: Option<AnalysisReport>,
}

impl CommandHandler {
    pub fn new(analyzer: FoodAnalyzer) -> Self {
        Self {
            analyzer,
            ledger: DailyLedger::new(),
            pending: None,
        }
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<(), String> {
        let input = input.trim();
        let argument = |prefix: &str| input[prefix.len()..].trim().to_string();

        match input.split_whitespace().next() {
            Some("analyze") => {
                let path = argument("analyze");
                if path.is_empty() {
                    return Err("Please specify an image file to analyze.".to_string());
                }
                self.analyze(&path).await
            }
            Some("lookup") => {
                let foods = argument("lookup");
                if foods.is_empty() {
                    return Err("Please specify comma-separated foods to look up.".to_string());
                }
                self.lookup(&foods).await
            }
            Some("commit") => {
                let meal = argument("commit");
                if meal.is_empty() {
                    return Err(format!(
                        "Please specify a meal type: {}",
                        meal_labels().join(", ")
                    ));
                }
                self.commit(&meal)
            }
            Some("summary") => {
                println!("{}", format_summary(&self.ledger));
                Ok(())
            }
            Some("save") => {
                let path = argument("save");
                if path.is_empty() {
                    return Err("Please specify a file to save the summary to.".to_string());
                }
                self.save(&path)
            }
            Some("reset") => {
                if argument("reset") == "all" {
                    self.pending = None;
                    self.ledger.reset();
                    println!("{}", "✅ All tracking data reset".green());
                } else {
                    self.pending = None;
                    println!("{}", "✅ Current analysis cleared".green());
                }
                Ok(())
            }
            _ => {
                println!(
                    "Available commands:\n\
                     - analyze <image_path> (Identify foods in a photo and fetch nutrition)\n\
                     - lookup <foods> (Fetch nutrition for comma-separated foods)\n\
                     - commit <meal> (Add the last analysis to a meal: {})\n\
                     - summary (Show today's nutrient intake)\n\
                     - save <path> (Write the summary to a file)\n\
                     - reset [all] (Clear the analysis, or everything)\n\
                     - exit",
                    meal_labels().join(", ")
                );
                Ok(())
            }
        }
    }

    async fn analyze(&mut self, path: &str) -> Result<(), String> {
        if !Path::new(path).exists() {
            return Err(format!("Image file not found: {path}"));
        }
        let image = image::open(path).map_err(|e| format!("Unable to load image: {e}"))?;

        let spinner = analysis_spinner("🔍 Identifying food items");
        let outcome = self.analyzer.analyze_image(&image).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(report) => {
                println!("{}", render_report(&report));
                self.pending = Some(report);
                Ok(())
            }
            Err(e) => Err(e.user_message()),
        }
    }

    async fn lookup(&mut self, foods: &str) -> Result<(), String> {
        let spinner = analysis_spinner("🔍 Fetching nutrition data");
        let outcome = self.analyzer.analyze_foods(foods).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(report) => {
                println!("{}", render_report(&report));
                self.pending = Some(report);
                Ok(())
            }
            Err(e) => Err(e.user_message()),
        }
    }

    fn commit(&mut self, meal: &str) -> Result<(), String> {
        let meal: MealType = meal.parse()?;
        let report = match self.pending.take() {
            Some(report) if !report.result.is_empty() => report,
            _ => return Err("No analyzed foods to add. Run analyze or lookup first.".to_string()),
        };

        let count = report.result.entries.len();
        self.ledger.commit(&report.result, meal);
        println!("{}", format!("✅ Added {count} foods to {meal}").green());
        Ok(())
    }

    fn save(&self, path: &str) -> Result<(), String> {
        if self.ledger.is_empty() {
            return Err("No summary data to save.".to_string());
        }
        std::fs::write(path, format_summary(&self.ledger))
            .map_err(|e| format!("Failed to save summary: {e}"))?;
        println!("{}", format!("✅ Summary saved to {path}").green());
        Ok(())
    }
}

fn meal_labels() -> Vec<&'static str> {
    MealType::ALL.iter().map(|m| m.label()).collect()
}

fn analysis_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Per-food nutrient blocks, missing-food warnings, then the totals
/// summary, in the order the app has always printed them.
fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    if report.merged.is_empty() {
        let _ = writeln!(out, "🧠 Identified foods: {}", report.recognized.join(", "));
    } else {
        let _ = writeln!(
            out,
            "🧠 Merged composite dish components, removed separate {}",
            report.merged.join(", ")
        );
    }

    for entry in &report.result.entries {
        let _ = write!(
            out,
            "\n🍽️ {}:\n   - Calories: {} kcal\n   - Protein: {} g\n   - Fat: {} g\n   - Carbohydrates: {} g\n   - Fiber: {} g\n",
            capitalize(&entry.name),
            entry.nutrients.calories,
            entry.nutrients.protein,
            entry.nutrients.fat,
            entry.nutrients.carbs,
            entry.nutrients.fiber,
        );
    }

    for food in &report.missing {
        let _ = write!(out, "\n⚠️ No data found for {food}\n");
    }

    if !report.result.is_empty() {
        let totals = &report.result.totals;
        let _ = write!(
            out,
            "\n✅ Nutrition Summary\nTotal Calories: {} kcal\nTotal Protein: {:.1} g\nTotal Fat: {:.1} g\nTotal Carbohydrates: {:.1} g\nTotal Fiber: {:.1} g\n",
            totals.calories as i64,
            totals.protein,
            totals.fat,
            totals.carbs,
            totals.fiber,
        );
    }

    out.push_str("\n✅ Analysis complete - add to your daily tracking with commit <meal>");
    out
}

fn capitalize(name: &str) -> String {
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
