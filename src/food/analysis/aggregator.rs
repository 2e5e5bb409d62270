use crate::food::api::{LookupOutcome, NutrientSource};
use crate::food::types::{AnalysisReport, FoodEntry};
use log::debug;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Upper bound on simultaneous in-flight lookups. The recognition prompt
/// asks for 1-3 foods, but the answer is not guaranteed to honor that.
const MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Resolves every food name concurrently and folds the outcomes into one
/// report. Draining the join set to empty is the join barrier: the report
/// is not returned until every dispatched lookup has completed.
///
/// All folding happens on this task as completions arrive, so entries land
/// in completion order and no mutation of the accumulator ever races.
pub async fn aggregate_nutrients(
    source: Arc<dyn NutrientSource>,
    foods: &[String],
) -> AnalysisReport {
    let limit = Arc::new(Semaphore::new(MAX_CONCURRENT_LOOKUPS));
    let mut lookups = JoinSet::new();

    for food in foods {
        let source = Arc::clone(&source);
        let limit = Arc::clone(&limit);
        let food = food.clone();
        lookups.spawn(async move {
            // Semaphore is never closed, acquire cannot fail.
            let _permit = limit.acquire_owned().await.unwrap();
            let outcome = source.resolve(&food).await;
            (food, outcome)
        });
    }

    let mut report = AnalysisReport::default();
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((food, LookupOutcome::Found(nutrients))) => {
                debug!("resolved '{food}'");
                report.result.push(FoodEntry { name: food, nutrients });
            }
            Ok((food, LookupOutcome::NoData)) => {
                report.missing.push(food);
            }
            Err(e) => {
                // A panicked lookup task counts as completed with no data;
                // it must not stall the barrier.
                log::error!("lookup task failed: {e}");
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::types::NutrientRecord;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Mock source with per-food canned outcomes and delays, plus a counter
    /// of completed resolutions for barrier assertions.
    struct ScriptedSource {
        records: HashMap<String, NutrientRecord>,
        delays: HashMap<String, u64>,
        completed: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(records: Vec<(&str, NutrientRecord)>, delays: Vec<(&str, u64)>) -> Self {
            Self {
                records: records
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                delays: delays.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
                completed: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NutrientSource for ScriptedSource {
        async fn resolve(&self, food: &str) -> LookupOutcome {
            if let Some(&ms) = self.delays.get(food) {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
            match self.records.get(food) {
                Some(record) => LookupOutcome::Found(*record),
                None => LookupOutcome::NoData,
            }
        }
    }

    fn record(calories: f64, protein: f64) -> NutrientRecord {
        NutrientRecord {
            calories,
            protein,
            fat: 1.0,
            carbs: 2.0,
            fiber: 0.5,
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_totals_are_sum_regardless_of_completion_order() {
        // Reverse the completion order with delays; totals must not care.
        let source = Arc::new(ScriptedSource::new(
            vec![
                ("rice", record(130.0, 2.7)),
                ("chicken", record(239.0, 27.3)),
                ("soup", record(75.0, 4.0)),
            ],
            vec![("rice", 30), ("chicken", 15), ("soup", 1)],
        ));

        let report = aggregate_nutrients(source, &names(&["rice", "chicken", "soup"])).await;

        assert_eq!(report.result.entries.len(), 3);
        assert!(report.missing.is_empty());
        assert!((report.result.totals.calories - 444.0).abs() < 1e-9);
        assert!((report.result.totals.protein - 34.0).abs() < 1e-9);
        assert!((report.result.totals.fat - 3.0).abs() < 1e-9);
        assert!((report.result.totals.carbs - 6.0).abs() < 1e-9);
        assert!((report.result.totals.fiber - 1.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_join_barrier_waits_for_every_lookup() {
        let source = Arc::new(ScriptedSource::new(
            vec![("toast", record(80.0, 3.0)), ("jam", record(50.0, 0.1))],
            vec![("toast", 40), ("jam", 1)],
        ));

        let report =
            aggregate_nutrients(Arc::clone(&source) as Arc<dyn NutrientSource>, &names(&["toast", "jam"]))
                .await;

        // Once the report exists, every dispatched lookup has completed.
        assert_eq!(source.completed.load(Ordering::SeqCst), 2);
        assert_eq!(report.result.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_foods_reported_but_not_counted() {
        let source = Arc::new(ScriptedSource::new(
            vec![("banana", record(89.0, 1.1))],
            vec![],
        ));

        let report = aggregate_nutrients(source, &names(&["banana", "xyzzy"])).await;

        assert_eq!(report.result.entries.len(), 1);
        assert_eq!(report.result.entries[0].name, "banana");
        assert_eq!(report.missing, vec!["xyzzy"]);
        assert!((report.result.totals.calories - 89.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_report() {
        let source = Arc::new(ScriptedSource::new(vec![], vec![]));
        let report = aggregate_nutrients(source, &[]).await;
        assert!(report.result.is_empty());
        assert!(report.missing.is_empty());
        assert_eq!(report.result.totals, NutrientRecord::ZERO);
    }

    #[tokio::test]
    async fn test_more_foods_than_permit_limit_all_complete() {
        let foods: Vec<String> = (0..10).map(|i| format!("food{i}")).collect();
        let source = Arc::new(ScriptedSource::new(
            foods.iter().map(|f| (f.as_str(), record(10.0, 1.0))).collect(),
            vec![],
        ));

        let report = aggregate_nutrients(source, &foods).await;

        assert_eq!(report.result.entries.len(), 10);
        assert!((report.result.totals.calories - 100.0).abs() < 1e-9);
    }
}
