/// Composite dishes and the component they already account for. When both
/// appear in one recognition answer, the component is dropped so its
/// nutrients are not double-counted.
const SUBSUMPTIONS: &[(&str, &str)] = &[("fried rice", "egg")];

/// Splits a raw comma-separated recognition answer into normalized food
/// names: trimmed, lowercased, empties dropped, first-appearance order kept.
/// Returns the surviving names and the components removed by subsumption.
pub fn normalize_food_names(raw: &str) -> (Vec<String>, Vec<String>) {
    let mut foods: Vec<String> = raw
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    let mut merged = Vec::new();
    for (dish, component) in SUBSUMPTIONS {
        if foods.iter().any(|f| f == dish) && foods.iter().any(|f| f == component) {
            foods.retain(|f| f != component);
            merged.push(component.to_string());
        }
    }

    (foods, merged)
}
