//! Environmental impact totals
//!
//! Products may carry free-form impact figures. Numeric values are summed per
//! key across the selection; anything else is ignored.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::SelectedProduct;

pub type ImpactTotals = BTreeMap<String, f64>;

fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Sum every numeric environmental figure across the selected products
pub fn calculate_environmental_impact<'a, I>(selected: I) -> ImpactTotals
where
    I: IntoIterator<Item = (&'a String, &'a SelectedProduct)>,
{
    let mut totals = ImpactTotals::new();

    for (ingredient, selected) in selected {
        let data = &selected.product.environmental_data;
        if data.is_empty() {
            tracing::debug!("No environmental data for '{}'", ingredient);
            continue;
        }

        for (key, value) in data {
            match numeric(value) {
                Some(amount) => *totals.entry(key.clone()).or_insert(0.0) += amount,
                None => tracing::debug!("Ignoring non-numeric '{}' for '{}'", key, ingredient),
            }
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use serde_json::json;
    use std::collections::HashMap;

    fn selected(data: Value) -> SelectedProduct {
        let environmental_data = serde_json::from_value(data).unwrap();
        SelectedProduct::new(Product {
            name: "x".to_string(),
            environmental_data,
            ..Default::default()
        })
    }

    #[test]
    fn test_sums_numeric_values() {
        let mut selection = HashMap::new();
        selection.insert("flour".to_string(), selected(json!({"co2_kg": 0.5, "water_l": 10})));
        selection.insert("milk".to_string(), selected(json!({"co2_kg": "1.25", "label": "B"})));
        selection.insert("salt".to_string(), SelectedProduct::default());

        let totals = calculate_environmental_impact(&selection);
        assert_eq!(totals.len(), 2);
        assert!((totals["co2_kg"] - 1.75).abs() < 1e-9);
        assert_eq!(totals["water_l"], 10.0);
    }

    #[test]
    fn test_empty_selection() {
        let selection: HashMap<String, SelectedProduct> = HashMap::new();
        assert!(calculate_environmental_impact(&selection).is_empty());
    }
}
