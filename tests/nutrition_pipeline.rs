//! End-to-end checks over the public library API: parse a recipe, pick
//! products, then run the allergen and nutrition analyses.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use recipewise::allergens::{check_allergens, AllergenKeywords, AllergenMatcher};
use recipewise::models::{NutrientBasis, NutrientEntry, Product, SelectedProduct};
use recipewise::nutrition::{
    calculate_nutrition, convert_to_grams, parse_serving_size, ConversionError, NutritionCalculator, Quantity,
};
use recipewise::recipes::parse_recipe_text;

fn catalog_product(name: &str, tags: &[&str], serving: &str, nutrients: Vec<NutrientEntry>) -> Product {
    Product {
        name: name.to_string(),
        allergens_hierarchy: Some(tags.iter().map(|t| t.to_string()).collect()),
        serving_size: Some(serving.to_string()),
        nutrients,
        ..Default::default()
    }
}

fn per_serving(name: &str, amount: f64, unit: &str) -> NutrientEntry {
    NutrientEntry::new(name, amount, unit, NutrientBasis::PerServing)
}

#[test]
fn custom_recipe_to_totals() {
    let (recipe, ingredients) = parse_recipe_text("2 cups milk\n100 g oats\nhoney");
    assert_eq!(recipe.ner, "milk, oats, honey");
    assert_eq!(ingredients[0].validated_unit(), Some("cups"));

    let mut selection: HashMap<String, SelectedProduct> = HashMap::new();
    selection.insert(
        "oats".to_string(),
        SelectedProduct::new(catalog_product(
            "Rolled oats",
            &["en:gluten"],
            "50 g",
            vec![per_serving("Energy", 190.0, "kcal"), per_serving("Fiber", 5.0, "g")],
        ))
        .with_amount(100.0, "g"),
    );
    selection.insert(
        "honey".to_string(),
        SelectedProduct::new(catalog_product(
            "Honey",
            &[],
            "21g",
            vec![per_serving("Energy", 64.0, "kcal"), per_serving("Sugars", 17.0, "g")],
        )),
    );

    let totals = calculate_nutrition(&selection);
    // oats: 2 servings; honey: its own serving once
    assert_eq!(totals.get("Energy").unwrap().amount, 444.0);
    assert_eq!(totals.get("Fiber").unwrap().amount, 10.0);
    assert_eq!(totals.get("Sugars").unwrap().amount, 17.0);

    let products: BTreeMap<String, Product> = selection
        .iter()
        .map(|(k, v)| (k.clone(), v.product.clone()))
        .collect();
    assert_eq!(
        check_allergens(&products, &["Gluten", "milk"]),
        BTreeSet::from(["gluten".to_string()])
    );
}

#[test]
fn totals_do_not_depend_on_insertion_order() {
    let entries = vec![
        ("a", catalog_product("A", &[], "10g", vec![per_serving("Sodium", 120.0, "mg")])),
        ("b", catalog_product("B", &[], "10g", vec![per_serving("Sodium", 0.5, "g")])),
        ("c", catalog_product("C", &[], "10g", vec![per_serving("Proteins", 3.0, "g")])),
    ];

    let forward: Vec<(String, SelectedProduct)> = entries
        .iter()
        .map(|(k, p)| (k.to_string(), SelectedProduct::new(p.clone())))
        .collect();
    let mut backward = forward.clone();
    backward.reverse();

    let calculator = NutritionCalculator::default();
    let first = calculator.calculate(forward.iter().map(|(k, v)| (k, v)));
    let second = calculator.calculate(backward.iter().map(|(k, v)| (k, v)));
    assert_eq!(first, second);

    let sodium = first.get("Sodium").unwrap();
    assert_eq!(sodium.unit, "mg");
    assert!((sodium.amount - 620.0).abs() < 1e-9);

    // Running it again gives the same answer
    assert_eq!(first, calculator.calculate(forward.iter().map(|(k, v)| (k, v))));
}

#[test]
fn unusable_products_are_left_out() {
    let mut selection: HashMap<String, SelectedProduct> = HashMap::new();
    selection.insert(
        "garlic".to_string(),
        SelectedProduct::new(catalog_product("Garlic", &[], "1 clove", vec![per_serving("Energy", 4.0, "kcal")]))
            .with_amount(Quantity::Number(2.0), "clove"),
    );
    selection.insert(
        "salt".to_string(),
        SelectedProduct::new(catalog_product("Salt", &[], "a pinch", vec![per_serving("Sodium", 0.4, "g")])),
    );
    selection.insert(
        "butter".to_string(),
        SelectedProduct::new(Product {
            name: "Butter".to_string(),
            nutrients: vec![NutrientEntry::new("Fat", 81.0, "g", NutrientBasis::Per100g)],
            ..Default::default()
        }),
    );

    let totals = calculate_nutrition(&selection);
    assert_eq!(totals.len(), 1);
    // no serving size, so the 100g default applies
    assert_eq!(totals.get("Fat").unwrap().amount, 81.0);
}

#[test]
fn conversion_and_serving_parsing() {
    assert!((convert_to_grams(1.0, "cup").unwrap() - 236.588).abs() < 1e-6);
    assert!((convert_to_grams(2.0, "kg").unwrap() - 2000.0).abs() < 1e-9);
    assert!(matches!(convert_to_grams(1.0, "handful"), Err(ConversionError::UnknownUnit(_))));
    assert!(matches!(convert_to_grams(3.0, "slices"), Err(ConversionError::UnitMismatch { .. })));

    let serving = parse_serving_size("30g").unwrap();
    assert_eq!(serving.quantity, 30.0);
    assert_eq!(serving.unit, "g");
    assert!(parse_serving_size("a pinch").is_none());
}

#[test]
fn custom_keyword_table() {
    let keywords = AllergenKeywords::empty().with_allergen("mustard", ["mustard", "dijon"]);
    let matcher = AllergenMatcher::new(keywords);

    let mut products = BTreeMap::new();
    products.insert(
        "dressing".to_string(),
        Product {
            name: "Dijon vinaigrette".to_string(),
            ..Default::default()
        },
    );

    assert_eq!(
        matcher.check(&products, &["mustard"]),
        BTreeSet::from(["mustard".to_string()])
    );
    assert!(matcher.check(&products, &["milk"]).is_empty());
}
