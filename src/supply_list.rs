use std::collections::HashMap;

use log::warn;

use crate::coordinate::PlanDate;
use crate::ledger::Ledger;
use crate::recipe_book::RecipeBook;

/// A procurement total for one (ingredient, unit) pair on a target date.
/// Derived on demand, never stored. The same ingredient under two units is
/// tracked as two totals; quantities are never unit-converted.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientTotal {
    pub ingredient: String,
    pub unit: String,
    pub quantity: f64,
}

/// Computes the shopping list for a target date.
///
/// Joins every ledger record on the date against the recipe book,
/// multiplies per-portion quantities by the person count and sums per
/// (ingredient, unit). A dish with no recipe, or an empty one, contributes
/// nothing. Results are sorted by ingredient name, then unit. Quantities
/// are plain f64 sums; rounding happens only at display and export time.
pub fn compute_supply_list(
    target: PlanDate,
    ledger: &Ledger,
    book: &RecipeBook,
) -> Vec<IngredientTotal> {
    let mut totals: HashMap<(String, String), f64> = HashMap::new();

    for (_, record) in ledger.records_for_date(target) {
        let recipe = match book.get_dish(&record.dish) {
            Some(recipe) => recipe,
            None => {
                warn!(
                    "dish '{}' is planned for {} but has no recipe, skipping it",
                    record.dish, target
                );
                continue;
            }
        };
        for entry in &recipe.entries {
            let key = (entry.ingredient.clone(), entry.unit.clone());
            *totals.entry(key).or_insert(0.0) +=
                entry.quantity_per_portion * record.persons as f64;
        }
    }

    let mut list: Vec<IngredientTotal> = totals
        .into_iter()
        .map(|((ingredient, unit), quantity)| IngredientTotal {
            ingredient,
            unit,
            quantity,
        })
        .collect();
    list.sort_by(|a, b| {
        a.ingredient
            .cmp(&b.ingredient)
            .then_with(|| a.unit.cmp(&b.unit))
    });
    list
}

/// Shopping list for the day after `reference` (given as `dd.mm.yyyy`).
/// An unparseable or invalid reference yields an empty list, never an error.
pub fn supply_list_for_tomorrow(
    reference: &str,
    ledger: &Ledger,
    book: &RecipeBook,
) -> Vec<IngredientTotal> {
    match reference.parse::<PlanDate>().ok().and_then(PlanDate::next_day) {
        Some(tomorrow) => compute_supply_list(tomorrow, ledger, book),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::{Coordinate, Meal, Regimen, Site};
    use crate::recipe_book::RecipeEntry;

    fn soup_book() -> RecipeBook {
        let mut book = RecipeBook::new();
        book.add_entry("Soup", RecipeEntry::new("Potato", "kg", 0.2).unwrap())
            .unwrap();
        book.add_entry("Soup", RecipeEntry::new("Carrot", "kg", 0.1).unwrap())
            .unwrap();
        book
    }

    fn coordinate(site: Site, meal: Meal, date: &str) -> Coordinate {
        Coordinate::new(site, Regimen::R1, meal, date.parse().unwrap())
    }

    fn target() -> PlanDate {
        "05.06.2025".parse().unwrap()
    }

    #[test]
    fn test_single_record_scales_by_persons() {
        let book = soup_book();
        let mut ledger = Ledger::new();
        ledger
            .add_record(coordinate(Site::C1, Meal::M1, "05.06.2025"), "Soup", 4, &book)
            .unwrap();

        let list = compute_supply_list(target(), &ledger, &book);
        assert_eq!(
            list,
            vec![
                IngredientTotal {
                    ingredient: "Carrot".into(),
                    unit: "kg".into(),
                    quantity: 0.4,
                },
                IngredientTotal {
                    ingredient: "Potato".into(),
                    unit: "kg".into(),
                    quantity: 0.8,
                },
            ]
        );
    }

    #[test]
    fn test_totals_merge_across_records() {
        let book = soup_book();
        let mut ledger = Ledger::new();
        ledger
            .add_record(coordinate(Site::C1, Meal::M1, "05.06.2025"), "Soup", 4, &book)
            .unwrap();
        ledger
            .add_record(coordinate(Site::C2, Meal::M2, "05.06.2025"), "Soup", 6, &book)
            .unwrap();

        let list = compute_supply_list(target(), &ledger, &book);
        let potato = list.iter().find(|t| t.ingredient == "Potato").unwrap();
        let carrot = list.iter().find(|t| t.ingredient == "Carrot").unwrap();
        assert!((potato.quantity - 2.0).abs() < 1e-9);
        assert!((carrot.quantity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_duplicate_ingredient_unit_pairs() {
        let mut book = soup_book();
        book.add_entry("Stew", RecipeEntry::new("Potato", "kg", 0.3).unwrap())
            .unwrap();
        book.add_entry("Stew", RecipeEntry::new("Potato", "g", 50.0).unwrap())
            .unwrap();
        let mut ledger = Ledger::new();
        ledger
            .add_record(coordinate(Site::C1, Meal::M1, "05.06.2025"), "Soup", 2, &book)
            .unwrap();
        ledger
            .add_record(coordinate(Site::C1, Meal::M2, "05.06.2025"), "Stew", 2, &book)
            .unwrap();

        let list = compute_supply_list(target(), &ledger, &book);
        let mut keys: Vec<(&str, &str)> = list
            .iter()
            .map(|t| (t.ingredient.as_str(), t.unit.as_str()))
            .collect();
        keys.dedup();
        assert_eq!(keys.len(), list.len());

        // same ingredient, different unit stays separate
        assert!(list.iter().any(|t| t.ingredient == "Potato" && t.unit == "kg"));
        assert!(list.iter().any(|t| t.ingredient == "Potato" && t.unit == "g"));
    }

    #[test]
    fn test_empty_date_yields_empty_list() {
        let book = soup_book();
        let mut ledger = Ledger::new();
        ledger
            .add_record(coordinate(Site::C1, Meal::M1, "05.06.2025"), "Soup", 4, &book)
            .unwrap();

        let list = compute_supply_list("06.06.2025".parse().unwrap(), &ledger, &book);
        assert!(list.is_empty());
    }

    #[test]
    fn test_missing_recipe_is_skipped_silently() {
        let book = soup_book();
        let mut ledger = Ledger::new();
        ledger
            .add_record(coordinate(Site::C1, Meal::M1, "05.06.2025"), "Soup", 4, &book)
            .unwrap();
        ledger
            .add_record(coordinate(Site::C1, Meal::M2, "05.06.2025"), "Stew", 10, &book)
            .unwrap();

        let list = compute_supply_list(target(), &ledger, &book);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|t| t.ingredient != "Stew"));
    }

    #[test]
    fn test_recipe_removed_after_planning_contributes_nothing() {
        let mut book = soup_book();
        let mut ledger = Ledger::new();
        ledger
            .add_record(coordinate(Site::C1, Meal::M1, "05.06.2025"), "Soup", 4, &book)
            .unwrap();
        book.remove_dish("Soup").unwrap();

        // the engine resolves against the current book, not the snapshot
        let list = compute_supply_list(target(), &ledger, &book);
        assert!(list.is_empty());
    }

    #[test]
    fn test_tomorrow_crosses_month_boundary() {
        let book = soup_book();
        let mut ledger = Ledger::new();
        ledger
            .add_record(coordinate(Site::C1, Meal::M1, "01.02.2025"), "Soup", 5, &book)
            .unwrap();

        let list = supply_list_for_tomorrow("31.01.2025", &ledger, &book);
        assert_eq!(list.len(), 2);
        let potato = list.iter().find(|t| t.ingredient == "Potato").unwrap();
        assert!((potato.quantity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tomorrow_crosses_year_boundary() {
        let book = soup_book();
        let mut ledger = Ledger::new();
        ledger
            .add_record(coordinate(Site::C1, Meal::M1, "01.01.2026"), "Soup", 5, &book)
            .unwrap();

        let list = supply_list_for_tomorrow("31.12.2025", &ledger, &book);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_invalid_reference_date_yields_empty_list() {
        let book = soup_book();
        let ledger = Ledger::new();
        assert!(supply_list_for_tomorrow("31.02.2025", &ledger, &book).is_empty());
        assert!(supply_list_for_tomorrow("garbage", &ledger, &book).is_empty());
        assert!(supply_list_for_tomorrow("", &ledger, &book).is_empty());
    }

    #[test]
    fn test_conservation_of_quantities() {
        let book = soup_book();
        let mut ledger = Ledger::new();
        let persons = [4_u32, 6, 11];
        for (i, &p) in persons.iter().enumerate() {
            let meal = [Meal::M1, Meal::M2, Meal::M3][i];
            ledger
                .add_record(coordinate(Site::C1, meal, "05.06.2025"), "Soup", p, &book)
                .unwrap();
        }

        let expected: f64 = persons.iter().map(|&p| (0.2 + 0.1) * p as f64).sum();
        let list = compute_supply_list(target(), &ledger, &book);
        let emitted: f64 = list.iter().map(|t| t.quantity).sum();
        assert!((emitted - expected).abs() < 1e-9);
    }
}
