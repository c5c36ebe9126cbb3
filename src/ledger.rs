use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, PlanDate};
use crate::recipe_book::RecipeBook;

/// An ingredient requirement resolved from the recipe book when the record
/// was inserted: per-portion quantity and the total for the person count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIngredient {
    pub ingredient: String,
    #[serde(rename = "um")]
    pub unit: String,
    #[serde(rename = "cantitate_per_persoana")]
    pub per_portion: f64,
    #[serde(rename = "cantitate_totala")]
    pub total: f64,
}

/// One planned dish for a coordinate: who many persons eat it, and the
/// ingredient breakdown captured at insertion time.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub dish: String,
    pub persons: u32,
    pub ingredients: Vec<ResolvedIngredient>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    nr_persoane: u32,
    ingrediente: Vec<ResolvedIngredient>,
}

/// The daily ledger ("CZA"): planned dishes keyed by planning coordinate.
///
/// Persisted as a JSON object keyed by the coordinate storage key; each
/// value maps dish name to `{nr_persoane, ingrediente}`.
#[derive(Debug, Default)]
pub struct Ledger {
    records: BTreeMap<Coordinate, Vec<LedgerRecord>>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds a dish for a coordinate, resolving its ingredient breakdown from
    /// the recipe book. A dish unknown to the book is inserted with an empty
    /// breakdown so the planning slot is still visible.
    pub fn add_record(
        &mut self,
        coordinate: Coordinate,
        dish: impl Into<String>,
        persons: u32,
        book: &RecipeBook,
    ) -> Result<()> {
        let dish = dish.into();
        if dish.trim().is_empty() {
            bail!("dish name must not be empty");
        }
        if persons == 0 {
            bail!("person count must be at least 1");
        }
        let slot = self.records.entry(coordinate).or_default();
        if slot.iter().any(|r| r.dish == dish) {
            bail!("dish '{}' is already planned for {}", dish, coordinate);
        }

        let ingredients = match book.get_dish(&dish) {
            Some(recipe) => recipe
                .entries
                .iter()
                .map(|entry| ResolvedIngredient {
                    ingredient: entry.ingredient.clone(),
                    unit: entry.unit.clone(),
                    per_portion: entry.quantity_per_portion,
                    total: entry.quantity_per_portion * persons as f64,
                })
                .collect(),
            None => {
                warn!("dish '{}' has no recipe, recording it without a breakdown", dish);
                Vec::new()
            }
        };

        slot.push(LedgerRecord {
            dish,
            persons,
            ingredients,
        });
        Ok(())
    }

    pub fn records_at(&self, coordinate: &Coordinate) -> &[LedgerRecord] {
        self.records
            .get(coordinate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All records planned for a date, across every site, regimen and meal.
    pub fn records_for_date(&self, date: PlanDate) -> Vec<(&Coordinate, &LedgerRecord)> {
        self.records
            .iter()
            .filter(|(coordinate, _)| coordinate.date == date)
            .flat_map(|(coordinate, records)| records.iter().map(move |r| (coordinate, r)))
            .collect()
    }

    pub fn remove_record(&mut self, coordinate: &Coordinate, dish: &str) -> Result<()> {
        let slot = self
            .records
            .get_mut(coordinate)
            .with_context(|| format!("nothing planned for {}", coordinate))?;
        let index = slot
            .iter()
            .position(|r| r.dish == dish)
            .with_context(|| format!("dish '{}' is not planned for {}", dish, coordinate))?;
        slot.remove(index);
        if slot.is_empty() {
            self.records.remove(coordinate);
        }
        Ok(())
    }

    /// Drops every record for a coordinate.
    pub fn clear(&mut self, coordinate: &Coordinate) {
        self.records.remove(coordinate);
    }

    /// Loads the ledger from `path`. A missing or malformed file yields an
    /// empty ledger; keys that fail to parse as coordinates are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Ledger::new());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read ledger file {:?}", path))?;
        let parsed: BTreeMap<String, BTreeMap<String, StoredRecord>> =
            match serde_json::from_str(&contents) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(
                        "ledger file {:?} is malformed ({}), starting with an empty ledger",
                        path, e
                    );
                    return Ok(Ledger::new());
                }
            };

        let mut records: BTreeMap<Coordinate, Vec<LedgerRecord>> = BTreeMap::new();
        for (key, dishes) in parsed {
            let coordinate = match Coordinate::parse_key(&key) {
                Ok(coordinate) => coordinate,
                Err(e) => {
                    warn!("skipping ledger entry with invalid key '{}': {}", key, e);
                    continue;
                }
            };
            let slot = records.entry(coordinate).or_default();
            for (dish, stored) in dishes {
                slot.push(LedgerRecord {
                    dish,
                    persons: stored.nr_persoane,
                    ingredients: stored.ingrediente,
                });
            }
        }
        Ok(Ledger { records })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data directory {:?}", parent))?;
        }
        let mut serializable: BTreeMap<String, BTreeMap<&str, StoredRecord>> = BTreeMap::new();
        for (coordinate, records) in &self.records {
            let slot = serializable.entry(coordinate.storage_key()).or_default();
            for record in records {
                slot.insert(
                    record.dish.as_str(),
                    StoredRecord {
                        nr_persoane: record.persons,
                        ingrediente: record.ingredients.clone(),
                    },
                );
            }
        }
        let contents = serde_json::to_string_pretty(&serializable)?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write ledger file {:?}", path))?;
        Ok(())
    }
}
