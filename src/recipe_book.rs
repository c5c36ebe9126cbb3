use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// One ingredient line of a recipe: quantity is per portion (per person).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub ingredient: String,
    #[serde(rename = "um")]
    pub unit: String,
    #[serde(rename = "cantitate")]
    pub quantity_per_portion: f64,
}

impl RecipeEntry {
    pub fn new(
        ingredient: impl Into<String>,
        unit: impl Into<String>,
        quantity_per_portion: f64,
    ) -> Result<Self> {
        if !quantity_per_portion.is_finite() || quantity_per_portion < 0.0 {
            bail!(
                "quantity per portion must be a non-negative number, got {}",
                quantity_per_portion
            );
        }
        Ok(RecipeEntry {
            ingredient: ingredient.into(),
            unit: unit.into(),
            quantity_per_portion,
        })
    }
}

/// A dish ("aliment") and its ingredient list, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub name: String,
    pub entries: Vec<RecipeEntry>,
}

/// The recipe book ("rețetar"): dish name -> ingredient list.
///
/// Persisted as a JSON object mapping dish name to a list of
/// `{ingredient, um, cantitate}` objects, rewritten wholesale on save.
#[derive(Debug, Default)]
pub struct RecipeBook {
    dishes: BTreeMap<String, Dish>,
}

impl RecipeBook {
    pub fn new() -> Self {
        RecipeBook::default()
    }

    pub fn get_dish(&self, name: &str) -> Option<&Dish> {
        self.dishes.get(name)
    }

    /// All dishes, sorted by name.
    pub fn list_dishes(&self) -> impl Iterator<Item = &Dish> {
        self.dishes.values()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn add_dish(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            bail!("dish name must not be empty");
        }
        if self.dishes.contains_key(&name) {
            bail!("dish '{}' already exists", name);
        }
        self.dishes.insert(
            name.clone(),
            Dish {
                name,
                entries: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn remove_dish(&mut self, name: &str) -> Result<()> {
        if self.dishes.remove(name).is_none() {
            bail!("dish '{}' not found", name);
        }
        Ok(())
    }

    /// Appends an ingredient entry, creating the dish if it does not exist yet.
    pub fn add_entry(&mut self, dish: impl Into<String>, entry: RecipeEntry) -> Result<()> {
        let dish = dish.into();
        if dish.trim().is_empty() {
            bail!("dish name must not be empty");
        }
        self.dishes
            .entry(dish.clone())
            .or_insert_with(|| Dish {
                name: dish,
                entries: Vec::new(),
            })
            .entries
            .push(entry);
        Ok(())
    }

    pub fn update_entry(&mut self, dish: &str, index: usize, entry: RecipeEntry) -> Result<()> {
        let dish = self
            .dishes
            .get_mut(dish)
            .with_context(|| format!("dish '{}' not found", dish))?;
        if index >= dish.entries.len() {
            bail!(
                "ingredient index {} out of range for '{}' ({} entries)",
                index,
                dish.name,
                dish.entries.len()
            );
        }
        dish.entries[index] = entry;
        Ok(())
    }

    /// Removes one ingredient entry. Removing the last entry removes the
    /// dish itself.
    pub fn remove_entry(&mut self, dish: &str, index: usize) -> Result<()> {
        let entry_count = {
            let dish = self
                .dishes
                .get_mut(dish)
                .with_context(|| format!("dish '{}' not found", dish))?;
            if index >= dish.entries.len() {
                bail!(
                    "ingredient index {} out of range for '{}' ({} entries)",
                    index,
                    dish.name,
                    dish.entries.len()
                );
            }
            dish.entries.remove(index);
            dish.entries.len()
        };
        if entry_count == 0 {
            self.dishes.remove(dish);
        }
        Ok(())
    }

    /// Loads the book from `path`. A missing or malformed file yields an
    /// empty book; only I/O failures on an existing file are errors.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(RecipeBook::new());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe book file {:?}", path))?;
        let parsed: BTreeMap<String, Vec<RecipeEntry>> = match serde_json::from_str(&contents) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    "recipe book file {:?} is malformed ({}), starting with an empty book",
                    path, e
                );
                return Ok(RecipeBook::new());
            }
        };
        let dishes = parsed
            .into_iter()
            .map(|(name, entries)| {
                let dish = Dish {
                    name: name.clone(),
                    entries,
                };
                (name, dish)
            })
            .collect();
        Ok(RecipeBook { dishes })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data directory {:?}", parent))?;
        }
        let serializable: BTreeMap<&String, &Vec<RecipeEntry>> = self
            .dishes
            .iter()
            .map(|(name, dish)| (name, &dish.entries))
            .collect();
        let contents = serde_json::to_string_pretty(&serializable)?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write recipe book file {:?}", path))?;
        Ok(())
    }
}
