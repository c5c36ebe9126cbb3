use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::coordinate::{Meal, PlanDate, Regimen, Site};

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily food-quantity planner: recipe book (retetar), daily ledger (CZA) and supply lists", long_about = None)]
pub struct Cli {
    /// Directory holding retetar.json and cza.json
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the recipe book
    #[command(subcommand)]
    Retetar(RetetarCommand),
    /// Manage the daily ledger
    #[command(subcommand)]
    Cza(CzaCommand),
    /// Compute the supply list for a date
    Lista(ListaArgs),
}

#[derive(Subcommand, Debug)]
pub enum RetetarCommand {
    /// List all dishes
    List,
    /// Show a dish and its ingredient entries
    Show { dish: String },
    /// Add an empty dish
    AddDish { name: String },
    /// Remove a dish and all its entries
    RemoveDish { name: String },
    /// Add an ingredient entry (creates the dish if needed)
    AddIngredient {
        dish: String,
        ingredient: String,
        unit: String,
        quantity: f64,
    },
    /// Replace the ingredient entry at a zero-based index
    UpdateIngredient {
        dish: String,
        index: usize,
        ingredient: String,
        unit: String,
        quantity: f64,
    },
    /// Remove the ingredient entry at a zero-based index
    RemoveIngredient { dish: String, index: usize },
}

/// The planning-slot flags shared by the CZA commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct SlotArgs {
    /// Consumption site (C1..C3)
    #[arg(long)]
    pub site: Site,

    /// Dietary regimen (R1..R6)
    #[arg(long)]
    pub regimen: Regimen,

    /// Meal of the day (M1..M5)
    #[arg(long)]
    pub meal: Meal,

    /// Planning date, dd.mm.yyyy; defaults to today
    #[arg(long)]
    pub date: Option<PlanDate>,
}

#[derive(Subcommand, Debug)]
pub enum CzaCommand {
    /// Plan a dish for a slot
    Add {
        #[command(flatten)]
        slot: SlotArgs,
        dish: String,
        persons: u32,
    },
    /// Show what is planned for a slot
    Show {
        #[command(flatten)]
        slot: SlotArgs,
    },
    /// Remove one planned dish from a slot
    Remove {
        #[command(flatten)]
        slot: SlotArgs,
        dish: String,
    },
    /// Remove everything planned for a slot
    Clear {
        #[command(flatten)]
        slot: SlotArgs,
    },
}

#[derive(Args, Debug)]
pub struct ListaArgs {
    /// Target date, dd.mm.yyyy; defaults to today
    #[arg(long, conflicts_with = "tomorrow_of")]
    pub date: Option<PlanDate>,

    /// Compute for the day after this reference date (dd.mm.yyyy)
    #[arg(long)]
    pub tomorrow_of: Option<String>,

    /// Also write the list to a CSV file at this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
