use std::path::Path;

use anyhow::Result;
use chrono::Local;
use log::info;

use dieta::cli::{parse_args, Command, CzaCommand, ListaArgs, RetetarCommand, SlotArgs};
use dieta::coordinate::{Coordinate, PlanDate};
use dieta::export;
use dieta::ledger::Ledger;
use dieta::recipe_book::{RecipeBook, RecipeEntry};
use dieta::supply_list::{compute_supply_list, supply_list_for_tomorrow};

const RECIPE_BOOK_FILE: &str = "retetar.json";
const LEDGER_FILE: &str = "cza.json";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = parse_args();
    let book_path = cli.data_dir.join(RECIPE_BOOK_FILE);
    let ledger_path = cli.data_dir.join(LEDGER_FILE);

    match cli.command {
        Command::Retetar(command) => run_retetar(command, &book_path),
        Command::Cza(command) => run_cza(command, &book_path, &ledger_path),
        Command::Lista(args) => run_lista(args, &book_path, &ledger_path),
    }
}

fn today() -> PlanDate {
    PlanDate::new(Local::now().date_naive())
}

fn slot_coordinate(slot: &SlotArgs) -> Coordinate {
    Coordinate::new(
        slot.site,
        slot.regimen,
        slot.meal,
        slot.date.unwrap_or_else(today),
    )
}

fn run_retetar(command: RetetarCommand, book_path: &Path) -> Result<()> {
    let mut book = RecipeBook::load(book_path)?;

    match command {
        RetetarCommand::List => {
            if book.is_empty() {
                println!("The recipe book is empty.");
                return Ok(());
            }
            for dish in book.list_dishes() {
                println!("{} ({} ingredients)", dish.name, dish.entries.len());
            }
            return Ok(());
        }
        RetetarCommand::Show { dish } => {
            let dish = book
                .get_dish(&dish)
                .ok_or_else(|| anyhow::anyhow!("dish '{}' not found", dish))?;
            println!("{}", dish.name);
            for (index, entry) in dish.entries.iter().enumerate() {
                println!(
                    "  {}. {} - {:.2} {}",
                    index, entry.ingredient, entry.quantity_per_portion, entry.unit
                );
            }
            return Ok(());
        }
        RetetarCommand::AddDish { name } => {
            book.add_dish(&name)?;
            println!("Added dish '{}'.", name);
        }
        RetetarCommand::RemoveDish { name } => {
            book.remove_dish(&name)?;
            println!("Removed dish '{}'.", name);
        }
        RetetarCommand::AddIngredient {
            dish,
            ingredient,
            unit,
            quantity,
        } => {
            book.add_entry(&dish, RecipeEntry::new(&ingredient, &unit, quantity)?)?;
            println!("Added '{}' to '{}'.", ingredient, dish);
        }
        RetetarCommand::UpdateIngredient {
            dish,
            index,
            ingredient,
            unit,
            quantity,
        } => {
            book.update_entry(&dish, index, RecipeEntry::new(&ingredient, &unit, quantity)?)?;
            println!("Updated entry {} of '{}'.", index, dish);
        }
        RetetarCommand::RemoveIngredient { dish, index } => {
            book.remove_entry(&dish, index)?;
            println!("Removed entry {} of '{}'.", index, dish);
        }
    }

    book.save(book_path)?;
    Ok(())
}

fn run_cza(command: CzaCommand, book_path: &Path, ledger_path: &Path) -> Result<()> {
    let book = RecipeBook::load(book_path)?;
    let mut ledger = Ledger::load(ledger_path)?;

    match command {
        CzaCommand::Add {
            slot,
            dish,
            persons,
        } => {
            let coordinate = slot_coordinate(&slot);
            ledger.add_record(coordinate, &dish, persons, &book)?;
            println!("Planned '{}' for {} persons at {}.", dish, persons, coordinate);
        }
        CzaCommand::Show { slot } => {
            let coordinate = slot_coordinate(&slot);
            let records = ledger.records_at(&coordinate);
            if records.is_empty() {
                println!("Nothing planned for {}.", coordinate);
                return Ok(());
            }
            println!("{}:", coordinate);
            for record in records {
                println!("  {} ({} persons)", record.dish, record.persons);
                for ingredient in &record.ingredients {
                    println!(
                        "    - {}: {:.2} {} ({:.2} per person)",
                        ingredient.ingredient, ingredient.total, ingredient.unit, ingredient.per_portion
                    );
                }
            }
            return Ok(());
        }
        CzaCommand::Remove { slot, dish } => {
            let coordinate = slot_coordinate(&slot);
            ledger.remove_record(&coordinate, &dish)?;
            println!("Removed '{}' from {}.", dish, coordinate);
        }
        CzaCommand::Clear { slot } => {
            let coordinate = slot_coordinate(&slot);
            ledger.clear(&coordinate);
            println!("Cleared {}.", coordinate);
        }
    }

    ledger.save(ledger_path)?;
    Ok(())
}

fn run_lista(args: ListaArgs, book_path: &Path, ledger_path: &Path) -> Result<()> {
    let book = RecipeBook::load(book_path)?;
    let ledger = Ledger::load(ledger_path)?;

    let list = match args.tomorrow_of {
        Some(reference) => supply_list_for_tomorrow(&reference, &ledger, &book),
        None => {
            let target = args.date.unwrap_or_else(today);
            info!("computing supply list for {}", target);
            compute_supply_list(target, &ledger, &book)
        }
    };

    if list.is_empty() {
        println!("No ledger records for the selected date.");
    } else {
        print!("{}", export::render_table(&list));
    }

    if let Some(csv_path) = args.csv {
        export::write_csv_file(&csv_path, &list)?;
        println!("Supply list written to {}.", csv_path.display());
    }

    Ok(())
}
