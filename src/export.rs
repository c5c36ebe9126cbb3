use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::supply_list::IngredientTotal;

const HEADERS: [&str; 3] = ["Ingredient", "Unitate masura", "Cantitate totala"];

/// Writes the supply list as UTF-8, comma-delimited CSV with a header row.
/// Quantities are rounded to 2 decimal places here and only here.
pub fn write_csv<W: Write>(writer: W, totals: &[IngredientTotal]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;
    for total in totals {
        csv_writer.write_record([
            total.ingredient.as_str(),
            total.unit.as_str(),
            &format!("{:.2}", total.quantity),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, totals: &[IngredientTotal]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create CSV file {:?}", path))?;
    write_csv(file, totals).with_context(|| format!("failed to write CSV file {:?}", path))
}

/// Renders the supply list as an aligned text table for the terminal.
pub fn render_table(totals: &[IngredientTotal]) -> String {
    let mut ingredient_width = HEADERS[0].len();
    let mut unit_width = HEADERS[1].len();
    for total in totals {
        ingredient_width = ingredient_width.max(total.ingredient.chars().count());
        unit_width = unit_width.max(total.unit.chars().count());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<iw$}  {:<uw$}  {}\n",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        iw = ingredient_width,
        uw = unit_width,
    ));
    out.push_str(&"-".repeat(ingredient_width + unit_width + HEADERS[2].len() + 4));
    out.push('\n');
    for total in totals {
        out.push_str(&format!(
            "{:<iw$}  {:<uw$}  {:.2}\n",
            total.ingredient,
            total.unit,
            total.quantity,
            iw = ingredient_width,
            uw = unit_width,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_totals() -> Vec<IngredientTotal> {
        vec![
            IngredientTotal {
                ingredient: "Carrot".into(),
                unit: "kg".into(),
                quantity: 1.0,
            },
            IngredientTotal {
                ingredient: "Potato".into(),
                unit: "kg".into(),
                quantity: 2.0,
            },
        ]
    }

    #[test]
    fn test_write_csv_exact_output() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample_totals()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Ingredient,Unitate masura,Cantitate totala\n\
             Carrot,kg,1.00\n\
             Potato,kg,2.00\n"
        );
    }

    #[test]
    fn test_write_csv_quotes_commas_in_names() {
        let totals = vec![IngredientTotal {
            ingredient: "Pepper, red".into(),
            unit: "kg".into(),
            quantity: 0.5,
        }];
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &totals).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"Pepper, red\",kg,0.50"));
    }

    #[test]
    fn test_write_csv_empty_list_is_header_only() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "Ingredient,Unitate masura,Cantitate totala\n");
    }

    #[test]
    fn test_render_table_aligns_and_rounds() {
        let table = render_table(&sample_totals());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Ingredient"));
        assert!(lines[2].contains("Carrot"));
        assert!(lines[2].ends_with("1.00"));
        assert!(lines[3].ends_with("2.00"));
    }
}
