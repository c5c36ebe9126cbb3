pub mod cli;
pub mod coordinate;
pub mod export;
pub mod ledger;
pub mod recipe_book;
pub mod supply_list;
