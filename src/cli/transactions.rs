use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::{get_connection, list_transactions};
use crate::error::Result;
use crate::fmt::money;
use crate::settings::get_data_dir;

pub fn run(limit: usize) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let transactions = list_transactions(&conn, limit)?;

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount", "Category", "Code"]);
    for txn in transactions {
        // Inferred categories are dimmed so they stand out for review.
        let category = if txn.inferred_category {
            format!("{}", txn.category.dimmed())
        } else {
            txn.category.clone()
        };
        table.add_row(vec![
            Cell::new(txn.date),
            Cell::new(txn.description),
            Cell::new(money(txn.amount)),
            Cell::new(category),
            Cell::new(txn.code),
        ]);
    }
    println!("Transactions\n{table}");
    Ok(())
}
