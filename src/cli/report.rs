use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::reports::{budget_summary, spend_by_category};
use crate::settings::get_data_dir;

pub fn spend(month: Option<&str>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let items = spend_by_category(&conn, month)?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Spent"]);
    let mut total = 0.0;
    for item in &items {
        table.add_row(vec![Cell::new(&item.category), Cell::new(money(item.total))]);
        total += item.total;
    }
    let period = month.map(str::to_string).unwrap_or_else(|| "this year".to_string());
    println!("Spend by category ({period})\n{table}");
    println!("Total: {}", money(total));
    Ok(())
}

pub fn budget(month: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let items = budget_summary(&conn, month)?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Budget", "Actual", "Remaining"]);
    for item in &items {
        let remaining = if item.remaining < 0.0 {
            format!("{}", money(item.remaining).red())
        } else {
            money(item.remaining)
        };
        table.add_row(vec![
            Cell::new(&item.category),
            Cell::new(money(item.budget)),
            Cell::new(money(item.actual)),
            Cell::new(remaining),
        ]);
    }
    println!("Budget report ({month})\n{table}");
    Ok(())
}
