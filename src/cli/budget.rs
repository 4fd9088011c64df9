use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::reports::{list_budgets, set_budget};
use crate::settings::get_data_dir;

pub fn set(category: &str, amount: f64, month: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    set_budget(&conn, category, amount, month)?;
    println!("Budget for {category} set to {} from {month}", money(amount));
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let budgets = list_budgets(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "From"]);
    for budget in budgets {
        table.add_row(vec![
            Cell::new(budget.category),
            Cell::new(money(budget.amount)),
            Cell::new(budget.start_date),
        ]);
    }
    println!("Budgets\n{table}");
    Ok(())
}
