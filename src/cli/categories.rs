use comfy_table::{Cell, Table};

use crate::db::{add_category, get_connection};
use crate::error::Result;
use crate::models::Category;
use crate::settings::get_data_dir;

pub fn add(name: &str, income: bool, description: Option<&str>) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    add_category(&conn, name, income, description)?;
    println!("Added category: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let mut stmt =
        conn.prepare("SELECT name, is_income, description FROM categories ORDER BY name")?;
    let categories: Vec<Category> = stmt
        .query_map([], |row| {
            Ok(Category {
                name: row.get(0)?,
                is_income: row.get(1)?,
                description: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Type", "Description"]);
    for cat in categories {
        table.add_row(vec![
            Cell::new(cat.name),
            Cell::new(if cat.is_income { "income" } else { "expense" }),
            Cell::new(cat.description.unwrap_or_default()),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
