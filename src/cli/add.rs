use chrono::NaiveDate;

use crate::db::{get_connection, insert_transaction, known_categories};
use crate::error::{PennyError, Result};
use crate::importer::title_case;
use crate::models::Transaction;
use crate::settings::get_data_dir;

pub fn run(date: &str, description: &str, amount: f64, category: &str, code: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| PennyError::InvalidDate(date.to_string()))?;

    let conn = get_connection(&get_data_dir().join("penny.db"))?;
    let categories = known_categories(&conn)?;
    if !categories.contains(category) {
        return Err(PennyError::UnknownCategory(category.to_string()));
    }

    insert_transaction(
        &conn,
        &Transaction {
            id: None,
            date: date.to_string(),
            description: title_case(description),
            amount,
            category: category.to_string(),
            code: title_case(code),
            inferred_category: false,
            import_id: None,
        },
    )?;
    println!("Added transaction: {}", title_case(description));
    Ok(())
}
