use chrono::Datelike;
use rusqlite::Connection;

use crate::error::{PennyError, Result};
use crate::models::Budget;

pub struct SpendItem {
    pub category: String,
    pub total: f64,
}

/// Total spend per expense category for a month ("YYYY-MM") or, when no
/// month is given, the current year. Totals are positive numbers.
pub fn spend_by_category(conn: &Connection, month: Option<&str>) -> Result<Vec<SpendItem>> {
    let prefix = match month {
        Some(m) => m.to_string(),
        None => format!("{}", chrono::Local::now().year()),
    };
    let mut stmt = conn.prepare(
        "SELECT t.category, ROUND(-SUM(t.amount), 2) AS total \
         FROM transactions t \
         JOIN categories c ON t.category = c.name \
         WHERE c.is_income = 0 AND t.date LIKE ?1 \
         GROUP BY t.category \
         ORDER BY total DESC",
    )?;
    let items = stmt
        .query_map([format!("{prefix}%")], |row| {
            Ok(SpendItem {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items)
}

pub struct BudgetItem {
    pub category: String,
    pub budget: f64,
    pub actual: f64,
    pub remaining: f64,
}

/// Budget versus actual per category for one month ("YYYY-MM"). The
/// effective budget for a category is the row with the latest start month
/// at or before the requested month.
pub fn budget_summary(conn: &Connection, month: &str) -> Result<Vec<BudgetItem>> {
    let mut stmt = conn.prepare(
        "SELECT b.category, b.amount FROM budgets b \
         WHERE b.start_date = ( \
             SELECT MAX(b2.start_date) FROM budgets b2 \
             WHERE b2.category = b.category AND b2.start_date <= ?1 \
         ) \
         ORDER BY b.category",
    )?;
    let budgets: Vec<(String, f64)> = stmt
        .query_map([month], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut items = Vec::with_capacity(budgets.len());
    for (category, budget) in budgets {
        let spent: f64 = conn.query_row(
            "SELECT COALESCE(-SUM(amount), 0) FROM transactions WHERE category = ?1 AND date LIKE ?2",
            rusqlite::params![category, format!("{month}%")],
            |row| row.get(0),
        )?;
        let actual = (spent * 100.0).round() / 100.0;
        items.push(BudgetItem {
            category,
            budget,
            actual,
            remaining: ((budget - actual) * 100.0).round() / 100.0,
        });
    }
    Ok(items)
}

pub fn set_budget(conn: &Connection, category: &str, amount: f64, month: &str) -> Result<()> {
    let known: bool = conn
        .prepare("SELECT 1 FROM categories WHERE name = ?1")?
        .exists([category])?;
    if !known {
        return Err(PennyError::UnknownCategory(category.to_string()));
    }
    conn.execute(
        "INSERT INTO budgets (category, amount, start_date) VALUES (?1, ?2, ?3)",
        rusqlite::params![category, amount, month],
    )?;
    Ok(())
}

pub fn list_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, category, amount, start_date FROM budgets ORDER BY start_date DESC, category",
    )?;
    let budgets = stmt
        .query_map([], |row| {
            Ok(Budget {
                id: row.get(0)?,
                category: row.get(1)?,
                amount: row.get(2)?,
                start_date: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(budgets)
}
