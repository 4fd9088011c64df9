use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::inference::{HistoryReader, DEFAULT_CATEGORY};
use crate::models::{HistoryRecord, Transaction};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    name TEXT PRIMARY KEY,
    is_income INTEGER DEFAULT 0,
    description TEXT
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    date_range_start TEXT,
    date_range_end TEXT,
    checksum TEXT
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT NOT NULL,
    code TEXT NOT NULL DEFAULT '',
    inferred_category INTEGER DEFAULT 0,
    import_id INTEGER,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (category) REFERENCES categories(name),
    FOREIGN KEY (import_id) REFERENCES imports(id)
);

CREATE TABLE IF NOT EXISTS budgets (
    id INTEGER PRIMARY KEY,
    category TEXT NOT NULL,
    amount REAL NOT NULL,
    start_date TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (category) REFERENCES categories(name)
);
";

// (name, is_income, description)
const DEFAULT_CATEGORIES: &[(&str, bool, &str)] = &[
    ("Salary", true, "Wages and regular pay"),
    ("Other Income", true, "Interest, refunds, anything else coming in"),
    ("Groceries", false, "Supermarkets, food shopping"),
    ("Rent", false, "Rent or mortgage payments"),
    ("Utilities", false, "Power, water, internet, phone"),
    ("Transport", false, "Transit fares, fuel, parking"),
    ("Dining", false, "Restaurants, cafes, takeout"),
    ("Entertainment", false, "Movies, events, games"),
    ("Shopping", false, "Clothing, electronics, household goods"),
    ("Subscriptions", false, "Streaming, memberships, recurring services"),
    ("Health", false, "Pharmacy, doctor visits, fitness"),
    ("Travel", false, "Flights, hotels, holidays"),
    ("Fees & Charges", false, "Bank fees, interest charges"),
    ("Other", false, "Fallback when nothing fits"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 {
        for cat in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (name, is_income, description) VALUES (?1, ?2, ?3)",
                rusqlite::params![cat.0, cat.1, cat.2],
            )?;
        }
    }
    Ok(())
}

pub fn known_categories(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM categories")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<BTreeSet<String>, _>>()?;
    Ok(names)
}

pub fn add_category(conn: &Connection, name: &str, is_income: bool, description: Option<&str>) -> Result<()> {
    conn.execute(
        "INSERT INTO categories (name, is_income, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, is_income, description],
    )?;
    Ok(())
}

/// Register categories supplied explicitly in an import file so the rows
/// that carry them pass inference untouched.
pub fn ensure_categories<'a, I>(conn: &Connection, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for name in names {
        conn.execute(
            "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
            [name],
        )?;
    }
    Ok(())
}

pub fn insert_transaction(conn: &Connection, txn: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions (date, description, amount, category, code, inferred_category, import_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            txn.date,
            txn.description,
            txn.amount,
            txn.category,
            txn.code,
            txn.inferred_category,
            txn.import_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_transactions(conn: &Connection, limit: usize) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, description, amount, category, code, inferred_category, import_id \
         FROM transactions ORDER BY date DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(Transaction {
                id: row.get(0)?,
                date: row.get(1)?,
                description: row.get(2)?,
                amount: row.get(3)?,
                category: row.get(4)?,
                code: row.get(5)?,
                inferred_category: row.get(6)?,
                import_id: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

impl HistoryReader for Connection {
    /// Ordered by date then rowid ascending so that last-write-wins
    /// indexing keeps the most recent assignment per code/description.
    fn recent_categorized(&self, inferred: bool) -> Result<Vec<HistoryRecord>> {
        let mut stmt = self.prepare(
            "SELECT description, code, category FROM transactions \
             WHERE (code != '' OR description != '') \
             AND category != ?1 \
             AND inferred_category = ?2 \
             ORDER BY date, id",
        )?;
        let records = stmt
            .query_map(rusqlite::params![DEFAULT_CATEGORY, inferred], |row| {
                Ok(HistoryRecord {
                    description: row.get(0)?,
                    code: row.get(1)?,
                    category: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
