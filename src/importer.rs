use std::path::Path;

use chrono::NaiveDate;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::classifier::Classifier;
use crate::db::{ensure_categories, insert_transaction, known_categories};
use crate::error::{PennyError, Result};
use crate::inference::infer_categories;
use crate::models::{ParsedRow, Transaction};

const EXPECTED_COLUMNS: &[&str] = &["Date", "Description", "Amount", "Category", "Code"];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    let value = if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        -inner.trim().parse::<f64>().unwrap_or(0.0)
    } else {
        s.parse().unwrap_or(0.0)
    };
    (value * 100.0).round() / 100.0
}

/// Trim and title-case free text so history matching sees a consistent
/// form regardless of how the bank capitalizes things.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn validate_date(raw: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| PennyError::InvalidDate(raw.to_string()))?;
    if date > chrono::Local::now().date_naive() {
        return Err(PennyError::InvalidDate(format!("{raw} is in the future")));
    }
    Ok(date.format("%Y-%m-%d").to_string())
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn is_duplicate_row(conn: &Connection, row: &ParsedRow) -> Result<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM transactions WHERE date = ?1 AND description = ?2 AND amount = ?3 AND code = ?4",
    )?;
    Ok(stmt.exists(rusqlite::params![row.date, row.description, row.amount, row.code])?)
}

// ---------------------------------------------------------------------------
// Statement parsing
// ---------------------------------------------------------------------------

/// Parse a bank statement CSV with Date, Description, Amount, Category and
/// Code columns. Text fields come out trimmed and title-cased; an empty
/// string means the cell was blank.
pub fn parse_statement(file_path: &Path) -> Result<Vec<ParsedRow>> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let headers = rdr.headers()?.clone();
    let mut indexes = Vec::with_capacity(EXPECTED_COLUMNS.len());
    for expected in EXPECTED_COLUMNS {
        let idx = headers
            .iter()
            .position(|h| h.trim() == *expected)
            .ok_or_else(|| PennyError::InvalidColumns(EXPECTED_COLUMNS.join(", ")))?;
        indexes.push(idx);
    }
    let (idx_date, idx_desc, idx_amount, idx_category, idx_code) =
        (indexes[0], indexes[1], indexes[2], indexes[3], indexes[4]);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        rows.push(ParsedRow {
            date: validate_date(&field(idx_date))?,
            description: title_case(&field(idx_desc)),
            amount: parse_amount(&field(idx_amount)),
            category: title_case(&field(idx_category)),
            code: title_case(&field(idx_code)),
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

pub struct ImportResult {
    pub imported: usize,
    pub inferred: usize,
    pub skipped: usize,
    pub duplicate_file: bool,
}

pub fn import_file(
    conn: &Connection,
    file_path: &Path,
    classifier: &dyn Classifier,
    min_score: u32,
) -> Result<ImportResult> {
    let checksum = compute_checksum(file_path)?;
    {
        let mut stmt = conn.prepare("SELECT 1 FROM imports WHERE checksum = ?1")?;
        if stmt.exists([&checksum])? {
            return Ok(ImportResult {
                imported: 0,
                inferred: 0,
                skipped: 0,
                duplicate_file: true,
            });
        }
    }

    let parsed_rows = parse_statement(file_path)?;

    // Categories supplied explicitly in the file are taken at face value;
    // register them before inference so those rows pass through untouched.
    ensure_categories(
        conn,
        parsed_rows
            .iter()
            .map(|r| r.category.as_str())
            .filter(|c| !c.is_empty()),
    )?;

    let categories = known_categories(conn)?;
    let inferences = infer_categories(&parsed_rows, &categories, conn, classifier, min_score)?;

    let dates: Vec<&str> = parsed_rows.iter().map(|r| r.date.as_str()).collect();
    conn.execute(
        "INSERT INTO imports (filename, record_count, date_range_start, date_range_end, checksum) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            file_path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
            parsed_rows.len() as i64,
            dates.iter().min().copied(),
            dates.iter().max().copied(),
            checksum,
        ],
    )?;
    let import_id = conn.last_insert_rowid();

    let mut imported = 0usize;
    let mut inferred = 0usize;
    let mut skipped = 0usize;
    for (row, inference) in parsed_rows.iter().zip(&inferences) {
        if is_duplicate_row(conn, row)? {
            skipped += 1;
            continue;
        }
        insert_transaction(
            conn,
            &Transaction {
                id: None,
                date: row.date.clone(),
                description: row.description.clone(),
                amount: row.amount,
                category: inference.category.clone(),
                code: row.code.clone(),
                inferred_category: inference.was_inferred,
                import_id: Some(import_id),
            },
        )?;
        imported += 1;
        if inference.was_inferred {
            inferred += 1;
        }
    }

    Ok(ImportResult {
        imported,
        inferred,
        skipped,
        duplicate_file: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FixedClassifier;
    use crate::db::{get_connection, init_db};
    use crate::fuzzy::DEFAULT_MIN_SCORE;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn write_csv(
        dir: &Path,
        name: &str,
        rows: &[(&str, &str, &str, &str, &str)],
    ) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut content = String::from("Date,Description,Amount,Category,Code\n");
        for (date, desc, amount, category, code) in rows {
            content.push_str(&format!("{date},{desc},{amount},{category},{code}\n"));
        }
        std::fs::write(&path, &content).unwrap();
        path
    }

    fn run_import(conn: &Connection, path: &Path) -> ImportResult {
        let classifier = FixedClassifier::new("Other");
        import_file(conn, path, &classifier, DEFAULT_MIN_SCORE).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), 1234.56);
        assert_eq!(parse_amount("$50.00"), 50.0);
        assert_eq!(parse_amount("(25.00)"), -25.0);
        assert_eq!(parse_amount("10.005"), 10.01);
        assert_eq!(parse_amount("not_a_number"), 0.0);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("  walmart supercenter "), "Walmart Supercenter");
        assert_eq!(title_case("COFFEE SHOP"), "Coffee Shop");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_parse_statement_normalizes_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            &[("2024-01-15", "WALMART SUPERCENTER", "-50.00", "groceries", "w001")],
        );
        let rows = parse_statement(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Walmart Supercenter");
        assert_eq!(rows[0].category, "Groceries");
        assert_eq!(rows[0].code, "W001");
        assert_eq!(rows[0].amount, -50.0);
    }

    #[test]
    fn test_parse_statement_rejects_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Date,Description,Amount\n2024-01-15,X,-1.00\n").unwrap();
        let err = parse_statement(&path).unwrap_err();
        assert!(matches!(err, PennyError::InvalidColumns(_)));
    }

    #[test]
    fn test_parse_statement_rejects_future_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            &[("2099-01-01", "Time Machine", "-1.00", "", "")],
        );
        let err = parse_statement(&path).unwrap_err();
        assert!(matches!(err, PennyError::InvalidDate(_)));
    }

    #[test]
    fn test_import_keeps_explicit_categories() {
        let (dir, conn) = test_db();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            &[("2024-01-15", "Walmart", "-50.00", "Groceries", "W001")],
        );
        let result = run_import(&conn, &path);
        assert_eq!(result.imported, 1);
        assert_eq!(result.inferred, 0);
        let (category, flag): (String, bool) = conn
            .query_row(
                "SELECT category, inferred_category FROM transactions LIMIT 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(category, "Groceries");
        assert!(!flag);
    }

    #[test]
    fn test_import_registers_new_explicit_categories() {
        let (dir, conn) = test_db();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            &[("2024-01-15", "Yarn Store", "-20.00", "Hobbies", "")],
        );
        let result = run_import(&conn, &path);
        assert_eq!(result.imported, 1);
        assert_eq!(result.inferred, 0);
        let names = known_categories(&conn).unwrap();
        assert!(names.contains("Hobbies"));
    }

    #[test]
    fn test_import_infers_from_history() {
        let (dir, conn) = test_db();
        conn.execute(
            "INSERT INTO transactions (date, description, amount, category, code, inferred_category) \
             VALUES ('2024-01-01', 'Walmart', -30.0, 'Groceries', 'W001', 0)",
            [],
        )
        .unwrap();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            &[("2024-01-15", "Walmart Supercenter", "-50.00", "", "W001")],
        );
        let result = run_import(&conn, &path);
        assert_eq!(result.imported, 1);
        assert_eq!(result.inferred, 1);
        let (category, flag): (String, bool) = conn
            .query_row(
                "SELECT category, inferred_category FROM transactions WHERE date = '2024-01-15'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(category, "Groceries");
        assert!(flag);
    }

    #[test]
    fn test_import_falls_back_to_classifier_label() {
        let (dir, conn) = test_db();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            &[("2024-01-15", "Mystery Vendor", "-5.00", "", "")],
        );
        let result = run_import(&conn, &path);
        assert_eq!(result.imported, 1);
        assert_eq!(result.inferred, 1);
        let category: String = conn
            .query_row("SELECT category FROM transactions LIMIT 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(category, "Other");
    }

    #[test]
    fn test_import_detects_duplicate_file() {
        let (dir, conn) = test_db();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            &[("2024-01-15", "Walmart", "-50.00", "Groceries", "")],
        );
        let first = run_import(&conn, &path);
        assert_eq!(first.imported, 1);
        let second = run_import(&conn, &path);
        assert!(second.duplicate_file);
        assert_eq!(second.imported, 0);
    }

    #[test]
    fn test_import_skips_duplicate_rows() {
        let (dir, conn) = test_db();
        let first = write_csv(
            dir.path(),
            "stmt1.csv",
            &[
                ("2024-01-15", "Walmart", "-50.00", "Groceries", ""),
                ("2024-01-16", "Rent Payment", "-900.00", "Rent", ""),
            ],
        );
        run_import(&conn, &first);
        let second = write_csv(
            dir.path(),
            "stmt2.csv",
            &[
                ("2024-01-16", "Rent Payment", "-900.00", "Rent", ""),
                ("2024-01-17", "Walmart", "-25.00", "Groceries", ""),
            ],
        );
        let result = run_import(&conn, &second);
        assert_eq!(result.imported, 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_import_records_batch() {
        let (dir, conn) = test_db();
        let path = write_csv(
            dir.path(),
            "stmt.csv",
            &[
                ("2024-01-15", "Walmart", "-50.00", "Groceries", ""),
                ("2024-01-20", "Rent Payment", "-900.00", "Rent", ""),
            ],
        );
        run_import(&conn, &path);
        let (count, start, end): (i64, String, String) = conn
            .query_row(
                "SELECT record_count, date_range_start, date_range_end FROM imports LIMIT 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(start, "2024-01-15");
        assert_eq!(end, "2024-01-20");
    }
}
