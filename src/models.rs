#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub is_income: bool,
    pub description: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub code: String,
    pub inferred_category: bool,
    pub import_id: Option<i64>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub category: String,
    pub amount: f64,
    pub start_date: String,
}

/// Intermediate representation from the CSV parser before inference and
/// DB insert. Text fields are already trimmed and title-cased; an empty
/// string means the column was absent.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub code: String,
}

/// A previously categorized transaction used as a match candidate.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub description: String,
    pub code: String,
    pub category: String,
}

/// Per-row output of category inference, parallel to the input batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub category: String,
    pub was_inferred: bool,
}
