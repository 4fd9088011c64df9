use std::collections::{BTreeMap, BTreeSet};

use crate::classifier::Classifier;
use crate::error::{PennyError, Result};
use crate::fuzzy::{fuzzy_search, token_set_ratio, token_sort_ratio};
use crate::models::{HistoryRecord, Inference, ParsedRow};

/// Sentinel assigned when nothing else can be determined. Always present
/// among the seeded categories and never used to seed history matching.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Read access to previously categorized transactions. The store behind
/// this is expected to return a consistent snapshot as of the call.
pub trait HistoryReader {
    /// Transactions with a non-empty code or description and a category
    /// other than "Other", oldest first. `inferred` selects rows whose
    /// category was itself inferred on an earlier run rather than
    /// supplied directly; those are weaker evidence and consulted second.
    fn recent_categorized(&self, inferred: bool) -> Result<Vec<HistoryRecord>>;
}

/// code -> category and description -> category lookups for one tier of
/// history. Insertion is last-write-wins, so with the reader's
/// oldest-first ordering the most recent assignment is the one kept.
#[derive(Debug, Default)]
struct HistoryIndex {
    codes: BTreeMap<String, String>,
    descriptions: BTreeMap<String, String>,
}

impl HistoryIndex {
    fn from_records(records: Vec<HistoryRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            if !record.code.is_empty() {
                index.codes.insert(record.code, record.category.clone());
            }
            if !record.description.is_empty() {
                index.descriptions.insert(record.description, record.category);
            }
        }
        index
    }

    fn record(&mut self, row: &ParsedRow, category: &str) {
        if !row.code.is_empty() {
            self.codes.insert(row.code.clone(), category.to_string());
        }
        if !row.description.is_empty() {
            self.descriptions
                .insert(row.description.clone(), category.to_string());
        }
    }
}

fn match_code(code: &str, tiers: &[&HistoryIndex], min_score: u32) -> Option<String> {
    for tier in tiers {
        let keys = tier.codes.keys().map(String::as_str);
        if let Some(key) = fuzzy_search(code, keys, token_set_ratio, min_score) {
            return tier.codes.get(key).cloned();
        }
    }
    None
}

fn match_description(description: &str, tiers: &[&HistoryIndex], min_score: u32) -> Option<String> {
    for tier in tiers {
        let keys = tier.descriptions.keys().map(String::as_str);
        if let Some(key) = fuzzy_search(description, keys, token_sort_ratio, min_score) {
            return tier.descriptions.get(key).cloned();
        }
    }
    None
}

fn infer_row(
    row: &ParsedRow,
    known_categories: &BTreeSet<String>,
    labels: &[String],
    tiers: &[&HistoryIndex],
    classifier: &dyn Classifier,
    min_score: u32,
) -> Result<Inference> {
    // An explicit category needs no inference.
    if known_categories.contains(&row.category) {
        return Ok(Inference {
            category: row.category.clone(),
            was_inferred: false,
        });
    }

    // No code and no description means no signal at all.
    if row.code.is_empty() && row.description.is_empty() {
        return Ok(Inference {
            category: DEFAULT_CATEGORY.to_string(),
            was_inferred: true,
        });
    }

    // Codes are a stronger identity signal than free text, so they are
    // tried first across all history tiers.
    if !row.code.is_empty() {
        if let Some(category) = match_code(&row.code, tiers, min_score) {
            return Ok(Inference {
                category,
                was_inferred: true,
            });
        }
    }

    if row.description.is_empty() {
        // Code present but nothing matched it, and there is no text to
        // classify.
        return Ok(Inference {
            category: DEFAULT_CATEGORY.to_string(),
            was_inferred: true,
        });
    }

    if let Some(category) = match_description(&row.description, tiers, min_score) {
        return Ok(Inference {
            category,
            was_inferred: true,
        });
    }

    let label = classifier.predict(&row.description, labels)?;
    if !known_categories.contains(&label) {
        return Err(PennyError::InvalidLabel(label));
    }
    Ok(Inference {
        category: label,
        was_inferred: true,
    })
}

/// Assign a category to every row of an imported batch.
///
/// Priority per row: explicit category, fuzzy code match, fuzzy
/// description match, classifier, "Other". Code and description matching
/// each consult three tiers in order: non-inferred history, inferred
/// history, then inferences made earlier in this same batch. State is
/// scoped to the call; nothing is cached across calls.
pub fn infer_categories(
    batch: &[ParsedRow],
    known_categories: &BTreeSet<String>,
    history: &dyn HistoryReader,
    classifier: &dyn Classifier,
    min_score: u32,
) -> Result<Vec<Inference>> {
    let non_inferred = HistoryIndex::from_records(history.recent_categorized(false)?);
    let inferred = HistoryIndex::from_records(history.recent_categorized(true)?);
    let mut overlay = HistoryIndex::default();

    let labels: Vec<String> = known_categories.iter().cloned().collect();

    let mut results = Vec::with_capacity(batch.len());
    for row in batch {
        let tiers = [&non_inferred, &inferred, &overlay];
        let inference = infer_row(row, known_categories, &labels, &tiers, classifier, min_score)?;
        if inference.was_inferred {
            overlay.record(row, &inference.category);
        }
        results.push(inference);
    }
    Ok(results)
}
