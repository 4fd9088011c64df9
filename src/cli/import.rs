use std::path::Path;

use crate::classifier::{Classifier, FixedClassifier, OpenAiClassifier};
use crate::db::get_connection;
use crate::error::{PennyError, Result};
use crate::fuzzy::DEFAULT_MIN_SCORE;
use crate::importer::import_file;
use crate::inference::DEFAULT_CATEGORY;
use crate::settings::{get_data_dir, load_settings};

pub fn run(file: &str, offline: bool) -> Result<()> {
    let settings = load_settings();
    let conn = get_connection(&get_data_dir().join("penny.db"))?;

    // Which classifier backs the fallback tier is a caller decision:
    // offline imports explicitly file unmatched rows under "Other".
    let classifier: Box<dyn Classifier> = if offline {
        Box::new(FixedClassifier::new(DEFAULT_CATEGORY))
    } else {
        let api_key = settings.api_key().ok_or_else(|| {
            PennyError::Settings(
                "no OpenAI API key configured; set OPENAI_API_KEY or pass --offline".to_string(),
            )
        })?;
        Box::new(OpenAiClassifier::new(&api_key, &settings.openai_model)?)
    };

    let result = import_file(&conn, Path::new(file), classifier.as_ref(), DEFAULT_MIN_SCORE)?;

    if result.duplicate_file {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }

    println!(
        "{} imported ({} with inferred categories), {} skipped (duplicates)",
        result.imported, result.inferred, result.skipped
    );
    Ok(())
}
