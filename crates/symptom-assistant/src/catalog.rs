use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::error::AppError;
use crate::model::CatalogRecord;

pub const REQUIRED_COLUMNS: [&str; 3] = ["symptom", "possible_condition", "recommended_action"];

/// Symptom records in source-file order. Never empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    pub fn new(records: Vec<CatalogRecord>) -> Result<Self, AppError> {
        if records.is_empty() {
            return Err(AppError::EmptyCatalog(
                "at least one symptom record is required".to_string(),
            ));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn symptoms(&self) -> Vec<String> {
        self.records.iter().map(|r| r.symptom.clone()).collect()
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog, AppError> {
    let file = std::fs::File::open(path).map_err(|e| AppError::Catalog {
        path: path.display().to_string(),
        message: format!("failed to open: {e}"),
    })?;
    parse_catalog(file, &path.display().to_string())
}

pub fn parse_catalog<R: Read>(reader: R, source: &str) -> Result<Catalog, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Catalog {
            path: source.to_string(),
            message: format!("missing required columns: {}", missing.join(", ")),
        });
    }

    let mut records = Vec::new();
    for (idx, row) in csv_reader.deserialize::<CatalogRecord>().enumerate() {
        let record = row?;
        if record.symptom.is_empty() {
            // +2: one for the header row, one for 1-based line numbers
            warn!(source, line = idx + 2, "skipping catalog row with blank symptom");
            continue;
        }
        records.push(record);
    }

    Catalog::new(records).map_err(|_| AppError::EmptyCatalog(format!("{source} has no usable rows")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_preserves_file_order_and_ignores_extra_columns() {
        let content = "\
id,symptom,possible_condition,recommended_action
1,fever,Flu,Rest and hydrate
2,  cough ,Common cold,Drink warm fluids
3,headache,Tension headache,\"Rest, and reduce screen time\"
";
        let catalog = parse_catalog(content.as_bytes(), "inline.csv").expect("parse should succeed");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.records()[0], CatalogRecord::new("fever", "Flu", "Rest and hydrate"));
        assert_eq!(catalog.records()[1].symptom, "cough");
        assert_eq!(catalog.records()[2].recommended_action, "Rest, and reduce screen time");
    }

    #[test]
    fn missing_column_is_rejected() {
        let content = "symptom,possible_condition\nfever,Flu\n";
        let err = parse_catalog(content.as_bytes(), "inline.csv").expect_err("should fail");
        assert!(err.to_string().contains("recommended_action"), "{err}");
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let content = "symptom,possible_condition,recommended_action\n";
        let err = parse_catalog(content.as_bytes(), "inline.csv").expect_err("should fail");
        assert!(matches!(err, AppError::EmptyCatalog(_)));
    }

    #[test]
    fn blank_symptom_rows_are_skipped() {
        let content = "symptom,possible_condition,recommended_action\n ,Unknown,Nothing\nfatigue,Anemia,See a doctor\n";
        let catalog = parse_catalog(content.as_bytes(), "inline.csv").expect("parse should succeed");
        assert_eq!(catalog.symptoms(), vec!["fatigue".to_string()]);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "symptom,possible_condition,recommended_action").expect("write");
        writeln!(file, "stomach pain,Gastritis,Avoid spicy food").expect("write");
        let catalog = load_catalog(file.path()).expect("load should succeed");
        assert_eq!(catalog.get(0).map(|r| r.possible_condition.as_str()), Some("Gastritis"));
    }

    #[test]
    fn load_missing_file_fails() {
        let err = load_catalog(Path::new("/nonexistent/Health_dataset.csv")).expect_err("should fail");
        assert!(matches!(err, AppError::Catalog { .. }));
    }

    #[test]
    fn bundled_dataset_covers_quick_symptoms() {
        let content = include_str!("../../../data/Health_dataset.csv");
        let catalog = parse_catalog(content.as_bytes(), "data/Health_dataset.csv").expect("parse should succeed");
        for label in crate::server::QUICK_SYMPTOMS {
            let lowered = label.to_lowercase();
            assert!(
                catalog.records().iter().any(|r| r.symptom == lowered),
                "missing quick symptom {label}"
            );
        }
    }
}
