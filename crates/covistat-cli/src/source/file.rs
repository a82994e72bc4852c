use std::path::PathBuf;

use covistat_analysis::{
    classify::{CaseRecord, group_case_records},
    record::CaseAggregate,
};

use crate::{
    source::{CaseDataSource, InputFormat},
    util,
};

/// Case rows stored in a JSON array file.
#[derive(Debug, Clone)]
pub(crate) struct JsonFileSource {
    path: PathBuf,
    format: InputFormat,
}

impl JsonFileSource {
    pub(crate) fn new(path: PathBuf, format: InputFormat) -> Self {
        Self { path, format }
    }
}

impl CaseDataSource for JsonFileSource {
    fn describe(&self) -> String {
        let kind = match self.format {
            InputFormat::Aggregates => "aggregates",
            InputFormat::Cases => "cases",
        };
        format!("{} ({kind})", self.path.display())
    }

    fn fetch(&self) -> anyhow::Result<Vec<CaseAggregate>> {
        match self.format {
            InputFormat::Aggregates => util::read_json_rows("case aggregate", &self.path),
            InputFormat::Cases => {
                let records: Vec<CaseRecord> = util::read_json_rows("case record", &self.path)?;
                log::info!("Grouping {} case records", records.len());
                Ok(group_case_records(&records))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use covistat_analysis::record::{AgeGroup, InfectionStatus};

    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("covistat-{}-{name}", process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_reads_aggregates() {
        let path = write_temp(
            "aggregates.json",
            r#"[
                {"age_group": "18-25", "sex": "M", "nationality": "India", "infection_status": "infected", "count": 3},
                {"age_group": "18-25", "sex": "F", "nationality": null, "infection_status": "recovered", "count": 2}
            ]"#,
        );
        let source = JsonFileSource::new(path.clone(), InputFormat::Aggregates);
        let rows = source.fetch().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].infection_status, InfectionStatus::Infected);
        assert_eq!(rows[1].nationality, None);
        assert!(source.describe().ends_with("(aggregates)"));
    }

    #[test]
    fn test_groups_raw_cases() {
        let path = write_temp(
            "cases.json",
            r#"[
                {"age": 70, "sex": "M", "nationality": "India", "current_status": "died"},
                {"age": 80, "sex": "M", "nationality": "India", "current_status": "Deceased"},
                {"age": null, "sex": "F", "nationality": "India", "current_status": "isolated"}
            ]"#,
        );
        let rows = JsonFileSource::new(path.clone(), InputFormat::Cases)
            .fetch()
            .unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].age_group, AgeGroup::Over65);
        assert_eq!(rows[0].infection_status, InfectionStatus::Deceased);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].age_group, AgeGroup::Unknown);
        assert_eq!(rows[1].infection_status, InfectionStatus::Infected);
    }

    #[test]
    fn test_malformed_row_fails_fast() {
        let path = write_temp(
            "malformed.json",
            r#"[
                {"age_group": "18-25", "sex": "M", "nationality": "India", "infection_status": "infected", "count": 3},
                {"age_group": "18-25", "sex": "M", "nationality": "India", "infection_status": "infected"}
            ]"#,
        );
        let err = JsonFileSource::new(path.clone(), InputFormat::Aggregates)
            .fetch()
            .unwrap_err();
        fs::remove_file(&path).unwrap();

        let message = format!("{err:#}");
        assert!(message.contains("index 1"), "{message}");
        assert!(message.contains("count"), "{message}");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let source = JsonFileSource::new(
            PathBuf::from("/nonexistent/covistat/aggregates.json"),
            InputFormat::Aggregates,
        );
        let err = source.fetch().unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
