//! Case data sources
//!
//! A source delivers the pre-grouped [`CaseAggregate`] rows the analysis runs
//! on, either from a JSON file or from a Dolt SQL repository.

use std::path::PathBuf;

use anyhow::Context as _;
use covistat_analysis::record::CaseAggregate;

use self::{dolt::DoltSource, file::JsonFileSource};

mod dolt;
mod file;

/// Supplier of grouped case counts.
pub(crate) trait CaseDataSource {
    /// Short description used in logs and reports.
    fn describe(&self) -> String;

    /// Loads all case aggregates.
    fn fetch(&self) -> anyhow::Result<Vec<CaseAggregate>>;
}

/// Row format of a JSON input file.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum InputFormat {
    /// Pre-grouped rows with a `count` column
    #[default]
    Aggregates,
    /// One row per case, grouped on load
    Cases,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SourceArg {
    /// JSON file with case rows
    #[arg(
        long,
        required_unless_present = "dolt_repo",
        conflicts_with = "dolt_repo"
    )]
    pub input: Option<PathBuf>,

    /// Row format of the input file: "aggregates" or "cases"
    #[arg(long, default_value = "aggregates")]
    pub input_format: InputFormat,

    /// Dolt repository directory to start a SQL server in
    #[arg(long)]
    pub dolt_repo: Option<PathBuf>,

    /// Database served by the Dolt SQL server
    #[arg(long, default_value = "corona-virus")]
    pub database: String,

    /// Table holding one row per case
    #[arg(long, default_value = "case_details")]
    pub table: String,

    /// Port for the Dolt SQL server
    #[arg(long, default_value_t = 3306)]
    pub port: u16,
}

impl SourceArg {
    pub(crate) fn open(&self) -> anyhow::Result<Box<dyn CaseDataSource>> {
        match (&self.input, &self.dolt_repo) {
            (Some(path), None) => Ok(Box::new(JsonFileSource::new(
                path.clone(),
                self.input_format,
            ))),
            (None, Some(repo)) => Ok(Box::new(DoltSource::new(
                repo.clone(),
                self.database.clone(),
                self.table.clone(),
                self.port,
            )?)),
            (Some(_), Some(_)) => anyhow::bail!("--input and --dolt-repo cannot be used together"),
            (None, None) => anyhow::bail!("either --input or --dolt-repo is required"),
        }
    }
}

/// Loads case aggregates from the source selected by `arg`.
///
/// Returns the source description together with the rows.
pub(crate) fn load_aggregates(arg: &SourceArg) -> anyhow::Result<(String, Vec<CaseAggregate>)> {
    let source = arg.open()?;
    let description = source.describe();

    log::info!("Loading case aggregates from {description}...");
    let aggregates = source.fetch()?;
    let total_cases = total_case_count(&aggregates)
        .with_context(|| format!("Total case count of {description} exceeds u64::MAX"))?;
    log::info!(
        "Loaded {} aggregate rows ({total_cases} cases)",
        aggregates.len()
    );

    Ok((description, aggregates))
}

fn total_case_count(aggregates: &[CaseAggregate]) -> Option<u64> {
    aggregates
        .iter()
        .try_fold(0_u64, |total, row| total.checked_add(row.count))
}
