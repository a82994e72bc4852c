use chrono::{DateTime, Utc};
use covistat_analysis::aggregate::AnalysisReport;
use serde::{Deserialize, Serialize};

/// Saved results of an `analyze` run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    /// Timestamp when the analysis was run (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Description of the case data source
    pub source: String,
    /// Significance level used to mark results
    pub alpha: f64,
    /// Whether Yates' continuity correction was applied
    pub continuity_correction: bool,
    /// One report per dependent variable, in command line order
    pub reports: Vec<AnalysisReport>,
}
