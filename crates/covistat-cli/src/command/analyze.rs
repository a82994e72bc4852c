use std::path::PathBuf;

use chrono::Utc;
use covistat_analysis::aggregate::AnalysisReport;

use crate::{
    command::AnalysisArg,
    schema::ReportFile,
    source::{self, SourceArg},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    #[clap(flatten)]
    pub(crate) source: SourceArg,

    #[clap(flatten)]
    pub(crate) analysis: AnalysisArg,

    /// Write the full report as JSON to this file
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let AnalyzeArg {
        source,
        analysis,
        output,
    } = arg;

    let (description, aggregates) = source::load_aggregates(source)?;
    let reports = analysis.run_analyses(&aggregates)?;

    for report in &reports {
        print_report(report, analysis.alpha);
    }

    if let Some(path) = output {
        let file = ReportFile {
            generated_at: Utc::now(),
            source: description,
            alpha: analysis.alpha,
            continuity_correction: analysis.yates,
            reports,
        };
        Output::save_json(&file, Some(path.clone()))?;
    }

    Ok(())
}

fn print_report(report: &AnalysisReport, alpha: f64) {
    println!();
    println!(
        "{} vs {}",
        report.dependent.label(),
        report.independent.label()
    );
    println!(
        "  {} of {} pairs tested, {} skipped (significance level {alpha})",
        report.results.len(),
        report.pair_count(),
        report.skipped.len()
    );
    println!();

    println!(
        "  {:<20} {:<20} {:>10} {:>10} {:>10}  {}",
        report.dependent.label(),
        report.independent.label(),
        "Chi2",
        "p-value",
        "Proportion",
        "Sig",
    );
    println!("  {}", "-".repeat(80));
    for result in &report.results {
        let marker = if result.is_significant(alpha) { "*" } else { "" };
        println!(
            "  {:<20} {:<20} {:>10.4} {:>10.4} {:>10.4}  {marker}",
            result.value, result.outcome, result.chi2, result.p_value, result.proportion,
        );
    }

    if !report.skipped.is_empty() {
        println!();
        println!("  Skipped pairs:");
        for skipped in &report.skipped {
            println!(
                "  {:<20} {:<20} {}",
                skipped.value, skipped.outcome, skipped.reason
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use covistat_analysis::attribute::Attribute;

    use crate::source::InputFormat;

    use super::*;

    #[test]
    fn test_writes_json_report() {
        let dir = env::temp_dir();
        let input = dir.join(format!("covistat-{}-analyze-input.json", process::id()));
        let output = dir.join(format!("covistat-{}-analyze-report.json", process::id()));
        fs::write(
            &input,
            r#"[
                {"age_group": "18-25", "sex": "M", "nationality": "India", "infection_status": "infected", "count": 10},
                {"age_group": "18-25", "sex": "M", "nationality": "India", "infection_status": "recovered", "count": 5},
                {"age_group": "26-35", "sex": "F", "nationality": "India", "infection_status": "infected", "count": 8},
                {"age_group": "26-35", "sex": "F", "nationality": "India", "infection_status": "recovered", "count": 12}
            ]"#,
        )
        .unwrap();

        let arg = AnalyzeArg {
            source: SourceArg {
                input: Some(input.clone()),
                input_format: InputFormat::Aggregates,
                dolt_repo: None,
                database: "corona-virus".to_owned(),
                table: "case_details".to_owned(),
                port: 3306,
            },
            analysis: AnalysisArg {
                dependent: vec![Attribute::Sex, Attribute::AgeGroup],
                independent: Attribute::InfectionStatus,
                alpha: 0.05,
                yates: false,
            },
            output: Some(output.clone()),
        };
        run(&arg).unwrap();

        let saved: ReportFile = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        fs::remove_file(&input).unwrap();
        fs::remove_file(&output).unwrap();

        assert!(saved.source.contains("aggregates"));
        assert!(!saved.continuity_correction);
        assert_eq!(saved.reports.len(), 2);
        assert_eq!(saved.reports[0].dependent, Attribute::Sex);
        assert_eq!(saved.reports[0].results.len(), 4);
        assert_eq!(saved.reports[1].dependent, Attribute::AgeGroup);
    }
}
