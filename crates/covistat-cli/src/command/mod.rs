use anyhow::Context as _;
use clap::{Parser, Subcommand};
use covistat_analysis::{
    aggregate::{AnalysisReport, Analyzer},
    attribute::Attribute,
    record::CaseAggregate,
};
use covistat_stats::independence::ChiSquareTest;

use self::{analyze::AnalyzeArg, fetch_aggregates::FetchAggregatesArg, plot::PlotArg};

mod analyze;
mod fetch_aggregates;
mod plot;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Test case attributes for association with an outcome and print the results
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Show outcome proportions as an interactive bar chart
    Plot(#[clap(flatten)] PlotArg),
    /// Load case aggregates from a source and save them as JSON
    FetchAggregates(#[clap(flatten)] FetchAggregatesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Plot(arg) => plot::run(&arg)?,
        Mode::FetchAggregates(arg) => fetch_aggregates::run(&arg)?,
    }
    Ok(())
}

/// Variables to compare and how to test them.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalysisArg {
    /// Dependent variables, comma separated
    #[arg(long, value_delimiter = ',', default_value = "sex")]
    pub dependent: Vec<Attribute>,

    /// Independent variable the dependent variables are compared against
    #[arg(long, default_value = "infection_status")]
    pub independent: Attribute,

    /// Significance level for marking results
    #[arg(long, default_value_t = 0.05, value_parser = parse_alpha)]
    pub alpha: f64,

    /// Apply Yates' continuity correction
    #[arg(long)]
    pub yates: bool,
}

impl AnalysisArg {
    pub(crate) fn analyzer(&self) -> Analyzer {
        Analyzer::new(ChiSquareTest::new().with_continuity_correction(self.yates))
    }

    /// Analyzes every dependent variable against the independent one.
    pub(crate) fn run_analyses(
        &self,
        aggregates: &[CaseAggregate],
    ) -> anyhow::Result<Vec<AnalysisReport>> {
        let analyzer = self.analyzer();
        self.dependent
            .iter()
            .map(|&dependent| {
                log::info!("Analyzing {dependent} against {}...", self.independent);
                analyzer
                    .analyze(aggregates, dependent, self.independent)
                    .with_context(|| {
                        format!("Failed to analyze {dependent} against {}", self.independent)
                    })
            })
            .collect()
    }
}

fn parse_alpha(s: &str) -> Result<f64, String> {
    let alpha: f64 = s.parse().map_err(|err| format!("{err}"))?;
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(format!("alpha must be between 0 and 1 (exclusive), got {alpha}"))
    }
}
