use covistat_analysis::aggregate::AnalysisReport;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Line,
    widgets::Paragraph,
};

use crate::{
    command::AnalysisArg,
    source::{self, SourceArg},
    ui::ProportionChart,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlotArg {
    #[clap(flatten)]
    pub(crate) source: SourceArg,

    #[clap(flatten)]
    pub(crate) analysis: AnalysisArg,
}

pub fn run(arg: &PlotArg) -> anyhow::Result<()> {
    let PlotArg { source, analysis } = arg;

    let (_description, aggregates) = source::load_aggregates(source)?;
    let reports = analysis.run_analyses(&aggregates)?;

    let mut screen = ChartScreen::new(reports, analysis.alpha);
    ratatui::run(|terminal| -> anyhow::Result<()> {
        while !screen.should_exit() {
            terminal.draw(|frame| screen.draw(frame))?;
            let event = event::read()?;
            screen.handle_event(&event);
        }
        Ok(())
    })
}

/// Shows one chart per dependent variable.
#[derive(Debug)]
struct ChartScreen {
    reports: Vec<AnalysisReport>,
    alpha: f64,
    selected: usize,
    should_exit: bool,
}

impl ChartScreen {
    fn new(reports: Vec<AnalysisReport>, alpha: f64) -> Self {
        Self {
            reports,
            alpha,
            selected: 0,
            should_exit: false,
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        if let Some(report) = self.reports.get(self.selected) {
            frame.render_widget(ProportionChart::new(report, self.alpha), main_area);
        }

        let help = format!(
            "[{}/{}] Tab/←/→: switch variable  q/Esc: quit  (* p < {})",
            self.selected + 1,
            self.reports.len(),
            self.alpha
        );
        frame.render_widget(Paragraph::new(Line::from(help)), help_area);
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(event) = event.as_key_press_event() else {
            return;
        };
        let count = self.reports.len();
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Down if count > 0 => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Up if count > 0 => {
                self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
            }
            _ => {}
        }
    }
}
