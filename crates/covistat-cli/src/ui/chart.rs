use covistat_analysis::{
    aggregate::{AnalysisReport, AnalysisResult},
    label::format_label,
};
use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Paragraph, Widget},
};

use crate::ui::color;

const BAR_WIDTH: u16 = 6;
const BAR_GAP: u16 = 1;
const GROUP_GAP: u16 = 3;
const PER_MILLE: u32 = 1000;

/// Grouped bar chart of outcome proportions for one dependent variable.
///
/// Each dependent value is a group with one bar per outcome. Skipped pairs
/// leave an empty slot so bars of the same outcome line up across groups.
#[derive(Debug)]
pub struct ProportionChart<'a> {
    report: &'a AnalysisReport,
    alpha: f64,
}

impl<'a> ProportionChart<'a> {
    pub fn new(report: &'a AnalysisReport, alpha: f64) -> Self {
        Self { report, alpha }
    }

    pub fn title(&self) -> String {
        format!(
            "Proportions of Outcomes by {}",
            self.report.dependent.label()
        )
    }

    /// Results per dependent value, one slot per outcome.
    fn slots(&self) -> Vec<Vec<Option<&'a AnalysisResult>>> {
        let report = self.report;
        report
            .dependent_values
            .iter()
            .map(|value| {
                report
                    .independent_values
                    .iter()
                    .map(|outcome| report.result(value, outcome))
                    .collect()
            })
            .collect()
    }

    fn bar(&self, slot: Option<&AnalysisResult>, color: Color) -> Bar<'static> {
        let Some(result) = slot else {
            return Bar::default().value(0).text_value(String::new());
        };
        let marker = if result.is_significant(self.alpha) {
            "*"
        } else {
            ""
        };
        Bar::default()
            .value(bar_height(result.proportion))
            .text_value(format!("{:.2}{marker}", result.proportion))
            .style(Style::new().fg(color))
            .value_style(Style::new().fg(color::BLACK).bg(color))
    }

    fn legend(&self) -> Line<'static> {
        let spans = self
            .report
            .independent_values
            .iter()
            .zip(color::PALETTE.iter().cycle())
            .flat_map(|(outcome, &color)| {
                [
                    Span::styled("■ ", Style::new().fg(color)),
                    Span::raw(format!("{}  ", format_label(outcome))),
                ]
            })
            .collect::<Vec<_>>();
        Line::from(spans).centered()
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_height(proportion: f64) -> u64 {
    (proportion.clamp(0.0, 1.0) * f64::from(PER_MILLE)).round() as u64
}

impl Widget for ProportionChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ProportionChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block = Block::bordered().title(Line::from(self.title()).centered());
        let [chart_area, caption_area, legend_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(block.inner(area));

        let mut chart = BarChart::default()
            .bar_width(BAR_WIDTH)
            .bar_gap(BAR_GAP)
            .group_gap(GROUP_GAP)
            .max(u64::from(PER_MILLE));
        for (value, slots) in self.report.dependent_values.iter().zip(self.slots()) {
            let bars = slots
                .into_iter()
                .zip(color::PALETTE.iter().cycle())
                .map(|(slot, &color)| self.bar(slot, color))
                .collect::<Vec<_>>();
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(value.clone()).centered())
                    .bars(&bars),
            );
        }

        let caption = Paragraph::new(Line::from(self.report.dependent.label()).centered());
        let legend = Paragraph::new(self.legend());

        Widget::render(block, area, buf);
        Widget::render(chart, chart_area, buf);
        Widget::render(caption, caption_area, buf);
        Widget::render(legend, legend_area, buf);
    }
}
