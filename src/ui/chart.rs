use crate::{
    deck::content::MarketDataPoint,
    render::{
        operation::{AsRenderOperations, RenderOperation},
        properties::WindowSize,
    },
    text::{Line, Text, style::TextStyle},
    theme::{Alignment, ChartStyle, Margin},
};
use itertools::Itertools;
use std::rc::Rc;

const BAR: &str = "██";
const EMPTY_BAR: &str = "  ";
const BAR_GAP: &str = " ";
const GROUP_GAP: &str = "  ";

/// A bar chart of market figures, one group of two bars per year.
///
/// Each series is scaled independently against its own maximum so both remain readable even
/// though their units differ by three orders of magnitude.
#[derive(Debug)]
pub(crate) struct MarketChart {
    data: &'static [MarketDataPoint],
    style: ChartStyle,
}

impl MarketChart {
    pub(crate) fn new(data: &'static [MarketDataPoint], style: ChartStyle) -> Self {
        Self { data, style }
    }

    /// The number of rows a bar occupies out of `height`.
    ///
    /// Any non zero value gets at least one row so small bars don't vanish entirely.
    fn filled_rows(value: f64, max: f64, height: u16) -> u16 {
        if value <= 0.0 || max <= 0.0 {
            return 0;
        }
        let rows = (value / max * height as f64).round() as u16;
        rows.clamp(1, height)
    }

    fn bar_chunk(value: f64, max: f64, height: u16, row: u16, style: TextStyle) -> Text {
        if Self::filled_rows(value, max, height) >= row { Text::new(BAR, style) } else { Text::from(EMPTY_BAR) }
    }

    fn group_width() -> usize {
        BAR.chars().count() * 2 + BAR_GAP.len()
    }

    fn width(&self) -> usize {
        self.data.len() * Self::group_width() + self.data.len().saturating_sub(1) * GROUP_GAP.len()
    }

    fn max_market_size(&self) -> f64 {
        self.data.iter().map(|point| point.market_size_billions).fold(0.0, f64::max)
    }

    fn max_developers(&self) -> f64 {
        self.data.iter().map(|point| point.developers_millions).fold(0.0, f64::max)
    }

    fn build_lines(&self) -> Vec<Line> {
        let height = self.style.height;
        let max_market_size = self.max_market_size();
        let max_developers = self.max_developers();
        let mut lines = Vec::new();
        for row in (1..=height).rev() {
            let mut chunks = Vec::new();
            for (index, point) in self.data.iter().enumerate() {
                if index > 0 {
                    chunks.push(Text::from(GROUP_GAP));
                }
                chunks.push(Self::bar_chunk(
                    point.market_size_billions,
                    max_market_size,
                    height,
                    row,
                    self.style.primary_style,
                ));
                chunks.push(Text::from(BAR_GAP));
                chunks.push(Self::bar_chunk(
                    point.developers_millions,
                    max_developers,
                    height,
                    row,
                    self.style.secondary_style,
                ));
            }
            lines.push(Line(chunks));
        }
        lines.push(Line::from(Text::new("─".repeat(self.width()), self.style.axis_style)));

        let group_width = Self::group_width();
        let labels = self.data.iter().map(|point| format!("{:^group_width$}", point.label)).join(GROUP_GAP);
        lines.push(Line::from(Text::new(labels, self.style.axis_style)));
        lines
    }

    fn legend(&self) -> Line {
        Line(vec![
            Text::new(BAR, self.style.primary_style),
            Text::from(format!(" Tooling spend, ${:.1}B by 2025", self.max_market_size())),
            Text::from(GROUP_GAP),
            Text::new(BAR, self.style.secondary_style),
            Text::from(format!(" Developers, {:.1}M", self.max_developers())),
        ])
    }
}

impl AsRenderOperations for MarketChart {
    fn as_render_operations(&self, _: &WindowSize) -> Vec<RenderOperation> {
        let alignment = Alignment::Center { minimum_margin: Margin::Fixed(0), minimum_size: 0 };
        let mut operations = Vec::new();
        for line in self.build_lines() {
            operations.push(RenderOperation::RenderText { line: line.into(), alignment: alignment.clone() });
            operations.push(RenderOperation::RenderLineBreak);
        }
        operations.push(RenderOperation::RenderLineBreak);
        operations.push(RenderOperation::RenderText { line: self.legend().into(), alignment });
        operations.push(RenderOperation::RenderLineBreak);
        operations
    }
}

impl From<MarketChart> for RenderOperation {
    fn from(chart: MarketChart) -> Self {
        Self::RenderDynamic(Rc::new(chart))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::deck::content::MARKET_DATA;
    use rstest::rstest;

    const DATA: &[MarketDataPoint] = &[
        MarketDataPoint { label: "2023", market_size_billions: 2.0, developers_millions: 5.0 },
        MarketDataPoint { label: "2024", market_size_billions: 4.0, developers_millions: 10.0 },
    ];

    fn chart(data: &'static [MarketDataPoint]) -> MarketChart {
        let style = ChartStyle {
            primary_style: TextStyle::default().bold(),
            secondary_style: TextStyle::default().italics(),
            axis_style: TextStyle::default(),
            height: 4,
        };
        MarketChart::new(data, style)
    }

    #[rstest]
    #[case::zero(0.0, 10.0, 0)]
    #[case::max(10.0, 10.0, 10)]
    #[case::half(5.0, 10.0, 5)]
    #[case::rounds_up(5.5, 10.0, 6)]
    #[case::tiny_but_visible(0.1, 100.0, 1)]
    fn filled_rows(#[case] value: f64, #[case] max: f64, #[case] expected: u16) {
        assert_eq!(MarketChart::filled_rows(value, max, 10), expected);
    }

    #[test]
    fn line_count_and_widths() {
        let chart = chart(DATA);
        let lines = chart.build_lines();
        // Bar rows plus the axis and the label rows.
        assert_eq!(lines.len(), 4 + 2);
        let widths: Vec<_> = lines.iter().map(Line::width).collect();
        assert!(widths.iter().all(|width| *width == chart.width()), "uneven line widths: {widths:?}");
    }

    #[test]
    fn only_tallest_bars_reach_the_top() {
        let chart = chart(DATA);
        let lines = chart.build_lines();
        let top: String = lines[0].0.iter().map(|text| text.content.as_str()).collect();
        // Both series peak on the second data point.
        assert_eq!(top, "       ██ ██");
        let bottom: String = lines[3].0.iter().map(|text| text.content.as_str()).collect();
        assert_eq!(bottom, "██ ██  ██ ██");
    }

    #[test]
    fn series_are_independently_scaled() {
        let chart = chart(DATA);
        let lines = chart.build_lines();
        // Half of max in both series fills half the rows, regardless of their magnitudes.
        let half_row: String = lines[1].0.iter().map(|text| text.content.as_str()).collect();
        assert_eq!(half_row, "       ██ ██");
        let third_row: String = lines[2].0.iter().map(|text| text.content.as_str()).collect();
        assert_eq!(third_row, "██ ██  ██ ██");
    }

    #[test]
    fn labels_sit_under_their_groups() {
        let chart = chart(DATA);
        let lines = chart.build_lines();
        let labels = &lines[5].0[0].content;
        assert_eq!(labels, "2023   2024 ");
    }

    #[test]
    fn deck_data_renders() {
        let chart = chart(&MARKET_DATA);
        let operations = chart.as_render_operations(&WindowSize { rows: 24, columns: 80 });
        let rendered = operations
            .iter()
            .filter(|operation| matches!(operation, RenderOperation::RenderText { .. }))
            .count();
        // Bars, axis, labels and the legend.
        assert_eq!(rendered, 4 + 2 + 1);
    }
}
