use chlmon_core::models::{ChartKind, ChartSpec};
use chlmon_core::ports::ChartSurface;

const BAR_WIDTH: usize = 40;

/// Chart surface that renders to text. At most one rendering is live.
#[derive(Debug, Default)]
pub struct TerminalChart {
    rendered: Option<String>,
}

impl TerminalChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live rendering, if a chart is drawn
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref()
    }
}

impl ChartSurface for TerminalChart {
    fn draw(&mut self, spec: &ChartSpec) {
        self.rendered = Some(render(spec));
    }

    fn destroy(&mut self) {
        self.rendered = None;
    }
}

/// Horizontal bars scaled to the largest value; gaps render as `–`
pub fn render(spec: &ChartSpec) -> String {
    let mut out = format!("{} ({})\n", spec.title, spec.series_label);
    if spec.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = spec
        .values
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let glyph = match spec.kind {
        ChartKind::Bar => '█',
        ChartKind::Line => '•',
    };

    for (label, value) in spec.labels.iter().zip(&spec.values) {
        let line = match value {
            Some(v) => {
                let len = if max > 0.0 {
                    ((v.abs() / max) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                let bar: String = match spec.kind {
                    ChartKind::Bar => std::iter::repeat(glyph).take(len).collect(),
                    ChartKind::Line => {
                        format!("{}{}", " ".repeat(len.saturating_sub(1)), glyph)
                    }
                };
                format!("{:<w$} │ {:<bw$} {}", label, bar, format_value(*v), w = label_width, bw = BAR_WIDTH)
            }
            None => format!("{:<w$} │ {:<bw$} –", label, "", w = label_width, bw = BAR_WIDTH),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.3}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_chart_scales_to_largest() {
        let spec = ChartSpec::bar(
            "CI Histogram • 2023-06-03",
            "Pixels",
            vec![("Class 20".into(), 5.0), ("Class 30".into(), 10.0)],
        );
        let text = render(&spec);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "CI Histogram • 2023-06-03 (Pixels)");
        assert_eq!(lines[1].matches('█').count(), 20);
        assert_eq!(lines[2].matches('█').count(), 40);
        assert!(lines[2].ends_with("10"));
    }

    #[test]
    fn test_line_chart_marks_gaps() {
        let spec = ChartSpec::line(
            "NDVI (mean) by month",
            "NDVI",
            vec![("2023-06".into(), Some(0.5)), ("2023-07".into(), None)],
        );
        let text = render(&spec);

        assert!(text.lines().nth(1).unwrap().ends_with("0.500"));
        assert!(text.lines().nth(2).unwrap().ends_with('–'));
    }

    #[test]
    fn test_destroy_clears_rendering() {
        let mut surface = TerminalChart::new();
        surface.draw(&ChartSpec::bar("t", "Pixels", vec![]));
        assert!(surface.rendered().unwrap().contains("(no data)"));

        surface.destroy();
        assert!(surface.rendered().is_none());
    }
}
