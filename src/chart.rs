// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{AggregatedResults, Error};

use plotters::coord::Shift;
use plotters::prelude::*;

use std::path::Path;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

const COLOURS: &[RGBColor] = &[
    hexcolour!(0xCC0000),
    hexcolour!(0x009900),
    hexcolour!(0x0000FF),
    hexcolour!(0xDDCC77),
    hexcolour!(0x332288),
    hexcolour!(0x88CCEE),
    hexcolour!(0x882255),
    hexcolour!(0x44AA99),
];

/// Fraction of a row covered by one group of bars.
const GROUP_SPAN: f64 = 2.0 / 3.0;

/// Headroom to the right of the longest bar, for the value labels.
const X_HEADROOM: f64 = 1.2;

/// One library to plot and the label it gets in the legend.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSpec {
    pub library: String,
    pub label: String,
}

impl SeriesSpec {
    pub fn new(library: impl AsRef<str>, label: impl AsRef<str>) -> Self {
        Self {
            library: library.as_ref().to_owned(),
            label: label.as_ref().to_owned(),
        }
    }
}

pub struct ChartConfig {
    title: String,
    size: (u32, u32),
    series: Vec<SeriesSpec>,
}

impl ChartConfig {
    pub fn new() -> Self {
        Self {
            title: "Times by move generator\n(Lower is better)".to_owned(),
            size: (1280, 0),
            series: Vec::new(),
        }
    }

    pub fn title(&mut self, title: impl AsRef<str>) -> &mut Self {
        self.title = title.as_ref().to_owned();
        self
    }

    /// a height of zero is derived from the number of tests
    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    pub fn series(&mut self, series: Vec<SeriesSpec>) -> &mut Self {
        self.series = series;
        self
    }

    /// the configured series, or every library in first-seen order
    pub fn resolve_series(&self, results: &AggregatedResults) -> Result<Vec<SeriesSpec>, Error> {
        if results.is_empty() {
            return Err(Error::NoResults);
        }

        if self.series.is_empty() {
            return Ok(results
                .libraries()
                .iter()
                .map(|library| SeriesSpec::new(library, library))
                .collect());
        }

        for spec in &self.series {
            if results.series(&spec.library).is_none() {
                return Err(Error::MissingSeries(spec.library.clone()));
            }
        }

        Ok(self.series.clone())
    }

    fn dimensions(&self, tests: usize) -> (u32, u32) {
        let height = if self.size.1 == 0 {
            120 + 40 * tests as u32
        } else {
            self.size.1
        };
        (self.size.0, height)
    }

    /// Render the results to `filename`. An `.svg` extension selects the SVG
    /// backend, anything else is written as a bitmap.
    pub fn render(
        &self,
        results: &AggregatedResults,
        filename: impl AsRef<Path>,
    ) -> Result<(), Error> {
        let series = self.resolve_series(results)?;
        let filename = filename.as_ref();
        let size = self.dimensions(results.axis().len());

        if is_svg(filename) {
            let root = SVGBackend::new(filename, size).into_drawing_area();
            self.draw(root, results, &series)
        } else {
            let root = BitMapBackend::new(filename, size).into_drawing_area();
            self.draw(root, results, &series)
        }
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: DrawingArea<DB, Shift>,
        results: &AggregatedResults,
        series: &[SeriesSpec],
    ) -> Result<(), Error> {
        let axis = results.axis();
        let rows = axis.len();

        let mut x_max: f64 = 0.0;
        for spec in series {
            if let Some(s) = results.series(&spec.library) {
                for (time, error) in s.times().iter().zip(s.errors()) {
                    x_max = x_max.max(time + error);
                }
            }
        }
        let x_max = if x_max > 0.0 { x_max * X_HEADROOM } else { 1.0 };

        root.fill(&WHITE).map_err(render_error)?;

        let caption = self.title.replace('\n', " ");
        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 30))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 100)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(0.0..x_max, -0.5..(rows as f64 - 0.5))
            .map_err(render_error)?;

        let label_row = |y: &f64| row_label(axis, *y);
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows.max(1))
            .y_label_formatter(&label_row)
            .x_desc("Time (in ms)")
            .y_desc("Test")
            .draw()
            .map_err(render_error)?;

        for (k, spec) in series.iter().enumerate() {
            let values = match results.series(&spec.library) {
                Some(values) => values,
                None => return Err(Error::MissingSeries(spec.library.clone())),
            };
            let colour = COLOURS[k % COLOURS.len()];

            let bars: Vec<(f64, f64, f64, f64)> = values
                .times()
                .iter()
                .zip(values.errors())
                .enumerate()
                .map(|(row, (time, error))| {
                    let (lo, hi) = bar_span(row, k, series.len());
                    (lo, hi, *time, *error)
                })
                .collect();

            chart
                .draw_series(bars.iter().map(|&(lo, hi, time, _)| {
                    Rectangle::new([(0.0, lo), (time, hi)], colour.filled())
                }))
                .map_err(render_error)?
                .label(&spec.label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 15, y + 5)], colour.filled())
                });

            chart
                .draw_series(bars.iter().map(|&(lo, hi, time, error)| {
                    let mid = (lo + hi) / 2.0;
                    let (left, right) = error_bar(time, error);
                    PathElement::new(vec![(left, mid), (right, mid)], BLACK.stroke_width(1))
                }))
                .map_err(render_error)?;

            chart
                .draw_series(bars.iter().map(|&(_, hi, time, _)| {
                    Text::new(
                        value_label(time),
                        (time, hi),
                        ("sans-serif", 11).into_font(),
                    )
                }))
                .map_err(render_error)?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.filled())
            .border_style(&BLACK)
            .position(SeriesLabelPosition::LowerRight)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;

        Ok(())
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertical extent of bar `k` of `n` in the group drawn for `row`. The group
/// is centered on the row and bars are stacked upwards in series order.
pub fn bar_span(row: usize, k: usize, n: usize) -> (f64, f64) {
    let thickness = GROUP_SPAN / n.max(1) as f64;
    let start = row as f64 - GROUP_SPAN / 2.0 + k as f64 * thickness;
    (start, start + thickness)
}

/// `.svg`, in any case, selects the SVG backend
fn is_svg(filename: &Path) -> bool {
    filename
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Horizontal extent of the error bar for `time ± error`, clipped at zero.
fn error_bar(time: f64, error: f64) -> (f64, f64) {
    ((time - error).max(0.0), time + error)
}

fn value_label(ms: f64) -> String {
    format!("{:.4}", ms)
}

/// y axis tick label: the test identifier for ticks that land on a row
fn row_label(axis: &[String], y: f64) -> String {
    let row = y.round();
    if (y - row).abs() > 1e-6 || row < 0.0 {
        return String::new();
    }
    axis.get(row as usize).cloned().unwrap_or_default()
}

fn render_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BenchmarkRecord;

    fn results() -> AggregatedResults {
        let mut results = AggregatedResults::new();
        for (test, library, mean_ms) in &[
            ("01", "chess_incremental", 6.5),
            ("01", "shakmaty", 7.25),
            ("02", "chess_incremental", 1.0),
            ("02", "shakmaty", 1.5),
        ] {
            results.record(BenchmarkRecord {
                test: test.to_string(),
                library: library.to_string(),
                mean_ms: *mean_ms,
                error_ms: 0.25,
            });
        }
        results
    }

    #[test]
    fn two_series_split_the_group() {
        let (lo, hi) = bar_span(0, 0, 2);
        assert!((lo + 1.0 / 3.0).abs() < 1e-12);
        assert!(hi.abs() < 1e-12);

        let (lo, hi) = bar_span(3, 1, 2);
        assert!((lo - 3.0).abs() < 1e-12);
        assert!((hi - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn bars_do_not_overlap() {
        for n in 1..5 {
            for k in 1..n {
                let (_, prev_hi) = bar_span(7, k - 1, n);
                let (lo, _) = bar_span(7, k, n);
                assert!((prev_hi - lo).abs() < 1e-12);
            }
            let (first, _) = bar_span(7, 0, n);
            let (_, last) = bar_span(7, n - 1, n);
            assert!((last - first - GROUP_SPAN).abs() < 1e-12);
        }
    }

    #[test]
    fn row_labels() {
        let axis = vec!["01".to_owned(), "kiwipete".to_owned()];
        assert_eq!(row_label(&axis, 0.0), "01");
        assert_eq!(row_label(&axis, 1.0), "kiwipete");
        assert_eq!(row_label(&axis, 0.5), "");
        assert_eq!(row_label(&axis, 2.0), "");
        assert_eq!(row_label(&axis, -1.0), "");
    }

    #[test]
    fn default_series_follow_first_seen_order() {
        let series = ChartConfig::new().resolve_series(&results()).unwrap();
        assert_eq!(
            series,
            vec![
                SeriesSpec::new("chess_incremental", "chess_incremental"),
                SeriesSpec::new("shakmaty", "shakmaty"),
            ]
        );
    }

    #[test]
    fn configured_series() {
        let mut config = ChartConfig::new();
        config.series(vec![
            SeriesSpec::new("shakmaty", "shakmaty 0.15.0"),
            SeriesSpec::new("chess_incremental", "chess 3.1.1"),
        ]);
        let series = config.resolve_series(&results()).unwrap();
        assert_eq!(series[0].label, "shakmaty 0.15.0");
        assert_eq!(series[1].library, "chess_incremental");
    }

    #[test]
    fn missing_series() {
        let mut config = ChartConfig::new();
        config.series(vec![
            SeriesSpec::new("shakmaty", "shakmaty 0.15.0"),
            SeriesSpec::new("chess_move_gen", "chess_move_gen"),
        ]);
        match config.resolve_series(&results()) {
            Err(Error::MissingSeries(library)) => assert_eq!(library, "chess_move_gen"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn no_results() {
        match ChartConfig::new().resolve_series(&AggregatedResults::new()) {
            Err(Error::NoResults) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn backend_selection() {
        assert!(is_svg(Path::new("a.svg")));
        assert!(is_svg(Path::new("a.SVG")));
        assert!(is_svg(Path::new("/tmp/perft.three-way.Svg")));
        assert!(!is_svg(Path::new("a.png")));
        assert!(!is_svg(Path::new("noext")));
        assert!(!is_svg(Path::new("svg")));
    }

    #[test]
    fn value_labels() {
        assert_eq!(value_label(6.760185), "6.7602");
        assert_eq!(value_label(0.331568), "0.3316");
        assert_eq!(value_label(12.0), "12.0000");
        assert_eq!(value_label(0.0), "0.0000");
    }

    #[test]
    fn error_bars() {
        assert_eq!(error_bar(6.5, 0.25), (6.25, 6.75));
        assert_eq!(error_bar(1.0, 0.0), (1.0, 1.0));
        assert_eq!(error_bar(0.25, 0.5), (0.0, 0.75));
    }

    #[test]
    fn render_without_results() {
        // the directory does not exist, so reaching a backend would fail differently
        let filename = "/nonexistent/perft-graph/perft.svg";
        match ChartConfig::new().render(&AggregatedResults::new(), filename) {
            Err(Error::NoResults) => {}
            other => panic!("unexpected: {:?}", other),
        }
        assert!(!Path::new(filename).exists());
    }

    #[test]
    fn render_missing_series() {
        let mut config = ChartConfig::new();
        config.series(vec![SeriesSpec::new("chess_move_gen", "chess_move_gen")]);
        match config.render(&results(), "/nonexistent/perft-graph/perft.png") {
            Err(Error::MissingSeries(library)) => assert_eq!(library, "chess_move_gen"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn derived_height() {
        let mut config = ChartConfig::new();
        assert_eq!(config.dimensions(27), (1280, 120 + 40 * 27));
        config.size((800, 600));
        assert_eq!(config.dimensions(27), (800, 600));
    }
}
