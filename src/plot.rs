use crate::{aggregate::FeatureCount, record::JavaVersion, series::CommitSeries};
use anyhow::Result;
use log::info;
use plotters::{coord::Shift, prelude::*};
use std::path::Path;

/// The first eight colours of matplotlib's "Paired" palette, one per version.
const PAIRED: [RGBColor; 8] = [
    RGBColor(166, 206, 227),
    RGBColor(31, 120, 180),
    RGBColor(178, 223, 138),
    RGBColor(51, 160, 44),
    RGBColor(251, 154, 153),
    RGBColor(227, 26, 28),
    RGBColor(253, 191, 111),
    RGBColor(255, 127, 0),
];

/// Colour for a version label; labels outside `JAVA1..JAVA8` are black.
pub fn version_color(label: &str) -> RGBColor {
    label.parse::<JavaVersion>().map(|version| PAIRED[version.index()]).unwrap_or(BLACK)
}

/// Something that can be drawn onto any plotters drawing area.
pub trait Chart {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: usize,
    pub color: RGBColor,
}

/// One bar per category, value written above each bar, category labels rotated.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn versions(title: impl Into<String>, counts: &[(String, usize)]) -> Self {
        let bars = counts
            .iter()
            .map(|(label, value)| Bar { label: label.clone(), value: *value, color: version_color(label) })
            .collect();
        Self { title: title.into(), bars }
    }

    pub fn features(title: impl Into<String>, features: &[FeatureCount]) -> Self {
        let bars = features
            .iter()
            .map(|f| Bar { label: f.feature.clone(), value: f.count, color: version_color(&f.version) })
            .collect();
        Self { title: title.into(), bars }
    }
}

impl Chart for BarChart {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let slots = self.bars.len().max(1);
        let top = self.bars.iter().map(|bar| bar.value).max().unwrap_or(0);
        let mut chart = ChartBuilder::on(area)
            .caption(&self.title, ("sans-serif", 16))
            .margin(8)
            .x_label_area_size(90)
            .y_label_area_size(40)
            .build_cartesian_2d((0..slots).into_segmented(), 0..top + top / 10 + 1)?;

        let label_of = |x: &SegmentValue<usize>| match x {
            SegmentValue::CenterOf(i) => self.bars.get(*i).map(|bar| bar.label.clone()).unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .x_label_style(("sans-serif", 11).into_font().transform(FontTransform::Rotate90))
            .x_label_formatter(&label_of)
            .draw()?;

        chart.draw_series(self.bars.iter().enumerate().map(|(i, bar)| {
            let mut rect =
                Rectangle::new([(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), bar.value)], bar.color.filled());
            rect.set_margin(0, 0, 3, 3);
            rect
        }))?;
        chart.draw_series(self.bars.iter().enumerate().map(|(i, bar)| {
            Text::new(bar.value.to_string(), (SegmentValue::CenterOf(i), bar.value), ("sans-serif", 11).into_font())
        }))?;
        Ok(())
    }
}

/// Several bar charts laid out on a grid under a common title, filled row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedChart {
    pub title: String,
    pub columns: usize,
    pub panels: Vec<BarChart>,
}

impl Chart for MergedChart {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let columns = self.columns.max(1);
        let rows = ((self.panels.len() + columns - 1) / columns).max(1);
        let area = area.titled(&self.title, ("sans-serif", 24))?;
        for (panel, cell) in self.panels.iter().zip(area.split_evenly((rows, columns)).iter()) {
            panel.draw(cell)?;
        }
        Ok(())
    }
}

/// Vertical line flagging one commit on a line chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub x: i64,
    pub label: String,
}

/// Occurrences over the commit counter axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub points: Vec<(i64, usize)>,
    pub marker: Option<Marker>,
}

impl LineChart {
    pub fn from_series(title: impl Into<String>, series: &CommitSeries) -> Self {
        Self {
            title: title.into(),
            x_desc: "Commit counter".into(),
            y_desc: "Occurrences".into(),
            points: series.points().iter().map(|point| (point.counter, point.occurrences)).collect(),
            marker: None,
        }
    }

    /// Horizontal extent of the chart, widened to include the marker.
    pub fn x_range(&self) -> (i64, i64) {
        let xs = self.points.iter().map(|(x, _)| *x).chain(self.marker.as_ref().map(|m| m.x));
        let (low, high) = xs.fold((i64::MAX, i64::MIN), |(low, high), x| (low.min(x), high.max(x)));
        if low > high {
            (0, 1)
        } else if low == high {
            (low, high + 1)
        } else {
            (low, high)
        }
    }
}

impl Chart for LineChart {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let (x_low, x_high) = self.x_range();
        let top = self.points.iter().map(|(_, y)| *y).max().unwrap_or(0);
        let y_high = top + top / 10 + 1;
        let mut chart = ChartBuilder::on(area)
            .caption(&self.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_low..x_high, 0..y_high)?;
        chart.configure_mesh().x_desc(self.x_desc.as_str()).y_desc(self.y_desc.as_str()).draw()?;

        chart.draw_series(LineSeries::new(self.points.iter().copied(), &BLUE))?;
        if let Some(marker) = &self.marker {
            chart.draw_series(LineSeries::new(vec![(marker.x, 0), (marker.x, y_high)], &RED))?;
            let style = ("sans-serif", 14).into_font().transform(FontTransform::Rotate90).color(&RED);
            chart.draw_series(std::iter::once(Text::new(marker.label.clone(), (marker.x, y_high / 2), style)))?;
        }
        Ok(())
    }
}

/// Render `chart` to `path`. A `.svg` extension selects the SVG backend; other
/// extensions are rendered as bitmaps when the `png` feature is enabled.
pub fn save<C: Chart>(chart: &C, path: &Path, size: (u32, u32)) -> Result<()> {
    if path.extension().map_or(false, |ext| ext == "svg") {
        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        chart.draw(&root)?;
        root.present()?;
    } else {
        save_bitmap(chart, path, size)?;
    }
    info!("chart written to {}", path.display());
    Ok(())
}

#[cfg(feature = "png")]
fn save_bitmap<C: Chart>(chart: &C, path: &Path, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    chart.draw(&root)?;
    root.present()?;
    Ok(())
}

#[cfg(not(feature = "png"))]
fn save_bitmap<C: Chart>(_chart: &C, path: &Path, _size: (u32, u32)) -> Result<()> {
    Err(anyhow::anyhow!("cannot write {}: bitmap output needs the `png` feature, use a .svg path", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::CommitCount;
    use std::fs;

    #[test]
    fn test_version_color_is_fixed() {
        assert_eq!(version_color("JAVA1"), RGBColor(166, 206, 227));
        assert_eq!(version_color("JAVA8"), RGBColor(255, 127, 0));
        assert_eq!(version_color("JAVA5"), version_color("JAVA5"));
        assert_eq!(version_color("JAVA11"), BLACK);
        assert_eq!(version_color(""), BLACK);
    }

    #[test]
    fn test_version_colors_are_distinct() {
        for (i, a) in JavaVersion::ALL.iter().enumerate() {
            for b in &JavaVersion::ALL[i + 1..] {
                assert_ne!(version_color(a.label()), version_color(b.label()));
            }
        }
    }

    #[test]
    fn test_feature_bars_take_the_feature_version_color() {
        let features = vec![
            FeatureCount { feature: "Lambda".into(), count: 4, version: "JAVA8".into() },
            FeatureCount { feature: "Var".into(), count: 1, version: "JAVA10".into() },
        ];
        let chart = BarChart::features("features", &features);
        assert_eq!(chart.bars[0].color, version_color("JAVA8"));
        assert_eq!(chart.bars[1].color, BLACK);
        assert_eq!(chart.bars[0].value, 4);
    }

    #[test]
    fn test_line_chart_x_range_includes_marker() {
        let counts = vec![
            CommitCount { commit_id: "3".into(), occurrences: 2 },
            CommitCount { commit_id: "7".into(), occurrences: 5 },
        ];
        let series = CommitSeries::from_counts(&counts, 20).unwrap();
        let mut chart = LineChart::from_series("lambdas", &series);
        assert_eq!(chart.x_range(), (13, 17));
        chart.marker = Some(Marker { x: 25, label: "6b818ba".into() });
        assert_eq!(chart.x_range(), (13, 25));
        chart.points.clear();
        chart.marker = None;
        assert_eq!(chart.x_range(), (0, 1));
    }

    #[test]
    fn test_save_merged_chart_as_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ProjA_merged.svg");
        let versions = BarChart::versions("versions", &[("JAVA8".to_string(), 2), ("JAVA1".to_string(), 1)]);
        let chart = MergedChart { title: "ProjA".into(), columns: 2, panels: vec![versions.clone(), versions] };
        save(&chart, &path, (800, 600)).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("ProjA"));
    }

    #[test]
    fn test_save_line_chart_as_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lambda_count.svg");
        let counts = vec![
            CommitCount { commit_id: "1".into(), occurrences: 2 },
            CommitCount { commit_id: "2".into(), occurrences: 3 },
        ];
        let mut chart = LineChart::from_series("lambdas", &CommitSeries::from_counts(&counts, 10).unwrap());
        chart.marker = Some(Marker { x: 9, label: "6b818ba".into() });
        save(&chart, &path, (640, 480)).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("6b818ba"));
    }

    #[cfg(not(feature = "png"))]
    #[test]
    fn test_bitmap_output_needs_png_feature() {
        let dir = tempfile::tempdir().unwrap();
        let chart = BarChart::versions("versions", &[]);
        assert!(save(&chart, &dir.path().join("out.png"), (100, 100)).is_err());
    }
}
