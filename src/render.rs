//! Plain text rendering of summary tables, in a bordered grid style and a
//! borderless plain style.

use crate::{
    aggregate::{FeatureMatrix, VersionMatrix},
    record::JavaVersion,
    series::CommitSeries,
};
use comfy_table::{
    presets::{ASCII_FULL_CONDENSED, NOTHING},
    CellAlignment, Table,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// `+---+` borders around the table, `+===+` under the header.
    Grid,
    /// Space separated columns, no borders.
    Plain,
}

/// A table of text cells with a header row. Cells may span several lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self { headers: headers.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Stack the characters of every header after the first one on top of each
    /// other, so wide feature names don't blow up the column widths.
    pub fn with_vertical_headers(mut self) -> Self {
        for header in self.headers.iter_mut().skip(1) {
            *header = header.chars().map(String::from).collect::<Vec<_>>().join("\n");
        }
        self
    }

    fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).chain(Some(self.headers.len())).max().unwrap_or(0)
    }

    /// Columns whose body cells are all numbers are right aligned.
    fn numeric_columns(&self) -> Vec<bool> {
        (0..self.column_count())
            .map(|column| {
                !self.rows.is_empty()
                    && self.rows.iter().all(|row| {
                        let cell = row.get(column).map_or("", |cell| cell.trim());
                        !cell.is_empty() && cell.parse::<f64>().is_ok()
                    })
            })
            .collect()
    }

    pub fn render(&self, style: TableStyle) -> String {
        let mut table = Table::new();
        table.load_preset(match style {
            TableStyle::Grid => ASCII_FULL_CONDENSED,
            TableStyle::Plain => NOTHING,
        });
        table.set_header(&self.headers);
        for row in &self.rows {
            table.add_row(row);
        }
        for (index, numeric) in self.numeric_columns().into_iter().enumerate() {
            if !numeric {
                continue;
            }
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
        table.to_string().lines().map(|line| format!("{}\n", line.trim_end())).collect()
    }

    pub fn print(&self, style: TableStyle) {
        print!("{}", self.render(style));
    }
}

impl From<&VersionMatrix> for TextTable {
    fn from(matrix: &VersionMatrix) -> Self {
        let mut table = TextTable::new(Some("").into_iter().chain(JavaVersion::ALL.iter().map(|v| v.label())));
        for (project, counts) in matrix.rows() {
            table.push_row(Some(project.to_owned()).into_iter().chain(counts.iter().map(usize::to_string)));
        }
        table
    }
}

impl From<&FeatureMatrix> for TextTable {
    fn from(matrix: &FeatureMatrix) -> Self {
        let mut table = TextTable::new(Some("").into_iter().chain(matrix.features().iter().map(String::as_str)));
        for (project, counts) in matrix.rows() {
            table.push_row(Some(project.to_owned()).into_iter().chain(counts.iter().map(usize::to_string)));
        }
        table
    }
}

impl From<&CommitSeries> for TextTable {
    fn from(series: &CommitSeries) -> Self {
        let mut table = TextTable::new(["commit_id", "Occurrences", "Commit"]);
        for point in series.points() {
            table.push_row([point.commit_id.clone(), point.occurrences.to_string(), point.counter.to_string()]);
        }
        table
    }
}

/// One row per version, one column per named percentage breakdown.
pub fn percentage_table(columns: &[(&str, &BTreeMap<JavaVersion, f64>)]) -> TextTable {
    let mut table = TextTable::new(Some("Version").into_iter().chain(columns.iter().map(|(name, _)| *name)));
    for version in JavaVersion::ALL.iter() {
        let mut row = vec![version.label().to_owned()];
        for (_, percentages) in columns {
            row.push(format!("{:.2}", percentages.get(version).copied().unwrap_or(0.0)));
        }
        table.push_row(row);
    }
    table
}
