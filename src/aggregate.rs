//! Group-by and count operations over a [`UnifiedTable`].
//!
//! Dense tables are built in two passes: the distinct keys are collected first
//! (in first-seen order), then a zero-filled grid indexed by that key set is
//! filled in.

use crate::{
    error::AdoptionError,
    record::{FeatureRecord, JavaVersion, UnifiedTable},
};
use log::warn;
use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

/// Substring marking a record's url as test code.
pub const TEST_URL_MARKER: &str = "test";

/// Count records per version label. Labels outside `JAVA1..JAVA8` are counted too,
/// so the counts always add up to the number of records.
pub fn count_by_version(table: &UnifiedTable) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in table.iter() {
        *counts.entry(record.version.clone()).or_default() += 1;
    }
    counts
}

/// Version counts ordered by label, highest version first.
pub fn versions_descending(counts: &BTreeMap<String, usize>) -> Vec<(String, usize)> {
    counts.iter().rev().map(|(label, count)| (label.clone(), *count)).collect()
}

/// Express each version count as a percentage of `total_rows`, over the fixed
/// `JAVA1..JAVA8` domain. Absent versions are `0.0`.
pub fn version_percentages(counts: &BTreeMap<String, usize>, total_rows: usize) -> BTreeMap<JavaVersion, f64> {
    JavaVersion::ALL
        .iter()
        .map(|version| {
            let count = counts.get(version.label()).copied().unwrap_or(0);
            let percentage = if total_rows == 0 { 0.0 } else { count as f64 / total_rows as f64 * 100.0 };
            (*version, percentage)
        })
        .collect()
}

/// How a feature that appears under several versions is attributed to one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPolicy {
    /// The version of the first record seen for the feature.
    FirstSeen,
    /// The most frequent version; ties go to the one seen first.
    Majority,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        VersionPolicy::FirstSeen
    }
}

impl FromStr for VersionPolicy {
    type Err = AdoptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-seen" => Ok(VersionPolicy::FirstSeen),
            "majority" => Ok(VersionPolicy::Majority),
            _ => Err(AdoptionError::UnknownPolicy(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCount {
    pub feature: String,
    pub count: usize,
    /// Version the feature is attributed to, per the [`VersionPolicy`] in use.
    pub version: String,
}

/// Count records per feature name, most used feature first (ties by name).
pub fn count_by_feature(table: &UnifiedTable, policy: VersionPolicy) -> Vec<FeatureCount> {
    // feature -> (count, versions in first-seen order with their counts)
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, usize, Vec<(&str, usize)>)> = Vec::new();
    for record in table.iter() {
        let slot = *index.entry(record.feature.as_str()).or_insert_with(|| {
            groups.push((record.feature.as_str(), 0, Vec::new()));
            groups.len() - 1
        });
        let (_, count, versions) = &mut groups[slot];
        *count += 1;
        match versions.iter_mut().find(|(label, _)| *label == record.version) {
            Some((_, n)) => *n += 1,
            None => versions.push((record.version.as_str(), 1)),
        }
    }

    let mut features: Vec<FeatureCount> = groups
        .into_iter()
        .map(|(feature, count, versions)| {
            let version = match policy {
                VersionPolicy::FirstSeen => versions.first(),
                // max_by_key keeps the last maximum, so walk the versions backwards
                VersionPolicy::Majority => versions.iter().rev().max_by_key(|(_, n)| *n),
            }
            .map(|(label, _)| label.to_string())
            .unwrap_or_default();
            FeatureCount { feature: feature.to_owned(), count, version }
        })
        .collect();
    features.sort_by(|a, b| (Reverse(a.count), &a.feature).cmp(&(Reverse(b.count), &b.feature)));
    features
}

/// Split a table into records whose url contains `needle` and the rest.
/// The match is a plain, case-sensitive substring match.
pub fn partition(table: &UnifiedTable, needle: &str) -> (UnifiedTable, UnifiedTable) {
    let (matching, rest): (Vec<FeatureRecord>, Vec<FeatureRecord>) =
        table.iter().cloned().partition(|record| record.url.contains(needle));
    (matching.into(), rest.into())
}

/// Collect distinct values in first-seen order, along with a lookup from value to position.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> (Vec<String>, HashMap<&'a str, usize>) {
    let mut keys = Vec::new();
    let mut index = HashMap::new();
    for value in values {
        index.entry(value).or_insert_with(|| {
            keys.push(value.to_owned());
            keys.len() - 1
        });
    }
    (keys, index)
}

/// Project x version cross tabulation, one row per project over all eight versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMatrix {
    projects: Vec<String>,
    cells: Vec<[usize; 8]>,
}

impl VersionMatrix {
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn row(&self, project: &str) -> Option<&[usize; 8]> {
        self.projects.iter().position(|p| p == project).map(|i| &self.cells[i])
    }

    pub fn get(&self, project: &str, version: JavaVersion) -> usize {
        self.row(project).map_or(0, |row| row[version.index()])
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[usize; 8])> {
        self.projects.iter().map(String::as_str).zip(self.cells.iter())
    }
}

pub fn version_matrix(table: &UnifiedTable) -> VersionMatrix {
    let (projects, index) = distinct(table.iter().map(|r| r.project_name.as_str()));
    let mut cells = vec![[0; 8]; projects.len()];
    let mut unknown = 0;
    for record in table.iter() {
        match record.java_version() {
            Some(version) => cells[index[record.project_name.as_str()]][version.index()] += 1,
            None => unknown += 1,
        }
    }
    if unknown > 0 {
        warn!("{} records with a version label outside JAVA1..JAVA8 left out of the version table", unknown);
    }
    VersionMatrix { projects, cells }
}

/// Project x feature cross tabulation, projects and features in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMatrix {
    projects: Vec<String>,
    features: Vec<String>,
    cells: Vec<Vec<usize>>,
}

impl FeatureMatrix {
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn get(&self, project: &str, feature: &str) -> usize {
        let row = self.projects.iter().position(|p| p == project);
        let column = self.features.iter().position(|f| f == feature);
        match (row, column) {
            (Some(row), Some(column)) => self.cells[row][column],
            _ => 0,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.projects.iter().map(String::as_str).zip(self.cells.iter().map(Vec::as_slice))
    }
}

pub fn feature_matrix(table: &UnifiedTable) -> FeatureMatrix {
    let (projects, project_index) = distinct(table.iter().map(|r| r.project_name.as_str()));
    let (features, feature_index) = distinct(table.iter().map(|r| r.feature.as_str()));
    let mut cells = vec![vec![0; features.len()]; projects.len()];
    for record in table.iter() {
        cells[project_index[record.project_name.as_str()]][feature_index[record.feature.as_str()]] += 1;
    }
    FeatureMatrix { projects, features, cells }
}
