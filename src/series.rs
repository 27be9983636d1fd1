use crate::{
    error::AdoptionError,
    ingest::ingest_directory_skipping,
    record::{Schema, UnifiedTable},
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::{collections::HashMap, path::Path};

/// Feature tracked by the commit counting tool unless told otherwise.
pub const DEFAULT_SERIES_FEATURE: &str = "TryWithResources";

/// File the commit counting tool writes and the time series tool reads.
pub const DEFAULT_COUNT_FILE: &str = "TWR_count.csv";

/// Header of the per-commit count csv. The count column keeps the `Version`
/// name that downstream notebooks already expect.
pub const COUNT_CSV_HEADER: [&str; 2] = ["commit_id", "Version"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitCount {
    pub commit_id: String,
    pub occurrences: usize,
}

fn commit_order_key(commit_id: &str) -> (Option<u64>, &str) {
    (commit_id.parse().ok(), commit_id)
}

/// Count the records of `feature` per commit, ordered by commit ordinal.
/// Commits in which the feature never occurs get no entry.
pub fn count_by_commit(table: &UnifiedTable, feature: &str) -> Vec<CommitCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CommitCount> = Vec::new();
    let mut without_commit = 0;
    for record in table.iter().filter(|record| record.feature == feature) {
        let commit_id = match record.commit_id.as_deref() {
            Some(commit_id) => commit_id,
            None => {
                without_commit += 1;
                continue;
            }
        };
        let slot = *index.entry(commit_id).or_insert_with(|| {
            counts.push(CommitCount { commit_id: commit_id.to_owned(), occurrences: 0 });
            counts.len() - 1
        });
        counts[slot].occurrences += 1;
    }
    if without_commit > 0 {
        debug!("{} {} records without a commit id skipped", without_commit, feature);
    }
    counts.sort_by(|a, b| commit_order_key(&a.commit_id).cmp(&commit_order_key(&b.commit_id)));
    counts
}

/// Count `feature` per commit over the detector output in `dir` and write the
/// counts to `output` inside it. A count file left there by an earlier run is
/// not read back as detector output.
pub fn count_commits_in(dir: &Path, feature: &str, output: &str) -> Result<Vec<CommitCount>> {
    let table = ingest_directory_skipping(dir, Schema::WithCommit, &[output])?;
    let counts = count_by_commit(&table, feature);
    write_commit_counts(&dir.join(output), &counts)?;
    Ok(counts)
}

pub fn write_commit_counts(path: &Path, counts: &[CommitCount]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(COUNT_CSV_HEADER)?;
    for count in counts {
        let occurrences = count.occurrences.to_string();
        writer.write_record([count.commit_id.as_str(), occurrences.as_str()])?;
    }
    writer.flush()?;
    info!("{} commits written to {}", counts.len(), path.display());
    Ok(())
}

pub fn read_commit_counts(path: &Path) -> Result<Vec<CommitCount>> {
    let mut reader = csv::Reader::from_path(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut counts = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("failed to parse {}", path.display()))?;
        let commit_id = row.get(0).unwrap_or("").to_owned();
        let value = row.get(1).unwrap_or("");
        let occurrences = value
            .trim()
            .parse()
            .map_err(|_| AdoptionError::InvalidCount { commit_id: commit_id.clone(), value: value.to_owned() })?;
        counts.push(CommitCount { commit_id, occurrences });
    }
    Ok(counts)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub commit_id: String,
    /// `total_commits - commit ordinal`
    pub counter: i64,
    pub occurrences: usize,
}

/// Occurrence counts laid out on the commit counter axis, in ascending counter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSeries {
    points: Vec<SeriesPoint>,
}

impl CommitSeries {
    /// `total_commits` is the number of commits in the analysed history; it is
    /// not derivable from the counts, which only cover the sampled commits.
    pub fn from_counts(counts: &[CommitCount], total_commits: i64) -> Result<Self> {
        let mut points = counts
            .iter()
            .map(|count| -> Result<SeriesPoint> {
                let ordinal: i64 = count
                    .commit_id
                    .trim()
                    .parse()
                    .map_err(|_| AdoptionError::InvalidCommitId(count.commit_id.clone()))?;
                Ok(SeriesPoint {
                    commit_id: count.commit_id.clone(),
                    counter: total_commits - ordinal,
                    occurrences: count.occurrences,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        points.sort_by_key(|point| point.counter);
        Ok(Self { points })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn counter_range(&self) -> Option<(i64, i64)> {
        Some((self.points.first()?.counter, self.points.last()?.counter))
    }

    pub fn max_occurrences(&self) -> usize {
        self.points.iter().map(|point| point.occurrences).max().unwrap_or(0)
    }
}
