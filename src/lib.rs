//! Aggregation of Java feature detector output: csv ingestion, group-by counts,
//! dense summary tables, commit time series, and their text and chart renderings.

pub mod aggregate;
pub mod error;
pub mod ingest;
pub mod plot;
pub mod record;
pub mod render;
pub mod series;

pub use aggregate::{
    count_by_feature, count_by_version, feature_matrix, partition, version_matrix, version_percentages,
    versions_descending, FeatureCount, FeatureMatrix, VersionMatrix, VersionPolicy, TEST_URL_MARKER,
};
pub use error::AdoptionError;
pub use ingest::{
    commit_id_from_file_name, ingest_directory, ingest_directory_skipping, ingest_file, resolve_input_dir,
};
pub use record::{FeatureRecord, JavaVersion, Schema, UnifiedTable};
pub use render::{percentage_table, TableStyle, TextTable};
pub use series::{
    count_by_commit, count_commits_in, read_commit_counts, write_commit_counts, CommitCount, CommitSeries, SeriesPoint,
    DEFAULT_COUNT_FILE, DEFAULT_SERIES_FEATURE,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// The worked example: three rows across two projects, one of them test code.
    #[test]
    fn test_end_to_end_example() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("features_1.csv"),
            "JAVA1,Lambda,src/A.java,ProjA\nJAVA8,Record,test/B.java,ProjA\nJAVA1,Lambda,src/C.java,ProjB\n",
        )
        .unwrap();
        let table = ingest_directory(dir.path(), Schema::Basic).unwrap();

        let matrix = version_matrix(&table);
        assert_eq!(matrix.projects().len(), 2);
        for version in JavaVersion::ALL {
            let expected_a = matches!(version, JavaVersion::Java1 | JavaVersion::Java8) as usize;
            let expected_b = (version == JavaVersion::Java1) as usize;
            assert_eq!(matrix.get("ProjA", version), expected_a, "ProjA {}", version);
            assert_eq!(matrix.get("ProjB", version), expected_b, "ProjB {}", version);
        }

        let (tests, sources) = partition(&table, TEST_URL_MARKER);
        assert_eq!(tests.len(), 1);
        assert_eq!(sources.len(), 2);

        let counts = count_by_version(&table);
        assert_eq!(counts.values().sum::<usize>(), table.len());
        let percentages = version_percentages(&counts, table.len());
        assert!((percentages.values().sum::<f64>() - 100.0).abs() < 1e-9);
    }
}
