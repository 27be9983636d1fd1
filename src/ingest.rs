use crate::{
    error::AdoptionError,
    record::{Schema, UnifiedTable},
};
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

lazy_static! {
    // `<prefix>_<commit_id>.<ext>`: the token after the first underscore, up to the next `_` or `.`
    static ref COMMIT_ID_IN_FILE_NAME: Regex = Regex::new(r"^[^_]*_([^_.]+)").unwrap();
}

/// Extract the commit id a file name carries, e.g. `data_1234.csv` -> `1234`.
pub fn commit_id_from_file_name(file_name: &str) -> Option<String> {
    COMMIT_ID_IN_FILE_NAME.captures(file_name).map(|captures| captures[1].to_string())
}

/// Directories are used as is, anything else stands for the directory it lives in.
pub fn resolve_input_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// List the `.csv` files directly inside `dir`, sorted by file name.
pub fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))? {
        let path = entry?.path();
        let is_csv = path.file_name().and_then(|n| n.to_str()).map_or(false, |n| n.ends_with(".csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read one headerless csv file with the given column layout.
///
/// Rows that are shorter or longer than the layout are kept, and a warning
/// with the number of such rows is logged for the file.
pub fn ingest_file(path: &Path, schema: Schema) -> Result<UnifiedTable> {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let file_commit_id = commit_id_from_file_name(&file_name);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut table = UnifiedTable::new();
    let mut short_rows = 0;
    let mut long_rows = 0;
    for row in reader.records() {
        let row = row.with_context(|| format!("failed to parse {}", path.display()))?;
        if row.len() < schema.width() {
            short_rows += 1;
        } else if row.len() > schema.width() {
            long_rows += 1;
        }
        let mut record = schema.record_from(row.iter());
        if record.commit_id.is_none() {
            record.commit_id = file_commit_id.clone();
            if schema.has_commit_column() && record.commit_id.is_none() {
                return Err(AdoptionError::MissingCommitId(file_name).into());
            }
        }
        table.push(record);
    }

    if short_rows > 0 {
        warn!(
            "{}: {} rows have fewer than {} fields, missing values left empty",
            path.display(),
            short_rows,
            schema.width()
        );
    }
    if long_rows > 0 {
        warn!("{}: {} rows have more than {} fields, extra values ignored", path.display(), long_rows, schema.width());
    }
    debug!("{}: {} rows", path.display(), table.len());
    Ok(table)
}

/// Read every csv file in `dir` into one table.
pub fn ingest_directory(dir: &Path, schema: Schema) -> Result<UnifiedTable> {
    ingest_directory_skipping(dir, schema, &[])
}

/// Like [`ingest_directory`], leaving out the files named in `skip`. Tools
/// that write their output next to their input use it to pass over that output.
pub fn ingest_directory_skipping(dir: &Path, schema: Schema, skip: &[&str]) -> Result<UnifiedTable> {
    let mut files = csv_files_in(dir)?;
    files.retain(|file| {
        let skipped = file.file_name().and_then(|n| n.to_str()).map_or(false, |n| skip.contains(&n));
        if skipped {
            debug!("{}: skipped", file.display());
        }
        !skipped
    });
    if files.is_empty() {
        return Err(AdoptionError::MissingInput(dir.to_path_buf()).into());
    }
    let mut table = UnifiedTable::new();
    for file in files {
        table.append(ingest_file(&file, schema)?);
    }
    debug!("{}: {} rows in total", dir.display(), table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FeatureRecord;
    use std::fs;

    #[test]
    fn test_commit_id_from_file_name() {
        assert_eq!(commit_id_from_file_name("data_1234.csv").as_deref(), Some("1234"));
        assert_eq!(commit_id_from_file_name("mockito_17_old.csv").as_deref(), Some("17"));
        assert_eq!(commit_id_from_file_name("_9.csv").as_deref(), Some("9"));
        assert_eq!(commit_id_from_file_name("data.csv"), None);
        assert_eq!(commit_id_from_file_name("data_.csv"), None);
    }

    #[test]
    fn test_ingest_directory_concatenates_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_1.csv"), "JAVA1,Lambda,src/A.java,ProjA\nJAVA8,Record,test/B.java,ProjA\n")
            .unwrap();
        fs::write(dir.path().join("b_2.csv"), "JAVA1,Lambda,src/C.java,ProjB\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "JAVA5,Generics,src/D.java,ProjC\n").unwrap();

        let table = ingest_directory(dir.path(), Schema::Basic).unwrap();
        assert_eq!(
            table.records(),
            &[
                FeatureRecord::new("JAVA1", "Lambda", "src/A.java", "ProjA").with_commit("1"),
                FeatureRecord::new("JAVA8", "Record", "test/B.java", "ProjA").with_commit("1"),
                FeatureRecord::new("JAVA1", "Lambda", "src/C.java", "ProjB").with_commit("2"),
            ]
        );
    }

    #[test]
    fn test_ingest_directory_without_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "nothing here").unwrap();
        let error = ingest_directory(dir.path(), Schema::Basic).unwrap_err();
        assert!(matches!(error.downcast_ref::<AdoptionError>(), Some(AdoptionError::MissingInput(_))));
    }

    #[test]
    fn test_ingest_file_keeps_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(&path, "JAVA1,Lambda\nJAVA2,Assert,src/A.java,ProjA,extra\n").unwrap();
        let table = ingest_file(&path, Schema::Basic).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].url, "");
        assert_eq!(table.records()[1].project_name, "ProjA");
        assert_eq!(table.records()[1].commit_id, None);
    }

    #[test]
    fn test_ingest_file_commit_id_from_column_or_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_42.csv");
        fs::write(&path, "JAVA7,TryWithResources,src/A.java,ProjA,7\nJAVA7,TryWithResources,src/B.java,ProjA,\n")
            .unwrap();
        let table = ingest_file(&path, Schema::WithCommit).unwrap();
        assert_eq!(table.records()[0].commit_id.as_deref(), Some("7"));
        assert_eq!(table.records()[1].commit_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_ingest_file_requires_commit_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        fs::write(&path, "JAVA7,TryWithResources,src/A.java,ProjA\n").unwrap();
        let error = ingest_file(&path, Schema::WithCommit).unwrap_err();
        assert!(matches!(error.downcast_ref::<AdoptionError>(), Some(AdoptionError::MissingCommitId(_))));
    }

    #[test]
    fn test_ingest_file_empty_commit_token_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_.csv");
        fs::write(&path, "JAVA7,TryWithResources,src/A.java,ProjA\n").unwrap();
        let error = ingest_file(&path, Schema::WithCommit).unwrap_err();
        assert!(matches!(error.downcast_ref::<AdoptionError>(), Some(AdoptionError::MissingCommitId(_))));
    }

    #[test]
    fn test_ingest_directory_skipping() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_1.csv"), "JAVA1,Lambda,src/A.java,ProjA\n").unwrap();
        fs::write(dir.path().join("TWR_count.csv"), "commit_id,Version\n1,1\n").unwrap();

        let table = ingest_directory_skipping(dir.path(), Schema::Basic, &["TWR_count.csv"]).unwrap();
        assert_eq!(table.records(), &[FeatureRecord::new("JAVA1", "Lambda", "src/A.java", "ProjA").with_commit("1")]);

        let error = ingest_directory_skipping(dir.path(), Schema::Basic, &["a_1.csv", "TWR_count.csv"]).unwrap_err();
        assert!(matches!(error.downcast_ref::<AdoptionError>(), Some(AdoptionError::MissingInput(_))));
    }

    #[test]
    fn test_resolve_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data_1.csv");
        fs::write(&file, "").unwrap();
        assert_eq!(resolve_input_dir(dir.path()), dir.path());
        assert_eq!(resolve_input_dir(&file), dir.path());
        assert_eq!(resolve_input_dir(Path::new("data_1.csv")), PathBuf::from("."));
    }
}
