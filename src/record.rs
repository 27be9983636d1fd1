use crate::error::AdoptionError;
use std::{fmt, str::FromStr};

/// The eight Java language generations a feature can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaVersion {
    Java1,
    Java2,
    Java3,
    Java4,
    Java5,
    Java6,
    Java7,
    Java8,
}

impl JavaVersion {
    pub const ALL: [JavaVersion; 8] = [
        JavaVersion::Java1,
        JavaVersion::Java2,
        JavaVersion::Java3,
        JavaVersion::Java4,
        JavaVersion::Java5,
        JavaVersion::Java6,
        JavaVersion::Java7,
        JavaVersion::Java8,
    ];

    pub fn label(self) -> &'static str {
        match self {
            JavaVersion::Java1 => "JAVA1",
            JavaVersion::Java2 => "JAVA2",
            JavaVersion::Java3 => "JAVA3",
            JavaVersion::Java4 => "JAVA4",
            JavaVersion::Java5 => "JAVA5",
            JavaVersion::Java6 => "JAVA6",
            JavaVersion::Java7 => "JAVA7",
            JavaVersion::Java8 => "JAVA8",
        }
    }

    /// Position in `ALL`, used as the column index of dense tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JavaVersion {
    type Err = AdoptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JavaVersion::ALL
            .iter()
            .copied()
            .find(|v| v.label() == s)
            .ok_or_else(|| AdoptionError::UnknownVersion(s.to_owned()))
    }
}

/// One detected feature usage, as emitted by the feature detector.
///
/// The version label is kept verbatim so that rows carrying an unexpected
/// label still take part in plain counts; [`FeatureRecord::java_version`]
/// resolves it against the fixed domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub version: String,
    pub feature: String,
    pub url: String,
    pub project_name: String,
    pub commit_id: Option<String>,
}

impl FeatureRecord {
    pub fn new(
        version: impl Into<String>,
        feature: impl Into<String>,
        url: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            feature: feature.into(),
            url: url.into(),
            project_name: project_name.into(),
            commit_id: None,
        }
    }

    pub fn with_commit(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = Some(commit_id.into());
        self
    }

    pub fn java_version(&self) -> Option<JavaVersion> {
        self.version.parse().ok()
    }
}

/// Positional column layouts produced by the feature detector. Files are headerless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// `Version, Feature, Url, ProjectName`
    Basic,
    /// `Version, Count, Url, ProjectName, commit_id`, where `Count` holds the feature name
    WithCommit,
}

impl Schema {
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Schema::Basic => &["Version", "Feature", "Url", "ProjectName"],
            Schema::WithCommit => &["Version", "Count", "Url", "ProjectName", "commit_id"],
        }
    }

    pub fn width(self) -> usize {
        self.headers().len()
    }

    pub fn has_commit_column(self) -> bool {
        self == Schema::WithCommit
    }

    /// Build a record from positional fields. Missing trailing fields become empty strings.
    pub fn record_from<'a>(self, fields: impl IntoIterator<Item = &'a str>) -> FeatureRecord {
        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or("").to_owned();
        let mut record = FeatureRecord::new(next(), next(), next(), next());
        if self.has_commit_column() {
            let commit_id = next();
            if !commit_id.is_empty() {
                record.commit_id = Some(commit_id);
            }
        }
        record
    }
}

/// Every record read in one run, in file then row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedTable {
    records: Vec<FeatureRecord>,
}

impl UnifiedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FeatureRecord) {
        self.records.push(record);
    }

    pub fn append(&mut self, other: UnifiedTable) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }
}

impl From<Vec<FeatureRecord>> for UnifiedTable {
    fn from(records: Vec<FeatureRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<FeatureRecord> for UnifiedTable {
    fn from_iter<I: IntoIterator<Item = FeatureRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_labels() {
        for (i, version) in JavaVersion::ALL.iter().enumerate() {
            assert_eq!(version.index(), i);
            assert_eq!(version.label().parse::<JavaVersion>().unwrap(), *version);
        }
        assert_eq!(JavaVersion::Java8.to_string(), "JAVA8");
        assert!("JAVA9".parse::<JavaVersion>().is_err());
        assert!("java1".parse::<JavaVersion>().is_err());
    }

    #[test]
    fn test_record_from_basic_fields() {
        let record = Schema::Basic.record_from(vec!["JAVA7", "Try With Resources", "src/A.java", "ProjA"]);
        assert_eq!(record, FeatureRecord::new("JAVA7", "Try With Resources", "src/A.java", "ProjA"));
        assert_eq!(record.java_version(), Some(JavaVersion::Java7));
    }

    #[test]
    fn test_record_from_short_row() {
        let record = Schema::WithCommit.record_from(vec!["JAVA8", "Lambda"]);
        assert_eq!(record.url, "");
        assert_eq!(record.project_name, "");
        assert_eq!(record.commit_id, None);
    }

    #[test]
    fn test_record_from_commit_fields() {
        let record = Schema::WithCommit.record_from(vec!["JAVA7", "TryWithResources", "src/A.java", "ProjA", "12"]);
        assert_eq!(record.feature, "TryWithResources");
        assert_eq!(record.commit_id.as_deref(), Some("12"));
    }
}
