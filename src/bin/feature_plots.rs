use adoption::{
    count_by_feature, count_by_version, ingest_file, partition, percentage_table,
    plot::{self, BarChart, MergedChart},
    resolve_input_dir, version_percentages, versions_descending, Schema, TableStyle, UnifiedTable, VersionPolicy,
    TEST_URL_MARKER,
};
use anyhow::Result;
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

/// Chart version and feature usage of one project, for all code, test code and
/// source code, and print the version percentages.
#[derive(StructOpt)]
struct Options {
    /// Detector output of the project
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Project name, used for the chart title and the output file name
    project: String,
    /// How a feature seen under several versions is coloured: first-seen or majority
    #[structopt(long, default_value = "first-seen")]
    policy: VersionPolicy,
    /// Url substring marking test code
    #[structopt(long, default_value = TEST_URL_MARKER)]
    test_marker: String,
    /// Chart file extension, svg or png (png needs the `png` feature)
    #[structopt(long, default_value = "svg")]
    format: String,
}

/// The versions panel and the features panel for one slice of the table.
fn panels(table: &UnifiedTable, policy: VersionPolicy, suffix: &str) -> [BarChart; 2] {
    let versions = versions_descending(&count_by_version(table));
    let features = count_by_feature(table, policy);
    [
        BarChart::versions(format!("Number of features per Java version{}", suffix), &versions),
        BarChart::features(format!("Number of times each feature is used{}", suffix), &features),
    ]
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let options = Options::from_args();

    let table = ingest_file(&options.input, Schema::Basic)?;
    let (tests, sources) = partition(&table, &options.test_marker);
    info!("{} records, {} in tests, {} in sources", table.len(), tests.len(), sources.len());

    // Rows: all code, tests, sources. Columns: versions, features.
    let mut chart_panels = Vec::with_capacity(6);
    chart_panels.extend(panels(&table, options.policy, ""));
    chart_panels.extend(panels(&tests, options.policy, " - TESTS"));
    chart_panels.extend(panels(&sources, options.policy, " - SRC"));
    let chart = MergedChart { title: options.project.clone(), columns: 2, panels: chart_panels };
    let output = resolve_input_dir(&options.input).join(format!("{}_merged.{}", options.project, options.format));
    plot::save(&chart, &output, (1500, 1000))?;

    // Every share is relative to the whole table, so tests and sources add up to the total
    let total = version_percentages(&count_by_version(&table), table.len());
    let test_share = version_percentages(&count_by_version(&tests), table.len());
    let source_share = version_percentages(&count_by_version(&sources), table.len());
    percentage_table(&[("Total", &total), ("Test", &test_share), ("Src", &source_share)]).print(TableStyle::Grid);
    Ok(())
}
