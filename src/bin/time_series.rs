use adoption::{
    plot::{self, LineChart, Marker},
    read_commit_counts, CommitSeries, TableStyle, TextTable, DEFAULT_COUNT_FILE,
};
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use structopt::StructOpt;

/// Plot per-commit occurrence counts against the commit counter
/// (`total commits - commit ordinal`).
#[derive(StructOpt)]
struct Options {
    /// Directory holding the per-commit count csv
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Number of commits in the analysed history
    #[structopt(env = "TOTAL_COMMITS")]
    total_commits: i64,
    /// Count csv file name inside the input directory
    #[structopt(long, default_value = DEFAULT_COUNT_FILE)]
    counts: String,
    /// Chart file name inside the input directory
    #[structopt(long, default_value = "TWR_count.svg")]
    output: String,
    #[structopt(long, default_value = "Try-with-resources usage")]
    title: String,
    #[structopt(long, default_value = "Number of times try-with-resources is used")]
    y_desc: String,
    /// Commit counter at which to draw a vertical marker
    #[structopt(long)]
    marker: Option<i64>,
    /// Text drawn along the marker, e.g. the commit hash
    #[structopt(long, requires = "marker")]
    marker_label: Option<String>,
}

fn main() -> Result<()> {
    // Load from .env file if it is present, TOTAL_COMMITS can be pinned there
    dotenv::dotenv().ok();
    env_logger::init();
    let options = Options::from_args();

    let counts = read_commit_counts(&options.input.join(&options.counts))?;
    let series = CommitSeries::from_counts(&counts, options.total_commits)?;
    if series.is_empty() {
        return Err(anyhow!("no commits in {}", options.counts));
    }
    TextTable::from(&series).print(TableStyle::Plain);

    let mut chart = LineChart::from_series(options.title, &series);
    chart.y_desc = options.y_desc;
    chart.marker = options.marker.map(|x| Marker { x, label: options.marker_label.unwrap_or_default() });
    plot::save(&chart, &options.input.join(&options.output), (1000, 600))
}
