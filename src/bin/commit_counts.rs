use adoption::{count_commits_in, DEFAULT_COUNT_FILE, DEFAULT_SERIES_FEATURE};
use anyhow::Result;
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

/// Count the occurrences of one feature per commit. Each csv file in the
/// directory holds the detector output of one commit, named `<prefix>_<commit>.csv`.
#[derive(StructOpt)]
struct Options {
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Feature name to count
    #[structopt(long, default_value = DEFAULT_SERIES_FEATURE)]
    feature: String,
    /// Output file name, written inside the input directory and skipped when reading it
    #[structopt(long, default_value = DEFAULT_COUNT_FILE)]
    output: String,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let options = Options::from_args();

    let counts = count_commits_in(&options.input, &options.feature, &options.output)?;
    info!(
        "{} occurrences of {} across {} commits",
        counts.iter().map(|c| c.occurrences).sum::<usize>(),
        options.feature,
        counts.len()
    );
    Ok(())
}
