use adoption::{feature_matrix, ingest_directory, resolve_input_dir, version_matrix, Schema, TableStyle, TextTable};
use anyhow::Result;
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

/// Print the project x version and project x feature tables for every csv file
/// in a directory.
#[derive(StructOpt)]
struct Options {
    /// Directory of detector output, or any file inside it
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Print feature names across instead of one character per line
    #[structopt(long)]
    horizontal_headers: bool,
}

fn main() -> Result<()> {
    // Load from .env file if it is present
    dotenv::dotenv().ok();
    env_logger::init();
    let options = Options::from_args();

    let dir = resolve_input_dir(&options.input);
    let table = ingest_directory(&dir, Schema::Basic)?;
    info!("{} feature records read from {}", table.len(), dir.display());

    let versions = TextTable::from(&version_matrix(&table));
    let mut features = TextTable::from(&feature_matrix(&table));
    if !options.horizontal_headers {
        features = features.with_vertical_headers();
    }

    for style in [TableStyle::Grid, TableStyle::Plain] {
        versions.print(style);
        features.print(style);
    }
    Ok(())
}
