//! # Datalens Command Line
//!
//! ```bash
//! datalens info data.csv
//! datalens stats data.csv --column Salary
//! datalens groups data.csv --numeric Salary --category Department
//! datalens insights data.csv --config thresholds.json
//! datalens report data.csv --json
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    datalens::logging::init(cli.verbose);
    cli::run_command(cli)
}
