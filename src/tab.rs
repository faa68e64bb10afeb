mod config_reader;
mod io_common;
mod io_report;
mod io_tab;

use log::{debug, info, warn};

use name_tally::builder::Builder;
use name_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use crate::tab::config_reader::*;
use crate::tab::io_common::*;
use crate::tab::io_report::*;
use crate::tab::io_tab::*;

#[derive(Debug, Snafu)]
pub enum TallyError {
    #[snafu(display("Invalid arguments: {source}"))]
    InvalidArguments { source: TallyErrors },
    #[snafu(display("Error opening config file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing config file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid configuration: {source}"))]
    InvalidConfig { source: TallyErrors },
    #[snafu(display("Error opening input file {path}"))]
    OpeningInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    ReadingLine {
        source: std::io::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error parsing line {lineno} of {path}"))]
    ParsingLine {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Malformed line {lineno} of {path}: {source}"))]
    MalformedRow {
        source: TallyErrors,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error creating output directory {path}"))]
    CreatingOutputDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing report {path}"))]
    WritingReport { source: csv::Error, path: String },
    #[snafu(display("Error flushing report {path}"))]
    FlushingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading report {path} for comparison"))]
    ReadingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Report {path} differs from the reference"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, TallyError>;

/// The settings of one run, as given on the command line.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunOptions {
    pub mode: String,
    pub gender_segregation: String,
    pub config_path: Option<String>,
    pub input_paths: Option<Vec<String>>,
    pub out_dir: Option<String>,
    pub reference_dir: Option<String>,
    pub unrecognized: Option<String>,
}

fn log_stats(tabulator: &Tabulator) {
    let stats = tabulator.stats();
    info!("Recorded {} rows", stats.rows_recorded);
    let counts: Vec<String> = stats
        .distinct_names
        .iter()
        .map(|(p, n)| format!("{} names: {}", p.label().unwrap_or("distinct"), n))
        .collect();
    info!("{}", counts.join(", "));

    let fate = match tabulator.rules().unrecognized {
        UnrecognizedPolicy::Drop => "dropped from the reports",
        UnrecognizedPolicy::Column => "reported as unrecognized",
    };
    for (code, count) in stats.unrecognized.iter() {
        warn!(
            "Ethnicity code {:?} is not in the list of ethnicities: {} occurrences {}",
            code, count, fate
        );
    }
}

/// Reads all the inputs, then writes one report per frequency table.
///
/// Returns the paths of the reports, in the order they were written.
pub fn run_tabulation(opts: &RunOptions) -> TallyResult<Vec<PathBuf>> {
    // Validate the arguments before reading anything.
    let mode: NameMode = opts.mode.parse().context(InvalidArgumentsSnafu {})?;
    let gender_segregation =
        parse_gender_segregation(&opts.gender_segregation).context(InvalidArgumentsSnafu {})?;
    let unrecognized: Option<UnrecognizedPolicy> = opts
        .unrecognized
        .as_deref()
        .map(|s| s.parse::<UnrecognizedPolicy>())
        .transpose()
        .context(InvalidArgumentsSnafu {})?;

    let config = match &opts.config_path {
        Some(p) => read_config(p)?,
        None => TallyConfig::default(),
    };
    debug!("config: {:?}", config);

    let builder: Builder = config.builder(mode, gender_segregation, unrecognized)?;
    let input_paths: Vec<PathBuf> = match &opts.input_paths {
        Some(paths) => paths.iter().map(PathBuf::from).collect(),
        None => config.input_paths(),
    };
    if input_paths.is_empty() {
        whatever!("No input files to tabulate")
    }
    let out_dir: String = opts
        .out_dir
        .clone()
        .or_else(|| config.output_directory.clone())
        .unwrap_or_else(|| ".".to_string());

    let mut tabulator = builder.build();
    for path in input_paths.iter() {
        let num_rows = tabulate_file(path, &mut tabulator)?;
        info!("{}: {} rows", simplify_file_name(path), num_rows);
    }
    log_stats(&tabulator);

    let mut written: Vec<PathBuf> = Vec::new();
    for report in tabulator.reports() {
        written.push(write_report(Path::new(&out_dir), &report, mode)?);
    }

    // The reference reports, if provided for comparison
    if let Some(reference_dir) = &opts.reference_dir {
        for p in written.iter() {
            check_against_reference(p, Path::new(reference_dir))?;
        }
    }

    Ok(written)
}
