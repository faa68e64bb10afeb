use clap::Parser;
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snafu::{prelude::*, Snafu};

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// The columns of the statewide voter file kept in the sample, in order.
const KEPT_COLUMNS: [usize; 14] = [0, 1, 9, 10, 11, 16, 25, 26, 27, 28, 29, 46, 47, 67];

const PROGRESS_INTERVAL: u64 = 100_000;

/// Extracts a random sample of the rows and a subset of the columns of a statewide voter file.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// (file path) The tab-delimited statewide voter file.
    #[clap(short, long, value_parser, default_value = "ncvoter_Statewide.txt")]
    input: String,

    /// (file path) Where the comma-delimited sample is written.
    #[clap(short, long, value_parser, default_value = "ncvoter_Statewide_sample.csv")]
    out: String,

    /// (between 0 and 1) The probability of keeping each row.
    #[clap(long, value_parser, default_value_t = 0.05)]
    rate: f64,

    /// (integer, optional) Makes the sample reproducible. Without it, every run draws a different sample.
    #[clap(long, value_parser)]
    seed: Option<u64>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    verbose: bool,
}

#[derive(Debug, Snafu)]
enum SampleError {
    #[snafu(display("The sampling rate must be between 0 and 1, got {rate}"))]
    InvalidRate { rate: f64 },
    #[snafu(display("Error opening input file {path}"))]
    OpeningInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Input file {path} has no header line"))]
    EmptyInput { path: String },
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
    #[snafu(display("Line {lineno} of {path} has {width} fields, column {index} is required"))]
    LineTooShort {
        path: String,
        lineno: usize,
        index: usize,
        width: usize,
    },
    #[snafu(display("Error writing sample {path}"))]
    WritingSample { source: csv::Error, path: String },
    #[snafu(display("Error flushing sample {path}"))]
    FlushingSample {
        source: std::io::Error,
        path: String,
    },
}

type SampleResult<T> = Result<T, SampleError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct SampleStats {
    rows_read: u64,
    rows_kept: u64,
}

/// Splits one physical line into its fields. A blank line has no field.
fn parse_line(line: &[u8]) -> csv::Result<csv::ByteRecord> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let mut record = csv::ByteRecord::new();
    if !line.is_empty() {
        csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_reader(line)
            .read_byte_record(&mut record)?;
    }
    Ok(record)
}

fn project<'a>(
    record: &'a csv::ByteRecord,
    path: &str,
    lineno: usize,
) -> SampleResult<Vec<&'a [u8]>> {
    KEPT_COLUMNS
        .iter()
        .map(|idx| {
            record.get(*idx).context(LineTooShortSnafu {
                path,
                lineno,
                index: *idx,
                width: record.len(),
            })
        })
        .collect()
}

/// Copies the projected header and a random subset of the projected rows.
fn sample_file<R: Rng>(input: &str, out: &str, rate: f64, rng: &mut R) -> SampleResult<SampleStats> {
    ensure!((0.0..=1.0).contains(&rate), InvalidRateSnafu { rate });

    info!("Attempting to read voter file {:?}", input);
    let file = File::open(input).context(OpeningInputSnafu { path: input })?;
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(out)
        .context(WritingSampleSnafu { path: out })?;

    let mut lines = BufReader::new(file).split(b'\n').enumerate();
    let (_, header) = lines.next().context(EmptyInputSnafu { path: input })?;
    let header = header.context(ReadingLineSnafu {
        path: input,
        lineno: 1_usize,
    })?;
    let header = parse_line(&header).context(ParsingLineSnafu {
        path: input,
        lineno: 1_usize,
    })?;
    wtr.write_record(project(&header, input, 1)?)
        .context(WritingSampleSnafu { path: out })?;

    let mut stats = SampleStats {
        rows_read: 0,
        rows_kept: 0,
    };
    for (idx, line_r) in lines {
        let lineno = idx + 1;
        let line = line_r.with_context(|_| ReadingLineSnafu {
            path: input,
            lineno,
        })?;
        let line = parse_line(&line).with_context(|_| ParsingLineSnafu {
            path: input,
            lineno,
        })?;
        stats.rows_read += 1;
        if stats.rows_read % PROGRESS_INTERVAL == 0 {
            info!("{} rows read", stats.rows_read);
        }
        // Every row is drawn, even the ones that end up discarded.
        if rng.gen::<f64>() < rate {
            wtr.write_record(project(&line, input, lineno)?)
                .with_context(|_| WritingSampleSnafu { path: out })?;
            stats.rows_kept += 1;
        }
    }
    wtr.flush().context(FlushingSampleSnafu { path: out })?;
    info!(
        "Kept {} of {} rows in {:?}",
        stats.rows_kept, stats.rows_read, out
    );
    Ok(stats)
}

fn run(args: &Args) -> SampleResult<SampleStats> {
    match args.seed {
        Some(seed) => {
            debug!("Sampling with seed {}", seed);
            sample_file(&args.input, &args.out, args.rate, &mut StdRng::seed_from_u64(seed))
        }
        None => sample_file(&args.input, &args.out, args.rate, &mut rand::thread_rng()),
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("args: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Sampling failed: {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(s) = e.source() {
            eprintln!("  caused by: {}", s);
        }
        std::process::exit(1);
    }
}
