use clap::Parser;

/// This is a name and ethnicity tabulation program for voter demographic files.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (first, middle or last) The name column used as the key of the tables.
    #[clap(value_parser)]
    pub mode: String,

    /// (yes or no) If yes, three reports are written: male, female and unknown.
    #[clap(value_parser)]
    pub gender_segregation: String,

    /// (file path, optional) A JSON file with the input paths, the column positions and
    /// the ethnicity codes. For more information about the file format, read the manual.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, repeatable) The tab-delimited demographic files to read. Setting this option
    /// overrides the paths that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<Vec<String>>,

    /// (directory, default: current directory) Where the reports are written. Setting this
    /// option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out_dir: Option<String>,

    /// (directory) If provided, each report is compared with the file of the same name in this
    /// directory and the program fails on any difference.
    #[clap(short, long, value_parser)]
    pub reference_dir: Option<String>,

    /// (drop or column, default drop) What to do with the ethnicity codes that have no column.
    #[clap(long, value_parser)]
    pub unrecognized: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
