mod args;
mod tab;

use clap::Parser;
use log::{debug, error};
use std::error::Error;

use crate::args::Args;
use crate::tab::RunOptions;

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("args: {:?}", args);

    let opts = RunOptions {
        mode: args.mode,
        gender_segregation: args.gender_segregation,
        config_path: args.config,
        input_paths: args.input,
        out_dir: args.out_dir,
        reference_dir: args.reference_dir,
        unrecognized: args.unrecognized,
    };

    if let Err(e) = tab::run_tabulation(&opts) {
        error!("Tabulation failed: {:?}", e);
        eprintln!("An error occured: {}", e);
        let mut source = e.source();
        while let Some(s) = source {
            eprintln!("  caused by: {}", s);
            source = s.source();
        }
        std::process::exit(1);
    }
}
