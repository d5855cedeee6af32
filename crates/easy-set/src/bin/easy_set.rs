//! `easy-set`: build nested JSON from path assignments.
//!
//! Usage:
//!   easy-set [--keep-null] '<path>=<json>' ...
//!
//! The document is read from stdin. Set `RUST_LOG=easy_set=debug` to see
//! container conversions on stderr.

use clap::Parser;
use easy_set::cli::{run, CliArgs};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();

    let args = CliArgs::parse();

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match run(&buf, &args) {
        Ok(result) => println!("{result}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
