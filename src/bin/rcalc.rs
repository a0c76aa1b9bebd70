//! Calculator command-line.
//!
//! When called without argument it drops into an interactive
//! read-evaluate-print loop.
//!
//! When called with file arguments, it evaluates the corresponding files in a
//! single session, so variables declared in one file are visible in the next.

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use rcalc::session::Session;

/// An interactive arithmetic expression evaluator.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script files to evaluate; reads standard input when absent.
    files: Vec<PathBuf>,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    if args.files.is_empty() {
        run_prompt()?;
    } else {
        run_all_files(&args.files)?;
    }
    Ok(())
}

fn run_all_files(paths: &[PathBuf]) -> Result<(), anyhow::Error> {
    let mut input: Box<dyn Read> = Box::new(io::empty());
    for p in paths {
        let file = File::open(p).with_context(|| format!("failed to open {}", p.display()))?;
        input = Box::new(input.chain(file));
    }

    let mut output = io::stdout();
    let mut errors = io::stderr();
    Session::new(BufReader::new(input), &mut output, &mut errors).run()?;
    Ok(())
}

fn run_prompt() -> Result<(), anyhow::Error> {
    let stdin = io::stdin();
    let mut output = io::stdout();
    let mut errors = io::stderr();

    Session::new(stdin.lock(), &mut output, &mut errors)
        .with_prompt()
        .run()?;
    Ok(())
}
