use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use cli::NrExtractArgs;
use resolver::Extractor;
use writer::{
    initialize_writer, write_csv, write_line_error, write_pending, write_redefinition, write_table,
};

mod cli;
mod colors;
mod define;
mod errors;
mod literal;
mod resolver;
mod writer;

fn main() -> ExitCode {
    let args = NrExtractArgs::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{} {error:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &NrExtractArgs) -> Result<ExitCode> {
    let (reader, source): (Box<dyn BufRead>, String) = if args.reads_stdin() {
        (Box::new(io::stdin().lock()), "<stdin>".to_owned())
    } else {
        let file = File::open(&args.define_file)
            .with_context(|| format!("could not open {}", args.define_file.display()))?;
        (
            Box::new(BufReader::new(file)),
            args.define_file.display().to_string(),
        )
    };

    let mut extractor = Extractor::new();
    let line_errors = extractor
        .process_reader(reader)
        .with_context(|| format!("could not read {source}"))?;

    let mut stderr = io::stderr().lock();
    if !args.quiet {
        for redefinition in extractor.take_redefinitions() {
            write_redefinition(&mut stderr, &redefinition)?;
        }
    }
    for line_error in &line_errors {
        write_line_error(&mut stderr, &args.tag, &args.arch, &source, line_error)?;
    }

    let records = extractor.records(&args.tag, &args.arch);
    let mut sink = initialize_writer(args.output.as_deref())?;
    if args.table {
        write_table(&mut sink, &records)?;
    } else {
        write_csv(&mut sink, &records)?;
    }
    sink.flush().context("could not write records")?;

    let pending = extractor.pending();
    write_pending(&mut stderr, pending)?;
    debug!(
        records = records.len(),
        plain = extractor.plain().len(),
        wide = extractor.wide().len(),
        pending = pending.dependents(),
        errors = line_errors.len(),
        "done"
    );

    if args.strict && !pending.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
