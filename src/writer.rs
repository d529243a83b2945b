use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{builder::Builder, settings::Style};

use crate::{
    colors::{ERROR_COLOR, GENERAL_TEXT_COLOR, SYMBOL_COLOR, WARNING_COLOR},
    resolver::{LineError, OutputRecord, PendingIndex, Redefinition},
};

pub type Sink = BufWriter<Box<dyn Write>>;

/// Records go to `output` if given, stdout otherwise.
pub fn initialize_writer(output: Option<&Path>) -> Result<Sink> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::options()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("could not open or create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    Ok(BufWriter::new(sink))
}

pub fn write_csv(writer: &mut impl Write, records: &[OutputRecord<'_>]) -> io::Result<()> {
    for record in records {
        writeln!(
            writer,
            "{},{},{},{}",
            record.tag, record.arch, record.name, record.value
        )?;
    }
    Ok(())
}

pub fn write_table(writer: &mut impl Write, records: &[OutputRecord<'_>]) -> io::Result<()> {
    let mut builder = Builder::new();
    builder.push_record(["tag", "arch", "syscall", "number"]);
    for record in records {
        let number = record.value.to_string();
        builder.push_record([record.tag, record.arch, record.name, number.as_str()]);
    }
    let table = builder.build().with(Style::ascii_rounded()).to_string();
    writeln!(writer, "{table}")
}

pub fn write_redefinition(writer: &mut impl Write, redefinition: &Redefinition) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} {} {}{} {}",
        "WARNING:".custom_color(*WARNING_COLOR).bold(),
        redefinition.key.to_string().custom_color(*SYMBOL_COLOR),
        "was defined as".custom_color(*GENERAL_TEXT_COLOR),
        redefinition.old,
        ", redefined as".custom_color(*GENERAL_TEXT_COLOR),
        redefinition.new,
    )
}

pub fn write_line_error(
    writer: &mut impl Write,
    tag: &str,
    arch: &str,
    source: &str,
    line_error: &LineError,
) -> io::Result<()> {
    writeln!(
        writer,
        "{} {}: {} {}:{}: {}",
        tag,
        arch,
        "extraction error in".custom_color(*ERROR_COLOR).bold(),
        source,
        line_error.line_number,
        line_error.error,
    )
}

/// Lists every macro that was referenced but never defined, with the defines
/// that are still waiting on it.
pub fn write_pending(writer: &mut impl Write, pending: &PendingIndex) -> io::Result<()> {
    if pending.is_empty() {
        return Ok(());
    }
    writeln!(
        writer,
        "{}",
        "There were undefined symbols:".custom_color(*ERROR_COLOR).bold()
    )?;
    for (awaited, entries) in pending.iter() {
        writeln!(
            writer,
            "  {} had {} definitions pending",
            awaited.to_string().custom_color(*SYMBOL_COLOR).bold(),
            entries.len()
        )?;
        for entry in entries {
            match entry.increment {
                0 => writeln!(writer, "    {} = {}", entry.dependent, awaited)?,
                increment => writeln!(
                    writer,
                    "    {} = {} + {}",
                    entry.dependent, awaited, increment
                )?,
            }
        }
    }
    Ok(())
}
