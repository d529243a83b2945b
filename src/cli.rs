use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    about = "nrextract pulls syscall numbers out of __NR_ defines in kernel headers.",
    version
)]
pub struct NrExtractArgs {
    /// dataset label, copied into every record (e.g. a kernel version)
    pub tag: String,

    /// architecture label, copied into every record
    pub arch: String,

    /// header to read, `-` for stdin
    pub define_file: PathBuf,

    /// write records to a file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// print records as a table instead of csv
    #[arg(short = 't', long)]
    pub table: bool,

    /// exit with status 1 if some references were never defined
    #[arg(short = 's', long)]
    pub strict: bool,

    /// don't warn about redefined syscalls
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// more internal logging, repeat for more
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl NrExtractArgs {
    pub fn reads_stdin(&self) -> bool {
        self.define_file.as_os_str() == "-"
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
