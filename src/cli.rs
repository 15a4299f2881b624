//! Command-line surface, translated into [`Settings`] for the engine.

use std::path::PathBuf;

use clap::Parser;

use crate::parser::DiffFormat;
use crate::session::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "rpatch",
    about = "Apply a diff listing to the files it describes",
    version
)]
pub struct Cli {
    /// File to patch; names from the listing are used when omitted
    pub origfile: Option<PathBuf>,

    /// Patch file to read; standard input when omitted
    pub patchfile: Option<PathBuf>,

    /// Interpret the listing as a context diff
    #[arg(short = 'c', long = "context", group = "format")]
    pub context: bool,

    /// Interpret the listing as a unified diff
    #[arg(short = 'u', long = "unified", group = "format")]
    pub unified: bool,

    /// Interpret the listing as a normal diff
    #[arg(short = 'n', long = "normal", group = "format")]
    pub normal: bool,

    /// Interpret the listing as an ed script
    #[arg(short = 'e', long = "ed", group = "format")]
    pub ed: bool,

    /// Strip NUM leading components from file names in the listing
    #[arg(short = 'p', long = "strip", value_name = "NUM")]
    pub strip: Option<usize>,

    /// Apply the patch in reverse
    #[arg(short = 'R', long = "reverse")]
    pub reverse: bool,

    /// Match context loosely: whitespace runs compare equal
    #[arg(short = 'l', long = "ignore-whitespace")]
    pub loose: bool,

    /// Keep both versions, bracketed by #ifdef SYMBOL conditionals
    #[arg(short = 'D', long = "ifdef", value_name = "SYMBOL")]
    pub define: Option<String>,

    /// Send patched output to FILE instead of patching in place; "-" for
    /// standard output
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write rejects to FILE instead of TARGET.rej
    #[arg(short = 'r', long = "reject-file", value_name = "FILE")]
    pub reject_file: Option<PathBuf>,

    /// Never ask questions; take the conservative answer everywhere
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Work silently unless something goes wrong
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Change to DIR before doing anything else
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        let format_override = if self.context {
            Some(DiffFormat::Context)
        } else if self.unified {
            Some(DiffFormat::Unified)
        } else if self.normal {
            Some(DiffFormat::Normal)
        } else if self.ed {
            Some(DiffFormat::Ed)
        } else {
            None
        };
        Settings {
            format_override,
            target_override: self.origfile.clone(),
            strip: self.strip,
            reverse: self.reverse,
            loose_match: self.loose,
            define: self.define.clone(),
            force: self.force,
            silent: self.silent,
            output: self.output.clone(),
            reject_override: self.reject_file.clone(),
        }
    }
}
