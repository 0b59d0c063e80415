//! Command line arguments for the `c2cpp` binary.

use crate::transpiler::{Options, Strategy};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// `--strategy` values; mirrors [`Strategy`] so the core type stays free of clap
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StrategyArg {
    Auto,
    Structural,
    Direct,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => Strategy::Auto,
            StrategyArg::Structural => Strategy::Structural,
            StrategyArg::Direct => Strategy::Direct,
        }
    }
}

/// Translate a C source file into C++
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path of the C source file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (default: INPUT with a `.cpp` extension). If <PATH> is `-` then stdout is used.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Choose how output is produced (auto = structural when fully parsed, direct otherwise)
    #[arg(long, value_enum, default_value = "auto", value_name = "MODE")]
    pub strategy: StrategyArg,

    /// Leave a rewrite rule out, e.g. `struct-to-class` (repeatable)
    #[arg(long = "disable-rule", value_name = "NAME")]
    pub disabled_rules: Vec<String>,

    /// Open the side-by-side viewer instead of writing output
    #[arg(long)]
    pub tui: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn options(&self) -> Options {
        Options {
            strategy: self.strategy.into(),
            disabled_rules: self.disabled_rules.clone(),
        }
    }

    pub fn output_to_stdout(&self) -> bool {
        self.output.as_deref() == Some(Path::new("-"))
    }

    /// Output file path; the stdout marker falls back to the default path.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) if !self.output_to_stdout() => path.clone(),
            _ => self.input.with_extension("cpp"),
        }
    }

    /// Log filter directive for the verbosity flags
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
