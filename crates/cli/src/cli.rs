//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use statforge_core::{Operation, expand_paths, process_files, run_batch_file};
use statforge_font_fvar::{FvarOptions, parse_axis_specs};

use crate::dump::dump;

#[derive(Parser)]
#[command(name = "statforge", version)]
#[command(about = "Synthesize and repair STAT, fvar and name tables of variable fonts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct FileArgs {
    /// Font files (glob patterns allowed)
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replace STAT with one built from axis value notation
    Stat {
        #[command(flatten)]
        files: FileArgs,
        /// e.g. "wght;300=Light,400=Regular*|ital;0>1=Regular*"
        #[arg(long = "values", required = true)]
        values: Vec<String>,
        /// Keep existing STAT axes the notation does not mention
        #[arg(long)]
        merge: bool,
    },
    /// Turn discrete STAT values into contiguous ranges
    UpgradeRanges {
        #[command(flatten)]
        files: FileArgs,
    },
    /// Remove duplicated style-linked values and name the normal value "Regular"
    Normalize {
        #[command(flatten)]
        files: FileArgs,
    },
    /// Add or update fvar axes and the default named instance
    Fvar {
        #[command(flatten)]
        files: FileArgs,
        /// e.g. "wght=100:400:900" or "ital=*"
        #[arg(long = "axis", required = true)]
        axes: Vec<String>,
        /// Subfamily name of the default instance
        #[arg(long)]
        style_name: Option<String>,
    },
    /// Print STAT as notation and the fvar axes
    Dump { file: PathBuf },
    /// Apply export configurations to exported binaries
    Batch {
        #[arg(long)]
        config: PathBuf,
        #[command(flatten)]
        fonts: FileArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        let (label, files, operations) = match self {
            Commands::Stat { files, values, merge } => {
                ("stat", files, vec![Operation::stat(&values, merge)?])
            }
            Commands::UpgradeRanges { files } => {
                ("upgrade-ranges", files, vec![Operation::UpgradeRanges])
            }
            Commands::Normalize { files } => ("normalize", files, vec![Operation::Normalize]),
            Commands::Fvar { files, axes, style_name } => {
                let mut specs = Vec::new();
                for axis in &axes {
                    specs.extend(parse_axis_specs(axis)?);
                }
                let options = FvarOptions { style_name };
                ("fvar", files, vec![Operation::Fvar { specs, options }])
            }
            Commands::Dump { file } => return dump(&file),
            Commands::Batch { config, fonts } => {
                let result = run_batch_file(&config, &expand_paths(&fonts.files)?)?;
                println!("{result}");
                return result.ok_or_bail("batch");
            }
        };

        let result = process_files(&expand_paths(&files.files)?, &operations);
        println!("{result}");
        result.ok_or_bail(label)
    }
}
