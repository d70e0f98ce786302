// Copyright 2025 Janek Bevendorff
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! nwc2warc: convert NWC corpus dumps into gzipped WARC files.
//!
//! # Usage
//!
//! ```text
//! nwc2warc convert input.gz output.warc.gz
//! nwc2warc batch corpus/ warc/ 8
//! ```

use std::ffi::OsString;
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use nwc2warc::config::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_CONTENT_TYPE, FALLBACK_HTTP_DATE};
use nwc2warc::{batch, BatchOptions, ConvertOptions, TracingSink};

#[derive(Parser)]
#[command(name = "nwc2warc", version, about = "Convert NWC web corpus dumps into WARC files", long_about = None)]
struct Cli {
    /// Log debug messages.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a single corpus file.
    Convert {
        /// Input NWC file (gzipped if it ends in .gz).
        in_file: PathBuf,

        /// Output WARC file.
        out_file: PathBuf,

        #[command(flatten)]
        converter: ConverterArgs,
    },

    /// Convert every *.gz file of a directory in parallel child processes.
    Batch {
        /// Input directory.
        in_dir: PathBuf,

        /// Output directory for WARC and log files.
        out_dir: PathBuf,

        /// Number of parallel processes.
        num_processes: usize,

        #[command(flatten)]
        converter: ConverterArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct ConverterArgs {
    /// HTTP date used for records without a usable Date header.
    #[arg(long, env = "NWC2WARC_FALLBACK_DATE", default_value = FALLBACK_HTTP_DATE)]
    fallback_date: String,

    /// Content-Type used for records without one.
    #[arg(long, env = "NWC2WARC_DEFAULT_CONTENT_TYPE", default_value = DEFAULT_CONTENT_TYPE)]
    default_content_type: String,

    /// gzip level of the output records.
    #[arg(
        long,
        env = "NWC2WARC_COMPRESSION_LEVEL",
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u32).range(0..=9)
    )]
    compression_level: u32,
}

impl ConverterArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            fallback_http_date: self.fallback_date.clone(),
            default_content_type: self.default_content_type.clone(),
            compression_level: self.compression_level,
            ..ConvertOptions::default()
        }
    }

    /// The same settings as command line arguments for child converters.
    fn to_args(&self, verbose: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--fallback-date".into(),
            self.fallback_date.clone().into(),
            "--default-content-type".into(),
            self.default_content_type.clone().into(),
            "--compression-level".into(),
            self.compression_level.to_string().into(),
        ];
        if verbose {
            args.push("--verbose".into());
        }
        args
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    nwc2warc::logging::init_logger(cli.verbose);

    match cli.command {
        Command::Convert { in_file, out_file, converter } => {
            let stats = nwc2warc::convert(&in_file, &out_file, &converter.options(), &mut TracingSink)
                .with_context(|| format!("Failed to convert {}", in_file.display()))?;
            info!("Wrote {} records to {}", stats.records, out_file.display());
        }
        Command::Batch { in_dir, out_dir, num_processes, converter } => {
            let options = BatchOptions {
                jobs: num_processes,
                program: std::env::current_exe().context("Cannot locate converter executable")?,
                extra_args: converter.to_args(cli.verbose),
            };
            batch::run(&in_dir, &out_dir, &options)
                .with_context(|| format!("Batch conversion of {} failed", in_dir.display()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn forwarded_args_parse_back() {
        let cli = Cli::parse_from(["nwc2warc", "batch", "in", "out", "3", "--compression-level", "1"]);
        let Command::Batch { converter, num_processes, .. } = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(num_processes, 3);

        let mut argv: Vec<OsString> = vec!["nwc2warc".into(), "convert".into(), "a".into(), "b".into()];
        argv.extend(converter.to_args(false));
        let child = Cli::parse_from(argv);
        assert!(!child.verbose);
        let Command::Convert { converter: child, .. } = child.command else {
            panic!("expected convert");
        };
        assert_eq!(child.options(), converter.options());
        assert_eq!(child.compression_level, 1);
    }

    #[test]
    fn verbose_reaches_child_converters() {
        let cli = Cli::parse_from(["nwc2warc", "batch", "-v", "in", "out", "2"]);
        assert!(cli.verbose);
        let Command::Batch { converter, .. } = cli.command else {
            panic!("expected batch");
        };

        let mut argv: Vec<OsString> = vec!["nwc2warc".into(), "convert".into(), "a".into(), "b".into()];
        argv.extend(converter.to_args(cli.verbose));
        assert!(argv.iter().any(|a| a == "--verbose"));
        assert!(Cli::parse_from(argv).verbose);
    }
}
