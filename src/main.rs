//! CLI entry point for repcalc.
//!
//! One subcommand per analysis mode plus a standalone transpose. Each error
//! kind exits with its own status code.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};

use repcalc::analysis::{DensityAnalysis, GenomeAnalysis, MatrixAnalysis};
use repcalc::config::{parse_length, Config, RoiColumns, TeColumns, DEFAULT_OUTPUT_DIR};
use repcalc::error::RepcalcError;
use repcalc::output::transpose_file;

/// Transposable element density and region-of-interest overlap calculator.
#[derive(Parser, Debug)]
#[command(name = "repcalc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory for output files given without a directory
    #[arg(long = "output-dir", global = true, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Increase log detail (-v for debug)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// TE density across an entire sequence
    Genome {
        /// Total sequence length in bp
        #[arg(short = 'l', long = "length", allow_hyphen_values = true)]
        length: String,

        /// TE annotation file
        #[arg(short = 't', long = "te")]
        te: PathBuf,

        /// Output table
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// TE columns: label,start,end or label,chrom,start,end (0-based)
        #[arg(long = "te-columns", value_delimiter = ',', allow_hyphen_values = true)]
        te_columns: Option<Vec<String>>,

        /// Label rewrite rule file
        #[arg(short = 'r', long = "rules")]
        rules: Option<PathBuf>,
    },

    /// TE density restricted to overlap with regions of interest
    Density {
        /// Reference length in bp for percentages
        #[arg(short = 'l', long = "length", allow_hyphen_values = true)]
        length: String,

        /// TE annotation file
        #[arg(short = 't', long = "te")]
        te: PathBuf,

        /// Region of interest file
        #[arg(short = 'i', long = "roi")]
        roi: PathBuf,

        /// Output table
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// TE columns: label,chrom,start,end (0-based)
        #[arg(long = "te-columns", value_delimiter = ',', allow_hyphen_values = true)]
        te_columns: Option<Vec<String>>,

        /// RoI columns: chrom,start,end (0-based)
        #[arg(long = "roi-columns", value_delimiter = ',', allow_hyphen_values = true)]
        roi_columns: Option<Vec<String>>,

        /// Label rewrite rule file
        #[arg(short = 'r', long = "rules")]
        rules: Option<PathBuf>,
    },

    /// TE class x RoI percent-overlap matrix
    Matrix {
        /// TE annotation file
        #[arg(short = 't', long = "te")]
        te: PathBuf,

        /// Region of interest file
        #[arg(short = 'i', long = "roi")]
        roi: PathBuf,

        /// Output matrix
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// TE columns: label,chrom,start,end (0-based)
        #[arg(long = "te-columns", value_delimiter = ',', allow_hyphen_values = true)]
        te_columns: Option<Vec<String>>,

        /// RoI columns: id,chrom,start,end (0-based)
        #[arg(long = "roi-columns", value_delimiter = ',', allow_hyphen_values = true)]
        roi_columns: Option<Vec<String>>,

        /// Label rewrite rule file
        #[arg(short = 'r', long = "rules")]
        rules: Option<PathBuf>,

        /// Write RoIs as rows instead of columns
        #[arg(short = 'T', long = "transpose")]
        transpose: bool,
    },

    /// Transpose a tab-delimited file in place
    Transpose {
        /// File to rewrite
        file: PathBuf,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose > 0 {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => {
            info!("Program complete.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            match err.downcast_ref::<RepcalcError>() {
                Some(kind) => {
                    eprintln!("{}", kind.summary());
                    ExitCode::from(kind.exit_code())
                }
                None => ExitCode::FAILURE,
            }
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config {
        output_dir: args.output_dir,
        ..Config::default()
    };

    match args.command {
        Command::Genome {
            length,
            te,
            output,
            te_columns,
            rules,
        } => {
            let region_length = parse_length(&length)?;
            let te_columns = match te_columns {
                Some(tokens) => TeColumns::parse_genome(&tokens)?,
                None => TeColumns::genome(),
            };
            GenomeAnalysis {
                region_length,
                te_path: te,
                te_columns,
                rules_path: rules,
                output,
            }
            .run(&config)?;
        }
        Command::Density {
            length,
            te,
            roi,
            output,
            te_columns,
            roi_columns,
            rules,
        } => {
            let region_length = parse_length(&length)?;
            let te_columns = match te_columns {
                Some(tokens) => TeColumns::parse_located(&tokens)?,
                None => TeColumns::located(),
            };
            let roi_columns = match roi_columns {
                Some(tokens) => RoiColumns::parse_density(&tokens)?,
                None => RoiColumns::density(),
            };
            DensityAnalysis {
                region_length,
                te_path: te,
                te_columns,
                roi_path: roi,
                roi_columns,
                rules_path: rules,
                output,
            }
            .run(&config)?;
        }
        Command::Matrix {
            te,
            roi,
            output,
            te_columns,
            roi_columns,
            rules,
            transpose,
        } => {
            let te_columns = match te_columns {
                Some(tokens) => TeColumns::parse_located(&tokens)?,
                None => TeColumns::located(),
            };
            let roi_columns = match roi_columns {
                Some(tokens) => RoiColumns::parse_matrix(&tokens)?,
                None => RoiColumns::matrix(),
            };
            MatrixAnalysis {
                te_path: te,
                te_columns,
                roi_path: roi,
                roi_columns,
                rules_path: rules,
                output,
                transpose,
            }
            .run(&config)?;
        }
        Command::Transpose { file } => {
            info!("Transposing {}", file.display());
            transpose_file(&file)?;
        }
    }

    Ok(())
}
