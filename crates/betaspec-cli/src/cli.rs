use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "BetaSpec CLI - Generates allowed beta-decay spectra with a configurable chain of spectral corrections and reports log ft and mean energies.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a spectrum and write OUTPUT.raw and OUTPUT.txt.
    Generate(GenerateArgs),
    /// Validate a transition file and print its derived parameters.
    Check(CheckArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    // --- Core Arguments ---
    /// Path to the transition description in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub transition: PathBuf,

    /// Path to the run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output stem; OUTPUT.raw and OUTPUT.txt are written next to it.
    #[arg(short, long, required = true, value_name = "OUTPUT")]
    pub output: PathBuf,

    // --- Spectrum Overrides ---
    /// Kinetic energy where the spectrum starts, in keV.
    #[arg(long, value_name = "KEV")]
    pub begin: Option<f64>,

    /// Kinetic energy where the spectrum ends, in keV. Zero means the endpoint.
    #[arg(long, value_name = "KEV")]
    pub end: Option<f64>,

    #[command(flatten)]
    pub step: StepOverride,

    /// Override `spectrum.neutrino` from the config file.
    #[command(flatten)]
    pub neutrino: NeutrinoOutput,

    /// Table of atomic exchange coefficients, overriding `advanced.exchange-table`.
    #[arg(long, value_name = "PATH")]
    pub exchange_table: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S couplings.g-a=1.27
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Grid spacing, either a fixed size or a number of steps.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct StepOverride {
    /// Step between grid points, in keV.
    #[arg(long, value_name = "KEV")]
    pub step_size: Option<f64>,
    /// Number of intervals between the spectrum bounds.
    #[arg(long, value_name = "N")]
    pub steps: Option<usize>,
}

/// A group to handle mutually exclusive flags for the neutrino column of the report.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct NeutrinoOutput {
    /// Include the antineutrino spectrum in the summary report.
    #[arg(long)]
    pub neutrino: bool,
    /// Leave the antineutrino spectrum out of the summary report.
    #[arg(long)]
    pub no_neutrino: bool,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the transition description in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub transition: PathBuf,

    /// Table of atomic exchange coefficients to look the mother nucleus up in.
    #[arg(long, value_name = "PATH")]
    pub exchange_table: Option<PathBuf>,
}
