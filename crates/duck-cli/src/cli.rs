use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint};
use duck_core::{Alignment, MonthSet};
use duck_io::DataSource;

use crate::config::{DuckConfig, OutputFormat, YLimit};

#[derive(Parser, Debug)]
#[command(
    name = "duck",
    author,
    version,
    about = "Duck-curve analysis of load and solar generation",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level (defaults to `[logging] level`, else info)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// TOML configuration file; built-in defaults are used without one
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the duck curve, plot each year and print ramp statistics
    Run(RunArgs),
    /// Inspect or create configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration
    Init {
        /// Destination file
        #[arg(long, default_value = "duck.toml", value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Overrides for one `duck run`; anything omitted comes from the config.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Generation-mix CSV (path or http(s) URL)
    #[arg(long, value_hint = ValueHint::AnyPath)]
    pub genmix: Option<DataSource>,
    /// Load CSV (path or http(s) URL)
    #[arg(long, value_hint = ValueHint::AnyPath)]
    pub load: Option<DataSource>,
    /// First day kept (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last day kept, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// Months kept, e.g. `3-7` or `1,6-8`
    #[arg(long)]
    pub months: Option<MonthSet>,
    /// Years to plot and report, comma separated
    #[arg(long, value_delimiter = ',')]
    pub years: Vec<i32>,
    /// y-axis limits in x10^4 MW as `LO,HI`, or `auto`
    #[arg(long)]
    pub ylim: Option<YLimit>,
    /// Directory for charts and the run manifest
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub out_dir: Option<PathBuf>,
    /// Chart image format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Skip chart rendering
    #[arg(long)]
    pub no_plot: bool,
    /// Also write the filtered residual-demand table to this CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub export: Option<PathBuf>,
    /// Reject load and generation tables whose columns differ
    #[arg(long)]
    pub strict: bool,
}

impl RunArgs {
    /// Folds the command-line overrides into `config`.
    pub fn apply(&self, config: &mut DuckConfig) {
        if let Some(genmix) = &self.genmix {
            config.sources.genmix = genmix.clone();
        }
        if let Some(load) = &self.load {
            config.sources.load = load.clone();
        }
        if self.strict {
            config.sources.alignment = Alignment::Strict;
        }
        if let Some(start) = self.start {
            config.filter.start = start;
        }
        if let Some(end) = self.end {
            config.filter.end = end;
        }
        if let Some(months) = self.months {
            config.filter.months = months;
        }
        if !self.years.is_empty() {
            config.filter.years = self.years.clone();
        }
        if let Some(ylim) = self.ylim {
            config.chart.ylim = ylim;
        }
        if let Some(dir) = &self.out_dir {
            config.chart.out_dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.chart.format = format;
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
