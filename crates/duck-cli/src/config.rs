//! `duck.toml` configuration.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) reproduces the CAISO 2018-2020 analysis.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use duck_core::{Alignment, DateRange, MonthSet};
use duck_io::importers::ImportOptions;
use duck_io::sources::covid_emda;
use duck_io::DataSource;
use duck_ts::{DuckCurveRequest, QuantileLevels};
use duck_viz::ChartStyle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DuckConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the generation mix and load tables are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_genmix")]
    pub genmix: DataSource,
    #[serde(default = "default_load")]
    pub load: DataSource,
    /// `outer` keeps mismatched rows/columns as missing values, `strict`
    /// rejects differing column sets.
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub import: ImportOptions,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            genmix: default_genmix(),
            load: default_load(),
            alignment: Alignment::default(),
            import: ImportOptions::default(),
        }
    }
}

fn default_genmix() -> DataSource {
    covid_emda::genmix("caiso")
}

fn default_load() -> DataSource {
    covid_emda::load("caiso")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_start")]
    pub start: NaiveDate,
    #[serde(default = "default_end")]
    pub end: NaiveDate,
    #[serde(default = "default_months")]
    pub months: MonthSet,
    /// Years that get a chart and a ramp report.
    #[serde(default = "default_years")]
    pub years: Vec<i32>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
            months: default_months(),
            years: default_years(),
        }
    }
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default()
}

fn default_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 7, 15).unwrap_or_default()
}

fn default_months() -> MonthSet {
    MonthSet::span(3, 7)
}

fn default_years() -> Vec<i32> {
    vec![2018, 2019, 2020]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// y-axis limits: `Auto` fits the axis to the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "YLimitRepr", into = "YLimitRepr")]
pub enum YLimit {
    Auto,
    Fixed(f64, f64),
}

impl Default for YLimit {
    fn default() -> Self {
        YLimit::Fixed(0.9, 3.7)
    }
}

impl YLimit {
    fn fixed(lo: f64, hi: f64) -> Result<Self, String> {
        if !(lo < hi) {
            return Err(format!("lower limit {lo} must be below upper limit {hi}"));
        }
        Ok(YLimit::Fixed(lo, hi))
    }
}

impl FromStr for YLimit {
    type Err = String;

    /// Parses `LO,HI` or `auto`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("auto") {
            return Ok(YLimit::Auto);
        }
        let (lo, hi) = raw
            .split_once(',')
            .ok_or_else(|| format!("expected LO,HI or auto, got '{raw}'"))?;
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid limit '{s}': {e}"))
        };
        YLimit::fixed(parse(lo)?, parse(hi)?)
    }
}

impl fmt::Display for YLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YLimit::Auto => write!(f, "auto"),
            YLimit::Fixed(lo, hi) => write!(f, "{lo},{hi}"),
        }
    }
}

// TOML has no null, so `Auto` is spelled as the string "auto".
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum YLimitRepr {
    Pair([f64; 2]),
    Word(String),
}

impl TryFrom<YLimitRepr> for YLimit {
    type Error = String;

    fn try_from(repr: YLimitRepr) -> Result<Self, Self::Error> {
        match repr {
            YLimitRepr::Pair([lo, hi]) => YLimit::fixed(lo, hi),
            YLimitRepr::Word(word) if word.eq_ignore_ascii_case("auto") => Ok(YLimit::Auto),
            YLimitRepr::Word(word) => Err(format!("expected [lo, hi] or \"auto\", got '{word}'")),
        }
    }
}

impl From<YLimit> for YLimitRepr {
    fn from(limit: YLimit) -> Self {
        match limit {
            YLimit::Auto => YLimitRepr::Word("auto".to_string()),
            YLimit::Fixed(lo, hi) => YLimitRepr::Pair([lo, hi]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// y-axis limits in x10^4 MW, written `[lo, hi]` or `"auto"`.
    #[serde(default)]
    pub ylim: YLimit,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub quantiles: QuantileLevels,
    #[serde(default)]
    pub style: ChartStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            ylim: YLimit::default(),
            out_dir: default_out_dir(),
            format: OutputFormat::default(),
            quantiles: QuantileLevels::default(),
            style: ChartStyle::default(),
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("duck-out")
}

impl ChartConfig {
    pub fn ylim(&self) -> Option<(f64, f64)> {
        match self.ylim {
            YLimit::Auto => None,
            YLimit::Fixed(lo, hi) => Some((lo, hi)),
        }
    }

    pub fn chart_path(&self, year: i32) -> PathBuf {
        self.out_dir
            .join(format!("duck-curve-{year}.{}", self.format.extension()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DuckConfig {
    /// Builder input for the configured sources and filters.
    pub fn request(&self) -> Result<DuckCurveRequest> {
        let dates = DateRange::daily(self.filter.start, self.filter.end)
            .context("invalid [filter] date range")?;
        Ok(DuckCurveRequest {
            genmix: self.sources.genmix.clone(),
            load: self.sources.load.clone(),
            dates,
            months: self.filter.months,
            alignment: self.sources.alignment,
            import: self.sources.import.clone(),
        })
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid log level '{}'", self.logging.level))
    }
}

/// Reads `path`, or returns the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<DuckConfig> {
    let Some(path) = path else {
        return Ok(DuckConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: DuckConfig =
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

pub fn save_config(config: &DuckConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents).with_context(|| format!("writing config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_the_caiso_analysis() {
        let config = DuckConfig::default();
        assert_eq!(config.filter.years, vec![2018, 2019, 2020]);
        assert_eq!(config.filter.months.to_string(), "3,4,5,6,7");
        assert_eq!(config.chart.ylim(), Some((0.9, 3.7)));
        assert!(config.sources.genmix.is_remote());
        assert!(config.sources.genmix.to_string().ends_with("caiso_rto_genmix.csv"));
        assert_eq!(
            config.chart.chart_path(2019),
            PathBuf::from("duck-out/duck-curve-2019.svg")
        );
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: DuckConfig = toml::from_str(
            r#"
[filter]
months = [6, 7, 8]
years = [2020]

[sources]
alignment = "strict"

[chart]
format = "png"

[chart.style]
dpi = 100
"#,
        )
        .unwrap();
        assert_eq!(config.filter.months.to_string(), "6,7,8");
        assert_eq!(config.filter.start, default_start());
        assert_eq!(config.sources.alignment, Alignment::Strict);
        assert_eq!(config.chart.format, OutputFormat::Png);
        assert_eq!(config.chart.style.dpi, 100);
        assert_eq!(config.chart.style.font_family, "Arial");
        assert_eq!(config.sources.import.fuel, "solar");
    }

    #[test]
    fn bad_quantiles_fail_to_parse() {
        let err = toml::from_str::<DuckConfig>("[chart]\nquantiles = [0.5, 1.5]\n");
        assert!(err.is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("duck.toml");
        let mut config = DuckConfig::default();
        config.filter.years = vec![2019];
        config.chart.ylim = YLimit::Fixed(1.0, 3.0);
        save_config(&config, &path).unwrap();
        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn auto_ylim_survives_a_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("duck.toml");
        let mut config = DuckConfig::default();
        config.chart.ylim = YLimit::Auto;
        save_config(&config, &path).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("ylim = \"auto\""));
        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.chart.ylim, YLimit::Auto);
        assert_eq!(loaded.chart.ylim(), None);
    }

    #[test]
    fn ylim_reads_pairs_and_auto() {
        let config: DuckConfig = toml::from_str("[chart]\nylim = [1, 2.5]\n").unwrap();
        assert_eq!(config.chart.ylim(), Some((1.0, 2.5)));
        let config: DuckConfig = toml::from_str("[chart]\nylim = \"Auto\"\n").unwrap();
        assert_eq!(config.chart.ylim, YLimit::Auto);
        assert!(toml::from_str::<DuckConfig>("[chart]\nylim = [3.7, 0.9]\n").is_err());
        assert!(toml::from_str::<DuckConfig>("[chart]\nylim = \"fit\"\n").is_err());
    }

    #[test]
    fn ylim_parses_flags() {
        assert_eq!("0.9,3.7".parse::<YLimit>(), Ok(YLimit::Fixed(0.9, 3.7)));
        assert_eq!(" 1 , 2 ".parse::<YLimit>(), Ok(YLimit::Fixed(1.0, 2.0)));
        assert_eq!("AUTO".parse::<YLimit>(), Ok(YLimit::Auto));
        assert!("3.7,0.9".parse::<YLimit>().is_err());
        assert!("3.7".parse::<YLimit>().is_err());
        assert!("a,b".parse::<YLimit>().is_err());
        assert_eq!(YLimit::Fixed(0.9, 3.7).to_string(), "0.9,3.7");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
        assert_eq!(load_config(None).unwrap(), DuckConfig::default());
    }

    #[test]
    fn request_rejects_reversed_dates() {
        let mut config = DuckConfig::default();
        config.filter.end = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        assert!(config.request().is_err());
    }
}
