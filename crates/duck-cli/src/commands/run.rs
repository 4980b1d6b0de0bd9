use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use duck_cli::cli::RunArgs;
use duck_cli::config::DuckConfig;
use duck_cli::manifest::Param;
use duck_io::exporters::write_frame_csv;
use duck_ts::{create_duck_curve, ramp_report};
use duck_viz::plot_duck_curve;
use tracing::{info, warn};

use crate::commands::telemetry::record_run_timed;

pub fn handle(args: &RunArgs, mut config: DuckConfig) -> Result<()> {
    args.apply(&mut config);
    let start = Instant::now();
    let mut outputs = Vec::new();
    let res = run(&config, args, &mut outputs);
    record_run_timed(
        &config.chart.out_dir,
        "run",
        run_params(&config, args),
        &outputs,
        start,
        &res,
    );
    res
}

fn run(config: &DuckConfig, args: &RunArgs, outputs: &mut Vec<PathBuf>) -> Result<()> {
    let request = config.request()?;
    info!(
        genmix = %request.genmix,
        load = %request.load,
        dates = %request.dates,
        months = %request.months,
        "building duck curve"
    );
    let duck = create_duck_curve(&request)?;
    if duck.is_empty() {
        warn!("no rows left after the date and month filters");
    }

    if let Some(path) = &args.export {
        write_frame_csv(&duck, path, &config.sources.import.index_column)?;
        info!("exported residual demand to {}", path.display());
        outputs.push(path.clone());
    }

    let mut stdout = io::stdout().lock();
    for &year in &config.filter.years {
        if !args.no_plot {
            if duck.select_year(year).is_empty() {
                warn!(year, "no rows for year, skipping chart");
            } else {
                let path = config.chart.chart_path(year);
                plot_duck_curve(
                    &duck,
                    year,
                    config.chart.ylim(),
                    &config.chart.quantiles,
                    &config.chart.style,
                    &path,
                )
                .with_context(|| format!("plotting {year} to {}", path.display()))?;
                info!("wrote {}", path.display());
                outputs.push(path);
            }
        }
        let report = ramp_report(&duck, year)?;
        writeln!(stdout, "{report}")?;
    }
    stdout.flush()?;
    Ok(())
}

fn run_params(config: &DuckConfig, args: &RunArgs) -> Vec<Param> {
    let years: Vec<String> = config.filter.years.iter().map(i32::to_string).collect();
    let mut params = vec![
        Param::new("genmix", config.sources.genmix.to_string()),
        Param::new("load", config.sources.load.to_string()),
        Param::new("start", config.filter.start.to_string()),
        Param::new("end", config.filter.end.to_string()),
        Param::new("months", config.filter.months.to_string()),
        Param::new("years", years.join(",")),
        Param::new("ylim", config.chart.ylim.to_string()),
        Param::new("format", config.chart.format.extension()),
        Param::new(
            "alignment",
            format!("{:?}", config.sources.alignment).to_lowercase(),
        ),
        Param::new("no_plot", args.no_plot.to_string()),
    ];
    if let Some(export) = &args.export {
        params.push(Param::new("export", export.display().to_string()));
    }
    params
}
