//! Dataset build driver.
//!
//! Usage:
//!     etl_build <config.json> [--replay]
//!
//! Builds the dataset described by the config and prints a JSON report to
//! stdout. With `--replay` the finished dataset is read back once and the
//! replayed window count is added to the report. Logging goes to stderr and is
//! controlled by `RUST_LOG` (default `info`).

use std::env;
use std::error::Error;
use std::process::ExitCode;
use std::time::Instant;

use bar_etl::{BuildReport, Etl, EtlConfig, Result};
use log::{error, info};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RunReport {
    config: EtlConfig,
    build: BuildReport,
    total_time_ms: f64,
    throughput_windows_per_sec: f64,
    replay: Option<ReplayReport>,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    batches: usize,
    windows: usize,
    time_ms: f64,
}

fn replay(etl: &Etl<f64>) -> Result<ReplayReport> {
    let start = Instant::now();
    let mut batches = 0;
    let mut windows = 0;
    for batch in etl.generate_clean_data(0)?.until_exhausted() {
        windows += batch?.len();
        batches += 1;
    }
    Ok(ReplayReport {
        batches,
        windows,
        time_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

fn run(config_path: &str, with_replay: bool) -> Result<RunReport> {
    let config = EtlConfig::from_json_file(config_path)?;
    let etl = Etl::<f64>::new(config)?;

    let start = Instant::now();
    let build = etl.create_clean_datafile()?;
    let total_time = start.elapsed().as_secs_f64() * 1000.0;
    let throughput = if total_time > 0.0 {
        (build.summary.rows as f64 / total_time) * 1000.0
    } else {
        0.0
    };
    info!("Built {} windows in {total_time:.1} ms", build.summary.rows);

    let replay = if with_replay {
        Some(replay(&etl)?)
    } else {
        None
    };

    Ok(RunReport {
        config: etl.config().clone(),
        build,
        total_time_ms: total_time,
        throughput_windows_per_sec: throughput,
        replay,
    })
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [--replay]", args[0]);
        return ExitCode::from(2);
    }
    let with_replay = args[2..].iter().any(|a| a == "--replay");

    let report = match run(&args[1], with_replay) {
        Ok(report) => report,
        Err(e) => {
            let mut message = e.to_string();
            let mut source = e.source();
            while let Some(cause) = source {
                message.push_str(&format!(": {cause}"));
                source = cause.source();
            }
            error!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize report: {e}");
            ExitCode::FAILURE
        }
    }
}
