use clap::Parser;
use env_logger::Builder;
use env_logger::Env;
use log::{error, info, Level};

mod analysis;
mod board_detection;
mod classify_postprocessing;
mod classify_preprocessing;
mod color_utils;
mod config;
mod model_metadata;
mod onnx_session;
mod report;
mod taxonomy;

use analysis::run_analysis;
use color_utils::{colors, symbols};
use colored::*;
use config::{AnalyzeConfig, Cli};
use report::AnalysisReport;
use std::io::Write;

fn get_log_level_from_verbosity(
    verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::ErrorLevel>,
) -> log::LevelFilter {
    let base_level = verbosity.log_level_filter();
    let adjusted_level = match base_level {
        log::LevelFilter::Off => log::LevelFilter::Off, // -qq -> OFF
        log::LevelFilter::Error => log::LevelFilter::Warn, // default -> WARN
        log::LevelFilter::Warn => log::LevelFilter::Info, // -v -> INFO
        log::LevelFilter::Info => log::LevelFilter::Debug, // -vv -> DEBUG
        log::LevelFilter::Debug => log::LevelFilter::Trace, // -vvv -> TRACE
        log::LevelFilter::Trace => log::LevelFilter::Trace, // -vvvv -> TRACE (max)
    };

    // But we also need to handle -q -> ERROR
    // clap-verbosity-flag doesn't give us a way to distinguish between default and -q
    // So we need to check the quiet flag directly
    if verbosity.is_silent() {
        log::LevelFilter::Error // -q -> ERROR
    } else {
        adjusted_level
    }
}

fn main() {
    let cli = Cli::parse();

    color_utils::init_color_config(cli.no_color);

    // If user didn't pass -v/-q and RUST_LOG is set, honor the env var.
    let use_env = !cli.verbosity.is_present() && std::env::var_os("RUST_LOG").is_some();

    let mut logger = if use_env {
        Builder::from_env(Env::default())
    } else {
        let level_filter = get_log_level_from_verbosity(cli.verbosity.clone());

        let mut b = Builder::new();
        b.filter_level(level_filter);
        b
    };

    logger
        .format(|buf, record| {
            let level_str = match record.level() {
                Level::Error => "ERROR".red().bold().to_string(),
                Level::Warn => "WARN".yellow().to_string(),
                Level::Info => "INFO".green().to_string(),
                Level::Debug => "DEBUG".blue().to_string(),
                Level::Trace => "TRACE".magenta().to_string(),
            };
            writeln!(buf, "[{}] {}", level_str, record.args())
        })
        .init();

    info!(
        "🔍 Trap analysis: {} | model: {} | conf: {} | device: {}",
        cli.image.display(),
        cli.model.display(),
        cli.confidence,
        cli.device
    );

    let config = AnalyzeConfig::from_args(&cli);
    let result = run_analysis(&config);
    if let Err(e) = &result {
        error!(
            "{} Analysis failed: {}",
            symbols::operation_failed(),
            colors::error_level(&format!("{e:#}"))
        );
    }

    // Exactly one JSON document on stdout, for success and failure alike.
    // The exit code stays 0 so batch callers distinguish outcomes by payload.
    let report = AnalysisReport::from_pipeline_result(result);
    println!("{}", report.to_json());
}
