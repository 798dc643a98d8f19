#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `repcount`: count squat repetitions from recorded or simulated pose streams.

mod cli;
mod count;
mod error_fmt;
mod source;

use std::path::Path;

use clap::Parser;
use eyre::WrapErr;
use repcount_core::error::RepError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, FILE_GUARD, JSON_MODE};
use crate::count::{Printer, SimulateOpts};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    // Usage errors exit with code 2 here.
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;

    let printer = |summary_only| Printer {
        json: cli.json,
        summary_only,
    };

    match cli.cmd {
        Commands::Replay { file, summary_only } => {
            count::run_replay(&cfg, &file, printer(summary_only))?;
        }
        Commands::Simulate {
            reps,
            fps,
            jitter_deg,
            dropout,
            seed,
            realtime,
            summary_only,
        } => {
            let opts = SimulateOpts {
                reps,
                fps,
                jitter_deg,
                dropout,
                seed,
                realtime,
            };
            count::run_simulate(&cfg, &opts, printer(summary_only))?;
        }
        Commands::SelfCheck => {
            count::self_check(&cfg)?;
            println!("ok");
        }
    }
    Ok(())
}

/// Load and validate the typed config. Every failure here is a `RepError::Config`.
fn load_config(explicit: Option<&Path>) -> eyre::Result<repcount_config::Config> {
    let path = match explicit {
        Some(p) => p,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => return Ok(repcount_config::Config::default()),
    };

    let parsed = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))
        .and_then(|text| {
            repcount_config::load_toml(&text)
                .wrap_err_with(|| format!("parse config {}", path.display()))
        })
        .and_then(|cfg| cfg.validate().map(|()| cfg));

    parsed.map_err(|e| eyre::Report::new(RepError::Config(format!("{e:#}"))))
}

fn init_tracing(
    json: bool,
    level: Option<&str>,
    logging: &repcount_config::Logging,
) -> eyre::Result<()> {
    let directive = level.or(logging.level.as_deref()).unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .map_err(|e| eyre::Report::new(RepError::Config(format!("log level '{directive}': {e}"))))?;

    // Console logs go to stderr; stdout carries status lines only.
    let console_json = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let console_pretty = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    let file_layer = match logging.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path.file_name().map_or_else(
                || std::ffi::OsString::from("repcount.log"),
                std::ffi::OsStr::to_os_string,
            );
            let appender = match logging.rotation.as_deref().unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_json)
        .with(console_pretty)
        .with(file_layer)
        .try_init()
        .wrap_err("install tracing subscriber")
}
