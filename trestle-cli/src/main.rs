//! Trestle CLI - Command line interface
//!
//! 读取 JSON 脚本并驱动桥接执行到结束。

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

mod config;
mod driver;
mod logging;

use config::LogConfig;
use driver::Driver;
use logging::LogFormat;
use trestle_api::{get_config, init_config, Bridge, RunConfig};
use trestle_config::BridgeOptions;

#[derive(Parser)]
#[command(
    name = "trestle",
    about = "Trestle scripting bridge - run a JSON driver script against the SWF host model",
    version = "0.1.0"
)]
struct Cli {
    /// Script file path
    #[arg(value_name = "SCRIPT", default_value = "script.json")]
    script: PathBuf,

    /// Global log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format: pretty, compact, json
    #[arg(long, default_value = "compact")]
    log_format: String,

    /// Additionally append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Echo every operation result to stdout
    #[arg(long)]
    echo: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        global: parse_level(&cli.log_level),
        ..LogConfig::default()
    };
    let format = LogFormat::parse(&cli.log_format).unwrap_or_else(|| {
        eprintln!(
            "Unknown log format '{}', falling back to compact",
            cli.log_format
        );
        LogFormat::Compact
    });
    logging::init_with_file(&log_config, format, cli.log_file.as_ref());

    init_config(RunConfig {
        bridge: BridgeOptions::default(),
        echo_results: cli.echo,
    });

    let source = match std::fs::read_to_string(&cli.script) {
        Ok(s) => s,
        Err(e) => {
            // 加载失败只打印诊断，退出码不作区分
            eprintln!("Error: cannot read script '{}': {}", cli.script.display(), e);
            return;
        }
    };

    let run_config = get_config();
    let bridge = Bridge::new(run_config.bridge.clone());
    let mut driver = Driver::new(bridge, run_config.echo_results);
    if let Err(e) = driver.run(&source) {
        eprintln!("Error: {}", e.to_report());
    }
}

fn parse_level(name: &str) -> Level {
    match name {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        other => {
            eprintln!("Unknown log level '{other}', falling back to warn");
            Level::WARN
        }
    }
}
