//! polish — 命令行文本优化工具
//!
//! Usage:
//!   polish <text> [--mode basic|strict] [--priority N] [--config <yaml>]
//!                 [--style-guide <yaml>] [--scene <name>]

use ai_polish::{ClientConfig, EnvConfig, OptimizeMode, OptimizerClient, StyleGuide};
use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Args {
    text: String,
    mode: OptimizeMode,
    priority: i32,
    config: Option<String>,
    style_guide: Option<String>,
    scene: Option<String>,
}

fn print_usage() {
    println!(
        r#"polish — 文本润色命令行工具

USAGE:
    polish <TEXT> [OPTIONS]

OPTIONS:
    --mode <basic|strict>     Rewrite mode (default: basic)
    --priority <N>            Queue priority, higher dispatches sooner (default: 1)
    --config <path>           Client configuration YAML
    --style-guide <path>      Style guide YAML
    --scene <name>            Style guide scene (default: general)
    --version                 Show version information
    --help                    Show this help message

ENVIRONMENT:
    POLISH_API_KEY            Provider API key (the system keyring is checked first)
    POLISH_BASE_URL           Provider base URL
    RUST_LOG                  Log filter, e.g. ai_polish=debug"#
    );
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> anyhow::Result<&'a String> {
    args.get(i + 1)
        .with_context(|| format!("{flag} requires a value"))
}

fn parse_args(raw: &[String]) -> anyhow::Result<Option<Args>> {
    let mut text: Option<String> = None;
    let mut mode = OptimizeMode::Basic;
    let mut priority = 1;
    let mut config = None;
    let mut style_guide = None;
    let mut scene = None;

    let mut i = 0;
    while i < raw.len() {
        let arg = raw[i].as_str();
        match arg {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                println!("polish {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--mode" => {
                mode = flag_value(raw, i, arg)?.parse()?;
                i += 1;
            }
            "--priority" => {
                priority = flag_value(raw, i, arg)?
                    .parse()
                    .context("--priority expects an integer")?;
                i += 1;
            }
            "--config" => {
                config = Some(flag_value(raw, i, arg)?.clone());
                i += 1;
            }
            "--style-guide" => {
                style_guide = Some(flag_value(raw, i, arg)?.clone());
                i += 1;
            }
            "--scene" => {
                scene = Some(flag_value(raw, i, arg)?.clone());
                i += 1;
            }
            other if other.starts_with("--") => bail!("unknown option: {other}"),
            other => {
                if text.is_some() {
                    bail!("unexpected argument: {other}");
                }
                text = Some(other.to_string());
            }
        }
        i += 1;
    }

    let Some(text) = text else {
        print_usage();
        bail!("missing <TEXT>");
    };
    Ok(Some(Args {
        text,
        mode,
        priority,
        config,
        style_guide,
        scene,
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&raw)? else {
        return Ok(());
    };

    let config = match &args.config {
        Some(path) => ClientConfig::from_path(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => ClientConfig::default(),
    }
    .with_env_overrides();

    let mut builder = OptimizerClient::builder()
        .config(config)
        .config_provider(Arc::new(EnvConfig::new()));
    if let Some(path) = &args.style_guide {
        let guide = StyleGuide::from_path(path)
            .with_context(|| format!("loading style guide from {path}"))?;
        builder = builder.style_guide(guide);
    }
    if let Some(scene) = &args.scene {
        builder = builder.scene(scene.clone());
    }
    let client = builder.build()?;

    let response = client.submit(args.text, args.mode, args.priority).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    eprintln!("{}", serde_json::to_string_pretty(&client.metrics())?);

    let success = response.success;
    client.shutdown().await;
    if !success {
        std::process::exit(2);
    }
    Ok(())
}
