use anyhow::{Context, Result, bail};
use scrip_config::Config;
use scrip_engine::{ProcessExecutor, RenderOptions, Renderer};
use std::{env, path::PathBuf, process, time::Duration};

struct Args {
    source: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut source = None;
    let mut config = None;
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => {
                let path = rest.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("Unknown option {flag}"),
            path if source.is_none() => source = Some(PathBuf::from(path)),
            extra => bail!("Unexpected argument {extra}"),
        }
    }

    Ok(Args {
        source: source.context("No source file given")?,
        config,
    })
}

/// Engine options with the configured values laid over the defaults.
fn render_options(config: &Config) -> RenderOptions {
    let defaults = RenderOptions::default();
    RenderOptions {
        stylesheet: config.stylesheet.clone(),
        external_stylesheets: config
            .external_stylesheets
            .clone()
            .unwrap_or(defaults.external_stylesheets),
        index_file_name: config
            .index_file_name
            .clone()
            .unwrap_or(defaults.index_file_name),
        escape_code_output: config
            .escape_code_output
            .unwrap_or(defaults.escape_code_output),
    }
}

fn code_timeout(config: &Config) -> Duration {
    config
        .code_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(ProcessExecutor::DEFAULT_TIMEOUT)
}

fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_or_default(args.config.as_deref()).with_context(|| {
        format!("Failed to load config file '{}'", config_path.display())
    })?;
    log::debug!("Using config {config:?}");

    let executor = ProcessExecutor::new(code_timeout(&config));
    let mut renderer = Renderer::new(executor, render_options(&config));

    let output = renderer
        .compile_file(&args.source)
        .with_context(|| format!("Failed to compile '{}'", args.source.display()))?;

    log::info!("Wrote {}", output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let argv: Vec<String> = env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            let program = argv.first().map(String::as_str).unwrap_or("scrip");
            eprintln!("Usage: {program} [--config <config.toml>] <file.scrip>");
            process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
