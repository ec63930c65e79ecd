use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use hls_rewrite::{FetchConfig, Manifest, ManifestSource, QueryParams, RewriteOptions};
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;
use url::Url;

mod cli;
mod error;

use cli::CliArgs;
use error::AppError;

fn main() {
    if let Err(e) = bootstrap() {
        eprintln!("Error: {e}");
        error!(error = ?e, "Application failed");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn bootstrap() -> Result<(), AppError> {
    let args = CliArgs::parse();

    // Logs go to stderr: stdout carries the rewritten playlist.
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Initialization(e.to_string()))?;

    let source = parse_source(&args.input)?;
    let options = build_options(&args)?;
    let config = build_config(&args);

    debug!(input = %args.input, "Rewriting manifest");
    let manifest = Manifest::fetch_with_config(source, options, &config).await?;
    print!("{manifest}");
    Ok(())
}

fn parse_source(input: &str) -> Result<ManifestSource, AppError> {
    if input.starts_with("http://") || input.starts_with("https://") {
        Ok(ManifestSource::Url(Url::parse(input)?))
    } else {
        Ok(ManifestSource::File(PathBuf::from(input)))
    }
}

fn build_options(args: &CliArgs) -> Result<RewriteOptions, AppError> {
    let mut options = RewriteOptions::new();

    if !args.params.is_empty() {
        let mut params = QueryParams::new();
        for spec in &args.params {
            let (key, value) = spec.split_once('=').ok_or_else(|| {
                AppError::InvalidInput(format!("expected KEY=VALUE, got '{spec}'"))
            })?;
            params.append(key, value);
        }
        options = options.with_params(params);
    }

    if let Some(prepend) = &args.prepend {
        options = options.with_prepend(Url::parse(prepend)?);
    }

    for name in &args.remove {
        options = options.with_remove(name.as_str());
    }

    Ok(options.with_chroot(args.chroot))
}

fn build_config(args: &CliArgs) -> FetchConfig {
    let mut config = FetchConfig {
        timeout: Duration::from_secs(args.timeout),
        ..Default::default()
    };
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = user_agent.clone();
    }
    config
}
