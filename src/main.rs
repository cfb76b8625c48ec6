mod cli;

use cachefetch::{CacheEnv, Config, DownloadResult, Downloader, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path)?.apply_env(|key| std::env::var(key).ok()),
        None => Config::from_env(),
    }
}

fn render_result(result: &DownloadResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let env = CacheEnv::from_process();
    let open = || Downloader::from_config(&config, &env);

    match cli.command {
        Commands::Dir => {
            println!("{}", open()?.cache_dir().display());
        }

        Commands::Fetch { url, filename } => {
            let result = open()?.download(&url, &filename)?;
            println!("{}", render_result(&result)?);
        }

        Commands::Json { url } => {
            let document: serde_json::Value = open()?.fetch_json(&url)?;
            println!("{:#}", document);
        }

        Commands::Clear { yes } => {
            let cache_dir = Downloader::resolve_cache_dir(&config, &env)?;
            if !yes {
                eprintln!(
                    "This deletes {} and everything in it. Re-run with --yes to confirm.",
                    cache_dir.display()
                );
                return Ok(());
            }
            Downloader::with_timeout(&cache_dir, config.timeout())?.clear_cache()?;
            eprintln!("✓ Cleared {}", cache_dir.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn fetch_output_is_download_result_json() {
        let result = DownloadResult {
            path: PathBuf::from("/cache/tools/f.bin"),
            size: 5,
            version: None,
        };

        let output = render_result(&result).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({ "path": "/cache/tools/f.bin", "size": 5, "version": null })
        );

        let back: DownloadResult = serde_json::from_str(&output).unwrap();
        assert_eq!(back, result);
    }
}
