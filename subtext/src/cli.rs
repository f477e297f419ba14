//! CLI argument definitions using clap.

use crate::client::{FasterWhisper, YtDlp};
use crate::config::Config;
use crate::run;
use clap::Parser;
use color_eyre::Section;
use eyre::{Result, WrapErr, ensure};
use std::io::{BufRead, Write};
use std::path::Path;

const CONFIG_PATH: &str = "config.json";

#[derive(Debug, Parser)]
#[command(name = "subtext")]
#[command(about = "Turn video and collection URLs into clean plain-text transcripts")]
#[command(version)]
pub struct Cli {
    /// Video or collection URL; read from stdin when omitted and the
    /// configuration lists no URLs
    pub url: Option<String>,
}

/// Execute the CLI - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    let config = Config::load(Path::new(CONFIG_PATH))
        .wrap_err("cannot start without a valid configuration")
        .suggestion(
            "create a config.json next to the binary with srt_path, audio_path, \
             out_path, and model_path set",
        )?;

    let refs = gather_references(&cli, &config)?;

    let client = YtDlp;
    let mut engine = FasterWhisper::new(&config.model_path);

    run::run(&client, &mut engine, &config, &refs)
}

/// Configured URLs first, then the CLI reference; when both are absent one
/// reference is read interactively from standard input.
fn gather_references(cli: &Cli, config: &Config) -> Result<Vec<String>> {
    let mut refs = config.urls.clone();

    if let Some(url) = &cli.url {
        refs.push(url.clone());
    }

    if refs.is_empty() {
        refs.push(prompt_for_reference()?);
    }

    Ok(refs)
}

fn prompt_for_reference() -> Result<String> {
    print!("enter a video or collection URL: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .wrap_err("failed to read reference from stdin")?;

    let line = line.trim().to_string();
    ensure!(!line.is_empty(), "no reference provided");
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_invocation() {
        let cli = Cli::parse_from(["subtext"]);
        assert_eq!(cli.url, None);
    }

    #[test]
    fn parses_positional_reference() {
        let cli = Cli::parse_from(["subtext", "https://x/space/1/favlist/2"]);
        assert_eq!(cli.url.as_deref(), Some("https://x/space/1/favlist/2"));
    }

    #[test]
    fn rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["subtext", "one", "two"]).is_err());
    }
}
