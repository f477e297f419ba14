//! JSON configuration loading and validation.
//!
//! The configuration is deserialized into a typed struct and validated once
//! at the boundary; the rest of the pipeline reads named fields. A missing
//! or malformed file is fatal before any reference is processed.

use eyre::{Result, WrapErr, ensure};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_subtitle_langs() -> Vec<String> {
    vec!["ai-zh".to_string()]
}

fn default_output_template() -> String {
    "%(title)s.%(ext)s".to_string()
}

fn default_max_retries() -> u32 {
    3
}

/// Run configuration loaded from `config.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Input video or collection references, processed in order
    #[serde(default)]
    pub urls: Vec<String>,

    /// Directory for fetched and generated subtitle files
    pub srt_path: PathBuf,

    /// Directory for fallback audio downloads
    pub audio_path: PathBuf,

    /// Directory for cleaned plain-text transcripts
    pub out_path: PathBuf,

    /// Local speech model location
    pub model_path: PathBuf,

    /// Optional credential file, attached to caption-path requests only
    #[serde(default)]
    pub cookiefile: Option<PathBuf>,

    /// Optional proxy URL forwarded to every download job
    #[serde(default)]
    pub proxy: Option<String>,

    /// Caption language preference, most preferred first
    #[serde(default = "default_subtitle_langs")]
    pub subtitle_langs: Vec<String>,

    /// yt-dlp filename template for downloaded artifacts
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Retry count forwarded to the platform client
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Socket timeout in seconds forwarded to the platform client
    #[serde(default)]
    pub timeout: Option<f64>,
}

impl Config {
    /// Read and validate the configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config: {}", path.display()))?;

        let config: Config = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("malformed config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.model_path.as_os_str().is_empty(),
            "model_path must not be empty"
        );
        ensure!(
            !self.subtitle_langs.is_empty(),
            "subtitle_langs must not be empty"
        );
        ensure!(
            !self.output_template.is_empty(),
            "output_template must not be empty"
        );
        Ok(())
    }
}
